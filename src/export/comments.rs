//! Comment sheet.

use super::SheetSpec;
use crate::format::format_published;
use crate::types::{CollectedComment, ExportKind};

/// Comment sheet layout
pub struct CommentSheet;

impl SheetSpec for CommentSheet {
    type Record = CollectedComment;

    const KIND: ExportKind = ExportKind::Comments;

    const HEADERS: &'static [&'static str] = &[
        "Video Shortcode",
        "Video Title",
        "Video URL",
        "Comment ID",
        "Author",
        "Author Verified(Sim/Nao)",
        "Text",
        "Likes",
        "Date",
        "Reply Count",
    ];

    fn row(entry: &CollectedComment) -> Vec<String> {
        let comment = &entry.comment;
        vec![
            entry.video.identifier.clone(),
            entry.video.title.clone(),
            entry.video.url.clone(),
            comment.id.clone(),
            comment.author.clone(),
            if comment.author_verified { "Sim" } else { "Nao" }.to_string(),
            comment.text.clone(),
            comment.likes.to_string(),
            format_published(comment.timestamp.as_deref()),
            comment.reply_count.to_string(),
        ]
    }
}
