//! Video metadata sheet.

use super::SheetSpec;
use crate::format::{format_duration, format_published};
use crate::types::{ExportKind, VideoRecord};

/// Video metadata sheet layout
pub struct VideoSheet;

impl SheetSpec for VideoSheet {
    type Record = VideoRecord;

    const KIND: ExportKind = ExportKind::Videos;

    const HEADERS: &'static [&'static str] = &[
        "Shortcode",
        "Title",
        "Full Description",
        "Views",
        "Likes",
        "Comments",
        "Duration(s)",
        "Duration(formatted)",
        "Type",
        "Publish Date",
        "Post URL",
        "Video URL",
        "Thumbnail URL",
    ];

    fn row(video: &VideoRecord) -> Vec<String> {
        vec![
            video.identifier.clone(),
            video.title.clone(),
            video
                .description
                .clone()
                .unwrap_or_else(|| video.title.clone()),
            video.view_count.to_string(),
            video.like_count.to_string(),
            video.comment_count.to_string(),
            video.duration_seconds.unwrap_or(0).to_string(),
            format_duration(video.duration_seconds),
            video.media_type.as_str().to_string(),
            format_published(video.published_at.as_deref()),
            video.source_url.clone(),
            video.direct_media_url.clone().unwrap_or_default(),
            video.thumbnail_url.clone(),
        ]
    }
}
