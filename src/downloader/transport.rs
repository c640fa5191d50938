//! Transport seam: how a queue item's media and comments are fetched.

use crate::error::Result;
use crate::types::{CommentRecord, Quality, VideoRecord};

/// How a single media transfer is requested
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransferRequest {
    /// Pre-resolved CDN URL, fetched through the backend's direct proxy
    Direct {
        /// Direct media URL
        url: String,
        /// Advisory filename
        filename: String,
    },
    /// Source post URL, resolved by the backend's extractor at the requested quality
    Extract {
        /// Public post URL
        source_url: String,
        /// Requested quality
        quality: Quality,
        /// Advisory filename
        filename: String,
    },
}

impl TransferRequest {
    /// Pick the transfer path for a video: direct when it carries a media URL
    pub fn for_video(video: &VideoRecord, quality: Quality, filename: &str) -> Self {
        match &video.direct_media_url {
            Some(url) => TransferRequest::Direct {
                url: url.clone(),
                filename: filename.to_string(),
            },
            None => TransferRequest::Extract {
                source_url: video.source_url.clone(),
                quality,
                filename: filename.to_string(),
            },
        }
    }

    /// Advisory filename carried by the request
    pub fn filename(&self) -> &str {
        match self {
            TransferRequest::Direct { filename, .. } | TransferRequest::Extract { filename, .. } => {
                filename
            }
        }
    }

    /// Whether this is the direct path
    pub fn is_direct(&self) -> bool {
        matches!(self, TransferRequest::Direct { .. })
    }
}

/// A fetched media file
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaPayload {
    /// Filename to save under (server-chosen when the response named one)
    pub filename: String,
    /// File contents
    pub bytes: Vec<u8>,
}

/// Fetches media and comments for queue items
///
/// Implementations report any non-success response or network failure as `Err`; the
/// error's display text is recorded verbatim on the failed item.
#[async_trait::async_trait]
pub trait MediaTransport: Send + Sync {
    /// Fetch one media file
    async fn fetch_media(&self, request: &TransferRequest) -> Result<MediaPayload>;

    /// Fetch up to `limit` comments for a video
    async fn fetch_comments(&self, identifier: &str, limit: u32) -> Result<Vec<CommentRecord>>;
}
