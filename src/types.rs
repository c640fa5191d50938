//! Core types for creator-dl

use serde::{Deserialize, Deserializer, Serialize};

/// Social platform a video record was scraped from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Instagram posts and reels
    #[default]
    Instagram,
    /// TikTok videos
    TikTok,
    /// YouTube videos and shorts
    YouTube,
}

impl Platform {
    /// Short tag used as the first segment of derived media filenames
    pub fn tag(&self) -> &'static str {
        match self {
            Platform::Instagram => "IG",
            Platform::TikTok => "TT",
            Platform::YouTube => "YT",
        }
    }

    /// Lowercase label, used as the export slug when no creator username is known
    pub fn label(&self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::TikTok => "tiktok",
            Platform::YouTube => "youtube",
        }
    }
}

/// Requested media quality for extractor-backed downloads
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quality {
    /// Best available format
    #[default]
    #[serde(rename = "best")]
    Best,
    /// Up to 1080p
    #[serde(rename = "1080")]
    P1080,
    /// Up to 720p
    #[serde(rename = "720")]
    P720,
    /// Up to 480p
    #[serde(rename = "480")]
    P480,
    /// Audio track only
    #[serde(rename = "audio")]
    Audio,
}

impl Quality {
    /// Query-string value understood by the download endpoint
    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Best => "best",
            Quality::P1080 => "1080",
            Quality::P720 => "720",
            Quality::P480 => "480",
            Quality::Audio => "audio",
        }
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of post a video record represents
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum MediaType {
    /// Regular feed video post
    #[default]
    #[serde(rename = "video")]
    VideoPost,
    /// Short-form post (reel, clip, short)
    #[serde(rename = "reel")]
    ShortFormPost,
    /// Ephemeral story
    #[serde(rename = "story")]
    Story,
}

impl MediaType {
    /// Parse a platform-specific type label, defaulting to a plain video post
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "reel" | "reels" | "clip" | "clips" | "short" | "shorts" => MediaType::ShortFormPost,
            "story" | "stories" => MediaType::Story,
            _ => MediaType::VideoPost,
        }
    }

    /// Label written to the export "Type" column
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::VideoPost => "video",
            MediaType::ShortFormPost => "reel",
            MediaType::Story => "story",
        }
    }
}

impl<'de> Deserialize<'de> for MediaType {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = Option::<String>::deserialize(deserializer)?;
        Ok(label.map(|l| MediaType::parse(&l)).unwrap_or_default())
    }
}

/// A cached video as served by the dashboard backend
///
/// Field names on the wire follow the backend's cache table; numeric fields tolerate
/// `null` and floating point values (durations come back fractional from some scrapers).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    /// Unique identifier within a result set (the post shortcode)
    #[serde(rename = "shortcode", deserialize_with = "lenient::string")]
    pub identifier: String,

    /// Public post URL
    #[serde(rename = "url", default, deserialize_with = "lenient::string")]
    pub source_url: String,

    /// Pre-resolved CDN media URL; when present the direct download path is used
    #[serde(
        rename = "video_url",
        default,
        deserialize_with = "lenient::non_empty",
        skip_serializing_if = "Option::is_none"
    )]
    pub direct_media_url: Option<String>,

    /// Caption headline (may be empty)
    #[serde(rename = "caption", default, deserialize_with = "lenient::string")]
    pub title: String,

    /// Full caption text when the backend stores it separately from the headline
    #[serde(
        rename = "caption_full",
        default,
        deserialize_with = "lenient::non_empty",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,

    /// View count
    #[serde(rename = "views", default, deserialize_with = "lenient::count")]
    pub view_count: u64,

    /// Like count
    #[serde(rename = "likes", default, deserialize_with = "lenient::count")]
    pub like_count: u64,

    /// Comment count as reported by the platform
    #[serde(rename = "comments", default, deserialize_with = "lenient::count")]
    pub comment_count: u64,

    /// Duration in whole seconds
    #[serde(
        rename = "duration",
        default,
        deserialize_with = "lenient::seconds",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration_seconds: Option<u64>,

    /// Publish date, ISO-8601 or compact `YYYYMMDD`
    #[serde(
        rename = "timestamp",
        default,
        deserialize_with = "lenient::non_empty",
        skip_serializing_if = "Option::is_none"
    )]
    pub published_at: Option<String>,

    /// Thumbnail URL (may be empty)
    #[serde(rename = "thumbnail", default, deserialize_with = "lenient::string")]
    pub thumbnail_url: String,

    /// Post kind
    #[serde(rename = "type", default)]
    pub media_type: MediaType,
}

/// A single reply under a comment
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CommentReply {
    /// Reply identifier
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    /// Reply author username
    #[serde(default, deserialize_with = "lenient::string")]
    pub author: String,
    /// Reply text
    #[serde(default, deserialize_with = "lenient::string")]
    pub text: String,
    /// Like count
    #[serde(default, deserialize_with = "lenient::count")]
    pub likes: u64,
    /// ISO-8601 creation time
    #[serde(default, deserialize_with = "lenient::non_empty")]
    pub timestamp: Option<String>,
}

/// A comment as returned by the comment-fetch endpoint
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CommentRecord {
    /// Comment identifier (numeric on some platforms, kept as text)
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    /// Author username
    #[serde(default, deserialize_with = "lenient::string")]
    pub author: String,
    /// Whether the author account is verified
    #[serde(default, deserialize_with = "lenient::flag")]
    pub author_verified: bool,
    /// Comment text
    #[serde(default, deserialize_with = "lenient::string")]
    pub text: String,
    /// Like count
    #[serde(default, deserialize_with = "lenient::count")]
    pub likes: u64,
    /// ISO-8601 creation time
    #[serde(default, deserialize_with = "lenient::non_empty")]
    pub timestamp: Option<String>,
    /// Number of replies under this comment
    #[serde(
        rename = "answers_count",
        alias = "reply_count",
        default,
        deserialize_with = "lenient::count"
    )]
    pub reply_count: u64,
    /// First replies, when the backend included them
    #[serde(default)]
    pub replies: Vec<CommentReply>,
}

/// Back-reference from a collected comment to the video it belongs to
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRef {
    /// Owning video's identifier
    pub identifier: String,
    /// Owning video's title
    pub title: String,
    /// Owning video's post URL
    pub url: String,
}

impl From<&VideoRecord> for VideoRef {
    fn from(video: &VideoRecord) -> Self {
        Self {
            identifier: video.identifier.clone(),
            title: video.title.clone(),
            url: video.source_url.clone(),
        }
    }
}

/// A comment collected during a run, tagged with its owning video
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CollectedComment {
    /// Owning video
    pub video: VideoRef,
    /// The comment itself
    pub comment: CommentRecord,
}

/// Response of the list/refresh video endpoints
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct VideoListResponse {
    /// Cached videos
    #[serde(default)]
    pub videos: Vec<VideoRecord>,
    /// When the cache was last refreshed, if ever
    #[serde(rename = "lastUpdate", alias = "last_update", default)]
    pub last_update: Option<String>,
    /// Profile the cache belongs to
    #[serde(default)]
    pub username: Option<String>,
}

/// Raw response of the comment-fetch endpoint (either a page of comments or an error)
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CommentsResponse {
    /// Fetched comments
    #[serde(default)]
    pub comments: Vec<CommentRecord>,
    /// Number of comments fetched
    #[serde(default, deserialize_with = "lenient::count")]
    pub fetched_comments: u64,
    /// Error reported by the scraper
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Status of a queue item's media transfer leg
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// Waiting for its turn
    Pending,
    /// Transfer in flight
    Downloading,
    /// Transfer finished and the file was saved
    Completed,
    /// Transfer failed or the run was cancelled
    Failed,
}

impl ItemStatus {
    /// Position in the forward-only lifecycle
    pub(crate) fn rank(&self) -> u8 {
        match self {
            ItemStatus::Pending => 0,
            ItemStatus::Downloading => 1,
            ItemStatus::Completed | ItemStatus::Failed => 2,
        }
    }

    /// Whether no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, ItemStatus::Completed | ItemStatus::Failed)
    }
}

/// Status of a queue item's comment collection leg
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentsStatus {
    /// Comment collection not requested for this run
    #[default]
    None,
    /// Waiting for its turn
    Pending,
    /// Fetch in flight
    Fetching,
    /// Comments fetched
    Completed,
    /// Fetch failed or the run was cancelled
    Failed,
}

impl CommentsStatus {
    pub(crate) fn rank(&self) -> u8 {
        match self {
            CommentsStatus::None => 0,
            CommentsStatus::Pending => 1,
            CommentsStatus::Fetching => 2,
            CommentsStatus::Completed | CommentsStatus::Failed => 3,
        }
    }

    /// Whether no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, CommentsStatus::Completed | CommentsStatus::Failed)
    }
}

/// One unit of orchestrated work: a video plus its processing state
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueueItem {
    /// The video being processed (never mutated)
    pub video: VideoRecord,
    /// Media transfer leg
    pub status: ItemStatus,
    /// Comment collection leg
    pub comments_status: CommentsStatus,
    /// Transfer error message, present only when `status` is failed
    pub error: Option<String>,
    /// Comment fetch error message, present only when `comments_status` is failed
    pub comments_error: Option<String>,
    /// Filename derived at enqueue time
    pub filename: String,
    /// Number of comments collected, set when the comment leg completes
    pub comment_count: Option<usize>,
}

/// What a run does with each queue item
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Transfer media (and optionally collect comments)
    Download,
    /// Collect comments only; media legs are marked completed up front
    CommentsOnly,
}

/// Aggregate progress of a run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Items counted as completed
    pub completed: usize,
    /// Items counted as failed
    pub failed: usize,
    /// Items in the queue
    pub total: usize,
    /// `round(100 * completed / total)`, 0 when the queue is empty
    pub percent: u8,
}

impl Progress {
    /// Build progress from raw counts
    pub fn from_counts(completed: usize, failed: usize, total: usize) -> Self {
        let percent = if total == 0 {
            0
        } else {
            ((completed as f64 / total as f64) * 100.0).round() as u8
        };
        Self {
            completed,
            failed,
            total,
            percent,
        }
    }
}

/// Which spreadsheet an export event refers to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    /// Video metadata sheet
    Videos,
    /// Comment sheet
    Comments,
}

impl ExportKind {
    /// Fixed filename prefix of this sheet
    pub fn prefix(&self) -> &'static str {
        match self {
            ExportKind::Videos => "videos",
            ExportKind::Comments => "comments",
        }
    }
}

/// Event emitted during a download run
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Queue built and processing is about to begin
    RunStarted {
        /// Run mode
        mode: RunMode,
        /// Number of queue items
        total: usize,
    },

    /// A queue item changed state
    ItemUpdated {
        /// Position in the queue
        index: usize,
        /// Video identifier
        identifier: String,
        /// Media leg status
        status: ItemStatus,
        /// Comment leg status
        comments_status: CommentsStatus,
        /// Failure message, if any
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },

    /// Aggregate progress changed
    Progress {
        /// Completed items
        completed: usize,
        /// Failed items
        failed: usize,
        /// Queue size
        total: usize,
        /// Rounded percentage
        percent: u8,
    },

    /// A spreadsheet was saved
    ExportWritten {
        /// Which sheet
        kind: ExportKind,
        /// Saved filename
        filename: String,
        /// Number of data rows
        rows: usize,
    },

    /// A spreadsheet could not be saved (the run continues)
    ExportFailed {
        /// Which sheet
        kind: ExportKind,
        /// Error message
        error: String,
    },

    /// Comment collection finished without a single comment
    NoCommentsFound,

    /// The run was cancelled by the user
    Cancelled,

    /// The run is no longer running
    RunFinished {
        /// Completed items
        completed: usize,
        /// Failed items
        failed: usize,
        /// Whether the run was cancelled
        cancelled: bool,
    },
}

/// Point-in-time view of a run for polling consumers
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSnapshot {
    /// Run mode, `None` before the run starts
    pub mode: Option<RunMode>,
    /// Whether the run is still processing
    pub running: bool,
    /// Whether the run was cancelled
    pub aborted: bool,
    /// Queue items in processing order
    pub items: Vec<QueueItem>,
    /// Aggregate progress of the media legs
    pub progress: Progress,
    /// Aggregate progress of the comment legs
    pub comment_progress: Progress,
}

/// Outcome of a finished run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    /// Run mode
    pub mode: RunMode,
    /// Final progress of the media legs
    pub progress: Progress,
    /// Final progress of the comment legs
    pub comment_progress: Progress,
    /// Whether the run was cancelled
    pub cancelled: bool,
    /// Comments collected across all items
    pub comments_collected: usize,
    /// Filename of the video sheet, if one was saved
    pub video_export: Option<String>,
    /// Filename of the comment sheet, if one was saved
    pub comment_export: Option<String>,
}

/// Tolerant field deserializers for scraper-produced JSON
pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Int(i64),
        Float(f64),
        Bool(bool),
        Text(String),
    }

    impl Scalar {
        fn into_u64(self) -> u64 {
            match self {
                Scalar::Int(n) => n.max(0) as u64,
                Scalar::Float(f) if f.is_finite() && f > 0.0 => f.floor() as u64,
                Scalar::Float(_) | Scalar::Bool(_) => 0,
                Scalar::Text(s) => s.trim().parse::<f64>().map_or(0, |f| {
                    if f.is_finite() && f > 0.0 {
                        f.floor() as u64
                    } else {
                        0
                    }
                }),
            }
        }

        fn into_string(self) -> String {
            match self {
                Scalar::Int(n) => n.to_string(),
                Scalar::Float(f) => f.to_string(),
                Scalar::Bool(b) => b.to_string(),
                Scalar::Text(s) => s,
            }
        }
    }

    pub fn count<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Scalar>::deserialize(deserializer)?.map_or(0, Scalar::into_u64))
    }

    pub fn seconds<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Scalar>::deserialize(deserializer)?.map(Scalar::into_u64))
    }

    pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Scalar>::deserialize(deserializer)?
            .map(Scalar::into_string)
            .unwrap_or_default())
    }

    pub fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Scalar>::deserialize(deserializer)?
            .map(Scalar::into_string)
            .filter(|s| !s.trim().is_empty()))
    }

    pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Scalar>::deserialize(deserializer)? {
            Some(Scalar::Bool(b)) => b,
            Some(Scalar::Int(n)) => n != 0,
            Some(Scalar::Text(s)) => matches!(s.as_str(), "true" | "1"),
            _ => false,
        })
    }
}
