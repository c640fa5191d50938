//! # creator-dl
//!
//! Batch media download and metadata export for creator video dashboards.
//!
//! ## Design Philosophy
//!
//! creator-dl is designed to be:
//! - **Sequential by design** - One transfer at a time, paced to stay under upstream rate limits
//! - **Failure-contained** - A failed item is recorded and the run moves on; nothing is retried
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//! - **Event-driven** - Consumers subscribe to events, no polling required
//!
//! ## Quick Start
//!
//! ```no_run
//! use creator_dl::{BatchDownloader, Config, DashboardClient, Quality, SelectionSet};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let client = DashboardClient::new(&config.api)?;
//!     let cached = client.list_videos().await?.videos;
//!
//!     let ranked = creator_dl::selection::rank_by(&cached, creator_dl::Metric::Views);
//!     let mut selection = SelectionSet::new();
//!     selection.select_top_n(&ranked, 5);
//!     let chosen: Vec<_> = selection.selected_videos(&cached).into_iter().cloned().collect();
//!
//!     let downloader = BatchDownloader::from_config(config)?;
//!     let mut events = downloader.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     let summary = downloader.start(&chosen, Quality::Best).await?;
//!     println!("{} of {} downloaded", summary.progress.completed, summary.progress.total);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// HTTP client for the dashboard backend
pub mod client;
/// Configuration types
pub mod config;
/// Batch download orchestrator
pub mod downloader;
/// Error types
pub mod error;
/// Spreadsheet export
pub mod export;
/// Filter and sort over cached videos
pub mod filter;
/// Display formatting and filename derivation
pub mod format;
/// Selection set and ranking
pub mod selection;
/// Core types and events
pub mod types;
/// Utility functions
pub mod utils;

// Re-export commonly used types
pub use client::DashboardClient;
pub use config::Config;
pub use downloader::{
    BatchDownloader, CANCELLED_MESSAGE, MediaPayload, MediaTransport, TransferRequest,
};
pub use error::{Error, Result};
pub use export::{ArtifactKind, ArtifactSink, DirectorySink};
pub use filter::{DateRange, SortOption, SortOrder, VideoFilter};
pub use selection::{Metric, RankBadge, SelectionSet};
pub use types::{
    CommentRecord, CommentsStatus, Event, ItemStatus, Platform, Progress, Quality, QueueItem,
    RunMode, RunSnapshot, RunSummary, VideoRecord,
};
