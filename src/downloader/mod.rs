//! Batch download orchestrator split into focused submodules.
//!
//! The `BatchDownloader` struct and its methods are organized by domain:
//! - [`transport`] - Media/comment transport seam and transfer requests
//! - [`queue`] - Queue items, guarded state transitions and progress
//! - [`run`] - The sequential run loop (download and comments-only modes)
//! - [`control`] - Cancellation
//!
//! A `BatchDownloader` drives exactly one run. Items are processed strictly one at a time,
//! in input order, with a configurable pause between items to stay under upstream rate
//! limits. Per-item failures are recorded on the item and never abort the run.

mod control;
mod queue;
mod run;
mod transport;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

pub use queue::CANCELLED_MESSAGE;
pub use transport::{MediaPayload, MediaTransport, TransferRequest};

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::client::DashboardClient;
use crate::config::Config;
use crate::error::Result;
use crate::export::{ArtifactSink, DirectorySink};
use crate::types::{Event, RunSnapshot};

use queue::RunState;

/// Capacity of the event broadcast channel
const EVENT_CHANNEL_CAPACITY: usize = 1000;

/// Orchestrates one batch run (cloneable - all fields are Arc-wrapped)
///
/// Clones share the same run, so one clone can drive [`start`](Self::start) while another
/// calls [`cancel_all`](Self::cancel_all) or polls [`snapshot`](Self::snapshot).
#[derive(Clone)]
pub struct BatchDownloader {
    /// Configuration (wrapped in Arc for sharing across tasks)
    pub(crate) config: Arc<Config>,
    /// Fetches media and comments
    pub(crate) transport: Arc<dyn MediaTransport>,
    /// Saves downloaded media and exported sheets
    pub(crate) sink: Arc<dyn ArtifactSink>,
    /// Queue items and run flags
    pub(crate) state: Arc<tokio::sync::Mutex<RunState>>,
    /// Cancelled by `cancel_all`; wakes the run loop out of its pacing delay
    pub(crate) cancel_token: CancellationToken,
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: tokio::sync::broadcast::Sender<Event>,
}

impl BatchDownloader {
    /// Create a downloader with explicit collaborators
    pub fn new(
        config: Config,
        transport: Arc<dyn MediaTransport>,
        sink: Arc<dyn ArtifactSink>,
    ) -> Self {
        let (event_tx, _rx) = tokio::sync::broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            config: Arc::new(config),
            transport,
            sink,
            state: Arc::new(tokio::sync::Mutex::new(RunState::default())),
            cancel_token: CancellationToken::new(),
            event_tx,
        }
    }

    /// Create a downloader talking to the configured backend and writing to the configured
    /// directories
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or the HTTP client cannot be built
    pub fn from_config(config: Config) -> Result<Self> {
        config.validate()?;
        let transport = Arc::new(DashboardClient::new(&config.api)?);
        let sink = Arc::new(DirectorySink::from_config(&config));
        Ok(Self::new(config, transport, sink))
    }

    /// Subscribe to run events
    ///
    /// Multiple subscribers are supported. Each subscriber receives all events independently.
    /// If a subscriber falls behind by more than 1000 events it receives
    /// `RecvError::Lagged`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use creator_dl::{BatchDownloader, Config, Event};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let downloader = BatchDownloader::from_config(Config::default())?;
    ///
    ///     let mut events = downloader.subscribe();
    ///     tokio::spawn(async move {
    ///         while let Ok(event) = events.recv().await {
    ///             if let Event::Progress { percent, .. } = event {
    ///                 println!("{percent}%");
    ///             }
    ///         }
    ///     });
    ///
    ///     Ok(())
    /// }
    /// ```
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Current configuration
    pub fn config(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }

    /// Point-in-time copy of the queue and run flags
    pub async fn snapshot(&self) -> RunSnapshot {
        self.state.lock().await.snapshot()
    }

    /// Emit an event to all subscribers
    ///
    /// If there are no active subscribers the event is dropped.
    pub(crate) fn emit_event(&self, event: Event) {
        self.event_tx.send(event).ok();
    }
}
