//! Run control (cancellation).

use crate::types::Event;

use super::BatchDownloader;

impl BatchDownloader {
    /// Cancel the run
    ///
    /// Every pending or in-flight leg is failed with [`CANCELLED_MESSAGE`] and the run is
    /// marked not running. A transfer already in flight is not interrupted; when it finishes,
    /// its real outcome replaces the cancellation failure. The run loop wakes from its pacing
    /// delay immediately and stops.
    ///
    /// Safe to call at any time: before the run starts, after it finishes, or repeatedly, it
    /// does nothing.
    ///
    /// [`CANCELLED_MESSAGE`]: super::CANCELLED_MESSAGE
    pub async fn cancel_all(&self) {
        let mut state = self.state.lock().await;
        if !state.running || state.aborted {
            return;
        }

        state.aborted = true;
        state.running = false;
        self.cancel_token.cancel();

        let updates: Vec<Event> = state
            .items
            .iter_mut()
            .enumerate()
            .filter_map(|(index, item)| item.cancel().then(|| item.update_event(index)))
            .collect();

        tracing::info!(cancelled_items = updates.len(), "Batch run cancelled");
        for event in updates {
            self.emit_event(event);
        }
        self.emit_event(state.progress_event());
        self.emit_event(Event::Cancelled);
    }

    /// Whether the run has been cancelled
    pub async fn is_cancelled(&self) -> bool {
        self.state.lock().await.aborted
    }
}
