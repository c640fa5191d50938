//! Queue items, guarded state transitions and progress.

use crate::format::derive_filename;
use crate::types::{
    CommentsStatus, Event, ItemStatus, Platform, Progress, QueueItem, RunMode, RunSnapshot,
    VideoRecord,
};

/// Error message recorded on items failed by a user cancellation
pub const CANCELLED_MESSAGE: &str = "Cancelled by user";

impl QueueItem {
    /// Build a pending item; the filename is derived once, here
    pub(crate) fn new(
        video: &VideoRecord,
        platform: Platform,
        mode: RunMode,
        collect_comments: bool,
    ) -> Self {
        let status = match mode {
            RunMode::Download => ItemStatus::Pending,
            RunMode::CommentsOnly => ItemStatus::Completed,
        };
        let comments_status = if collect_comments && !video.identifier.is_empty() {
            CommentsStatus::Pending
        } else {
            CommentsStatus::None
        };

        Self {
            filename: derive_filename(platform, video),
            video: video.clone(),
            status,
            comments_status,
            error: None,
            comments_error: None,
            comment_count: None,
        }
    }

    /// Move the media leg forward; returns false (and changes nothing) for a backward or
    /// post-terminal move
    pub(crate) fn advance(&mut self, next: ItemStatus, error: Option<String>) -> bool {
        if self.status.is_terminal() || next.rank() <= self.status.rank() {
            return false;
        }
        self.status = next;
        if next == ItemStatus::Failed {
            self.error = error;
        }
        true
    }

    /// Move the comment leg forward; same guard as [`advance`](Self::advance)
    pub(crate) fn advance_comments(
        &mut self,
        next: CommentsStatus,
        outcome: Result<usize, String>,
    ) -> bool {
        if self.comments_status == CommentsStatus::None
            || self.comments_status.is_terminal()
            || next.rank() <= self.comments_status.rank()
        {
            return false;
        }
        self.comments_status = next;
        match (next, outcome) {
            (CommentsStatus::Completed, Ok(count)) => self.comment_count = Some(count),
            (CommentsStatus::Failed, Err(message)) => self.comments_error = Some(message),
            _ => {}
        }
        true
    }

    /// Record the real outcome of a transfer that was cancelled while in flight
    ///
    /// Only replaces the cancellation failure itself; a genuine outcome is never overwritten.
    pub(crate) fn settle_interrupted(&mut self, next: ItemStatus, error: Option<String>) -> bool {
        let interrupted =
            self.status == ItemStatus::Failed && self.error.as_deref() == Some(CANCELLED_MESSAGE);
        if !interrupted || !next.is_terminal() {
            return false;
        }
        self.status = next;
        self.error = match next {
            ItemStatus::Failed => error,
            _ => None,
        };
        true
    }

    /// Fail every leg that has not finished yet; returns whether anything changed
    pub(crate) fn cancel(&mut self) -> bool {
        let media = matches!(self.status, ItemStatus::Pending | ItemStatus::Downloading)
            && self.advance(ItemStatus::Failed, Some(CANCELLED_MESSAGE.to_string()));
        let comments = matches!(
            self.comments_status,
            CommentsStatus::Pending | CommentsStatus::Fetching
        ) && self.advance_comments(
            CommentsStatus::Failed,
            Err(CANCELLED_MESSAGE.to_string()),
        );
        media || comments
    }

    /// Event describing this item's current state
    pub(crate) fn update_event(&self, index: usize) -> Event {
        Event::ItemUpdated {
            index,
            identifier: self.video.identifier.clone(),
            status: self.status,
            comments_status: self.comments_status,
            error: self.error.clone().or_else(|| self.comments_error.clone()),
        }
    }
}

/// Queue and run flags of one run
#[derive(Debug, Default)]
pub(crate) struct RunState {
    /// Set when the run is started
    pub(crate) mode: Option<RunMode>,
    /// Processing in progress
    pub(crate) running: bool,
    /// Cancelled by the user
    pub(crate) aborted: bool,
    /// Run loop has exited
    pub(crate) finished: bool,
    /// Items in processing order
    pub(crate) items: Vec<QueueItem>,
}

impl RunState {
    /// Human-readable phase, used in `InvalidState` errors
    pub(crate) fn phase(&self) -> &'static str {
        if self.finished {
            "finished"
        } else if self.mode.is_some() {
            "running"
        } else {
            "idle"
        }
    }

    /// Aggregate progress of the media legs; every item counts toward the total
    pub(crate) fn progress(&self) -> Progress {
        Progress::from_counts(
            self.count_status(ItemStatus::Completed),
            self.count_status(ItemStatus::Failed),
            self.items.len(),
        )
    }

    /// Aggregate progress of the comment legs; items without a comment leg are left out
    pub(crate) fn comment_progress(&self) -> Progress {
        let legs = self
            .items
            .iter()
            .filter(|i| i.comments_status != CommentsStatus::None);
        let (mut completed, mut failed, mut total) = (0, 0, 0);
        for item in legs {
            total += 1;
            match item.comments_status {
                CommentsStatus::Completed => completed += 1,
                CommentsStatus::Failed => failed += 1,
                _ => {}
            }
        }
        Progress::from_counts(completed, failed, total)
    }

    fn count_status(&self, status: ItemStatus) -> usize {
        self.items.iter().filter(|i| i.status == status).count()
    }

    /// Progress as an event
    pub(crate) fn progress_event(&self) -> Event {
        let Progress {
            completed,
            failed,
            total,
            percent,
        } = self.progress();
        Event::Progress {
            completed,
            failed,
            total,
            percent,
        }
    }

    pub(crate) fn snapshot(&self) -> RunSnapshot {
        RunSnapshot {
            mode: self.mode,
            running: self.running,
            aborted: self.aborted,
            items: self.items.clone(),
            progress: self.progress(),
            comment_progress: self.comment_progress(),
        }
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn video(id: &str) -> VideoRecord {
        VideoRecord {
            identifier: id.into(),
            title: "Hello, \"World\"!!".into(),
            view_count: 2_500_000,
            ..Default::default()
        }
    }

    #[test]
    fn new_item_derives_filename_once() {
        let item = QueueItem::new(&video("a"), Platform::Instagram, RunMode::Download, false);
        assert_eq!(item.filename, "IG - 2.5M - Hello World.mp4");
        assert_eq!(item.status, ItemStatus::Pending);
        assert_eq!(item.comments_status, CommentsStatus::None);
    }

    #[test]
    fn comments_only_items_start_with_media_leg_completed() {
        let item = QueueItem::new(&video("a"), Platform::TikTok, RunMode::CommentsOnly, true);
        assert_eq!(item.status, ItemStatus::Completed);
        assert_eq!(item.comments_status, CommentsStatus::Pending);
    }

    #[test]
    fn items_without_identifier_get_no_comment_leg() {
        let item = QueueItem::new(&video(""), Platform::Instagram, RunMode::Download, true);
        assert_eq!(item.comments_status, CommentsStatus::None);
    }

    #[test]
    fn media_leg_never_moves_backward() {
        let mut item = QueueItem::new(&video("a"), Platform::Instagram, RunMode::Download, false);
        assert!(item.advance(ItemStatus::Downloading, None));
        assert!(!item.advance(ItemStatus::Pending, None));
        assert!(item.advance(ItemStatus::Completed, None));
        assert!(!item.advance(ItemStatus::Failed, Some("late".into())));
        assert_eq!(item.status, ItemStatus::Completed);
        assert!(item.error.is_none());
    }

    #[test]
    fn cancel_fails_unfinished_legs_only() {
        let mut item = QueueItem::new(&video("a"), Platform::Instagram, RunMode::Download, true);
        item.advance(ItemStatus::Downloading, None);
        assert!(item.cancel());
        assert_eq!(item.status, ItemStatus::Failed);
        assert_eq!(item.error.as_deref(), Some(CANCELLED_MESSAGE));
        assert_eq!(item.comments_status, CommentsStatus::Failed);
        assert_eq!(item.comments_error.as_deref(), Some(CANCELLED_MESSAGE));

        // Second cancel is a no-op
        assert!(!item.cancel());

        let mut done = QueueItem::new(&video("b"), Platform::Instagram, RunMode::Download, false);
        done.advance(ItemStatus::Downloading, None);
        done.advance(ItemStatus::Completed, None);
        assert!(!done.cancel());
        assert_eq!(done.status, ItemStatus::Completed);
    }

    #[test]
    fn comment_leg_records_count_or_error() {
        let mut ok = QueueItem::new(&video("a"), Platform::Instagram, RunMode::Download, true);
        assert!(ok.advance_comments(CommentsStatus::Fetching, Ok(0)));
        assert!(ok.advance_comments(CommentsStatus::Completed, Ok(12)));
        assert_eq!(ok.comment_count, Some(12));

        let mut bad = QueueItem::new(&video("b"), Platform::Instagram, RunMode::Download, true);
        bad.advance_comments(CommentsStatus::Fetching, Ok(0));
        assert!(bad.advance_comments(CommentsStatus::Failed, Err("HTTP 500".into())));
        assert_eq!(bad.comments_error.as_deref(), Some("HTTP 500"));
        assert!(bad.comment_count.is_none());
    }

    #[test]
    fn progress_counts_media_legs_in_download_mode() {
        let mut state = RunState {
            mode: Some(RunMode::Download),
            ..Default::default()
        };
        for id in ["a", "b", "c"] {
            state.items.push(QueueItem::new(
                &video(id),
                Platform::Instagram,
                RunMode::Download,
                false,
            ));
        }
        assert_eq!(state.progress(), Progress::from_counts(0, 0, 3));

        state.items[0].advance(ItemStatus::Completed, None);
        state.items[1].advance(ItemStatus::Failed, Some("boom".into()));
        let progress = state.progress();
        assert_eq!(progress.completed, 1);
        assert_eq!(progress.failed, 1);
        assert_eq!(progress.total, 3);
        assert_eq!(progress.percent, 33);
    }

    #[test]
    fn comment_progress_leaves_out_items_without_a_comment_leg() {
        let mut state = RunState {
            mode: Some(RunMode::CommentsOnly),
            ..Default::default()
        };
        for id in ["a", ""] {
            state.items.push(QueueItem::new(
                &video(id),
                Platform::Instagram,
                RunMode::CommentsOnly,
                true,
            ));
        }
        assert_eq!(state.comment_progress(), Progress::from_counts(0, 0, 1));

        state.items[0].advance_comments(CommentsStatus::Completed, Ok(3));
        assert_eq!(state.comment_progress(), Progress::from_counts(1, 0, 1));
        assert_eq!(state.comment_progress().percent, 100);

        // Media legs are completed up front in this mode
        assert_eq!(state.progress(), Progress::from_counts(2, 0, 2));
    }

    #[test]
    fn interrupted_transfer_outcome_replaces_the_cancellation() {
        let mut item = QueueItem::new(&video("a"), Platform::Instagram, RunMode::Download, false);
        item.advance(ItemStatus::Downloading, None);
        item.cancel();
        assert!(item.settle_interrupted(ItemStatus::Completed, None));
        assert_eq!(item.status, ItemStatus::Completed);
        assert!(item.error.is_none());

        // A second outcome, or one for a genuine failure, changes nothing
        assert!(!item.settle_interrupted(ItemStatus::Failed, Some("late".into())));
        let mut failed = QueueItem::new(&video("b"), Platform::Instagram, RunMode::Download, false);
        failed.advance(ItemStatus::Failed, Some("HTTP 502".into()));
        assert!(!failed.settle_interrupted(ItemStatus::Completed, None));
        assert_eq!(failed.error.as_deref(), Some("HTTP 502"));
    }

    #[test]
    fn phase_names() {
        let mut state = RunState::default();
        assert_eq!(state.phase(), "idle");
        state.mode = Some(RunMode::Download);
        assert_eq!(state.phase(), "running");
        state.finished = true;
        assert_eq!(state.phase(), "finished");
    }
}
