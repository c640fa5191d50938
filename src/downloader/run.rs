//! The sequential run loop.

use chrono::{Local, NaiveDate};

use crate::error::{Error, Result};
use crate::export::{ArtifactKind, CommentSheet, SheetSpec, VideoSheet, write_sheet};
use crate::types::{
    CollectedComment, CommentsStatus, Event, ItemStatus, Quality, QueueItem, RunMode,
    RunSummary, VideoRecord, VideoRef,
};

use super::{BatchDownloader, TransferRequest};

impl BatchDownloader {
    /// Download every video in order, exporting their metadata first
    ///
    /// The video sheet is written before the first transfer, whatever the transfers' later
    /// outcome. When comment collection is enabled, each item's comments are fetched after its
    /// transfer and a comment sheet is written once the loop exits.
    ///
    /// # Errors
    /// - [`Error::EmptySelection`] when `videos` is empty (nothing is created or emitted)
    /// - [`Error::InvalidState`] when this downloader has already been started
    ///
    /// Transfer and comment failures never surface here; they are recorded on the items.
    pub async fn start(&self, videos: &[VideoRecord], quality: Quality) -> Result<RunSummary> {
        self.run(videos, RunMode::Download, quality).await
    }

    /// Collect comments for every video in order, without transferring any media
    ///
    /// Media legs are marked completed up front. A comment sheet is written at the end if any
    /// comment was collected; otherwise [`Event::NoCommentsFound`] is emitted.
    ///
    /// # Errors
    /// Same as [`start`](Self::start).
    pub async fn start_comments_only(&self, videos: &[VideoRecord]) -> Result<RunSummary> {
        self.run(videos, RunMode::CommentsOnly, self.config.download.quality)
            .await
    }

    async fn run(
        &self,
        videos: &[VideoRecord],
        mode: RunMode,
        quality: Quality,
    ) -> Result<RunSummary> {
        if videos.is_empty() {
            return Err(Error::EmptySelection);
        }

        let collect_comments = mode == RunMode::CommentsOnly || self.config.comments.enabled;
        self.begin(videos, mode, collect_comments).await?;

        tracing::info!(
            mode = ?mode,
            total = videos.len(),
            quality = %quality,
            "Batch run started"
        );

        let slug = self.config.export_slug().to_string();
        let today = Local::now().date_naive();

        let video_export = match mode {
            RunMode::Download => self.export::<VideoSheet>(videos, &slug, today).await,
            RunMode::CommentsOnly => None,
        };

        let mut collected: Vec<CollectedComment> = Vec::new();
        for (index, video) in videos.iter().enumerate() {
            if self.cancel_token.is_cancelled() {
                break;
            }

            if mode == RunMode::Download {
                self.transfer_item(index, video, quality).await;
            }

            if collect_comments && !self.cancel_token.is_cancelled() {
                self.collect_comments(index, video, &mut collected).await;
            }

            let is_last = index + 1 == videos.len();
            if !is_last && !self.pace().await {
                break;
            }
        }

        let aborted = self.cancel_token.is_cancelled();
        let comment_export = if !collect_comments {
            None
        } else if collected.is_empty() {
            if mode == RunMode::CommentsOnly && !aborted {
                tracing::info!("No comments found for the selected videos");
                self.emit_event(Event::NoCommentsFound);
            }
            None
        } else {
            self.export::<CommentSheet>(&collected, &slug, today).await
        };

        if !aborted {
            tokio::time::sleep(self.config.pacing.settle_delay).await;
        }

        Ok(self
            .finish(mode, collected.len(), video_export, comment_export)
            .await)
    }

    /// Build the queue and mark the run running
    async fn begin(
        &self,
        videos: &[VideoRecord],
        mode: RunMode,
        collect_comments: bool,
    ) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.mode.is_some() {
            return Err(Error::InvalidState {
                operation: "start".to_string(),
                state: state.phase().to_string(),
            });
        }

        let platform = self.config.download.platform;
        state.items = videos
            .iter()
            .map(|video| QueueItem::new(video, platform, mode, collect_comments))
            .collect();
        state.mode = Some(mode);
        state.running = true;

        self.emit_event(Event::RunStarted {
            mode,
            total: state.items.len(),
        });
        for (index, item) in state.items.iter().enumerate() {
            self.emit_event(item.update_event(index));
        }
        self.emit_event(state.progress_event());
        Ok(())
    }

    /// Apply a transition to one item, emitting its new state when it changed
    async fn update_item<F>(&self, index: usize, transition: F) -> bool
    where
        F: FnOnce(&mut QueueItem) -> bool,
    {
        let mut state = self.state.lock().await;
        let Some(item) = state.items.get_mut(index) else {
            return false;
        };
        if !transition(item) {
            return false;
        }
        let event = item.update_event(index);
        self.emit_event(event);
        self.emit_event(state.progress_event());
        true
    }

    async fn transfer_item(&self, index: usize, video: &VideoRecord, quality: Quality) {
        let filename = {
            let state = self.state.lock().await;
            match state.items.get(index) {
                Some(item) => item.filename.clone(),
                None => return,
            }
        };

        if !self
            .update_item(index, |item| item.advance(ItemStatus::Downloading, None))
            .await
        {
            return;
        }

        let request = TransferRequest::for_video(video, quality, &filename);
        tracing::debug!(
            index,
            identifier = %video.identifier,
            direct = request.is_direct(),
            "Transfer started"
        );

        let outcome = match self.transport.fetch_media(&request).await {
            Ok(payload) => {
                let saved = self
                    .sink
                    .save(ArtifactKind::Media, &payload.filename, &payload.bytes)
                    .await;
                saved.map(|()| payload.filename)
            }
            Err(e) => Err(e),
        };

        let (next, error) = match &outcome {
            Ok(saved_as) => {
                tracing::info!(index, identifier = %video.identifier, filename = %saved_as, "Transfer completed");
                (ItemStatus::Completed, None)
            }
            Err(e) => {
                tracing::warn!(index, identifier = %video.identifier, error = %e, "Transfer failed");
                (ItemStatus::Failed, Some(e.to_string()))
            }
        };

        // A transfer cancelled while in flight still records its real outcome
        let applied = self
            .update_item(index, |item| {
                item.advance(next, error.clone()) || item.settle_interrupted(next, error)
            })
            .await;
        if !applied {
            tracing::debug!(
                index,
                identifier = %video.identifier,
                succeeded = outcome.is_ok(),
                "Late transfer outcome ignored, item already final"
            );
        }
    }

    async fn collect_comments(
        &self,
        index: usize,
        video: &VideoRecord,
        collected: &mut Vec<CollectedComment>,
    ) {
        if !self
            .update_item(index, |item| {
                item.advance_comments(CommentsStatus::Fetching, Ok(0))
            })
            .await
        {
            return;
        }

        let limit = self.config.comments.limit;
        match self.transport.fetch_comments(&video.identifier, limit).await {
            Ok(comments) => {
                let count = comments.len();
                let applied = self
                    .update_item(index, |item| {
                        item.advance_comments(CommentsStatus::Completed, Ok(count))
                    })
                    .await;
                if applied {
                    tracing::info!(index, identifier = %video.identifier, count, "Comments collected");
                    let owner = VideoRef::from(video);
                    collected.extend(comments.into_iter().map(|comment| CollectedComment {
                        video: owner.clone(),
                        comment,
                    }));
                } else {
                    tracing::debug!(index, identifier = %video.identifier, "Late comment result ignored");
                }
            }
            Err(e) => {
                tracing::warn!(index, identifier = %video.identifier, error = %e, "Comment fetch failed");
                let message = e.to_string();
                self.update_item(index, |item| {
                    item.advance_comments(CommentsStatus::Failed, Err(message))
                })
                .await;
            }
        }
    }

    /// Wait the inter-item delay; returns false if the run was cancelled meanwhile
    async fn pace(&self) -> bool {
        tokio::select! {
            _ = self.cancel_token.cancelled() => false,
            _ = tokio::time::sleep(self.config.pacing.inter_item_delay) => {
                !self.cancel_token.is_cancelled()
            }
        }
    }

    /// Write a sheet through the sink; failures are reported as events, never propagated
    async fn export<S: SheetSpec>(
        &self,
        records: &[S::Record],
        slug: &str,
        today: NaiveDate,
    ) -> Option<String> {
        match write_sheet::<S>(self.sink.as_ref(), records, slug, today).await {
            Ok(sheet) => {
                self.emit_event(Event::ExportWritten {
                    kind: sheet.kind,
                    filename: sheet.filename.clone(),
                    rows: sheet.rows,
                });
                Some(sheet.filename)
            }
            Err(e) => {
                tracing::error!(kind = S::KIND.prefix(), error = %e, "Export failed");
                self.emit_event(Event::ExportFailed {
                    kind: S::KIND,
                    error: e.to_string(),
                });
                None
            }
        }
    }

    async fn finish(
        &self,
        mode: RunMode,
        comments_collected: usize,
        video_export: Option<String>,
        comment_export: Option<String>,
    ) -> RunSummary {
        let mut state = self.state.lock().await;
        state.running = false;
        state.finished = true;

        let progress = state.progress();
        let comment_progress = state.comment_progress();
        let cancelled = state.aborted;
        tracing::info!(
            completed = progress.completed,
            failed = progress.failed,
            total = progress.total,
            cancelled,
            "Batch run finished"
        );
        self.emit_event(Event::RunFinished {
            completed: progress.completed,
            failed: progress.failed,
            cancelled,
        });

        RunSummary {
            mode,
            progress,
            comment_progress,
            cancelled,
            comments_collected,
            video_export,
            comment_export,
        }
    }
}
