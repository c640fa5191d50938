use super::test_helpers::*;
use super::*;
use crate::error::Error;
use crate::export::ArtifactKind;
use crate::types::{CommentsStatus, Event, ItemStatus, Quality};


/// Everything emitted so far
fn drain(events: &mut tokio::sync::broadcast::Receiver<Event>) -> Vec<Event> {
    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push(event);
    }
    seen
}
