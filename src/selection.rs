//! Selection set: which videos are chosen for a batch action.
//!
//! Membership is keyed by identifier and survives filter changes. Identifiers that are no
//! longer in the current list are not removed; they are simply never resolved by
//! [`SelectionSet::selected_videos`].

use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::format::parse_published;
use crate::types::VideoRecord;

/// Number of items highlighted by the top/bottom badges
pub const DEFAULT_RANK_SIZE: usize = 5;

/// Metric used to rank videos
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// View count
    #[default]
    Views,
    /// Like count
    Likes,
    /// Comment count
    Comments,
    /// Duration in seconds
    Duration,
    /// Publish date (unknown dates rank lowest)
    PublishDate,
}

impl Metric {
    /// Numeric value of this metric for a video
    pub fn value(&self, video: &VideoRecord) -> i64 {
        let clamp = |n: u64| i64::try_from(n).unwrap_or(i64::MAX);
        match self {
            Metric::Views => clamp(video.view_count),
            Metric::Likes => clamp(video.like_count),
            Metric::Comments => clamp(video.comment_count),
            Metric::Duration => clamp(video.duration_seconds.unwrap_or(0)),
            Metric::PublishDate => video
                .published_at
                .as_deref()
                .and_then(parse_published)
                .map_or(i64::MIN, |p| i64::from(p.date().num_days_from_ce())),
        }
    }
}

/// Rank videos by a metric, highest first; ties keep their original relative order
pub fn rank_by<T: Borrow<VideoRecord>>(videos: &[T], metric: Metric) -> Vec<&VideoRecord> {
    let mut ranked: Vec<&VideoRecord> = videos.iter().map(Borrow::borrow).collect();
    // sort_by_key is stable
    ranked.sort_by_key(|v| std::cmp::Reverse(metric.value(v)));
    ranked
}

/// Identifiers of the first `n` items of an ordered list
pub fn top_n_ids<T: Borrow<VideoRecord>>(ordered: &[T], n: usize) -> HashSet<String> {
    ordered
        .iter()
        .take(n)
        .map(|v| v.borrow().identifier.clone())
        .collect()
}

/// Identifiers of the last `n` items of an ordered list
pub fn bottom_n_ids<T: Borrow<VideoRecord>>(ordered: &[T], n: usize) -> HashSet<String> {
    let start = ordered.len().saturating_sub(n);
    ordered[start..]
        .iter()
        .map(|v| v.borrow().identifier.clone())
        .collect()
}

/// Highlight shown on a ranked video
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankBadge {
    /// Among the top `n`
    Top,
    /// Among the bottom `n` (and not among the top)
    Bottom,
}

/// Badge per identifier for an ordered list; top wins when a short list puts an item in both
pub fn rank_badges<T: Borrow<VideoRecord>>(ordered: &[T], n: usize) -> HashMap<String, RankBadge> {
    let mut badges: HashMap<String, RankBadge> = bottom_n_ids(ordered, n)
        .into_iter()
        .map(|id| (id, RankBadge::Bottom))
        .collect();
    for id in top_n_ids(ordered, n) {
        badges.insert(id, RankBadge::Top);
    }
    badges
}

/// Set of chosen video identifiers
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSet {
    ids: HashSet<String>,
}

impl SelectionSet {
    /// Create an empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of an identifier; returns whether it is now selected
    pub fn toggle(&mut self, identifier: &str) -> bool {
        if self.ids.remove(identifier) {
            false
        } else {
            self.ids.insert(identifier.to_string());
            true
        }
    }

    /// Add the first `n` items of an ordered list (union with the current selection)
    pub fn select_top_n<T: Borrow<VideoRecord>>(&mut self, ordered: &[T], n: usize) {
        self.ids.extend(top_n_ids(ordered, n));
    }

    /// Add the last `n` items of an ordered list (union with the current selection)
    pub fn select_bottom_n<T: Borrow<VideoRecord>>(&mut self, ordered: &[T], n: usize) {
        self.ids.extend(bottom_n_ids(ordered, n));
    }

    /// Replace the selection with exactly these identifiers
    pub fn select_all<I, S>(&mut self, identifiers: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids = identifiers.into_iter().map(Into::into).collect();
    }

    /// Empty the selection (explicit clear or full data refresh)
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Current cardinality
    pub fn count(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is selected (batch actions should be disabled)
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Whether an identifier is selected
    pub fn is_selected(&self, identifier: &str) -> bool {
        self.ids.contains(identifier)
    }

    /// Selected videos present in `list`, in list order
    pub fn selected_videos<'a>(&self, list: &'a [VideoRecord]) -> Vec<&'a VideoRecord> {
        list.iter()
            .filter(|v| self.ids.contains(&v.identifier))
            .collect()
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn video(id: &str, views: u64) -> VideoRecord {
        VideoRecord {
            identifier: id.into(),
            view_count: views,
            ..Default::default()
        }
    }

    fn ids(videos: &[&VideoRecord]) -> Vec<String> {
        videos.iter().map(|v| v.identifier.clone()).collect()
    }

    #[test]
    fn toggle_flips_membership() {
        let mut selection = SelectionSet::new();
        assert!(selection.toggle("a"));
        assert!(selection.is_selected("a"));
        assert!(!selection.toggle("a"));
        assert!(selection.is_empty());
    }

    #[test]
    fn top_and_bottom_on_short_list_select_everything() {
        let list = vec![video("a", 30), video("b", 20), video("c", 10)];

        let mut top = SelectionSet::new();
        top.select_top_n(&list, 5);
        assert_eq!(top.count(), 3);

        let mut bottom = SelectionSet::new();
        bottom.select_bottom_n(&list, 5);
        assert_eq!(bottom.count(), 3);
    }

    #[test]
    fn top_and_bottom_are_unions() {
        let list: Vec<_> = (0..12).map(|i| video(&format!("v{i}"), 100 - i)).collect();
        let mut selection = SelectionSet::new();
        selection.toggle("v6");
        selection.select_top_n(&list, 5);
        selection.select_bottom_n(&list, 5);

        assert_eq!(selection.count(), 11);
        for id in ["v0", "v4", "v6", "v7", "v11"] {
            assert!(selection.is_selected(id), "{id} should be selected");
        }
        assert!(!selection.is_selected("v5"));
    }

    #[test]
    fn select_all_replaces_and_clear_empties() {
        let mut selection = SelectionSet::new();
        selection.toggle("stale");
        selection.select_all(["a", "b"]);
        assert_eq!(selection.count(), 2);
        assert!(!selection.is_selected("stale"));

        selection.clear();
        assert_eq!(selection.count(), 0);
    }

    #[test]
    fn stale_identifiers_are_not_resolved() {
        let list = vec![video("a", 1), video("b", 2), video("c", 3)];
        let mut selection = SelectionSet::new();
        selection.select_all(["c", "gone", "a"]);

        assert_eq!(selection.count(), 3);
        assert_eq!(ids(&selection.selected_videos(&list)), vec!["a", "c"]);
    }

    #[test]
    fn ranking_is_stable_on_ties() {
        let list = vec![video("a", 5), video("b", 9), video("c", 5), video("d", 9)];
        let ranked = rank_by(&list, Metric::Views);
        assert_eq!(ids(&ranked), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn ranking_by_publish_date_puts_unknown_last() {
        let mut old = video("old", 0);
        old.published_at = Some("20230101".into());
        let mut new = video("new", 0);
        new.published_at = Some("2024-06-01T12:00:00".into());
        let unknown = video("unknown", 0);

        let list = vec![unknown, old, new];
        assert_eq!(
            ids(&rank_by(&list, Metric::PublishDate)),
            vec!["new", "old", "unknown"]
        );
    }

    #[test]
    fn badges_give_top_precedence_on_overlap() {
        let list = vec![video("a", 3), video("b", 2), video("c", 1)];
        let badges = rank_badges(&list, 2);
        assert_eq!(badges["a"], RankBadge::Top);
        assert_eq!(badges["b"], RankBadge::Top);
        assert_eq!(badges["c"], RankBadge::Bottom);

        let badges = rank_badges(&list, DEFAULT_RANK_SIZE);
        assert!(badges.values().all(|b| *b == RankBadge::Top));
    }
}
