//! Filter and sort over a cached video list.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::format::parse_published;
use crate::selection::Metric;
use crate::types::VideoRecord;

/// Publish-date window
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateRange {
    /// No date restriction
    #[default]
    All,
    /// Published within the last N days (inclusive of today)
    Days(u32),
}

impl DateRange {
    /// Presets offered by the dashboard
    pub const PRESETS: [DateRange; 6] = [
        DateRange::Days(7),
        DateRange::Days(30),
        DateRange::Days(60),
        DateRange::Days(90),
        DateRange::Days(180),
        DateRange::Days(365),
    ];

    fn admits(&self, video: &VideoRecord, today: NaiveDate) -> bool {
        match self {
            DateRange::All => true,
            DateRange::Days(days) => {
                let Some(published) = video.published_at.as_deref().and_then(parse_published)
                else {
                    return false;
                };
                // A window reaching past the calendar has no lower bound
                today
                    .checked_sub_days(chrono::Days::new(u64::from(*days)))
                    .is_none_or(|cutoff| published.date() >= cutoff)
            }
        }
    }
}

/// Sort direction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Highest first
    #[default]
    Desc,
    /// Lowest first
    Asc,
}

/// Sort key plus direction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOption {
    /// Metric to sort by
    pub metric: Metric,
    /// Direction
    pub order: SortOrder,
}

impl Default for SortOption {
    fn default() -> Self {
        Self {
            metric: Metric::Views,
            order: SortOrder::Desc,
        }
    }
}

/// Criteria applied to the cached list before display and selection
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoFilter {
    /// Case-insensitive substring matched against title and description
    pub search_text: String,
    /// Inclusive lower bound on views
    pub min_views: Option<u64>,
    /// Inclusive upper bound on views
    pub max_views: Option<u64>,
    /// Inclusive lower bound on duration in seconds
    pub min_duration: Option<u64>,
    /// Inclusive upper bound on duration in seconds
    pub max_duration: Option<u64>,
    /// Publish-date window
    pub date_range: DateRange,
    /// Result ordering
    pub sort: SortOption,
}

impl VideoFilter {
    /// Filter and sort `videos`; `today` anchors the date window
    pub fn apply(&self, videos: &[VideoRecord], today: NaiveDate) -> Vec<VideoRecord> {
        let needle = self.search_text.trim().to_lowercase();
        let mut matched: Vec<VideoRecord> = videos
            .iter()
            .filter(|v| needle.is_empty() || matches_text(v, &needle))
            .filter(|v| within(v.view_count, self.min_views, self.max_views))
            .filter(|v| {
                within(
                    v.duration_seconds.unwrap_or(0),
                    self.min_duration,
                    self.max_duration,
                )
            })
            .filter(|v| self.date_range.admits(v, today))
            .cloned()
            .collect();

        let metric = self.sort.metric;
        match self.sort.order {
            SortOrder::Desc => matched.sort_by_key(|v| std::cmp::Reverse(metric.value(v))),
            SortOrder::Asc => matched.sort_by_key(|v| metric.value(v)),
        }
        matched
    }
}

fn matches_text(video: &VideoRecord, needle: &str) -> bool {
    video.title.to_lowercase().contains(needle)
        || video
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(needle))
}

fn within(value: u64, min: Option<u64>, max: Option<u64>) -> bool {
    min.is_none_or(|m| value >= m) && max.is_none_or(|m| value <= m)
}
