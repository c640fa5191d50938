//! Display formatting for counts, durations, dates and media filenames
//!
//! Everything here is pure. The export encoder and the orchestrator share these so that a
//! view count looks the same in a filename, a sheet and a UI row.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

use crate::types::{Platform, VideoRecord};

/// Maximum length of the title segment of a derived filename
pub const MAX_TITLE_CHARS: usize = 50;

/// Title segment used when sanitising leaves nothing
pub const FALLBACK_TITLE: &str = "video";

/// Format a count with a K/M suffix: `2500000` -> `"2.5M"`, `1500` -> `"1.5K"`, `999` -> `"999"`
pub fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// Format seconds as `m:ss`; absent or zero durations render as `"0:00"`
pub fn format_duration(seconds: Option<u64>) -> String {
    let seconds = seconds.unwrap_or(0);
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Parse `m:ss` (or a bare number of seconds) back into seconds; garbage yields 0
pub fn parse_duration(text: &str) -> u64 {
    let text = text.trim();
    if text.is_empty() {
        return 0;
    }

    let parts: Vec<&str> = text.split(':').collect();
    match parts.as_slice() {
        [mins, secs] => match (mins.trim().parse::<u64>(), secs.trim().parse::<u64>()) {
            (Ok(m), Ok(s)) => m * 60 + s,
            _ => 0,
        },
        [secs] => leading_integer(secs),
        _ => 0,
    }
}

// Mirrors lenient integer parsing: "90s" -> 90, "abc" -> 0
fn leading_integer(text: &str) -> u64 {
    let digits: String = text.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

/// A publish date in one of the two canonical forms the scrapers produce
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Published {
    /// ISO-8601 timestamp (offsets are normalised to UTC)
    DateTime(NaiveDateTime),
    /// Compact `YYYYMMDD` or ISO date without a time
    Date(NaiveDate),
}

impl Published {
    /// Calendar date of the publication
    pub fn date(&self) -> NaiveDate {
        match self {
            Published::DateTime(dt) => dt.date(),
            Published::Date(d) => *d,
        }
    }
}

/// Parse a publish date: ISO-8601 (with or without offset) or compact `YYYYMMDD`
pub fn parse_published(text: &str) -> Option<Published> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if text.len() == 8 && text.bytes().all(|b| b.is_ascii_digit()) {
        return NaiveDate::parse_from_str(text, "%Y%m%d")
            .ok()
            .map(Published::Date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(Published::DateTime(dt.naive_utc()));
    }

    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, pattern) {
            return Some(Published::DateTime(dt));
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .map(Published::Date)
}

/// Render a publish date as `dd/mm/yyyy HH:MM` (or `dd/mm/yyyy` when only a date is known)
///
/// Absent or unparseable input renders as an empty string.
pub fn format_published(text: Option<&str>) -> String {
    match text.and_then(parse_published) {
        Some(Published::DateTime(dt)) => dt.format("%d/%m/%Y %H:%M").to_string(),
        Some(Published::Date(d)) => d.format("%d/%m/%Y").to_string(),
        None => String::new(),
    }
}

/// Render a compact `YYYYMMDD` date as `dd/mm/yyyy`; anything else renders empty
pub fn format_compact_date(text: &str) -> String {
    if text.len() != 8 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return String::new();
    }
    format!("{}/{}/{}", &text[6..8], &text[4..6], &text[0..4])
}

/// Compile a built-in pattern; a failure is logged and the caller falls back to char filtering
fn compile_pattern(pattern: &str) -> Option<Regex> {
    Regex::new(pattern)
        .map_err(|e| tracing::warn!(pattern, error = %e, "Invalid title pattern"))
        .ok()
}

fn title_strip_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| compile_pattern(r"[^A-Za-z0-9_\s-]"))
        .as_ref()
}

fn whitespace_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| compile_pattern(r"\s+")).as_ref()
}

/// Reduce a caption to a filesystem-friendly title segment
///
/// Strips everything but word characters, whitespace and hyphens, collapses whitespace
/// runs, trims, and truncates to [`MAX_TITLE_CHARS`]. Returns an empty string when nothing
/// survives.
pub fn sanitize_title(title: &str) -> String {
    let stripped: Cow<'_, str> = match title_strip_pattern() {
        Some(pattern) => pattern.replace_all(title, ""),
        None => title
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-') || c.is_whitespace())
            .collect(),
    };
    let collapsed: Cow<'_, str> = match whitespace_pattern() {
        Some(pattern) => pattern.replace_all(&stripped, " "),
        None => stripped.split_whitespace().collect::<Vec<_>>().join(" ").into(),
    };
    collapsed.trim().chars().take(MAX_TITLE_CHARS).collect()
}

/// Derive the advisory filename for a video: `"<Tag> - <Views> - <Title>.mp4"`
///
/// The server may override it through `Content-Disposition`.
pub fn derive_filename(platform: Platform, video: &VideoRecord) -> String {
    let title = sanitize_title(&video.title);
    let title = if title.is_empty() {
        FALLBACK_TITLE.to_string()
    } else {
        title
    };
    format!(
        "{} - {} - {}.mp4",
        platform.tag(),
        format_count(video.view_count),
        title
    )
}
