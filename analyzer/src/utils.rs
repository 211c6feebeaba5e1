use crate::error::{AnalyzerError, Result};
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref VIDEO_ID_PATTERN: Regex =
        Regex::new(r"(?:[?&]v=|/shorts/|/watch/|/embed/|youtu\.be/)([A-Za-z0-9_-]+)")
            .expect("video id pattern is valid");
}

const SECONDS_PER_DAY: i64 = 86_400;

/// Extracts the video ID from watch, shorts, embed and youtu.be links.
pub fn extract_video_id(url: &str) -> Result<String> {
    VIDEO_ID_PATTERN
        .captures(url)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| AnalyzerError::InvalidUrl(url.to_string()))
}

/// Parse an RFC 3339 / ISO8601 timestamp as returned by the Data API.
pub fn parse_iso8601(date_str: &str) -> Option<DateTime<Utc>> {
    if date_str.is_empty() {
        return None;
    }
    date_str.parse::<DateTime<Utc>>().ok()
}

/// Whole days elapsed between `published` and `now`, floored, never negative.
pub fn days_since(published: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let seconds = (now - published).num_seconds();
    seconds.div_euclid(SECONDS_PER_DAY).max(0)
}

/// Two-decimal rounding; exact halves go to the even neighbour (0.125 -> 0.12).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
