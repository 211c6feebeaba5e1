use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Descriptive and statistical fields of a single video, as written to
/// `video_metadata.json`.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct VideoMetadata {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub channel_title: String,
    pub channel_id: String,
    pub publish_date: String,
    pub thumbnail_url: String,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub duration: String,
    pub licensed_content: bool,
    pub privacy_status: String,
    pub embeddable: bool,
    pub public_stats_viewable: bool,
    pub category_id: Option<String>,
    pub topic_categories: Vec<String>,
    pub live_broadcast: Option<String>,
    pub default_language: Option<String>,
}

/// Derived engagement ratios. Ratios are percentages where noted and are
/// rounded to two decimals; `popularity_score` is an exact sum.
///
/// `reach_ratio` mirrors `engagement_rate` and `engagement_per_day` mirrors
/// `intensity_score`; both keys stay in the output.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq)]
pub struct EngagementStatistics {
    pub engagement_rate: f64,
    pub like_view_ratio: f64,
    pub comment_like_ratio: f64,
    pub popularity_score: u64,
    pub like_growth_rate: f64,
    pub comment_growth_rate: f64,
    pub success_score: f64,
    pub engagement_depth: f64,
    pub reach_ratio: f64,
    pub intensity_score: f64,
    pub engagement_per_day: f64,
    pub comprehensive_intensity_score: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CommentRecord {
    pub comment_text: String,
    pub author: String,
    pub like_count: u64,
    pub published_at: String,
    pub sentiment: String,
}

/// Contents of `sentiment_analysis.json`.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct SentimentReport {
    pub comments: Vec<CommentRecord>,
    pub sentiment_distribution: LabelCounts,
    pub top_keywords: Vec<(String, u64)>,
    pub top_active_users: Vec<(String, u64)>,
}

/// Label counts serialized as a JSON object whose keys keep insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelCounts(Vec<(String, u64)>);

impl LabelCounts {
    pub fn get(&self, label: &str) -> Option<u64> {
        self.0
            .iter()
            .find(|(name, _)| name == label)
            .map(|&(_, count)| count)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(label, count)| (label.as_str(), *count))
    }
}

impl From<Vec<(String, u64)>> for LabelCounts {
    fn from(entries: Vec<(String, u64)>) -> Self {
        Self(entries)
    }
}

impl Serialize for LabelCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, count) in &self.0 {
            map.serialize_entry(label, count)?;
        }
        map.end()
    }
}

struct LabelCountsVisitor;

impl<'de> Visitor<'de> for LabelCountsVisitor {
    type Value = LabelCounts;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of label to count")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((label, count)) = access.next_entry::<String, u64>()? {
            entries.push((label, count));
        }
        Ok(LabelCounts(entries))
    }
}

impl<'de> Deserialize<'de> for LabelCounts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(LabelCountsVisitor)
    }
}
