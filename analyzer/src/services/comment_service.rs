use crate::error::Result;
use crate::models::{CommentRecord, LabelCounts, SentimentReport};
use crate::services::sentiment::SentimentClassifier;
use crate::services::youtube_api::{YouTubeApi, MAX_PAGE_SIZE};
use log::{debug, info};
use std::collections::HashMap;

pub const TOP_KEYWORDS: usize = 10;
pub const TOP_ACTIVE_USERS: usize = 5;

/// Words of this length or shorter are not counted as keywords.
const MIN_KEYWORD_LEN: usize = 3;

/// Occurrence counter that remembers first-seen order so that equal counts
/// rank in the order their keys first appeared.
#[derive(Debug, Default, Clone)]
pub struct FrequencyTable {
    index: HashMap<String, usize>,
    entries: Vec<(String, u64)>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: &str) {
        match self.index.get(key) {
            Some(&position) => self.entries[position].1 += 1,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), 1));
            }
        }
    }

    pub fn get(&self, key: &str) -> u64 {
        self.index
            .get(key)
            .map(|&position| self.entries[position].1)
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `n` highest counts, descending; ties keep first-seen order.
    pub fn most_common(&self, n: usize) -> Vec<(String, u64)> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }

    /// All counts in first-seen order.
    pub fn into_label_counts(self) -> LabelCounts {
        LabelCounts::from(self.entries)
    }
}

/// Counts every whitespace-separated word longer than three characters, lowercased.
pub fn tally_keywords(table: &mut FrequencyTable, text: &str) {
    for word in text.split_whitespace() {
        if word.chars().count() > MIN_KEYWORD_LEN {
            table.add(&word.to_lowercase());
        }
    }
}

#[derive(Debug, Default)]
struct CommentTallies {
    comments: Vec<CommentRecord>,
    sentiments: FrequencyTable,
    keywords: FrequencyTable,
    authors: FrequencyTable,
}

impl CommentTallies {
    fn into_report(self) -> SentimentReport {
        SentimentReport {
            top_keywords: self.keywords.most_common(TOP_KEYWORDS),
            top_active_users: self.authors.most_common(TOP_ACTIVE_USERS),
            sentiment_distribution: self.sentiments.into_label_counts(),
            comments: self.comments,
        }
    }
}

/// Pages through the top-level comments of a video (at most `max_comments`),
/// classifying each one and folding it into the keyword, author and
/// sentiment tables.
pub async fn get_comment_sentiments(
    api: &dyn YouTubeApi,
    classifier: &dyn SentimentClassifier,
    video_id: &str,
    max_comments: usize,
) -> Result<SentimentReport> {
    let mut tallies = CommentTallies::default();
    let mut next_page_token: Option<String> = None;

    while tallies.comments.len() < max_comments {
        let remaining = max_comments - tallies.comments.len();
        let page_size = remaining.min(MAX_PAGE_SIZE);

        let page = api
            .list_comment_threads(video_id, page_size, next_page_token.as_deref())
            .await?;
        debug!("Fetched page of {} comment threads", page.items.len());

        for thread in page.items.into_iter().take(remaining) {
            let snippet = thread.snippet.top_level_comment.snippet;

            let truncated = classifier.truncate(&snippet.text_display)?;
            let sentiment = classifier.classify(&truncated).await?;

            tallies.sentiments.add(&sentiment.label);
            tally_keywords(&mut tallies.keywords, &snippet.text_display);
            tallies.authors.add(&snippet.author_display_name);

            tallies.comments.push(CommentRecord {
                comment_text: snippet.text_display,
                author: snippet.author_display_name,
                like_count: snippet.like_count,
                published_at: snippet.published_at,
                sentiment: sentiment.label,
            });
        }

        next_page_token = page.next_page_token;
        if next_page_token.is_none() {
            break;
        }
    }

    info!(
        "Analyzed {} comments for video {video_id}: {} distinct keywords, {} distinct authors",
        tallies.comments.len(),
        tallies.keywords.len(),
        tallies.authors.len()
    );

    Ok(tallies.into_report())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_case_folded_and_length_filtered() {
        let mut table = FrequencyTable::new();
        tally_keywords(&mut table, "this is GREAT stuff");
        tally_keywords(&mut table, "great work indeed");

        assert_eq!(table.get("great"), 2);
        assert_eq!(table.get("this"), 1);
        assert_eq!(table.get("stuff"), 1);
        assert_eq!(table.get("is"), 0);
        assert_eq!(table.get("GREAT"), 0);
    }

    #[test]
    fn keyword_length_counts_characters_not_bytes() {
        let mut table = FrequencyTable::new();
        tally_keywords(&mut table, "çok öyle güzel");
        assert_eq!(table.get("çok"), 0);
        assert_eq!(table.get("öyle"), 1);
        assert_eq!(table.get("güzel"), 1);
    }

    #[test]
    fn most_common_keeps_top_n_descending() {
        let mut table = FrequencyTable::new();
        for author in 0..15u64 {
            for _ in 0..=author {
                table.add(&format!("user{author}"));
            }
        }

        let top = table.most_common(5);
        assert_eq!(
            top,
            vec![
                ("user14".to_string(), 15),
                ("user13".to_string(), 14),
                ("user12".to_string(), 13),
                ("user11".to_string(), 12),
                ("user10".to_string(), 11),
            ]
        );
    }

    #[test]
    fn ties_rank_in_first_seen_order() {
        let mut table = FrequencyTable::new();
        for key in ["beta", "alpha", "gamma", "alpha", "beta", "delta"] {
            table.add(key);
        }

        let top = table.most_common(3);
        assert_eq!(
            top,
            vec![
                ("beta".to_string(), 2),
                ("alpha".to_string(), 2),
                ("gamma".to_string(), 1),
            ]
        );
    }

    #[test]
    fn label_counts_keep_first_seen_order() {
        let mut table = FrequencyTable::new();
        for label in ["5 stars", "1 star", "5 stars", "3 stars", "1 star", "5 stars"] {
            table.add(label);
        }

        let counts = table.into_label_counts();
        assert_eq!(
            counts.iter().collect::<Vec<_>>(),
            vec![("5 stars", 3), ("1 star", 2), ("3 stars", 1)]
        );
    }

    #[test]
    fn most_common_on_small_table_returns_everything() {
        let mut table = FrequencyTable::new();
        table.add("only");
        assert_eq!(table.most_common(10), vec![("only".to_string(), 1)]);
        assert!(FrequencyTable::new().most_common(5).is_empty());
    }
}
