// YouTube Data API v3 client for video lookups and comment threads
// Docs: https://developers.google.com/youtube/v3/docs

use crate::config::Settings;
use crate::error::{AnalyzerError, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

/// Facets requested for a metadata lookup.
pub const VIDEO_PARTS: [&str; 6] = [
    "snippet",
    "contentDetails",
    "statistics",
    "status",
    "topicDetails",
    "liveStreamingDetails",
];

/// Upper bound the API accepts for `maxResults` on commentThreads.list.
pub const MAX_PAGE_SIZE: usize = 100;

// ============================================================================
// videos.list
// ============================================================================

#[derive(Debug, Deserialize, Default)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoItem {
    pub id: String,
    pub snippet: VideoSnippet,
    pub content_details: Option<ContentDetails>,
    pub statistics: Option<VideoStatistics>,
    pub status: Option<VideoStatus>,
    pub topic_details: Option<TopicDetails>,
    pub live_streaming_details: Option<LiveStreamingDetails>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoSnippet {
    pub published_at: String,
    pub channel_id: String,
    pub title: String,
    pub description: String,
    pub channel_title: String,
    pub tags: Vec<String>,
    pub thumbnails: Thumbnails,
    pub category_id: Option<String>,
    pub default_language: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Thumbnails {
    pub default: Option<ThumbnailInfo>,
    pub medium: Option<ThumbnailInfo>,
    pub high: Option<ThumbnailInfo>,
}

#[derive(Debug, Deserialize)]
pub struct ThumbnailInfo {
    pub url: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentDetails {
    pub duration: String,
    pub licensed_content: Option<bool>,
}

/// Counts are transported as decimal strings.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoStatistics {
    pub view_count: Option<String>,
    pub like_count: Option<String>,
    pub comment_count: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoStatus {
    pub privacy_status: String,
    pub embeddable: bool,
    pub public_stats_viewable: bool,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TopicDetails {
    pub topic_categories: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct LiveStreamingDetails {
    pub actual_start_time: Option<String>,
}

// ============================================================================
// commentThreads.list
// ============================================================================

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CommentThreadListResponse {
    pub items: Vec<CommentThread>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommentThread {
    pub snippet: CommentThreadSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentThreadSnippet {
    pub top_level_comment: TopLevelComment,
}

#[derive(Debug, Deserialize)]
pub struct TopLevelComment {
    pub snippet: CommentSnippet,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CommentSnippet {
    pub text_display: String,
    pub author_display_name: String,
    pub like_count: u64,
    pub published_at: String,
}

// ============================================================================
// Client
// ============================================================================

/// The two Data API operations the analyzer depends on.
#[async_trait]
pub trait YouTubeApi: Send + Sync {
    async fn list_videos(&self, video_id: &str, parts: &[&str]) -> Result<VideoListResponse>;

    async fn list_comment_threads(
        &self,
        video_id: &str,
        max_results: usize,
        page_token: Option<&str>,
    ) -> Result<CommentThreadListResponse>;
}

#[derive(Debug, Clone)]
pub struct YouTubeClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl YouTubeClient {
    /// Fails with a configuration error when no API key is set. No request is made.
    pub fn new(settings: &Settings) -> Result<Self> {
        let api_key = settings.youtube_api_key.clone().ok_or_else(|| {
            AnalyzerError::Configuration(
                "YOUTUBE_API_KEY is not set (environment or .env file)".to_string(),
            )
        })?;

        Ok(Self {
            client: Client::new(),
            api_key,
            base_url: settings
                .youtube_api_base_url
                .trim_end_matches('/')
                .to_string(),
        })
    }

    fn endpoint(&self, resource: &str, params: &[(&str, &str)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/{resource}", self.base_url)).map_err(|e| {
            AnalyzerError::Configuration(format!(
                "Invalid YouTube API base URL {}: {e}",
                self.base_url
            ))
        })?;
        url.query_pairs_mut()
            .extend_pairs(params)
            .append_pair("key", &self.api_key);
        Ok(url)
    }

    /// Transport errors are stripped of their URL, which carries the API key.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AnalyzerError::Api { status, body });
        }

        Ok(response
            .json::<T>()
            .await
            .map_err(reqwest::Error::without_url)?)
    }
}

#[async_trait]
impl YouTubeApi for YouTubeClient {
    async fn list_videos(&self, video_id: &str, parts: &[&str]) -> Result<VideoListResponse> {
        let part = parts.join(",");
        debug!("videos.list id={video_id} part={part}");
        let url = self.endpoint("videos", &[("part", part.as_str()), ("id", video_id)])?;
        self.get_json(url).await
    }

    async fn list_comment_threads(
        &self,
        video_id: &str,
        max_results: usize,
        page_token: Option<&str>,
    ) -> Result<CommentThreadListResponse> {
        debug!("commentThreads.list videoId={video_id} maxResults={max_results} pageToken={page_token:?}");
        let max_results = max_results.to_string();
        let mut params = vec![
            ("part", "snippet"),
            ("videoId", video_id),
            ("textFormat", "plainText"),
            ("maxResults", max_results.as_str()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }
        let url = self.endpoint("commentThreads", &params)?;
        self.get_json(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_with_key(key: Option<&str>) -> Settings {
        Settings {
            youtube_api_key: key.map(String::from),
            youtube_api_base_url: "https://example.test/youtube/v3/".to_string(),
            ..Settings::default()
        }
    }

    #[test]
    fn missing_key_is_a_configuration_error() {
        let err = YouTubeClient::new(&settings_with_key(None)).unwrap_err();
        assert!(matches!(err, AnalyzerError::Configuration(_)));
    }

    #[test]
    fn endpoint_carries_params_and_key() {
        let client = YouTubeClient::new(&settings_with_key(Some("secret"))).unwrap();
        let url = client
            .endpoint("videos", &[("part", "snippet,statistics"), ("id", "abc")])
            .unwrap();
        assert_eq!(url.path(), "/youtube/v3/videos");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("part".to_string(), "snippet,statistics".to_string()),
                ("id".to_string(), "abc".to_string()),
                ("key".to_string(), "secret".to_string()),
            ]
        );
    }

    #[test]
    fn deserializes_video_list_with_missing_optional_facets() {
        let body = r#"{
            "kind": "youtube#videoListResponse",
            "items": [{
                "id": "abc",
                "snippet": {
                    "publishedAt": "2023-01-01T00:00:00Z",
                    "channelId": "UC1",
                    "title": "Title",
                    "description": "Desc",
                    "channelTitle": "Channel",
                    "thumbnails": { "high": { "url": "https://i.ytimg.com/hq.jpg" } }
                },
                "statistics": { "viewCount": "1000", "likeCount": "100" },
                "status": { "privacyStatus": "public", "embeddable": true, "publicStatsViewable": true }
            }]
        }"#;
        let parsed: VideoListResponse = serde_json::from_str(body).unwrap();
        let item = &parsed.items[0];
        assert_eq!(item.snippet.title, "Title");
        assert!(item.snippet.tags.is_empty());
        assert!(item.snippet.category_id.is_none());
        assert!(item.topic_details.is_none());
        let stats = item.statistics.as_ref().unwrap();
        assert_eq!(stats.view_count.as_deref(), Some("1000"));
        assert!(stats.comment_count.is_none());
    }

    #[test]
    fn deserializes_comment_page() {
        let body = r#"{
            "nextPageToken": "NEXT",
            "items": [{
                "snippet": {
                    "topLevelComment": {
                        "snippet": {
                            "textDisplay": "Harika video!",
                            "authorDisplayName": "@ayse",
                            "likeCount": 3,
                            "publishedAt": "2024-05-01T10:00:00Z"
                        }
                    }
                }
            }]
        }"#;
        let parsed: CommentThreadListResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.next_page_token.as_deref(), Some("NEXT"));
        let snippet = &parsed.items[0].snippet.top_level_comment.snippet;
        assert_eq!(snippet.author_display_name, "@ayse");
        assert_eq!(snippet.like_count, 3);
    }
}
