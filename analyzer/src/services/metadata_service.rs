use crate::error::{AnalyzerError, Result};
use crate::models::VideoMetadata;
use crate::services::youtube_api::{VideoItem, YouTubeApi, VIDEO_PARTS};
use log::info;

/// One videos.list call for every facet; fails if the ID matches nothing.
pub async fn fetch_video_metadata(api: &dyn YouTubeApi, video_id: &str) -> Result<VideoMetadata> {
    let response = api.list_videos(video_id, &VIDEO_PARTS).await?;

    let item = response
        .items
        .into_iter()
        .next()
        .ok_or_else(|| AnalyzerError::VideoNotFound(video_id.to_string()))?;

    let metadata = into_metadata(video_id, item);

    info!(
        "Fetched YT-Video: {}\nChannel: {} -> {}, Published: {}\nDuration: {}, Views: {}, Likes: {}, Comments: {}\nTags: {}",
        metadata.title,
        metadata.channel_title,
        metadata.channel_id,
        metadata.publish_date,
        metadata.duration,
        metadata.view_count,
        metadata.like_count,
        metadata.comment_count,
        metadata.tags.join(", "),
    );

    Ok(metadata)
}

fn parse_count(value: Option<&String>) -> u64 {
    value.and_then(|v| v.parse().ok()).unwrap_or(0)
}

fn into_metadata(video_id: &str, item: VideoItem) -> VideoMetadata {
    let snippet = item.snippet;
    let statistics = item.statistics.unwrap_or_default();
    let content_details = item.content_details.unwrap_or_default();
    let status = item.status.unwrap_or_default();

    let thumbnails = snippet.thumbnails;
    let thumbnail_url = thumbnails
        .high
        .or(thumbnails.medium)
        .or(thumbnails.default)
        .map(|t| t.url)
        .unwrap_or_default();

    VideoMetadata {
        video_id: video_id.to_string(),
        title: snippet.title,
        description: snippet.description,
        tags: snippet.tags,
        channel_title: snippet.channel_title,
        channel_id: snippet.channel_id,
        publish_date: snippet.published_at,
        thumbnail_url,
        view_count: parse_count(statistics.view_count.as_ref()),
        like_count: parse_count(statistics.like_count.as_ref()),
        comment_count: parse_count(statistics.comment_count.as_ref()),
        duration: content_details.duration,
        licensed_content: content_details.licensed_content.unwrap_or(false),
        privacy_status: status.privacy_status,
        embeddable: status.embeddable,
        public_stats_viewable: status.public_stats_viewable,
        category_id: snippet.category_id,
        topic_categories: item
            .topic_details
            .map(|t| t.topic_categories)
            .unwrap_or_default(),
        live_broadcast: item
            .live_streaming_details
            .and_then(|l| l.actual_start_time),
        default_language: snippet.default_language,
    }
}
