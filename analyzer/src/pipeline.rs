use crate::error::Result;
use crate::models::{EngagementStatistics, SentimentReport, VideoMetadata};
use crate::services::comment_service::get_comment_sentiments;
use crate::services::metadata_service::fetch_video_metadata;
use crate::services::sentiment::SentimentClassifier;
use crate::services::statistics::calculate_video_statistics;
use crate::services::writer::{
    save_metadata_to_json, save_sentiment_analysis_to_json, save_statistics_to_json,
};
use crate::services::youtube_api::YouTubeApi;
use crate::utils::extract_video_id;
use log::info;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct StatisticsOutcome {
    pub metadata: VideoMetadata,
    pub statistics: EngagementStatistics,
    pub metadata_path: PathBuf,
    pub statistics_path: PathBuf,
}

#[derive(Debug)]
pub struct SentimentOutcome {
    pub metadata: VideoMetadata,
    pub report: SentimentReport,
    pub metadata_path: PathBuf,
    pub report_path: PathBuf,
}

/// URL -> metadata -> `video_metadata.json` -> statistics -> `video_statistics.json`.
pub async fn run_statistics_pipeline(
    api: &dyn YouTubeApi,
    youtube_url: &str,
    out_dir: &Path,
) -> Result<StatisticsOutcome> {
    let video_id = extract_video_id(youtube_url)?;
    info!("Analyzing statistics for video ID: {video_id}");

    let metadata = fetch_video_metadata(api, &video_id).await?;
    let metadata_path = save_metadata_to_json(&metadata, out_dir)?;

    let statistics = calculate_video_statistics(&metadata);
    let statistics_path = save_statistics_to_json(&statistics, out_dir)?;

    Ok(StatisticsOutcome {
        metadata,
        statistics,
        metadata_path,
        statistics_path,
    })
}

/// URL -> metadata -> `video_metadata.json` -> comments -> `sentiment_analysis.json`.
pub async fn run_sentiment_pipeline(
    api: &dyn YouTubeApi,
    classifier: &dyn SentimentClassifier,
    youtube_url: &str,
    max_comments: usize,
    out_dir: &Path,
) -> Result<SentimentOutcome> {
    let video_id = extract_video_id(youtube_url)?;
    info!("Analyzing up to {max_comments} comments for video ID: {video_id}");

    let metadata = fetch_video_metadata(api, &video_id).await?;
    let metadata_path = save_metadata_to_json(&metadata, out_dir)?;

    let report = get_comment_sentiments(api, classifier, &video_id, max_comments).await?;
    let report_path = save_sentiment_analysis_to_json(&report, out_dir)?;

    Ok(SentimentOutcome {
        metadata,
        report,
        metadata_path,
        report_path,
    })
}
