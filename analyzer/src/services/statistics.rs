use crate::models::{EngagementStatistics, VideoMetadata};
use crate::utils::{days_since, parse_iso8601, round2};
use chrono::{DateTime, Utc};
use log::warn;

/// Weights of views, likes and comments in the success score.
const SUCCESS_WEIGHTS: (f64, f64, f64) = (0.5, 0.3, 0.2);

/// Engagement ratios relative to the current wall-clock time.
pub fn calculate_video_statistics(metadata: &VideoMetadata) -> EngagementStatistics {
    calculate_video_statistics_at(metadata, Utc::now())
}

/// Engagement ratios relative to `now`. Zero denominators yield 0.
pub fn calculate_video_statistics_at(
    metadata: &VideoMetadata,
    now: DateTime<Utc>,
) -> EngagementStatistics {
    let views = metadata.view_count as f64;
    let likes = metadata.like_count as f64;
    let comments = metadata.comment_count as f64;
    let interactions = likes + comments;

    let days_since_published = match parse_iso8601(&metadata.publish_date) {
        Some(published) => days_since(published, now),
        None => {
            warn!(
                "Unparsable publish date {:?} for video {}, treating it as published today",
                metadata.publish_date, metadata.video_id
            );
            0
        }
    };
    let day_span = (days_since_published + 1) as f64;

    let percent_of = |numerator: f64, denominator: f64| {
        if denominator > 0.0 {
            numerator / denominator * 100.0
        } else {
            0.0
        }
    };

    let engagement_rate = percent_of(interactions, views);
    let intensity_score = interactions / day_span;
    let (view_weight, like_weight, comment_weight) = SUCCESS_WEIGHTS;

    EngagementStatistics {
        engagement_rate: round2(engagement_rate),
        like_view_ratio: round2(percent_of(likes, views)),
        comment_like_ratio: round2(percent_of(comments, likes)),
        popularity_score: metadata.like_count + metadata.comment_count,
        like_growth_rate: round2(likes / day_span),
        comment_growth_rate: round2(comments / day_span),
        success_score: round2(views * view_weight + likes * like_weight + comments * comment_weight),
        engagement_depth: round2(percent_of(comments, interactions)),
        reach_ratio: round2(engagement_rate),
        intensity_score: round2(intensity_score),
        engagement_per_day: round2(intensity_score),
        comprehensive_intensity_score: round2((views + interactions) / day_span),
    }
}
