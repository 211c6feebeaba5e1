use analyzer::cli::prompt_for_url;
use analyzer::config::{init_logger, load_environment, Settings};
use analyzer::pipeline::run_sentiment_pipeline;
use analyzer::services::sentiment::shared_classifier;
use analyzer::services::youtube_api::YouTubeClient;
use analyzer::utils::extract_video_id;
use anyhow::Result;
use log::error;
use std::path::Path;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    load_environment();
    init_logger();

    if let Err(e) = run().await {
        error!("Comment sentiment analysis failed: {e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let youtube_url = prompt_for_url()?;
    let settings = Settings::from_env();
    let client = YouTubeClient::new(&settings)?;
    // Reject bad input before the model download.
    extract_video_id(&youtube_url)?;
    let classifier = shared_classifier(&settings).await?;

    let outcome = run_sentiment_pipeline(
        &client,
        classifier.as_ref(),
        &youtube_url,
        settings.max_comments,
        Path::new("."),
    )
    .await?;

    println!(
        "Video metadata saved to '{}'.",
        outcome.metadata_path.display()
    );
    println!(
        "Sentiment analysis of {} comments saved to '{}'.",
        outcome.report.comments.len(),
        outcome.report_path.display()
    );
    Ok(())
}
