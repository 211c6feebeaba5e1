use analyzer::cli::prompt_for_url;
use analyzer::config::{init_logger, load_environment, Settings};
use analyzer::pipeline::run_statistics_pipeline;
use analyzer::services::youtube_api::YouTubeClient;
use anyhow::Result;
use log::error;
use std::path::Path;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    load_environment();
    init_logger();

    if let Err(e) = run().await {
        error!("Video statistics analysis failed: {e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let youtube_url = prompt_for_url()?;
    let settings = Settings::from_env();
    let client = YouTubeClient::new(&settings)?;

    let outcome = run_statistics_pipeline(&client, &youtube_url, Path::new(".")).await?;

    println!(
        "Video metadata saved to '{}'.",
        outcome.metadata_path.display()
    );
    println!(
        "Video statistics saved to '{}'.",
        outcome.statistics_path.display()
    );
    Ok(())
}
