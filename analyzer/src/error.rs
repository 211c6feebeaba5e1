use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalyzerError>;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid YouTube URL: {0}")]
    InvalidUrl(String),

    #[error("No video found for ID: {0}")]
    VideoNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Sentiment classifier error: {0}")]
    Classifier(String),
}
