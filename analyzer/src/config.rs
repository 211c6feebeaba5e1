use env_logger::{Builder, Env};
use log::info;
use std::env;

pub const DEFAULT_YOUTUBE_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_SENTIMENT_MODEL: &str = "nlptown/bert-base-multilingual-uncased-sentiment";
pub const DEFAULT_HF_INFERENCE_URL: &str = "https://router.huggingface.co/hf-inference/models";
pub const DEFAULT_MAX_COMMENTS: usize = 100;

/// Token limit of the sentiment model input, special tokens included.
pub const MAX_TOKENS: usize = 512;

pub fn init_logger() {
    Builder::from_env(Env::default().default_filter_or("info")).init();
    info!("Starting video analyzer...");
}

pub fn load_environment() {
    dotenv::dotenv().ok();
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub youtube_api_key: Option<String>,
    pub youtube_api_base_url: String,
    pub sentiment_model: String,
    pub hf_inference_url: String,
    pub hf_api_token: Option<String>,
    pub max_comments: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            youtube_api_key: None,
            youtube_api_base_url: DEFAULT_YOUTUBE_API_BASE_URL.to_string(),
            sentiment_model: DEFAULT_SENTIMENT_MODEL.to_string(),
            hf_inference_url: DEFAULT_HF_INFERENCE_URL.to_string(),
            hf_api_token: None,
            max_comments: DEFAULT_MAX_COMMENTS,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            youtube_api_key: get("YOUTUBE_API_KEY"),
            youtube_api_base_url: get("YOUTUBE_API_BASE_URL")
                .unwrap_or(defaults.youtube_api_base_url),
            sentiment_model: get("SENTIMENT_MODEL").unwrap_or(defaults.sentiment_model),
            hf_inference_url: get("HF_INFERENCE_URL").unwrap_or(defaults.hf_inference_url),
            hf_api_token: get("HF_API_TOKEN"),
            max_comments: get("MAX_COMMENTS")
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(defaults.max_comments),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let settings = Settings::from_lookup(lookup(&[]));
        assert!(settings.youtube_api_key.is_none());
        assert_eq!(settings.youtube_api_base_url, DEFAULT_YOUTUBE_API_BASE_URL);
        assert_eq!(settings.sentiment_model, DEFAULT_SENTIMENT_MODEL);
        assert_eq!(settings.max_comments, 100);
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let settings = Settings::from_lookup(lookup(&[("YOUTUBE_API_KEY", "   ")]));
        assert!(settings.youtube_api_key.is_none());
    }

    #[test]
    fn max_comments_falls_back_on_garbage() {
        let settings = Settings::from_lookup(lookup(&[
            ("YOUTUBE_API_KEY", "abc"),
            ("MAX_COMMENTS", "lots"),
        ]));
        assert_eq!(settings.youtube_api_key.as_deref(), Some("abc"));
        assert_eq!(settings.max_comments, DEFAULT_MAX_COMMENTS);

        let settings = Settings::from_lookup(lookup(&[("MAX_COMMENTS", "250")]));
        assert_eq!(settings.max_comments, 250);
    }
}
