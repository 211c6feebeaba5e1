// Comment sentiment scoring backed by a pretrained text-classification model.
// The model's vocabulary is fetched from the Hugging Face Hub for local
// truncation; inference runs on the hosted endpoint.

use crate::config::{Settings, MAX_TOKENS};
use crate::error::{AnalyzerError, Result};
use async_trait::async_trait;
use hf_hub::api::sync::Api;
use lazy_static::lazy_static;
use log::{debug, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use tokenizers::decoders::wordpiece::WordPiece as WordPieceDecoder;
use tokenizers::models::wordpiece::WordPiece;
use tokenizers::normalizers::bert::BertNormalizer;
use tokenizers::pre_tokenizers::bert::BertPreTokenizer;
use tokenizers::Tokenizer;
use tokio::sync::OnceCell;

/// `[CLS]` and `[SEP]` are added by the model and count towards its limit.
const SPECIAL_TOKENS: usize = 2;

lazy_static! {
    static ref SHARED_CLASSIFIER: OnceCell<Arc<HubSentimentClassifier>> = OnceCell::new();
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentPrediction {
    pub label: String,
    pub score: f64,
}

#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    /// Cuts `text` down to what fits in one model input.
    fn truncate(&self, text: &str) -> Result<String>;

    /// Single best label for `text`.
    async fn classify(&self, text: &str) -> Result<SentimentPrediction>;
}

pub struct HubSentimentClassifier {
    client: Client,
    tokenizer: Tokenizer,
    endpoint: String,
    api_token: Option<String>,
    max_word_pieces: usize,
}

impl HubSentimentClassifier {
    /// Downloads the model vocabulary (cached by hf-hub) and prepares the client.
    pub async fn load(settings: &Settings) -> Result<Self> {
        let model_id = settings.sentiment_model.clone();
        info!("Loading tokenizer for sentiment model {model_id}");

        let tokenizer = tokio::task::spawn_blocking(move || build_tokenizer(&model_id))
            .await
            .map_err(|e| AnalyzerError::Classifier(format!("Tokenizer loader panicked: {e}")))??;

        Ok(Self {
            client: Client::new(),
            tokenizer,
            endpoint: format!(
                "{}/{}",
                settings.hf_inference_url.trim_end_matches('/'),
                settings.sentiment_model
            ),
            api_token: settings.hf_api_token.clone(),
            max_word_pieces: MAX_TOKENS - SPECIAL_TOKENS,
        })
    }
}

fn classifier_error(context: &str) -> impl Fn(tokenizers::Error) -> AnalyzerError + '_ {
    move |e| AnalyzerError::Classifier(format!("{context}: {e}"))
}

/// Fetches the model's `vocab.txt` through the hub cache.
fn build_tokenizer(model_id: &str) -> Result<Tokenizer> {
    let api = Api::new().map_err(|e| AnalyzerError::Classifier(format!("Hub client: {e}")))?;
    let vocab_path = api
        .model(model_id.to_string())
        .get("vocab.txt")
        .map_err(|e| AnalyzerError::Classifier(format!("Downloading vocab.txt: {e}")))?;

    tokenizer_from_vocab(&vocab_path)
}

/// BERT uncased WordPiece tokenizer over a local `vocab.txt`.
fn tokenizer_from_vocab(vocab_path: &Path) -> Result<Tokenizer> {
    let vocab = vocab_path.to_str().ok_or_else(|| {
        AnalyzerError::Classifier(format!("Non UTF-8 vocab path: {}", vocab_path.display()))
    })?;

    let wordpiece = WordPiece::from_file(vocab)
        .unk_token("[UNK]".to_string())
        .build()
        .map_err(classifier_error("Building WordPiece model"))?;

    let mut tokenizer = Tokenizer::new(wordpiece);
    tokenizer
        .with_normalizer(BertNormalizer::new(true, true, None, true))
        .with_pre_tokenizer(BertPreTokenizer)
        .with_decoder(WordPieceDecoder::default());

    Ok(tokenizer)
}

/// The endpoint answers either `[[{label, score}, ..]]` or `[{label, score}, ..]`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Nested(Vec<Vec<SentimentPrediction>>),
    Flat(Vec<SentimentPrediction>),
}

impl InferenceResponse {
    fn best(self) -> Option<SentimentPrediction> {
        let candidates = match self {
            Self::Nested(batches) => batches.into_iter().next().unwrap_or_default(),
            Self::Flat(candidates) => candidates,
        };
        candidates
            .into_iter()
            .reduce(|best, next| if next.score > best.score { next } else { best })
    }
}

#[async_trait]
impl SentimentClassifier for HubSentimentClassifier {
    fn truncate(&self, text: &str) -> Result<String> {
        let encoding = self
            .tokenizer
            .encode(text, false)
            .map_err(classifier_error("Encoding comment"))?;

        let ids = encoding.get_ids();
        if ids.len() <= self.max_word_pieces {
            return Ok(text.to_string());
        }

        debug!(
            "Truncating comment from {} to {} word pieces",
            ids.len(),
            self.max_word_pieces
        );
        self.tokenizer
            .decode(&ids[..self.max_word_pieces], true)
            .map_err(classifier_error("Decoding truncated comment"))
    }

    async fn classify(&self, text: &str) -> Result<SentimentPrediction> {
        let mut request = self.client.post(&self.endpoint).json(&json!({
            "inputs": text,
            "options": { "wait_for_model": true },
        }));
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AnalyzerError::Api { status, body });
        }

        response
            .json::<InferenceResponse>()
            .await?
            .best()
            .ok_or_else(|| AnalyzerError::Classifier("Model returned no labels".to_string()))
    }
}

/// Process-wide classifier, built on first use and shared read-only afterwards.
pub async fn shared_classifier(settings: &Settings) -> Result<Arc<HubSentimentClassifier>> {
    SHARED_CLASSIFIER
        .get_or_try_init(|| async { HubSentimentClassifier::load(settings).await.map(Arc::new) })
        .await
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_highest_score_from_nested_response() {
        let body = r#"[[
            {"label": "1 star", "score": 0.02},
            {"label": "4 stars", "score": 0.31},
            {"label": "5 stars", "score": 0.61},
            {"label": "3 stars", "score": 0.06}
        ]]"#;
        let parsed: InferenceResponse = serde_json::from_str(body).unwrap();
        let best = parsed.best().unwrap();
        assert_eq!(best.label, "5 stars");
        assert_eq!(best.score, 0.61);
    }

    #[test]
    fn picks_highest_score_from_flat_response() {
        let body = r#"[{"label": "2 stars", "score": 0.7}, {"label": "1 star", "score": 0.3}]"#;
        let parsed: InferenceResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.best().unwrap().label, "2 stars");
    }

    #[test]
    fn empty_response_has_no_label() {
        let parsed: InferenceResponse = serde_json::from_str("[[]]").unwrap();
        assert!(parsed.best().is_none());
    }

    fn classifier_with_vocab(max_word_pieces: usize) -> (tempfile::TempDir, HubSentimentClassifier) {
        let dir = tempfile::tempdir().unwrap();
        let vocab_path = dir.path().join("vocab.txt");
        std::fs::write(
            &vocab_path,
            "[PAD]\n[UNK]\n[CLS]\n[SEP]\ngreat\nvideo\nwork\n##s\n",
        )
        .unwrap();

        let classifier = HubSentimentClassifier {
            client: Client::new(),
            tokenizer: tokenizer_from_vocab(&vocab_path).unwrap(),
            endpoint: String::new(),
            api_token: None,
            max_word_pieces,
        };
        (dir, classifier)
    }

    #[test]
    fn short_comment_is_returned_verbatim() {
        let (_dir, classifier) = classifier_with_vocab(3);
        assert_eq!(classifier.truncate("Great video").unwrap(), "Great video");
        assert_eq!(classifier.truncate("").unwrap(), "");
    }

    #[test]
    fn long_comment_is_cut_to_word_piece_limit() {
        let (_dir, classifier) = classifier_with_vocab(3);
        let truncated = classifier
            .truncate("Great video great video great")
            .unwrap();
        assert_eq!(truncated, "great video great");
    }

    #[test]
    fn sub_word_pieces_count_towards_the_limit() {
        let (_dir, classifier) = classifier_with_vocab(2);
        assert_eq!(classifier.truncate("great works video").unwrap(), "great work");
    }

    #[test]
    fn missing_vocab_is_a_classifier_error() {
        let dir = tempfile::tempdir().unwrap();
        match tokenizer_from_vocab(&dir.path().join("vocab.txt")) {
            Err(AnalyzerError::Classifier(message)) => {
                assert!(message.starts_with("Building WordPiece model"))
            }
            other => panic!("expected Classifier error, got {:?}", other.map(|_| ())),
        }
    }
}
