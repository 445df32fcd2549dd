use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use common::{Error, Result, SentimentLabel, SentimentScorer, SentimentSignal};

/// Longest description (in characters) sent to the model.
const MAX_INPUT_CHARS: usize = 512;

/// Text-classification client for the Hugging Face Inference API.
pub struct HuggingFaceScorer {
    token: String,
    url: String,
    http: Client,
}

impl HuggingFaceScorer {
    pub fn new(
        base_url: &str,
        model: &str,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            token: token.into(),
            url: format!("{}/models/{model}", base_url.trim_end_matches('/')),
            http: crate::http_client(timeout)?,
        })
    }
}

#[async_trait]
impl SentimentScorer for HuggingFaceScorer {
    async fn score(&self, text: &str) -> Result<SentimentSignal> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::SentimentUnavailable("empty text".into()));
        }
        let (input, chars) = truncate_chars(text, MAX_INPUT_CHARS);

        debug!(chars, bytes = input.len(), "Requesting sentiment classification");
        let resp = self
            .http
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(&json!({ "inputs": input }))
            .send()
            .await
            .map_err(|e| Error::SentimentUnavailable(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| Error::SentimentUnavailable(e.to_string()))?;

        if !status.is_success() {
            return Err(Error::SentimentUnavailable(format!("HTTP {status}: {body}")));
        }
        parse_classification(&body)
    }
}

/// Used when no sentiment token is configured: every call is "no signal".
pub struct DisabledScorer;

#[async_trait]
impl SentimentScorer for DisabledScorer {
    async fn score(&self, _text: &str) -> Result<SentimentSignal> {
        Err(Error::SentimentUnavailable("sentiment scoring disabled".into()))
    }
}

/// First `max` characters of `text`, with the character count kept.
fn truncate_chars(text: &str, max: usize) -> (&str, usize) {
    match text.char_indices().nth(max) {
        Some((cut, _)) => (&text[..cut], max),
        None => (text, text.chars().count()),
    }
}

/// Highest-scoring recognised label of a classification response.
fn parse_classification(body: &str) -> Result<SentimentSignal> {
    let resp: ClassificationResponse = serde_json::from_str(body)
        .map_err(|e| Error::SentimentUnavailable(format!("malformed classification: {e}")))?;

    let candidates = match resp {
        ClassificationResponse::Nested(batches) => batches.into_iter().next().unwrap_or_default(),
        ClassificationResponse::Flat(scores) => scores,
        ClassificationResponse::Failure { error } => {
            return Err(Error::SentimentUnavailable(error));
        }
    };

    candidates
        .into_iter()
        .filter(|c| c.score.is_finite())
        .filter_map(|c| SentimentLabel::parse(&c.label).map(|label| (label, c.score)))
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(label, score)| SentimentSignal::new(label, score))
        .ok_or_else(|| Error::SentimentUnavailable("no recognised sentiment label".into()))
}

// ─── Response types ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(untagged)]
enum ClassificationResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
    Failure { error: String },
}

#[derive(Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_top_label_from_nested_response() {
        let body = r#"[[{"label":"NEGATIVE","score":0.0123},{"label":"POSITIVE","score":0.9877}]]"#;
        let signal = parse_classification(body).unwrap();
        assert_eq!(signal.label, SentimentLabel::Positive);
        assert!((signal.confidence - 0.9877).abs() < 1e-12);
    }

    #[test]
    fn accepts_flat_response() {
        let body = r#"[{"label":"negative","score":0.8},{"label":"neutral","score":0.15}]"#;
        assert_eq!(parse_classification(body).unwrap().label, SentimentLabel::Negative);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let text = "é".repeat(600);
        let (input, chars) = truncate_chars(&text, MAX_INPUT_CHARS);
        assert_eq!(chars, 512);
        assert_eq!(input.chars().count(), 512);
        assert_eq!(input.len(), 1024);

        let (short, chars) = truncate_chars("ñandú", MAX_INPUT_CHARS);
        assert_eq!((short, chars), ("ñandú", 5));
    }

    #[test]
    fn model_error_is_unavailable() {
        let body = r#"{"error":"Model is currently loading","estimated_time":20.0}"#;
        assert!(matches!(
            parse_classification(body),
            Err(Error::SentimentUnavailable(msg)) if msg.contains("loading")
        ));
    }

    #[test]
    fn unknown_labels_and_garbage_are_unavailable() {
        assert!(parse_classification(r#"[[{"label":"LABEL_0","score":0.9}]]"#).is_err());
        assert!(parse_classification("[]").is_err());
        assert!(parse_classification("not json").is_err());
    }

    #[tokio::test]
    async fn empty_text_is_rejected_without_a_request() {
        let scorer = HuggingFaceScorer::new(
            "http://127.0.0.1:9",
            "any",
            "token",
            Duration::from_millis(50),
        )
        .unwrap();
        assert!(matches!(
            scorer.score("   ").await,
            Err(Error::SentimentUnavailable(msg)) if msg == "empty text"
        ));
    }

    #[tokio::test]
    async fn disabled_scorer_never_fabricates_a_signal() {
        assert!(DisabledScorer.score("great ape").await.is_err());
    }
}
