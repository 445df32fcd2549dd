use async_trait::async_trait;

use crate::{Result, SentimentSignal};

/// Maps free text to a sentiment signal.
///
/// Empty or unscorable text yields `Error::SentimentUnavailable`; callers treat
/// that as "no signal" and never substitute a made-up value.
#[async_trait]
pub trait SentimentScorer: Send + Sync {
    async fn score(&self, text: &str) -> Result<SentimentSignal>;
}
