use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Market data source unreachable or returned an unusable payload.
    #[error("Market data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Insufficient price history: {points} point(s), need at least 2")]
    InsufficientHistory { points: usize },

    /// Regression model could not be fitted or evaluated.
    #[error("Forecast model error: {0}")]
    Model(String),

    #[error("Sentiment unavailable: {0}")]
    SentimentUnavailable(String),

    /// Purchase transaction could not be built, signed or submitted.
    #[error("Purchase failed: {0}")]
    Execution(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
