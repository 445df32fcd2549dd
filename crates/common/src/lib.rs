pub mod config;
pub mod error;
pub mod marketplace;
pub mod sentiment;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use marketplace::{MarketDataSource, TradeExecutor};
pub use sentiment::SentimentScorer;
pub use types::*;
