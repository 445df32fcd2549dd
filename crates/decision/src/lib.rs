pub mod config;
pub mod engine;

pub use config::{DecisionConfig, PriceGate, SentimentGate};
pub use engine::{DecisionEngine, DecisionInputs};
