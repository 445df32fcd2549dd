pub mod linear;
pub mod random_forest;

pub use linear::LinearTrendForecaster;
pub use random_forest::RandomForestForecaster;
