pub mod config;
pub mod ethereum;
pub mod opensea;
pub mod sentiment;
pub mod trader;

pub use config::TraderFileConfig;
pub use ethereum::{EthereumExecutor, GasSettings};
pub use opensea::OpenSeaClient;
pub use sentiment::{DisabledScorer, HuggingFaceScorer};
pub use trader::Trader;

use std::time::Duration;

use common::{Error, Result};

/// Shared HTTP client settings for every outbound collaborator.
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .use_rustls_tls()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::Http(format!("Failed to build HTTP client: {e}")))
}
