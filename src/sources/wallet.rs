use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::{ApiEndpoint, SourcesConfig};
use crate::models::{RawWalletSummary, Result, ScoreError};
use crate::sources::client::{build_http_client, send_json, WalletSource};
use crate::sources::resilience::{retry_with_backoff, RetryConfig};

const SOURCE_NAME: &str = "wallet";

/// Wallet summary lookups against the indexer API.
pub struct WalletApiClient {
    client: Client,
    endpoint: ApiEndpoint,
    retry: RetryConfig,
}

impl WalletApiClient {
    pub fn new(config: &SourcesConfig) -> Result<Self> {
        Ok(Self {
            client: build_http_client(config.timeout())?,
            endpoint: config.wallet.clone(),
            retry: RetryConfig::from(&config.retry),
        })
    }

    fn request(&self, address: &str) -> reqwest::RequestBuilder {
        let url = self.endpoint.url(&format!("wallets/{}/summary", address));
        let request = self.client.get(url).header("accept", "application/json");

        match &self.endpoint.api_key {
            Some(key) => request.header("X-API-Key", key),
            None => request,
        }
    }
}

#[async_trait]
impl WalletSource for WalletApiClient {
    async fn fetch_wallet_summary(&self, address: &str) -> Result<RawWalletSummary> {
        let address = address.trim();
        if address.is_empty() {
            return Err(ScoreError::InvalidInput("Wallet address is empty".to_string()));
        }

        debug!("Fetching wallet summary for {}", address);
        let body = retry_with_backoff(&self.retry, "fetch_wallet_summary", || {
            send_json(self.request(address), SOURCE_NAME)
        })
        .await?;

        Ok(RawWalletSummary(body))
    }
}
