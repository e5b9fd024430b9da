use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde_json::Value;

use crate::models::{RawSocialProfile, RawVaultItems, RawWalletSummary, Result, ScoreError};

/// Supplies the social profile payload for a handle.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SocialSource: Send + Sync {
    async fn fetch_social_profile(&self, handle: &str) -> Result<RawSocialProfile>;
}

/// Supplies the wallet summary payload for an address.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WalletSource: Send + Sync {
    async fn fetch_wallet_summary(&self, address: &str) -> Result<RawWalletSummary>;
}

/// Supplies the chat group and message collections stored in a user's vault.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VaultSource: Send + Sync {
    async fn fetch_vault_groups(&self, user_id: &str) -> Result<RawVaultItems>;

    async fn fetch_vault_messages(&self, user_id: &str) -> Result<RawVaultItems>;
}

/// Sends `request` and decodes a JSON body, turning non-2xx statuses into
/// a `SourceError` tagged with `source_name`.
pub(crate) async fn send_json(request: RequestBuilder, source_name: &str) -> Result<Value> {
    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ScoreError::SourceError {
            source_name: source_name.to_string(),
            message: format!("HTTP {}: {}", status, truncate(&body, 200)),
        });
    }

    Ok(response.json::<Value>().await?)
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub(crate) fn build_http_client(timeout: std::time::Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ScoreError::ConfigError(format!("Failed to create HTTP client: {}", e)))
}
