use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

use crate::config::{ApiEndpoint, SourcesConfig};
use crate::models::{RawVaultItems, Result, ScoreError};
use crate::sources::client::{build_http_client, send_json, VaultSource};
use crate::sources::resilience::{retry_with_backoff, RetryConfig};
use crate::storage::TokenStore;

const SOURCE_NAME: &str = "vault";

pub const CHAT_GROUP_SCHEMA: &str =
    "https://common.schemas.verida.io/social/chat/group/v0.1.0/schema.json";
pub const CHAT_MESSAGE_SCHEMA: &str =
    "https://common.schemas.verida.io/social/chat/message/v0.1.0/schema.json";
pub const TELEGRAM_SOURCE: &str = "https://telegram.com";

const SEARCH_PATH: &str = "api/rest/v1/search/ds";
const SEARCH_LIMIT: u64 = 10_000_000;

/// Reads Telegram chat data out of a user's personal data vault.
pub struct VaultApiClient {
    client: Client,
    endpoint: ApiEndpoint,
    retry: RetryConfig,
    tokens: Arc<dyn TokenStore>,
}

impl VaultApiClient {
    pub fn new(config: &SourcesConfig, tokens: Arc<dyn TokenStore>) -> Result<Self> {
        Ok(Self {
            client: build_http_client(config.timeout())?,
            endpoint: config.vault.clone(),
            retry: RetryConfig::from(&config.retry),
            tokens,
        })
    }

    fn token_for(&self, user_id: &str) -> Result<String> {
        self.tokens
            .token(user_id)
            .ok_or_else(|| ScoreError::MissingAuthToken(user_id.to_string()))
    }

    async fn search(&self, user_id: &str, schema: &'static str) -> Result<RawVaultItems> {
        let token = self.token_for(user_id)?;
        let body = search_body(schema);
        let url = self.endpoint.url(SEARCH_PATH);

        let response = retry_with_backoff(&self.retry, "vault_search", || {
            let request = self
                .client
                .post(url.as_str())
                .bearer_auth(&token)
                .json(&body);
            send_json(request, SOURCE_NAME)
        })
        .await?;

        let items = RawVaultItems(response);
        debug!("Vault returned {} items for {} ({})", items.len(), user_id, schema);
        Ok(items)
    }
}

fn search_body(schema: &str) -> Value {
    json!({
        "schema": schema,
        "query": { "sourceApplication": TELEGRAM_SOURCE },
        "options": {
            "sort": [{ "_id": "desc" }],
            "limit": SEARCH_LIMIT,
        }
    })
}

#[async_trait]
impl VaultSource for VaultApiClient {
    async fn fetch_vault_groups(&self, user_id: &str) -> Result<RawVaultItems> {
        self.search(user_id, CHAT_GROUP_SCHEMA).await
    }

    async fn fetch_vault_messages(&self, user_id: &str) -> Result<RawVaultItems> {
        self.search(user_id, CHAT_MESSAGE_SCHEMA).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryTokenStore;

    #[test]
    fn test_search_body_targets_telegram() {
        let body = search_body(CHAT_MESSAGE_SCHEMA);
        assert_eq!(body["schema"], CHAT_MESSAGE_SCHEMA);
        assert_eq!(body["query"]["sourceApplication"], TELEGRAM_SOURCE);
        assert_eq!(body["options"]["limit"], SEARCH_LIMIT);
    }

    #[tokio::test]
    async fn test_missing_token_fails_without_request() {
        let tokens = Arc::new(InMemoryTokenStore::default());
        let mut config = SourcesConfig::default();
        config.vault.base_url = "http://127.0.0.1:9".to_string();
        let client = VaultApiClient::new(&config, tokens).unwrap();

        let err = client.fetch_vault_groups("user-1").await.unwrap_err();
        assert!(matches!(err, ScoreError::MissingAuthToken(ref id) if id == "user-1"));
    }
}
