use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::{ApiEndpoint, SourcesConfig};
use crate::models::{RawSocialProfile, Result, ScoreError};
use crate::sources::client::{build_http_client, send_json, SocialSource};
use crate::sources::resilience::{retry_with_backoff, RetryConfig};

const SOURCE_NAME: &str = "social";

/// Twitter profile lookups through RapidAPI.
pub struct SocialApiClient {
    client: Client,
    endpoint: ApiEndpoint,
    retry: RetryConfig,
}

impl SocialApiClient {
    pub fn new(config: &SourcesConfig) -> Result<Self> {
        Ok(Self {
            client: build_http_client(config.timeout())?,
            endpoint: config.social.clone(),
            retry: RetryConfig::from(&config.retry),
        })
    }

    fn request(&self, handle: &str) -> reqwest::RequestBuilder {
        let mut request = self
            .client
            .get(self.endpoint.url("user"))
            .query(&[("username", handle)]);

        if let Some(key) = &self.endpoint.api_key {
            request = request.header("x-rapidapi-key", key);
        }
        if let Some(host) = &self.endpoint.host {
            request = request.header("x-rapidapi-host", host);
        }
        request
    }
}

#[async_trait]
impl SocialSource for SocialApiClient {
    async fn fetch_social_profile(&self, handle: &str) -> Result<RawSocialProfile> {
        let handle = handle.trim().trim_start_matches('@');
        if handle.is_empty() {
            return Err(ScoreError::InvalidInput("Social handle is empty".to_string()));
        }

        debug!("Fetching social profile for @{}", handle);
        let body = retry_with_backoff(&self.retry, "fetch_social_profile", || {
            send_json(self.request(handle), SOURCE_NAME)
        })
        .await?;

        Ok(RawSocialProfile(body))
    }
}
