use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Endpoints and retry policy for the three upstream data APIs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    pub social: ApiEndpoint,
    pub wallet: ApiEndpoint,
    pub vault: ApiEndpoint,
    pub timeout_seconds: u64,
    pub retry: RetrySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEndpoint {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Sent as `x-rapidapi-host` when set.
    pub host: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_multiplier: f64,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            social: ApiEndpoint {
                base_url: "https://twitter-api45.p.rapidapi.com".to_string(),
                api_key: None,
                host: Some("twitter-api45.p.rapidapi.com".to_string()),
            },
            wallet: ApiEndpoint {
                base_url: "https://deep-index.moralis.io/api/v2.2".to_string(),
                api_key: None,
                host: None,
            },
            vault: ApiEndpoint {
                base_url: "https://api.verida.ai".to_string(),
                api_key: None,
                host: None,
            },
            timeout_seconds: 30,
            retry: RetrySettings::default(),
        }
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 250,
            max_delay_ms: 5_000,
            backoff_multiplier: 2.0,
        }
    }
}

impl SourcesConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl ApiEndpoint {
    /// `base_url` joined with `path`, tolerating slashes on either side.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url_join() {
        let endpoint = ApiEndpoint {
            base_url: "https://api.example.com/".to_string(),
            api_key: None,
            host: None,
        };
        assert_eq!(endpoint.url("/v1/users"), "https://api.example.com/v1/users");
        assert_eq!(endpoint.url("v1/users"), "https://api.example.com/v1/users");
    }
}
