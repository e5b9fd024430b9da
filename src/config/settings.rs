use serde::{Deserialize, Serialize};
use config::{Config, ConfigError, File};
use std::collections::HashSet;
use std::path::Path;

use crate::scoring::{
    badges::{default_badge_thresholds, find_badge, BadgeThresholdRule},
    titles::{default_title_rules, TitleRule, DEFAULT_FALLBACK_TITLE},
    weights::{CategoryCaps, ScoringWeights},
};
use super::sources::SourcesConfig;

const ENV_PREFIX: &str = "SIGNAL_SCORE";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub app: AppSettings,
    pub scoring: ScoringSettings,
    pub database: DatabaseSettings,
    pub sources: SourcesConfig,
    pub token_store: TokenStoreSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub version: String,
    pub log_level: String,
    pub environment: Environment,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

/// Weight, cap, badge and title tables. Loaded once and treated as immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringSettings {
    pub weights: ScoringWeights,
    pub caps: CategoryCaps,
    pub badge_thresholds: Vec<BadgeThresholdRule>,
    pub titles: Vec<TitleRule>,
    pub fallback_title: String,
    /// Score recorded for wallets other than the one that was evaluated.
    pub additional_wallet_score: f64,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            caps: CategoryCaps::default(),
            badge_thresholds: default_badge_thresholds(),
            titles: default_title_rules(),
            fallback_title: DEFAULT_FALLBACK_TITLE.to_string(),
            additional_wallet_score: 10.0,
        }
    }
}

impl ScoringSettings {
    pub fn validate(&self) -> Result<(), String> {
        self.weights.validate()?;
        self.caps.validate()?;

        let mut seen = HashSet::new();
        for rule in &self.badge_thresholds {
            if find_badge(&rule.badge).is_none() {
                return Err(format!("Thresholds given for unknown badge {}", rule.badge));
            }
            if !seen.insert(rule.badge.as_str()) {
                return Err(format!("Badge {} has more than one threshold entry", rule.badge));
            }
            if !rule.thresholds().is_ascending() {
                return Err(format!(
                    "Thresholds for {} must ascend silver <= gold <= platinum",
                    rule.badge
                ));
            }
        }

        for title in &self.titles {
            if title.requires.is_empty() {
                return Err(format!("Title {} has no required badges", title.title));
            }
            if let Some(unknown) = title.requires.iter().find(|b| find_badge(b).is_none()) {
                return Err(format!("Title {} requires unknown badge {}", title.title, unknown));
            }
        }

        if self.fallback_title.trim().is_empty() {
            return Err("Fallback title must not be empty".to_string());
        }
        if !self.additional_wallet_score.is_finite() || self.additional_wallet_score < 0.0 {
            return Err("Additional wallet score must be non-negative".to_string());
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenStoreSettings {
    pub ttl_seconds: u64,
    pub max_entries: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app: AppSettings {
                name: "Signal Scorer".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                log_level: "info".to_string(),
                environment: Environment::Development,
            },
            scoring: ScoringSettings::default(),
            database: DatabaseSettings::default(),
            sources: SourcesConfig::default(),
            token_store: TokenStoreSettings::default(),
        }
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "sqlite://signal_scores.db".to_string(),
            max_connections: 5,
        }
    }
}

impl Default for TokenStoreSettings {
    fn default() -> Self {
        Self {
            ttl_seconds: 3600,
            max_entries: 10_000,
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        s.try_deserialize()
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::from(path.as_ref()))
            .build()?;

        s.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        self.scoring.validate()?;

        if self.database.max_connections == 0 {
            return Err("Database max_connections must be at least 1".to_string());
        }
        if self.token_store.max_entries == 0 {
            return Err("Token store max_entries must be at least 1".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings_validate() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_descending_thresholds_rejected() {
        let mut settings = Settings::default();
        settings.scoring.badge_thresholds[0].platinum = 0.0;
        assert!(settings.validate().unwrap_err().contains("ascend"));
    }

    #[test]
    fn test_title_with_unknown_badge_rejected() {
        let mut settings = Settings::default();
        settings.scoring.titles.push(TitleRule::new("Mystery", &["Not A Badge"]));
        assert!(settings.validate().unwrap_err().contains("Not A Badge"));
    }

    #[test]
    fn test_duplicate_threshold_entry_rejected() {
        let mut settings = Settings::default();
        let first = settings.scoring.badge_thresholds[0].clone();
        settings.scoring.badge_thresholds.push(first);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[scoring]\nfallback_title = \"Wanderer\"\n\n[scoring.caps]\nsocial = 25.0\ncrypto = 40.0\nnft = 30.0\ncommunity = 20.0\nvault = 15.0\n"
        )
        .unwrap();

        let settings = Settings::from_file(file.path()).unwrap();

        assert_eq!(settings.scoring.fallback_title, "Wanderer");
        assert_eq!(settings.scoring.caps.social, 25.0);
        assert_eq!(settings.scoring.weights, ScoringWeights::default());
        assert_eq!(settings.scoring.titles.len(), 10);
    }
}
