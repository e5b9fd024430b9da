use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use super::{BadgeResult, ScoreBreakdown};

/// Persisted per-user score state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreRecord {
    pub user_key: String,
    pub username: Option<String>,
    pub email: Option<String>,
    pub title: String,
    pub badges: Vec<String>,
    #[serde(default)]
    pub badge_groups: BadgeGroups,
    pub social_score: f64,
    pub vault_score: f64,
    pub wallets: Vec<WalletScore>,
    /// social + vault + every wallet's score.
    pub aggregate_score: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Awarded badge names split by the source that earned them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BadgeGroups {
    pub social: Vec<String>,
    pub wallet: Vec<String>,
    pub vault: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WalletScore {
    pub wallet_address: String,
    pub score: f64,
}

impl ScoreRecord {
    pub fn new(user_key: String, now: DateTime<Utc>) -> Self {
        Self {
            user_key,
            username: None,
            email: None,
            title: String::new(),
            badges: Vec::new(),
            badge_groups: BadgeGroups::default(),
            social_score: 0.0,
            vault_score: 0.0,
            wallets: Vec::new(),
            aggregate_score: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn wallet_total(&self) -> f64 {
        self.wallets.iter().map(|w| w.score).sum()
    }

    /// Sets a wallet's score, adding the wallet if it is new.
    pub fn upsert_wallet(&mut self, address: &str, score: f64) {
        match self.wallets.iter_mut().find(|w| w.wallet_address == address) {
            Some(existing) => existing.score = score,
            None => self.wallets.push(WalletScore {
                wallet_address: address.to_string(),
                score,
            }),
        }
    }

    /// Adds a wallet with `score` only if the record does not hold it yet.
    pub fn add_wallet_if_missing(&mut self, address: &str, score: f64) -> bool {
        if self.wallets.iter().any(|w| w.wallet_address == address) {
            return false;
        }
        self.wallets.push(WalletScore {
            wallet_address: address.to_string(),
            score,
        });
        true
    }

    pub fn recompute_aggregate(&mut self) {
        self.aggregate_score = self.social_score + self.vault_score + self.wallet_total();
    }
}

/// Inputs for collecting and scoring one user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub user_key: String,
    pub username: Option<String>,
    pub email: Option<String>,
    pub primary_address: Option<String>,
    pub wallet_addresses: Vec<String>,
    pub vault_user_id: Option<String>,
}

impl ScoreRequest {
    pub fn new(user_key: impl Into<String>) -> Self {
        Self {
            user_key: user_key.into(),
            ..Default::default()
        }
    }

    /// The explicit primary address, else the first listed wallet.
    pub fn primary_address(&self) -> Option<&str> {
        self.primary_address
            .as_deref()
            .or_else(|| self.wallet_addresses.first().map(String::as_str))
            .filter(|a| !a.is_empty())
    }

    /// Every wallet address, primary included, without duplicates or blanks.
    pub fn all_addresses(&self) -> Vec<String> {
        let mut addresses: Vec<String> = Vec::new();
        let primary = self.primary_address.iter();
        for address in primary.chain(self.wallet_addresses.iter()) {
            if !address.is_empty() && !addresses.contains(address) {
                addresses.push(address.clone());
            }
        }
        addresses
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SourceStatus {
    Fetched,
    Failed,
    Skipped,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceReport {
    pub social: SourceStatus,
    pub wallet: SourceStatus,
    pub vault: SourceStatus,
}

/// What a collection request hands back to its caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreReport {
    pub user_key: String,
    pub title: String,
    pub badges: BadgeResult,
    pub badge_groups: BadgeGroups,
    pub scores: ScoreBreakdown,
    pub aggregate_score: f64,
    pub wallet_count: usize,
    pub sources: SourceReport,
    pub persisted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_address_falls_back_to_first_wallet() {
        let mut req = ScoreRequest::new("user-1");
        assert_eq!(req.primary_address(), None);

        req.wallet_addresses = vec!["0xaaa".to_string(), "0xbbb".to_string()];
        assert_eq!(req.primary_address(), Some("0xaaa"));

        req.primary_address = Some("0xbbb".to_string());
        assert_eq!(req.primary_address(), Some("0xbbb"));
        assert_eq!(req.all_addresses(), vec!["0xbbb".to_string(), "0xaaa".to_string()]);
    }

    #[test]
    fn test_wallet_upsert_and_aggregate() {
        let mut record = ScoreRecord::new("user-1".to_string(), Utc::now());
        record.social_score = 12.0;
        record.vault_score = 3.0;
        record.upsert_wallet("0xaaa", 20.0);
        assert!(record.add_wallet_if_missing("0xbbb", 10.0));
        assert!(!record.add_wallet_if_missing("0xaaa", 10.0));
        record.upsert_wallet("0xaaa", 25.0);
        record.recompute_aggregate();

        assert_eq!(record.wallets.len(), 2);
        assert_eq!(record.wallet_total(), 35.0);
        assert_eq!(record.aggregate_score, 50.0);
    }
}
