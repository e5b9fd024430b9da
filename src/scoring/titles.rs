use serde::{Deserialize, Serialize};

use crate::models::BadgeResult;

pub const DEFAULT_FALLBACK_TITLE: &str = "ALL ROUNDOOR";

/// A title and the badges a user must hold (any tier) to earn it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleRule {
    pub title: String,
    pub requires: Vec<String>,
}

impl TitleRule {
    pub fn new(title: &str, requires: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            requires: requires.iter().map(|b| b.to_string()).collect(),
        }
    }

    pub fn is_satisfied_by(&self, badges: &BadgeResult) -> bool {
        self.requires.iter().all(|badge| badges.contains_key(badge))
    }
}

pub fn default_title_rules() -> Vec<TitleRule> {
    vec![
        TitleRule::new(
            "Crypto Connoisseur",
            &["Crypto Communicator", "Social Connector", "Liquidity Laureate", "Telegram Titan"],
        ),
        TitleRule::new(
            "Blockchain Baron",
            &["DeFi Master", "Liquidity Laureate", "Governance Griot", "Staking Veteran", "Gas Spender"],
        ),
        TitleRule::new(
            "Digital Dynamo",
            &["Twitter Veteran", "Fast Grower", "Engagement Star", "Verified Visionary", "Degen Dualist"],
        ),
        TitleRule::new("DeFi Dynamo", &["DeFi Master", "Airdrop Veteran", "Dapp Diplomat"]),
        TitleRule::new("NFT Aficionado", &["NFT Networker", "NFT Whale"]),
        TitleRule::new(
            "Social Savant",
            &["Crypto Communicator", "Social Connector", "Twitter Veteran", "Engagement Economist", "Retweet Riches"],
        ),
        TitleRule::new("Protocol Pioneer", &["Chain Explorer", "Bridge Blazer", "DeFi Drifter"]),
        TitleRule::new("Token Titan", &["Influence Investor", "NFT Networker", "Tweet Trader"]),
        TitleRule::new("Chain Champion", &["Bridge Blazer", "Viral Validator", "Social HODLer"]),
        TitleRule::new("Governance Guru", &["DAO Diplomat", "Community Leader", "Governance Griot"]),
    ]
}

/// First-match title lookup over an ordered rule table.
#[derive(Debug, Clone)]
pub struct TitleSelector {
    rules: Vec<TitleRule>,
    fallback: String,
}

impl Default for TitleSelector {
    fn default() -> Self {
        Self::new(default_title_rules(), DEFAULT_FALLBACK_TITLE)
    }
}

impl TitleSelector {
    pub fn new(rules: Vec<TitleRule>, fallback: impl Into<String>) -> Self {
        Self {
            rules,
            fallback: fallback.into(),
        }
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    pub fn select_title(&self, badges: &BadgeResult) -> String {
        self.rules
            .iter()
            .find(|rule| rule.is_satisfied_by(badges))
            .map(|rule| rule.title.clone())
            .unwrap_or_else(|| self.fallback.clone())
    }
}
