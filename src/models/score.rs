use serde::{Deserialize, Serialize};

use super::BadgeResult;

/// Category scores as computed (uncapped) plus the capped total.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub social_score: f64,
    pub crypto_score: f64,
    pub nft_score: f64,
    pub community_score: f64,
    pub vault_score: f64,
    pub total_score: f64,
}

impl ScoreBreakdown {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn categories(&self) -> [f64; 5] {
        [
            self.social_score,
            self.crypto_score,
            self.nft_score,
            self.community_score,
            self.vault_score,
        ]
    }

    /// Score the wallet contributes to a persisted record.
    pub fn wallet_score(&self) -> f64 {
        self.crypto_score + self.nft_score
    }
}

/// Output of one evaluation: title, awarded badges and scores.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Evaluation {
    pub title: String,
    pub badges: BadgeResult,
    pub scores: ScoreBreakdown,
}

impl Evaluation {
    /// The minimal result returned when evaluation cannot complete.
    pub fn fallback(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            badges: BadgeResult::new(),
            scores: ScoreBreakdown::zero(),
        }
    }

    pub fn badge_names(&self) -> Vec<String> {
        self.badges.keys().cloned().collect()
    }
}
