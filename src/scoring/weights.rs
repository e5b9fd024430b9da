use serde::{Deserialize, Serialize};

/// Per-metric multipliers for the five category scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    // Social
    pub followers: f64,
    pub retweets: f64,
    pub quotes: f64,
    pub replies: f64,
    pub engagement: f64,
    pub verification: f64,
    pub tweet_frequency: f64,
    pub subscriptions: f64,
    pub account_age: f64,
    pub media: f64,
    pub pinned: f64,
    pub friends: f64,
    pub listed: f64,
    pub super_follow: f64,

    // Crypto and NFT
    pub active_chains: f64,
    pub native_balance: f64,
    pub token_holdings: f64,
    pub nft_holdings: f64,
    pub defi_positions: f64,
    pub web3_domains: f64,
    pub transaction_count: f64,
    pub unique_token_interactions: f64,

    // Community and vault
    pub group_count: f64,
    pub message_frequency: f64,
    pub pinned_messages: f64,
    pub media_messages: f64,
    pub hashtags: f64,
    pub polls: f64,
    pub leadership: f64,
    pub bot_interactions: f64,
    pub sticker_messages: f64,
    pub gif_messages: f64,
    pub mentions: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            followers: 0.001,
            retweets: 0.005,
            quotes: 0.005,
            replies: 0.002,
            engagement: 0.0001,
            verification: 5.0,
            tweet_frequency: 0.001,
            subscriptions: 2.0,
            account_age: 0.1,
            media: 0.01,
            pinned: 5.0,
            friends: 0.001,
            listed: 0.01,
            super_follow: 5.0,

            active_chains: 5.0,
            native_balance: 10.0,
            token_holdings: 2.0,
            nft_holdings: 5.0,
            defi_positions: 5.0,
            web3_domains: 5.0,
            transaction_count: 0.01,
            unique_token_interactions: 1.0,

            group_count: 2.0,
            message_frequency: 0.1,
            pinned_messages: 5.0,
            media_messages: 2.0,
            hashtags: 1.0,
            polls: 2.0,
            leadership: 5.0,
            bot_interactions: 1.0,
            sticker_messages: 0.5,
            gif_messages: 0.5,
            mentions: 1.0,
        }
    }
}

impl ScoringWeights {
    fn named(&self) -> [(&'static str, f64); 33] {
        [
            ("followers", self.followers),
            ("retweets", self.retweets),
            ("quotes", self.quotes),
            ("replies", self.replies),
            ("engagement", self.engagement),
            ("verification", self.verification),
            ("tweet_frequency", self.tweet_frequency),
            ("subscriptions", self.subscriptions),
            ("account_age", self.account_age),
            ("media", self.media),
            ("pinned", self.pinned),
            ("friends", self.friends),
            ("listed", self.listed),
            ("super_follow", self.super_follow),
            ("active_chains", self.active_chains),
            ("native_balance", self.native_balance),
            ("token_holdings", self.token_holdings),
            ("nft_holdings", self.nft_holdings),
            ("defi_positions", self.defi_positions),
            ("web3_domains", self.web3_domains),
            ("transaction_count", self.transaction_count),
            ("unique_token_interactions", self.unique_token_interactions),
            ("group_count", self.group_count),
            ("message_frequency", self.message_frequency),
            ("pinned_messages", self.pinned_messages),
            ("media_messages", self.media_messages),
            ("hashtags", self.hashtags),
            ("polls", self.polls),
            ("leadership", self.leadership),
            ("bot_interactions", self.bot_interactions),
            ("sticker_messages", self.sticker_messages),
            ("gif_messages", self.gif_messages),
            ("mentions", self.mentions),
        ]
    }

    pub fn validate(&self) -> Result<(), String> {
        for (name, weight) in self.named() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(format!("Weight {} must be a non-negative number, got {}", name, weight));
            }
        }
        Ok(())
    }
}

/// Ceiling each category contributes to the total score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCaps {
    pub social: f64,
    pub crypto: f64,
    pub nft: f64,
    pub community: f64,
    pub vault: f64,
}

impl Default for CategoryCaps {
    fn default() -> Self {
        Self {
            social: 50.0,
            crypto: 40.0,
            nft: 30.0,
            community: 20.0,
            vault: 15.0,
        }
    }
}

impl CategoryCaps {
    /// Caps in the same order as `ScoreBreakdown::categories`.
    pub fn as_array(&self) -> [f64; 5] {
        [self.social, self.crypto, self.nft, self.community, self.vault]
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.as_array().iter().any(|c| !c.is_finite() || *c < 0.0) {
            return Err("Category caps must be non-negative numbers".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_are_valid() {
        assert!(ScoringWeights::default().validate().is_ok());
    }

    #[test]
    fn test_negative_weight_rejected() {
        let weights = ScoringWeights {
            followers: -1.0,
            ..Default::default()
        };
        let err = weights.validate().unwrap_err();
        assert!(err.contains("followers"));
    }

    #[test]
    fn test_default_caps() {
        let caps = CategoryCaps::default();
        assert_eq!(caps.as_array(), [50.0, 40.0, 30.0, 20.0, 15.0]);
        assert!(caps.validate().is_ok());
    }
}
