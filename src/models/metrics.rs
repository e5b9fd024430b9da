use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// Flat, defaulted view of all three raw sources. Every field the score
/// calculator and badge assigner read has a defined default, so the
/// calculators are plain arithmetic.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct NormalizedMetrics {
    // Social profile
    pub followers: f64,
    pub favourites: f64,
    pub media: f64,
    pub listed: f64,
    pub statuses: f64,
    pub friends: f64,
    pub retweets: f64,
    pub quotes: f64,
    pub replies: f64,
    pub subscriptions: f64,
    pub blue_verified: bool,
    pub super_follow_eligible: bool,
    pub has_pinned_post: bool,
    pub account_created_at: Option<DateTime<Utc>>,
    /// Years since `account_created_at` relative to the evaluation clock; 0 when unknown.
    pub account_age_years: f64,

    // Wallet summary
    pub native_balance: f64,
    pub token_balance_count: u64,
    pub active_chain_count: u64,
    pub defi_position_count: u64,
    pub nft_count: u64,
    pub has_resolved_domain: bool,
    pub transaction_count: f64,
    pub unique_token_interactions: f64,
    pub gas_spent: f64,
    pub staking_positions: f64,
    pub airdrops: f64,
    pub dao_votes: f64,

    // Vault collections
    pub group_count: u64,
    pub message_count: u64,
    pub pinned_message_count: u64,
    pub photo_message_count: u64,
    pub sticker_message_count: u64,
    pub gif_message_count: u64,
    pub bot_message_count: u64,
    pub hashtag_count: u64,
    pub mention_count: u64,
    pub polls_allowed: bool,
    pub pin_permission_group_count: u64,

    /// Fields that were present but had the wrong shape and fell back to
    /// their default. Reported, never fatal.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub anomalies: Vec<String>,
}

impl NormalizedMetrics {
    pub fn any_pin_permission(&self) -> bool {
        self.pin_permission_group_count > 0
    }

    /// Engagement as the social formula counts it.
    pub fn engagement(&self) -> f64 {
        self.favourites + self.media + self.listed
    }
}
