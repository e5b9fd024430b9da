use crate::models::{NormalizedMetrics, ScoreBreakdown};
use super::weights::{CategoryCaps, ScoringWeights};

/// Weighted linear scoring over normalized metrics.
#[derive(Debug, Clone, Default)]
pub struct ScoringAlgorithm {
    weights: ScoringWeights,
    caps: CategoryCaps,
}

impl ScoringAlgorithm {
    pub fn new(weights: ScoringWeights, caps: CategoryCaps) -> Self {
        Self { weights, caps }
    }

    pub fn caps(&self) -> &CategoryCaps {
        &self.caps
    }

    pub fn calculate_score(&self, metrics: &NormalizedMetrics) -> ScoreBreakdown {
        let mut breakdown = ScoreBreakdown {
            social_score: saturate(self.calculate_social_score(metrics)),
            crypto_score: saturate(self.calculate_crypto_score(metrics)),
            nft_score: saturate(self.calculate_nft_score(metrics)),
            community_score: saturate(self.calculate_community_score(metrics)),
            vault_score: saturate(self.calculate_vault_score(metrics)),
            total_score: 0.0,
        };
        breakdown.total_score = self.sum_breakdown(&breakdown);
        breakdown
    }

    /// Sum of each category after clamping it to its cap.
    pub fn sum_breakdown(&self, breakdown: &ScoreBreakdown) -> f64 {
        breakdown
            .categories()
            .iter()
            .zip(self.caps.as_array())
            .map(|(score, cap)| score.min(cap))
            .sum()
    }

    fn calculate_social_score(&self, m: &NormalizedMetrics) -> f64 {
        let w = &self.weights;
        m.followers * w.followers
            + m.engagement() * w.engagement
            + flag(m.blue_verified, w.verification)
            + m.statuses * w.tweet_frequency
            + m.subscriptions * w.subscriptions
            + m.account_age_years * w.account_age
            + m.media * w.media
            + flag(m.has_pinned_post, w.pinned)
            + m.friends * w.friends
            + m.listed * w.listed
            + flag(m.super_follow_eligible, w.super_follow)
            + m.retweets * w.retweets
            + m.quotes * w.quotes
            + m.replies * w.replies
    }

    fn calculate_crypto_score(&self, m: &NormalizedMetrics) -> f64 {
        let w = &self.weights;
        m.active_chain_count as f64 * w.active_chains
            + m.native_balance * w.native_balance
            + m.token_balance_count as f64 * w.token_holdings
            + m.defi_position_count as f64 * w.defi_positions
            + flag(m.has_resolved_domain, w.web3_domains)
            + m.transaction_count * w.transaction_count
            + m.unique_token_interactions * w.unique_token_interactions
    }

    fn calculate_nft_score(&self, m: &NormalizedMetrics) -> f64 {
        m.nft_count as f64 * self.weights.nft_holdings
    }

    fn calculate_community_score(&self, m: &NormalizedMetrics) -> f64 {
        m.subscriptions * self.weights.subscriptions + m.group_count as f64 * self.weights.group_count
    }

    fn calculate_vault_score(&self, m: &NormalizedMetrics) -> f64 {
        let w = &self.weights;
        m.group_count as f64 * w.group_count
            + m.message_count as f64 * w.message_frequency
            + m.pinned_message_count as f64 * w.pinned_messages
            + m.photo_message_count as f64 * w.media_messages
            + m.hashtag_count as f64 * w.hashtags
            + flag(m.polls_allowed, w.polls)
            + flag(m.any_pin_permission(), w.leadership)
            + m.bot_message_count as f64 * w.bot_interactions
            + m.sticker_message_count as f64 * w.sticker_messages
            + m.gif_message_count as f64 * w.gif_messages
            + m.mention_count as f64 * w.mentions
    }
}

/// Overflowed sums stay at the largest finite value so caps still apply.
fn saturate(score: f64) -> f64 {
    if score == f64::INFINITY { f64::MAX } else { score }
}

fn flag(set: bool, weight: f64) -> f64 {
    if set { weight } else { 0.0 }
}
