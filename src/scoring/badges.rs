use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

use crate::models::{BadgeAward, BadgeGroups, BadgeResult, BadgeThresholds, BadgeTier, NormalizedMetrics};

/// Added to the message count for "Telegram Titan" when any group allows polls.
pub const POLL_PERMISSION_BONUS: f64 = 1000.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BadgeCategory {
    Social,
    Wallet,
    Vault,
}

/// The metric (or simple derivation) a badge is graded on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeSource {
    Followers,
    StatusesPerHundred,
    Favourites,
    Media,
    Listed,
    Verified,
    PinnedPost,
    SuperFollow,
    Subscriptions,
    AccountAgeYears,
    Retweets,
    Friends,
    FavouritesPlusRetweets,
    FollowersPerYear,
    ActiveChains,
    TokenBalances,
    Nfts,
    DefiPositions,
    GasSpent,
    StakingPositions,
    Airdrops,
    DaoVotes,
    ResolvedDomain,
    TransactionCount,
    UniqueTokenInteractions,
    NativeBalance,
    Groups,
    Messages,
    PinnedMessages,
    PhotoMessages,
    Hashtags,
    PollsAllowed,
    PinPermissionGroups,
    BotMessages,
    StickerMessages,
    GifMessages,
    Mentions,
    MessagesWithPollBonus,
    GovernancePermissions,
}

impl BadgeSource {
    pub fn value(&self, m: &NormalizedMetrics) -> f64 {
        match self {
            BadgeSource::Followers => m.followers,
            BadgeSource::StatusesPerHundred => m.statuses / 100.0,
            BadgeSource::Favourites => m.favourites,
            BadgeSource::Media => m.media,
            BadgeSource::Listed => m.listed,
            BadgeSource::Verified => indicator(m.blue_verified),
            BadgeSource::PinnedPost => indicator(m.has_pinned_post),
            BadgeSource::SuperFollow => indicator(m.super_follow_eligible),
            BadgeSource::Subscriptions => m.subscriptions,
            BadgeSource::AccountAgeYears => m.account_age_years,
            BadgeSource::Retweets => m.retweets,
            BadgeSource::Friends => m.friends,
            BadgeSource::FavouritesPlusRetweets => m.favourites + m.retweets,
            BadgeSource::FollowersPerYear => m.followers / m.account_age_years.max(1.0),
            BadgeSource::ActiveChains => m.active_chain_count as f64,
            BadgeSource::TokenBalances => m.token_balance_count as f64,
            BadgeSource::Nfts => m.nft_count as f64,
            BadgeSource::DefiPositions => m.defi_position_count as f64,
            BadgeSource::GasSpent => m.gas_spent,
            BadgeSource::StakingPositions => m.staking_positions,
            BadgeSource::Airdrops => m.airdrops,
            BadgeSource::DaoVotes => m.dao_votes,
            BadgeSource::ResolvedDomain => indicator(m.has_resolved_domain),
            BadgeSource::TransactionCount => m.transaction_count,
            BadgeSource::UniqueTokenInteractions => m.unique_token_interactions,
            BadgeSource::NativeBalance => m.native_balance,
            BadgeSource::Groups => m.group_count as f64,
            BadgeSource::Messages => m.message_count as f64,
            BadgeSource::PinnedMessages => m.pinned_message_count as f64,
            BadgeSource::PhotoMessages => m.photo_message_count as f64,
            BadgeSource::Hashtags => m.hashtag_count as f64,
            BadgeSource::PollsAllowed => indicator(m.polls_allowed),
            BadgeSource::PinPermissionGroups => m.pin_permission_group_count as f64,
            BadgeSource::BotMessages => m.bot_message_count as f64,
            BadgeSource::StickerMessages => m.sticker_message_count as f64,
            BadgeSource::GifMessages => m.gif_message_count as f64,
            BadgeSource::Mentions => m.mention_count as f64,
            BadgeSource::MessagesWithPollBonus => {
                m.message_count as f64 + if m.polls_allowed { POLL_PERMISSION_BONUS } else { 0.0 }
            }
            BadgeSource::GovernancePermissions => {
                indicator(m.polls_allowed) + indicator(m.any_pin_permission())
            }
        }
    }
}

fn indicator(set: bool) -> f64 {
    if set { 1.0 } else { 0.0 }
}

#[derive(Debug, Clone, Copy)]
pub struct BadgeDefinition {
    pub name: &'static str,
    pub category: BadgeCategory,
    pub source: BadgeSource,
}

const fn badge(name: &'static str, category: BadgeCategory, source: BadgeSource) -> BadgeDefinition {
    BadgeDefinition { name, category, source }
}

use BadgeCategory::{Social, Vault, Wallet};
use BadgeSource as S;

/// Every badge the assigner knows, grouped by the payload it draws on.
/// Several badges deliberately share a value source.
pub const BADGE_CATALOG: &[BadgeDefinition] = &[
    badge("Influence Investor", Social, S::Followers),
    badge("Tweet Trader", Social, S::StatusesPerHundred),
    badge("Engagement Economist", Social, S::Favourites),
    badge("Media Mogul", Social, S::Media),
    badge("List Legend", Social, S::Listed),
    badge("Verified Visionary", Social, S::Verified),
    badge("Pinned Post Pro", Social, S::PinnedPost),
    badge("Super Follower", Social, S::SuperFollow),
    badge("Creator Subscriber", Social, S::Subscriptions),
    badge("Twitter Veteran", Social, S::AccountAgeYears),
    badge("Retweet Riches", Social, S::Retweets),
    badge("Crypto Communicator", Social, S::StatusesPerHundred),
    badge("Social Connector", Social, S::Friends),
    badge("Engagement Star", Social, S::FavouritesPlusRetweets),
    badge("Fast Grower", Social, S::FollowersPerYear),
    badge("Viral Validator", Social, S::Retweets),
    badge("Chain Explorer", Wallet, S::ActiveChains),
    badge("Token Holder", Wallet, S::TokenBalances),
    badge("NFT Networker", Wallet, S::Nfts),
    badge("DeFi Drifter", Wallet, S::DefiPositions),
    badge("Gas Spender", Wallet, S::GasSpent),
    badge("Staking Veteran", Wallet, S::StakingPositions),
    badge("Airdrop Veteran", Wallet, S::Airdrops),
    badge("DAO Diplomat", Wallet, S::DaoVotes),
    badge("Web3 Domain Owner", Wallet, S::ResolvedDomain),
    badge("Degen Dualist", Wallet, S::TransactionCount),
    badge("Transaction Titan", Wallet, S::TransactionCount),
    badge("Token Interactor", Wallet, S::UniqueTokenInteractions),
    badge("NFT Whale", Wallet, S::Nfts),
    badge("DeFi Master", Wallet, S::DefiPositions),
    badge("Bridge Blazer", Wallet, S::ActiveChains),
    badge("Social HODLer", Wallet, S::NativeBalance),
    badge("Liquidity Laureate", Wallet, S::DefiPositions),
    badge("Group Guru", Vault, S::Groups),
    badge("Message Maestro", Vault, S::Messages),
    badge("Pinned Message Master", Vault, S::PinnedMessages),
    badge("Media Messenger", Vault, S::PhotoMessages),
    badge("Hashtag Hero", Vault, S::Hashtags),
    badge("Poll Creator", Vault, S::PollsAllowed),
    badge("Community Leader", Vault, S::PinPermissionGroups),
    badge("Bot Interactor", Vault, S::BotMessages),
    badge("Sticker Star", Vault, S::StickerMessages),
    badge("GIF Guru", Vault, S::GifMessages),
    badge("Mention Magnet", Vault, S::Mentions),
    badge("Telegram Titan", Vault, S::MessagesWithPollBonus),
    badge("Governance Griot", Vault, S::GovernancePermissions),
    badge("Dapp Diplomat", Vault, S::BotMessages),
];

pub fn find_badge(name: &str) -> Option<&'static BadgeDefinition> {
    BADGE_CATALOG.iter().find(|b| b.name == name)
}

/// Names of the awarded badges that belong to `category`.
pub fn badges_in_category(badges: &BadgeResult, category: BadgeCategory) -> Vec<String> {
    badges
        .keys()
        .filter(|name| find_badge(name).is_some_and(|b| b.category == category))
        .cloned()
        .collect()
}

pub fn group_badges(badges: &BadgeResult) -> BadgeGroups {
    BadgeGroups {
        social: badges_in_category(badges, BadgeCategory::Social),
        wallet: badges_in_category(badges, BadgeCategory::Wallet),
        vault: badges_in_category(badges, BadgeCategory::Vault),
    }
}

/// Threshold triple for one badge, as it appears in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadgeThresholdRule {
    pub badge: String,
    pub silver: f64,
    pub gold: f64,
    pub platinum: f64,
}

impl BadgeThresholdRule {
    fn new(badge: &str, silver: f64, gold: f64, platinum: f64) -> Self {
        Self {
            badge: badge.to_string(),
            silver,
            gold,
            platinum,
        }
    }

    pub fn thresholds(&self) -> BadgeThresholds {
        BadgeThresholds::new(self.silver, self.gold, self.platinum)
    }
}

pub fn default_badge_thresholds() -> Vec<BadgeThresholdRule> {
    [
        ("Influence Investor", 1_000_000.0, 5_000_000.0, 10_000_000.0),
        ("Tweet Trader", 5.0, 10.0, 20.0),
        ("Engagement Economist", 1000.0, 5000.0, 10000.0),
        ("Media Mogul", 100.0, 500.0, 1000.0),
        ("List Legend", 100.0, 500.0, 1000.0),
        ("Verified Visionary", 1.0, 1.0, 1.0),
        ("Pinned Post Pro", 1.0, 1.0, 1.0),
        ("Super Follower", 1.0, 1.0, 1.0),
        ("Creator Subscriber", 5.0, 10.0, 20.0),
        ("Twitter Veteran", 5.0, 10.0, 15.0),
        ("Retweet Riches", 100.0, 500.0, 1000.0),
        ("Crypto Communicator", 50.0, 100.0, 200.0),
        ("Social Connector", 1000.0, 5000.0, 10000.0),
        ("Engagement Star", 2000.0, 10000.0, 20000.0),
        ("Fast Grower", 100_000.0, 500_000.0, 1_000_000.0),
        ("Viral Validator", 500.0, 2000.0, 5000.0),
        ("Chain Explorer", 2.0, 5.0, 10.0),
        ("Token Holder", 5.0, 20.0, 50.0),
        ("NFT Networker", 1.0, 5.0, 10.0),
        ("DeFi Drifter", 1.0, 3.0, 5.0),
        ("Gas Spender", 100.0, 500.0, 1000.0),
        ("Staking Veteran", 1.0, 3.0, 5.0),
        ("Airdrop Veteran", 1.0, 5.0, 10.0),
        ("DAO Diplomat", 1.0, 5.0, 10.0),
        ("Web3 Domain Owner", 1.0, 1.0, 1.0),
        ("Degen Dualist", 10000.0, 50000.0, 100000.0),
        ("Transaction Titan", 100.0, 500.0, 1000.0),
        ("Token Interactor", 10.0, 50.0, 100.0),
        ("NFT Whale", 10.0, 50.0, 100.0),
        ("DeFi Master", 5.0, 10.0, 20.0),
        ("Bridge Blazer", 5.0, 10.0, 20.0),
        ("Social HODLer", 1.0, 10.0, 50.0),
        ("Liquidity Laureate", 1.0, 3.0, 5.0),
        ("Group Guru", 5.0, 10.0, 20.0),
        ("Message Maestro", 100.0, 500.0, 1000.0),
        ("Pinned Message Master", 1.0, 5.0, 10.0),
        ("Media Messenger", 10.0, 50.0, 100.0),
        ("Hashtag Hero", 10.0, 50.0, 100.0),
        ("Poll Creator", 1.0, 5.0, 10.0),
        ("Community Leader", 1.0, 3.0, 5.0),
        ("Bot Interactor", 10.0, 50.0, 100.0),
        ("Sticker Star", 10.0, 50.0, 100.0),
        ("GIF Guru", 10.0, 50.0, 100.0),
        ("Mention Magnet", 10.0, 50.0, 100.0),
        ("Telegram Titan", 500.0, 1000.0, 2000.0),
        ("Governance Griot", 2.0, 5.0, 10.0),
        ("Dapp Diplomat", 50.0, 100.0, 200.0),
    ]
    .into_iter()
    .map(|(name, silver, gold, platinum)| BadgeThresholdRule::new(name, silver, gold, platinum))
    .collect()
}

#[derive(Error, Debug, PartialEq)]
pub enum BadgeError {
    #[error("no thresholds configured")]
    MissingThresholds,

    #[error("value {0} is not a finite number")]
    NonFiniteValue(f64),
}

/// Grades every catalog badge against its threshold triple.
#[derive(Debug, Clone)]
pub struct BadgeAssigner {
    thresholds: HashMap<String, BadgeThresholds>,
}

impl Default for BadgeAssigner {
    fn default() -> Self {
        Self::new(&default_badge_thresholds())
    }
}

impl BadgeAssigner {
    pub fn new(rules: &[BadgeThresholdRule]) -> Self {
        let thresholds = rules
            .iter()
            .map(|rule| (rule.badge.clone(), rule.thresholds()))
            .collect();
        Self { thresholds }
    }

    pub fn assign_badges(&self, metrics: &NormalizedMetrics) -> BadgeResult {
        let mut badges = BadgeResult::new();

        for category in [BadgeCategory::Social, BadgeCategory::Wallet, BadgeCategory::Vault] {
            for definition in BADGE_CATALOG.iter().filter(|b| b.category == category) {
                match self.evaluate_badge(definition, metrics) {
                    Ok(Some(award)) => {
                        badges.insert(definition.name.to_string(), award);
                    }
                    Ok(None) => {}
                    Err(e) => debug!("Skipping badge {}: {}", definition.name, e),
                }
            }
        }

        badges
    }

    /// Grades a single badge. `Ok(None)` means the value is below silver.
    pub fn evaluate_badge(
        &self,
        definition: &BadgeDefinition,
        metrics: &NormalizedMetrics,
    ) -> Result<Option<BadgeAward>, BadgeError> {
        let thresholds = self
            .thresholds
            .get(definition.name)
            .ok_or(BadgeError::MissingThresholds)?;

        let value = match definition.source.value(metrics) {
            v if v == f64::INFINITY => f64::MAX,
            v if v.is_nan() => return Err(BadgeError::NonFiniteValue(v)),
            v => v,
        };

        Ok(BadgeTier::for_value(value, thresholds).map(|tier| BadgeAward { tier, value }))
    }
}
