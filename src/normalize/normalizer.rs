use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::models::{NormalizedMetrics, RawSocialProfile, RawVaultItems, RawWalletSummary};
use super::accessors::{
    lookup, read_array, read_count, read_str, read_timestamp, read_truthy, shape_mismatch, Kind,
};

const SECONDS_PER_YEAR: f64 = 365.0 * 24.0 * 60.0 * 60.0;

// Wallet summary result keys.
const NATIVE_BALANCE: &str = "Native Balance Result";
const TOKEN_BALANCES: &str = "Token Balances Result";
const ACTIVE_CHAINS: &str = "Active Chains Result";
const DEFI_POSITIONS: &str = "DeFi Positions Summary Result";
const RESOLVED_ADDRESS: &str = "Resolved Address Result";
const WALLET_NFTS: &str = "Wallet NFTs Result";
const TRANSACTION_COUNT: &str = "Transaction Count";
const UNIQUE_TOKEN_INTERACTIONS: &str = "Unique Token Interactions";
const GAS_SPENT: &str = "Gas Spent";
const STAKING_POSITIONS: &str = "Staking Positions";
const AIRDROPS: &str = "Airdrops";
const DAO_VOTES: &str = "DAO Votes";

// Vault message content tags.
const PHOTO_CONTENT: &str = "messagePhoto";
const STICKER_CONTENT: &str = "messageSticker";
const ANIMATION_CONTENT: &str = "messageAnimation";
const HASHTAG_ENTITY: &str = "textEntityTypeHashtag";
const MENTION_ENTITY: &str = "textEntityTypeMention";

/// Maps the three raw payloads into one `NormalizedMetrics`.
///
/// `now` is the evaluation clock; it is only used to turn the account
/// creation date into an age in years.
pub fn normalize(
    social: &RawSocialProfile,
    wallet: &RawWalletSummary,
    vault_groups: &RawVaultItems,
    vault_messages: &RawVaultItems,
    now: DateTime<Utc>,
) -> NormalizedMetrics {
    let mut metrics = NormalizedMetrics::default();
    normalize_social(&social.0, now, &mut metrics);
    normalize_wallet(&wallet.0, &mut metrics);
    normalize_vault(vault_groups, vault_messages, &mut metrics);
    metrics
}

/// The profile object: `result`, or the older `data.user.result` envelope.
fn social_root(social: &Value) -> &Value {
    [&["result"][..], &["data", "user", "result"][..]]
        .iter()
        .filter_map(|path| lookup(social, path))
        .find(|v| v.is_object())
        .unwrap_or(&Value::Null)
}

fn normalize_social(social: &Value, now: DateTime<Utc>, metrics: &mut NormalizedMetrics) {
    let root = social_root(social);
    let legacy = lookup(root, &["legacy"]).unwrap_or(&Value::Null);

    let counters: [(&str, &mut f64); 9] = [
        ("followers_count", &mut metrics.followers),
        ("favourites_count", &mut metrics.favourites),
        ("media_count", &mut metrics.media),
        ("listed_count", &mut metrics.listed),
        ("statuses_count", &mut metrics.statuses),
        ("friends_count", &mut metrics.friends),
        ("retweet_count", &mut metrics.retweets),
        ("quote_count", &mut metrics.quotes),
        ("reply_count", &mut metrics.replies),
    ];
    for (key, slot) in counters {
        *slot = read_count(legacy, &[key]);
        if let Some(anomaly) = shape_mismatch(legacy, &[key], Kind::Number) {
            metrics.anomalies.push(format!("social.legacy.{}", anomaly));
        }
    }

    metrics.subscriptions = read_count(root, &["creator_subscriptions_count"]);
    metrics.blue_verified = read_truthy(root, &["is_blue_verified"]);
    metrics.super_follow_eligible = read_truthy(root, &["super_follow_eligible"]);
    metrics.has_pinned_post = !read_array(legacy, &["pinned_tweet_ids_str"]).is_empty();

    metrics.account_created_at = read_timestamp(legacy, &["created_at"]);
    if metrics.account_created_at.is_none() && lookup(legacy, &["created_at"]).is_some_and(|v| !v.is_null()) {
        metrics.anomalies.push("social.legacy.created_at: unparseable date".to_string());
    }
    metrics.account_age_years = metrics
        .account_created_at
        .map(|created| account_age_years(created, now))
        .unwrap_or(0.0);
}

/// Whole and fractional years between `created` and `now`, never negative.
pub fn account_age_years(created: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let seconds = (now - created).num_milliseconds() as f64 / 1000.0;
    (seconds / SECONDS_PER_YEAR).max(0.0)
}

fn normalize_wallet(wallet: &Value, metrics: &mut NormalizedMetrics) {
    let chains_path = [ACTIVE_CHAINS, "activeChains"];
    for (path, kind) in [
        (&[TOKEN_BALANCES][..], Kind::Array),
        (&chains_path[..], Kind::Array),
        (&[DEFI_POSITIONS][..], Kind::Array),
        (&[WALLET_NFTS][..], Kind::Array),
        (&[NATIVE_BALANCE][..], Kind::Number),
        (&[TRANSACTION_COUNT][..], Kind::Number),
    ] {
        if let Some(anomaly) = shape_mismatch(wallet, path, kind) {
            metrics.anomalies.push(format!("wallet.{}", anomaly));
        }
    }

    metrics.native_balance = read_count(wallet, &[NATIVE_BALANCE]);
    metrics.token_balance_count = read_array(wallet, &[TOKEN_BALANCES]).len() as u64;
    metrics.active_chain_count = read_array(wallet, &chains_path).len() as u64;
    metrics.defi_position_count = read_array(wallet, &[DEFI_POSITIONS]).len() as u64;
    metrics.nft_count = read_array(wallet, &[WALLET_NFTS]).len() as u64;
    metrics.has_resolved_domain = read_truthy(wallet, &[RESOLVED_ADDRESS]);
    metrics.transaction_count = read_count(wallet, &[TRANSACTION_COUNT]);
    metrics.unique_token_interactions = read_count(wallet, &[UNIQUE_TOKEN_INTERACTIONS]);
    metrics.gas_spent = read_count(wallet, &[GAS_SPENT]);
    metrics.staking_positions = read_count(wallet, &[STAKING_POSITIONS]);
    metrics.airdrops = read_count(wallet, &[AIRDROPS]);
    metrics.dao_votes = read_count(wallet, &[DAO_VOTES]);
}

fn normalize_vault(groups: &RawVaultItems, messages: &RawVaultItems, metrics: &mut NormalizedMetrics) {
    for (label, collection) in [("groups", groups), ("messages", messages)] {
        let shape_ok = matches!(&collection.0, Value::Null | Value::Array(_))
            || lookup(&collection.0, &["items"]).is_some_and(Value::is_array);
        if !shape_ok {
            metrics.anomalies.push(format!("vault.{}: expected array of items", label));
        }
    }

    let groups = groups.items();
    let messages = messages.items();

    metrics.group_count = groups.len() as u64;
    metrics.polls_allowed = groups
        .iter()
        .any(|g| read_truthy(g, &["sourceData", "permissions", "can_send_polls"]));
    metrics.pin_permission_group_count = count_where(groups, |g| {
        read_truthy(g, &["sourceData", "permissions", "can_pin_messages"])
    });

    metrics.message_count = messages.len() as u64;
    metrics.pinned_message_count = count_where(messages, |m| read_truthy(m, &["sourceData", "is_pinned"]));
    metrics.photo_message_count = count_where(messages, |m| content_tag(m) == Some(PHOTO_CONTENT));
    metrics.sticker_message_count = count_where(messages, |m| content_tag(m) == Some(STICKER_CONTENT));
    metrics.gif_message_count = count_where(messages, |m| content_tag(m) == Some(ANIMATION_CONTENT));
    metrics.bot_message_count = count_where(messages, via_bot);
    metrics.hashtag_count = messages
        .iter()
        .map(|m| count_entities(m, &["sourceData", "content", "caption", "entities"], HASHTAG_ENTITY))
        .sum();
    metrics.mention_count = messages
        .iter()
        .map(|m| count_entities(m, &["sourceData", "content", "entities"], MENTION_ENTITY))
        .sum();
}

fn count_where<F>(items: &[Value], predicate: F) -> u64
where
    F: Fn(&Value) -> bool,
{
    items.iter().filter(|item| predicate(item)).count() as u64
}

fn content_tag(message: &Value) -> Option<&str> {
    read_str(message, &["sourceData", "content", "_"])
}

/// Sent through a bot: `via_bot_user_id` is a non-zero number.
fn via_bot(message: &Value) -> bool {
    lookup(message, &["sourceData", "via_bot_user_id"])
        .and_then(Value::as_f64)
        .is_some_and(|id| id != 0.0)
}

fn count_entities(message: &Value, path: &[&str], entity_type: &str) -> u64 {
    read_array(message, path)
        .iter()
        .filter(|e| read_str(e, &["type", "_"]) == Some(entity_type))
        .count() as u64
}
