use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use signal_scorer::{
    config::{DatabaseSettings, ScoringSettings},
    models::{
        BadgeAward, BadgeResult, BadgeThresholds, BadgeTier, NormalizedMetrics, RawSocialProfile,
        RawVaultItems, RawWalletSummary, Result, ScoreBreakdown, ScoreError, ScoreRequest, SourceStatus,
    },
    scoring::{Evaluator, FixedClock, ScoreCalculator, ScoringAlgorithm, TitleSelector},
    sources::{SocialSource, VaultSource, WalletSource},
    storage::SqliteScoreStore,
};
use std::sync::Arc;

fn evaluator() -> Evaluator {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    Evaluator::default().with_clock(Arc::new(FixedClock(now)))
}

fn social(value: Value) -> RawSocialProfile {
    RawSocialProfile(value)
}

fn wallet(value: Value) -> RawWalletSummary {
    RawWalletSummary(value)
}

#[test]
fn test_empty_inputs_yield_fallback() {
    let evaluation = evaluator().evaluate(
        &social(json!({})),
        &wallet(json!({})),
        &RawVaultItems(json!([])),
        &RawVaultItems(json!([])),
    );

    assert_eq!(evaluation.title, "ALL ROUNDOOR");
    assert!(evaluation.badges.is_empty());
    assert_eq!(evaluation.scores.total_score, 0.0);
    assert_eq!(evaluation.scores.categories(), [0.0; 5]);
}

#[test]
fn test_evaluation_is_deterministic() {
    let profile = social(json!({
        "result": {
            "is_blue_verified": true,
            "legacy": {
                "followers_count": 4200,
                "favourites_count": 900,
                "statuses_count": 12000,
                "created_at": "Sat Mar 14 10:00:00 +0000 2015"
            }
        }
    }));
    let summary = wallet(json!({
        "Native Balance Result": 0.4,
        "Wallet NFTs Result": [{}, {}]
    }));
    let messages = RawVaultItems(json!({ "items": [
        { "sourceData": { "content": { "_": "messagePhoto" } } },
        { "sourceData": { "via_bot_user_id": 77 } }
    ]}));

    let e = evaluator();
    let first = e.evaluate(&profile, &summary, &RawVaultItems::empty(), &messages);
    let second = e.evaluate(&profile, &summary, &RawVaultItems::empty(), &messages);

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_famous_verified_profile_caps_social() {
    let evaluation = evaluator().evaluate(
        &social(json!({
            "result": {
                "is_blue_verified": true,
                "legacy": { "followers_count": 1_000_000 }
            }
        })),
        &wallet(json!({})),
        &RawVaultItems::empty(),
        &RawVaultItems::empty(),
    );

    let scores = evaluation.scores;
    assert!(scores.social_score > 50.0);
    assert_eq!(scores.crypto_score, 0.0);
    assert_eq!(scores.nft_score, 0.0);
    assert_eq!(scores.community_score, 0.0);
    assert_eq!(scores.vault_score, 0.0);
    assert_eq!(scores.total_score, 50.0);

    assert_eq!(evaluation.badges["Influence Investor"].tier, BadgeTier::Silver);
    assert_eq!(evaluation.badges["Verified Visionary"].tier, BadgeTier::Platinum);
}

#[test]
fn test_wallet_only_nft_score() {
    let evaluation = evaluator().evaluate(
        &RawSocialProfile::empty(),
        &wallet(json!({
            "Active Chains Result": { "activeChains": ["eth", "base"] },
            "Wallet NFTs Result": [{ "id": 1 }, { "id": 2 }, { "id": 3 }]
        })),
        &RawVaultItems::empty(),
        &RawVaultItems::empty(),
    );

    assert_eq!(evaluation.scores.nft_score, 15.0);
    assert_eq!(evaluation.scores.crypto_score, 10.0);
    assert_eq!(evaluation.scores.total_score, 25.0);
    assert_eq!(evaluation.badges["Chain Explorer"].tier, BadgeTier::Silver);
    assert_eq!(evaluation.badges["NFT Networker"].tier, BadgeTier::Silver);
}

#[test]
fn test_null_source_data_message_is_ignored() {
    let photo = json!({ "sourceData": { "content": { "_": "messagePhoto" } } });
    let clean = RawVaultItems::from_items(vec![photo.clone(), photo.clone()]);
    let with_null = RawVaultItems::from_items(vec![photo.clone(), json!({ "sourceData": null }), photo]);

    let e = evaluator();
    let base = e.evaluate(&RawSocialProfile::empty(), &RawWalletSummary::empty(), &RawVaultItems::empty(), &clean);
    let mixed = e.evaluate(&RawSocialProfile::empty(), &RawWalletSummary::empty(), &RawVaultItems::empty(), &with_null);

    // the null item still counts as a message, but adds nothing else
    let per_message = 0.1;
    assert!((mixed.scores.vault_score - base.scores.vault_score - per_message).abs() < 1e-9);
    assert_eq!(mixed.badges.contains_key("Bot Interactor"), base.badges.contains_key("Bot Interactor"));
}

type Setter = fn(&mut NormalizedMetrics, f64);

fn metric_setters() -> Vec<(&'static str, Setter)> {
    vec![
        ("followers", |m, v| m.followers = v),
        ("favourites", |m, v| m.favourites = v),
        ("media", |m, v| m.media = v),
        ("listed", |m, v| m.listed = v),
        ("statuses", |m, v| m.statuses = v),
        ("friends", |m, v| m.friends = v),
        ("retweets", |m, v| m.retweets = v),
        ("quotes", |m, v| m.quotes = v),
        ("replies", |m, v| m.replies = v),
        ("subscriptions", |m, v| m.subscriptions = v),
        ("account_age_years", |m, v| m.account_age_years = v),
        ("native_balance", |m, v| m.native_balance = v),
        ("token_balance_count", |m, v| m.token_balance_count = v as u64),
        ("active_chain_count", |m, v| m.active_chain_count = v as u64),
        ("defi_position_count", |m, v| m.defi_position_count = v as u64),
        ("nft_count", |m, v| m.nft_count = v as u64),
        ("transaction_count", |m, v| m.transaction_count = v),
        ("unique_token_interactions", |m, v| m.unique_token_interactions = v),
        ("group_count", |m, v| m.group_count = v as u64),
        ("message_count", |m, v| m.message_count = v as u64),
        ("pinned_message_count", |m, v| m.pinned_message_count = v as u64),
        ("photo_message_count", |m, v| m.photo_message_count = v as u64),
        ("sticker_message_count", |m, v| m.sticker_message_count = v as u64),
        ("gif_message_count", |m, v| m.gif_message_count = v as u64),
        ("bot_message_count", |m, v| m.bot_message_count = v as u64),
        ("hashtag_count", |m, v| m.hashtag_count = v as u64),
        ("mention_count", |m, v| m.mention_count = v as u64),
        ("pin_permission_group_count", |m, v| m.pin_permission_group_count = v as u64),
        ("blue_verified", |m, v| m.blue_verified = v > 0.0),
        ("super_follow_eligible", |m, v| m.super_follow_eligible = v > 0.0),
        ("has_pinned_post", |m, v| m.has_pinned_post = v > 0.0),
        ("has_resolved_domain", |m, v| m.has_resolved_domain = v > 0.0),
        ("polls_allowed", |m, v| m.polls_allowed = v > 0.0),
    ]
}

#[test]
fn test_raising_any_metric_never_lowers_a_score() {
    let algo = ScoringAlgorithm::default();
    let caps = algo.caps().as_array();
    let cap_total: f64 = caps.iter().sum();
    let ladder = [0.0, 1.0, 10.0, 1_000.0, 1e9, 1e18, f64::MAX / 2.0, f64::MAX];

    // a busy baseline so near-limit values also add onto non-zero sums
    let baseline = NormalizedMetrics {
        followers: 500.0,
        statuses: 40.0,
        native_balance: 0.5,
        nft_count: 2,
        group_count: 3,
        message_count: 120,
        ..Default::default()
    };

    for (name, set) in metric_setters() {
        let mut previous: Option<ScoreBreakdown> = None;

        for value in ladder {
            let mut metrics = baseline.clone();
            set(&mut metrics, value);
            let score = algo.calculate_score(&metrics);

            assert!(
                score.categories().iter().all(|c| !c.is_nan()),
                "{} = {} gave a NaN category",
                name,
                value
            );
            assert!(score.total_score <= cap_total, "{} = {} exceeded the caps", name, value);

            if let Some(prev) = &previous {
                for (now, before) in score.categories().iter().zip(prev.categories()) {
                    assert!(*now >= before, "{} = {} lowered a category", name, value);
                }
                assert!(score.total_score >= prev.total_score, "{} = {} lowered the total", name, value);
            }
            previous = Some(score);
        }
    }
}

#[test]
fn test_every_category_respects_its_cap() {
    let metrics = NormalizedMetrics {
        followers: 1e9,
        active_chain_count: 1_000,
        native_balance: 1e6,
        nft_count: 10_000,
        subscriptions: 1_000.0,
        group_count: 1_000,
        message_count: 1_000_000,
        ..Default::default()
    };

    let algo = ScoringAlgorithm::default();
    let score = algo.calculate_score(&metrics);
    let caps = algo.caps().as_array();

    let capped: f64 = score
        .categories()
        .iter()
        .zip(caps)
        .map(|(s, cap)| {
            assert!(*s >= cap);
            s.min(cap)
        })
        .sum();
    assert_eq!(score.total_score, capped);
    assert_eq!(score.total_score, caps.iter().sum::<f64>());
}

#[test]
fn test_tier_boundaries() {
    let thresholds = BadgeThresholds::new(10.0, 50.0, 100.0);

    assert_eq!(BadgeTier::for_value(9.0, &thresholds), None);
    assert_eq!(BadgeTier::for_value(10.0, &thresholds), Some(BadgeTier::Silver));
    assert_eq!(BadgeTier::for_value(49.0, &thresholds), Some(BadgeTier::Silver));
    assert_eq!(BadgeTier::for_value(50.0, &thresholds), Some(BadgeTier::Gold));
    assert_eq!(BadgeTier::for_value(100.0, &thresholds), Some(BadgeTier::Platinum));
}

#[test]
fn test_title_selection() {
    let selector = TitleSelector::default();
    let award = BadgeAward {
        tier: BadgeTier::Silver,
        value: 1.0,
    };

    let mut badges = BadgeResult::new();
    for name in ["DeFi Master", "Airdrop Veteran", "Dapp Diplomat"] {
        badges.insert(name.to_string(), award);
    }

    assert_eq!(selector.select_title(&badges), "DeFi Dynamo");
    assert_eq!(selector.select_title(&BadgeResult::new()), "ALL ROUNDOOR");
}

struct StaticSocial(Value);

#[async_trait]
impl SocialSource for StaticSocial {
    async fn fetch_social_profile(&self, _handle: &str) -> Result<RawSocialProfile> {
        Ok(RawSocialProfile(self.0.clone()))
    }
}

struct StaticWallet(Value);

#[async_trait]
impl WalletSource for StaticWallet {
    async fn fetch_wallet_summary(&self, _address: &str) -> Result<RawWalletSummary> {
        Ok(RawWalletSummary(self.0.clone()))
    }
}

struct UnauthorizedVault;

#[async_trait]
impl VaultSource for UnauthorizedVault {
    async fn fetch_vault_groups(&self, user_id: &str) -> Result<RawVaultItems> {
        Err(ScoreError::MissingAuthToken(user_id.to_string()))
    }

    async fn fetch_vault_messages(&self, user_id: &str) -> Result<RawVaultItems> {
        Err(ScoreError::MissingAuthToken(user_id.to_string()))
    }
}

#[tokio::test]
async fn test_collect_and_total_against_sqlite() {
    let store = SqliteScoreStore::connect(&DatabaseSettings {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
    })
    .await
    .unwrap();

    let calculator = ScoreCalculator::new(
        Arc::new(StaticSocial(json!({
            "result": { "legacy": { "followers_count": 2000 } }
        }))),
        Arc::new(StaticWallet(json!({ "Wallet NFTs Result": [{}] }))),
        Arc::new(UnauthorizedVault),
        Arc::new(store),
        &ScoringSettings::default(),
    )
    .with_evaluator(evaluator());

    let mut request = ScoreRequest::new("user-9");
    request.username = Some("bob".to_string());
    request.wallet_addresses = vec!["0x01".to_string(), "0x02".to_string()];
    request.vault_user_id = Some("did:vda:bob".to_string());

    let report = calculator.calculate_user_score(request.clone()).await.unwrap();
    assert!(report.persisted);
    assert_eq!(report.sources.vault, SourceStatus::Failed);
    // social 2 + primary wallet 5 + extra wallet 10
    assert!((report.aggregate_score - 17.0).abs() < 1e-9);

    // second run changes nothing for a stable input
    let again = calculator.calculate_user_score(request).await.unwrap();
    assert!((again.aggregate_score - 17.0).abs() < 1e-9);

    let record = calculator.stored_record("user-9").await.unwrap().unwrap();
    assert_eq!(record.username.as_deref(), Some("bob"));
    assert_eq!(record.wallets.len(), 2);
    assert!((record.aggregate_score - 17.0).abs() < 1e-9);
    assert!(calculator.stored_record("nobody").await.unwrap().is_none());
}
