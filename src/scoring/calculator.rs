use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    config::ScoringSettings,
    models::{
        Evaluation, RawSocialProfile, RawVaultItems, RawWalletSummary, Result, ScoreError,
        ScoreRecord, ScoreReport, ScoreRequest, SourceReport, SourceStatus,
    },
    scoring::{group_badges, CategoryCaps, Evaluator},
    sources::{SocialSource, VaultSource, WalletSource},
    storage::ScoreStore,
};

/// Gathers a user's raw data from the three sources, evaluates it and folds
/// the result into the user's stored score record.
pub struct ScoreCalculator {
    social: Arc<dyn SocialSource>,
    wallet: Arc<dyn WalletSource>,
    vault: Arc<dyn VaultSource>,
    store: Arc<dyn ScoreStore>,
    evaluator: Evaluator,
    additional_wallet_score: f64,
}

impl ScoreCalculator {
    pub fn new(
        social: Arc<dyn SocialSource>,
        wallet: Arc<dyn WalletSource>,
        vault: Arc<dyn VaultSource>,
        store: Arc<dyn ScoreStore>,
        settings: &ScoringSettings,
    ) -> Self {
        Self {
            social,
            wallet,
            vault,
            store,
            evaluator: Evaluator::from_settings(settings),
            additional_wallet_score: settings.additional_wallet_score,
        }
    }

    pub fn with_evaluator(mut self, evaluator: Evaluator) -> Self {
        self.evaluator = evaluator;
        self
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    pub async fn calculate_user_score(&self, request: ScoreRequest) -> Result<ScoreReport> {
        let user_key = request.user_key.trim();
        if user_key.is_empty() {
            return Err(ScoreError::InvalidInput("User key is required".to_string()));
        }

        info!("Calculating score for user: {}", user_key);

        let ((social, social_status), (wallet, wallet_status), (groups, messages, vault_status)) = futures::join!(
            self.collect_social(request.username.as_deref()),
            self.collect_wallet(request.primary_address()),
            self.collect_vault(request.vault_user_id.as_deref()),
        );

        let evaluation = self.evaluator.evaluate(&social, &wallet, &groups, &messages);
        info!(
            "Evaluation for {}: title={}, badges={}, total={:.2}",
            user_key,
            evaluation.title,
            evaluation.badges.len(),
            evaluation.scores.total_score
        );

        let now = self.evaluator.now();
        // A record that failed to load is never overwritten.
        let (existing, loaded) = match self.store.load(user_key).await {
            Ok(existing) => (existing, true),
            Err(e) => {
                warn!("Failed to load score record for {}: {}", user_key, e);
                (None, false)
            }
        };

        let mut record = existing.unwrap_or_else(|| ScoreRecord::new(user_key.to_string(), now));
        merge_evaluation(
            &mut record,
            &request,
            &evaluation,
            self.evaluator.caps(),
            self.additional_wallet_score,
            now,
        );

        let persisted = loaded && self.persist(&record).await;

        info!(
            "Score updated for {}: aggregate={:.2} across {} wallets",
            user_key,
            record.aggregate_score,
            record.wallets.len()
        );

        Ok(ScoreReport {
            user_key: record.user_key,
            title: evaluation.title,
            badge_groups: record.badge_groups,
            badges: evaluation.badges,
            scores: evaluation.scores,
            aggregate_score: record.aggregate_score,
            wallet_count: record.wallets.len(),
            sources: SourceReport {
                social: social_status,
                wallet: wallet_status,
                vault: vault_status,
            },
            persisted,
        })
    }

    async fn persist(&self, record: &ScoreRecord) -> bool {
        match self.store.save(record).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to persist score record for {}: {}", record.user_key, e);
                false
            }
        }
    }

    /// The persisted record for `user_key`, if any.
    pub async fn stored_record(&self, user_key: &str) -> Result<Option<ScoreRecord>> {
        let user_key = user_key.trim();
        if user_key.is_empty() {
            return Err(ScoreError::InvalidInput("User key is required".to_string()));
        }
        self.store.load(user_key).await
    }

    async fn collect_social(&self, handle: Option<&str>) -> (RawSocialProfile, SourceStatus) {
        let Some(handle) = handle.filter(|h| !h.trim().is_empty()) else {
            return (RawSocialProfile::empty(), SourceStatus::Skipped);
        };

        match self.social.fetch_social_profile(handle).await {
            Ok(profile) => {
                debug!("Fetched social profile for {}", handle);
                (profile, SourceStatus::Fetched)
            }
            Err(e) => {
                warn!("Failed to fetch social profile for {}: {}", handle, e);
                (RawSocialProfile::empty(), SourceStatus::Failed)
            }
        }
    }

    async fn collect_wallet(&self, address: Option<&str>) -> (RawWalletSummary, SourceStatus) {
        let Some(address) = address else {
            return (RawWalletSummary::empty(), SourceStatus::Skipped);
        };

        match self.wallet.fetch_wallet_summary(address).await {
            Ok(summary) => {
                debug!("Fetched wallet summary for {}", address);
                (summary, SourceStatus::Fetched)
            }
            Err(e) => {
                warn!("Failed to fetch wallet summary for {}: {}", address, e);
                (RawWalletSummary::empty(), SourceStatus::Failed)
            }
        }
    }

    async fn collect_vault(
        &self,
        user_id: Option<&str>,
    ) -> (RawVaultItems, RawVaultItems, SourceStatus) {
        let Some(user_id) = user_id.filter(|id| !id.trim().is_empty()) else {
            return (RawVaultItems::empty(), RawVaultItems::empty(), SourceStatus::Skipped);
        };

        let fetched = futures::try_join!(
            self.vault.fetch_vault_groups(user_id),
            self.vault.fetch_vault_messages(user_id),
        );

        match fetched {
            Ok((groups, messages)) => {
                debug!(
                    "Fetched {} vault groups and {} messages for {}",
                    groups.len(),
                    messages.len(),
                    user_id
                );
                (groups, messages, SourceStatus::Fetched)
            }
            Err(e) => {
                warn!("Failed to fetch vault data for {}: {}", user_id, e);
                (RawVaultItems::empty(), RawVaultItems::empty(), SourceStatus::Failed)
            }
        }
    }
}

/// Folds one evaluation into a stored record. The evaluated wallet takes
/// the capped crypto + NFT score; other wallets only join with the default
/// score and keep whatever they already had.
pub fn merge_evaluation(
    record: &mut ScoreRecord,
    request: &ScoreRequest,
    evaluation: &Evaluation,
    caps: &CategoryCaps,
    additional_wallet_score: f64,
    now: DateTime<Utc>,
) {
    let scores = &evaluation.scores;

    if request.username.is_some() {
        record.username = request.username.clone();
    }
    if request.email.is_some() {
        record.email = request.email.clone();
    }

    record.title = evaluation.title.clone();
    record.badges = evaluation.badge_names();
    record.badge_groups = group_badges(&evaluation.badges);
    record.social_score = scores.social_score.min(caps.social);
    record.vault_score = scores.vault_score.min(caps.vault);

    let primary = request.primary_address();
    let primary_score = scores.crypto_score.min(caps.crypto) + scores.nft_score.min(caps.nft);

    for address in request.all_addresses() {
        if Some(address.as_str()) == primary {
            record.upsert_wallet(&address, primary_score);
        } else if record.add_wallet_if_missing(&address, additional_wallet_score) {
            debug!("Added wallet {} with default score", address);
        }
    }

    record.recompute_aggregate();
    record.updated_at = now;
}
