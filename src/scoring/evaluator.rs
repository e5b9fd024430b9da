use chrono::{DateTime, Utc};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::warn;

use crate::{
    config::ScoringSettings,
    models::{
        Evaluation, RawSocialProfile, RawVaultItems, RawWalletSummary, Result, ScoreError,
    },
    normalize::normalize,
};
use super::{
    algorithm::ScoringAlgorithm,
    badges::BadgeAssigner,
    titles::TitleSelector,
    weights::CategoryCaps,
};

/// Source of "now" for account-age arithmetic.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Normalizer, score calculator, badge assigner and title selector in one
/// pure call. Holds only immutable tables, so one instance can be shared
/// across threads.
#[derive(Clone)]
pub struct Evaluator {
    algorithm: ScoringAlgorithm,
    assigner: BadgeAssigner,
    selector: TitleSelector,
    clock: Arc<dyn Clock>,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(ScoringAlgorithm::default(), BadgeAssigner::default(), TitleSelector::default())
    }
}

impl Evaluator {
    pub fn new(algorithm: ScoringAlgorithm, assigner: BadgeAssigner, selector: TitleSelector) -> Self {
        Self {
            algorithm,
            assigner,
            selector,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn from_settings(settings: &ScoringSettings) -> Self {
        Self::new(
            ScoringAlgorithm::new(settings.weights.clone(), settings.caps.clone()),
            BadgeAssigner::new(&settings.badge_thresholds),
            TitleSelector::new(settings.titles.clone(), settings.fallback_title.clone()),
        )
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn caps(&self) -> &CategoryCaps {
        self.algorithm.caps()
    }

    pub fn fallback_title(&self) -> &str {
        self.selector.fallback()
    }

    /// Evaluates one user's payloads. Never fails: anything that goes wrong
    /// inside yields the fallback evaluation instead.
    pub fn evaluate(
        &self,
        social: &RawSocialProfile,
        wallet: &RawWalletSummary,
        vault_groups: &RawVaultItems,
        vault_messages: &RawVaultItems,
    ) -> Evaluation {
        self.evaluate_at(social, wallet, vault_groups, vault_messages, self.clock.now())
    }

    /// Same as `evaluate` with an explicit clock reading.
    pub fn evaluate_at(
        &self,
        social: &RawSocialProfile,
        wallet: &RawWalletSummary,
        vault_groups: &RawVaultItems,
        vault_messages: &RawVaultItems,
        now: DateTime<Utc>,
    ) -> Evaluation {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.try_evaluate(social, wallet, vault_groups, vault_messages, now)
        }));

        match outcome {
            Ok(Ok(evaluation)) => evaluation,
            Ok(Err(e)) => {
                warn!("Evaluation failed, returning fallback result: {}", e);
                Evaluation::fallback(self.selector.fallback())
            }
            Err(_) => {
                warn!("Evaluation panicked, returning fallback result");
                Evaluation::fallback(self.selector.fallback())
            }
        }
    }

    fn try_evaluate(
        &self,
        social: &RawSocialProfile,
        wallet: &RawWalletSummary,
        vault_groups: &RawVaultItems,
        vault_messages: &RawVaultItems,
        now: DateTime<Utc>,
    ) -> Result<Evaluation> {
        let metrics = normalize(social, wallet, vault_groups, vault_messages, now);
        for anomaly in &metrics.anomalies {
            warn!("Malformed payload field, using default: {}", anomaly);
        }

        let scores = self.algorithm.calculate_score(&metrics);
        if scores.categories().iter().any(|s| s.is_nan()) {
            return Err(ScoreError::ScoreCalculationError(
                "category score is not a number".to_string(),
            ));
        }

        let badges = self.assigner.assign_badges(&metrics);
        let title = self.selector.select_title(&badges);

        Ok(Evaluation { title, badges, scores })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BadgeTier;
    use chrono::TimeZone;
    use serde_json::json;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn evaluator() -> Evaluator {
        Evaluator::default().with_clock(Arc::new(FixedClock(fixed_now())))
    }

    #[test]
    fn test_empty_inputs_yield_default_result() {
        let result = evaluator().evaluate(
            &RawSocialProfile(json!({})),
            &RawWalletSummary(json!({})),
            &RawVaultItems::empty(),
            &RawVaultItems::empty(),
        );
        assert_eq!(result, Evaluation::fallback("ALL ROUNDOOR"));
    }

    #[test]
    fn test_null_inputs_yield_default_result() {
        let result = evaluator().evaluate(
            &RawSocialProfile::empty(),
            &RawWalletSummary::empty(),
            &RawVaultItems(serde_json::Value::Null),
            &RawVaultItems(serde_json::Value::Null),
        );
        assert_eq!(result.scores.total_score, 0.0);
        assert!(result.badges.is_empty());
    }

    #[test]
    fn test_clock_drives_account_age() {
        let social = RawSocialProfile(json!({
            "result": { "legacy": { "created_at": "Wed Jun 01 12:00:00 +0000 2005" } }
        }));
        let result = evaluator().evaluate(
            &social,
            &RawWalletSummary::empty(),
            &RawVaultItems::empty(),
            &RawVaultItems::empty(),
        );
        let veteran = result.badges["Twitter Veteran"];
        assert_eq!(veteran.tier, BadgeTier::Platinum);
        assert!(veteran.value > 20.0 && veteran.value < 20.1);
    }

    #[test]
    fn test_huge_balance_keeps_other_categories() {
        let social = RawSocialProfile(json!({
            "result": {
                "is_blue_verified": true,
                "legacy": { "followers_count": 1_000_000 }
            }
        }));
        let wallet = RawWalletSummary(json!({ "Native Balance Result": 1.7e308 }));
        let result = evaluator().evaluate(
            &social,
            &wallet,
            &RawVaultItems::empty(),
            &RawVaultItems::empty(),
        );

        assert_eq!(result.scores.crypto_score, f64::MAX);
        assert!((result.scores.social_score - 1005.0).abs() < 1e-9);
        assert_eq!(result.scores.total_score, 90.0);
        assert_eq!(result.badges["Social HODLer"].tier, BadgeTier::Platinum);
        assert_eq!(result.badges["Verified Visionary"].tier, BadgeTier::Platinum);
    }

    #[test]
    fn test_settings_drive_tables() {
        let mut settings = ScoringSettings::default();
        settings.fallback_title = "Newcomer".to_string();
        let result = Evaluator::from_settings(&settings).evaluate_at(
            &RawSocialProfile::empty(),
            &RawWalletSummary::empty(),
            &RawVaultItems::empty(),
            &RawVaultItems::empty(),
            fixed_now(),
        );
        assert_eq!(result.title, "Newcomer");
    }
}
