pub mod config;
pub mod models;
pub mod normalize;
pub mod scoring;
pub mod sources;
pub mod storage;

pub use self::config::Settings;
pub use models::{
    BadgeResult, BadgeTier, Evaluation, NormalizedMetrics, RawSocialProfile, RawVaultItems,
    RawWalletSummary, Result, ScoreBreakdown, ScoreError, ScoreRecord, ScoreReport, ScoreRequest,
};
pub use scoring::{Evaluator, ScoreCalculator};
