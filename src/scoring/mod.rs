pub mod algorithm;
pub mod badges;
pub mod calculator;
pub mod evaluator;
pub mod titles;
pub mod weights;

pub use algorithm::ScoringAlgorithm;
pub use badges::{
    badges_in_category, find_badge, group_badges, BadgeAssigner, BadgeCategory, BadgeDefinition,
    BadgeError, BadgeThresholdRule, BADGE_CATALOG,
};
pub use calculator::{merge_evaluation, ScoreCalculator};
pub use evaluator::{Clock, Evaluator, FixedClock, SystemClock};
pub use titles::{TitleRule, TitleSelector, DEFAULT_FALLBACK_TITLE};
pub use weights::{CategoryCaps, ScoringWeights};
