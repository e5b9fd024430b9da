use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BadgeTier {
    Silver,
    Gold,
    Platinum,
}

impl BadgeTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeTier::Silver => "Silver",
            BadgeTier::Gold => "Gold",
            BadgeTier::Platinum => "Platinum",
        }
    }

    /// Highest tier whose threshold `value` meets, checked platinum first.
    /// Comparisons are inclusive; below silver yields `None`.
    pub fn for_value(value: f64, thresholds: &BadgeThresholds) -> Option<Self> {
        if value >= thresholds.platinum {
            Some(BadgeTier::Platinum)
        } else if value >= thresholds.gold {
            Some(BadgeTier::Gold)
        } else if value >= thresholds.silver {
            Some(BadgeTier::Silver)
        } else {
            None
        }
    }
}

impl fmt::Display for BadgeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BadgeThresholds {
    pub silver: f64,
    pub gold: f64,
    pub platinum: f64,
}

impl BadgeThresholds {
    pub const fn new(silver: f64, gold: f64, platinum: f64) -> Self {
        Self { silver, gold, platinum }
    }

    pub fn is_ascending(&self) -> bool {
        self.silver <= self.gold && self.gold <= self.platinum
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BadgeAward {
    pub tier: BadgeTier,
    pub value: f64,
}

/// Awarded badges keyed by name. Only badges that reached a tier are present.
pub type BadgeResult = BTreeMap<String, BadgeAward>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries_are_inclusive() {
        let t = BadgeThresholds::new(10.0, 50.0, 100.0);
        assert_eq!(BadgeTier::for_value(9.0, &t), None);
        assert_eq!(BadgeTier::for_value(10.0, &t), Some(BadgeTier::Silver));
        assert_eq!(BadgeTier::for_value(49.0, &t), Some(BadgeTier::Silver));
        assert_eq!(BadgeTier::for_value(50.0, &t), Some(BadgeTier::Gold));
        assert_eq!(BadgeTier::for_value(100.0, &t), Some(BadgeTier::Platinum));
        assert_eq!(BadgeTier::for_value(1e9, &t), Some(BadgeTier::Platinum));
    }

    #[test]
    fn test_flat_thresholds_jump_to_platinum() {
        let t = BadgeThresholds::new(1.0, 1.0, 1.0);
        assert_eq!(BadgeTier::for_value(1.0, &t), Some(BadgeTier::Platinum));
        assert_eq!(BadgeTier::for_value(0.0, &t), None);
    }

    #[test]
    fn test_nan_never_qualifies() {
        let t = BadgeThresholds::new(0.0, 0.0, 0.0);
        assert_eq!(BadgeTier::for_value(f64::NAN, &t), None);
    }
}
