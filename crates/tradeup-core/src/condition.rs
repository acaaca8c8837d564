//! Wear to condition classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper wear bounds of the first four conditions, ascending.
pub const CONDITION_BOUNDARIES: [f64; 4] = [0.07, 0.15, 0.38, 0.45];

/// Discrete cosmetic condition derived from a wear value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Condition {
    /// Wear in [0.00, 0.07).
    #[serde(rename = "Factory New")]
    FactoryNew,
    /// Wear in [0.07, 0.15).
    #[serde(rename = "Minimal Wear")]
    MinimalWear,
    /// Wear in [0.15, 0.38).
    #[serde(rename = "Field-Tested")]
    FieldTested,
    /// Wear in [0.38, 0.45).
    #[serde(rename = "Well-Worn")]
    WellWorn,
    /// Wear in [0.45, 1.00].
    #[serde(rename = "Battle-Scarred")]
    BattleScarred,
}

impl Condition {
    /// All conditions ordered from least to most worn.
    pub const ALL: [Condition; 5] = [
        Condition::FactoryNew,
        Condition::MinimalWear,
        Condition::FieldTested,
        Condition::WellWorn,
        Condition::BattleScarred,
    ];

    /// Position of the condition in [`Condition::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Inclusive lower wear bound of the condition's interval.
    pub fn lower_bound(self) -> f64 {
        match self {
            Condition::FactoryNew => 0.0,
            other => CONDITION_BOUNDARIES[other.index() - 1],
        }
    }

    /// Market spelling, e.g. "Field-Tested".
    pub fn label(self) -> &'static str {
        match self {
            Condition::FactoryNew => "Factory New",
            Condition::MinimalWear => "Minimal Wear",
            Condition::FieldTested => "Field-Tested",
            Condition::WellWorn => "Well-Worn",
            Condition::BattleScarred => "Battle-Scarred",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a wear value. Wear is clamped to [0,1]; a value sitting exactly
/// on a boundary belongs to the more worn condition.
pub fn condition_for(wear: f64) -> Condition {
    let clamped = if wear.is_nan() { 0.0 } else { wear.clamp(0.0, 1.0) };
    let idx = CONDITION_BOUNDARIES.partition_point(|&b| b <= clamped);
    Condition::ALL[idx]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn boundaries_map_to_more_worn_condition() {
        assert_eq!(condition_for(0.0), Condition::FactoryNew);
        assert_eq!(condition_for(0.069_999), Condition::FactoryNew);
        assert_eq!(condition_for(0.07), Condition::MinimalWear);
        assert_eq!(condition_for(0.15), Condition::FieldTested);
        assert_eq!(condition_for(0.38), Condition::WellWorn);
        assert_eq!(condition_for(0.45), Condition::BattleScarred);
        assert_eq!(condition_for(1.0), Condition::BattleScarred);
    }

    #[test]
    fn out_of_range_wear_is_clamped() {
        assert_eq!(condition_for(-0.5), Condition::FactoryNew);
        assert_eq!(condition_for(3.0), Condition::BattleScarred);
    }

    #[test]
    fn lower_bounds_classify_to_themselves() {
        for c in Condition::ALL {
            assert_eq!(condition_for(c.lower_bound()), c);
        }
    }

    #[test]
    fn serde_uses_market_spelling() {
        let s = serde_json::to_string(&Condition::FieldTested).unwrap();
        assert_eq!(s, "\"Field-Tested\"");
        let back: Condition = serde_json::from_str("\"Battle-Scarred\"").unwrap();
        assert_eq!(back, Condition::BattleScarred);
    }

    proptest! {
        #[test]
        fn mapping_is_monotonic(a in -0.2f64..1.2, b in -0.2f64..1.2) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(condition_for(lo) <= condition_for(hi));
        }
    }
}
