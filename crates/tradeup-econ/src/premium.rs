//! Markup for wear values sitting just above a condition's lower bound.

use tradeup_core::Condition;

/// Dampening applied to the premium excess of high-value items.
const HIGH_VALUE_DAMPING: f64 = 0.6;

/// Low-wear premium model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PremiumModel {
    /// Scales the excess of every multiplier over 1.0. Zero disables premiums.
    pub premium_scale: f64,
    /// Base price (catalog currency) above which premiums are dampened.
    pub high_value_threshold: f64,
}

impl Default for PremiumModel {
    fn default() -> Self {
        Self {
            premium_scale: 1.0,
            high_value_threshold: 50.0,
        }
    }
}

/// Raw multiplier for a distance `delta` above the condition's lower bound.
///
/// Tiers only apply to strictly positive deltas; a wear exactly on the lower
/// bound carries no premium.
pub fn raw_multiplier(condition: Condition, delta: f64) -> f64 {
    if delta <= 0.0 {
        return 1.0;
    }
    let tiers: &[(f64, f64)] = match condition {
        Condition::FactoryNew => &[(0.005, 5.0), (0.015, 3.0), (0.035, 1.5)],
        Condition::MinimalWear => &[(0.005, 2.0), (0.015, 1.4), (0.03, 1.1)],
        Condition::FieldTested => &[(0.01, 2.0), (0.03, 1.3), (0.05, 1.1)],
        Condition::WellWorn | Condition::BattleScarred => &[],
    };
    tiers
        .iter()
        .find(|(limit, _)| delta <= *limit)
        .map(|(_, m)| *m)
        .unwrap_or(1.0)
}

impl PremiumModel {
    /// Premium-adjusted price. Unpriced inputs (non-positive, NaN or infinite
    /// base) come back as `f64::INFINITY`.
    pub fn adjusted_price(&self, base_price: f64, wear: f64, condition: Condition) -> f64 {
        if !(base_price > 0.0) || base_price.is_infinite() {
            return f64::INFINITY;
        }
        let delta = (wear - condition.lower_bound()).max(0.0);
        let multiplier = raw_multiplier(condition, delta);
        let mut effective = 1.0 + (multiplier - 1.0) * self.premium_scale;
        if effective > 1.0 && base_price > self.high_value_threshold {
            effective = 1.0 + (effective - 1.0) * HIGH_VALUE_DAMPING;
        }
        base_price * effective
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn model(scale: f64) -> PremiumModel {
        PremiumModel {
            premium_scale: scale,
            high_value_threshold: 50.0,
        }
    }

    #[test]
    fn wear_on_lower_bound_is_unchanged() {
        let m = model(1.0);
        for c in Condition::ALL {
            assert_eq!(m.adjusted_price(10.0, c.lower_bound(), c), 10.0);
        }
    }

    #[test]
    fn factory_new_tiers() {
        let m = model(1.0);
        let fn_ = Condition::FactoryNew;
        assert_eq!(m.adjusted_price(10.0, 0.004, fn_), 50.0);
        assert_eq!(m.adjusted_price(10.0, 0.01, fn_), 30.0);
        assert_eq!(m.adjusted_price(10.0, 0.03, fn_), 15.0);
        assert_eq!(m.adjusted_price(10.0, 0.05, fn_), 10.0);
    }

    #[test]
    fn field_tested_and_worn_tiers() {
        let m = model(1.0);
        assert!((m.adjusted_price(10.0, 0.155, Condition::FieldTested) - 20.0).abs() < 1e-9);
        assert!((m.adjusted_price(10.0, 0.17, Condition::FieldTested) - 13.0).abs() < 1e-9);
        assert_eq!(m.adjusted_price(10.0, 0.381, Condition::WellWorn), 10.0);
        assert_eq!(m.adjusted_price(10.0, 0.451, Condition::BattleScarred), 10.0);
    }

    #[test]
    fn scale_and_high_value_damping() {
        let half = model(0.5);
        // 1 + (2.0 - 1) * 0.5
        assert!((half.adjusted_price(10.0, 0.072, Condition::MinimalWear) - 15.0).abs() < 1e-9);
        let full = model(1.0);
        // 1 + (5 - 1) * 0.6 = 3.4
        assert!((full.adjusted_price(100.0, 0.001, Condition::FactoryNew) - 340.0).abs() < 1e-9);
        assert_eq!(model(0.0).adjusted_price(10.0, 0.001, Condition::FactoryNew), 10.0);
    }

    #[test]
    fn unpriced_base_is_infinite() {
        let m = model(1.0);
        assert_eq!(m.adjusted_price(0.0, 0.01, Condition::FactoryNew), f64::INFINITY);
        assert_eq!(m.adjusted_price(-3.0, 0.01, Condition::FactoryNew), f64::INFINITY);
        assert_eq!(
            m.adjusted_price(f64::INFINITY, 0.01, Condition::FactoryNew),
            f64::INFINITY
        );
    }

    proptest! {
        #[test]
        fn never_below_base(base in 0.01f64..10_000.0, wear in 0.0f64..1.0, scale in 0.0f64..3.0) {
            let c = tradeup_core::condition_for(wear);
            let p = model(scale).adjusted_price(base, wear, c);
            prop_assert!(p >= base);
            prop_assert!(p <= base * (1.0 + 4.0 * scale) + 1e-9);
        }
    }
}
