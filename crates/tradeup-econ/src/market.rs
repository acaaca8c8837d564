//! Market-level parameters: currency, price tiers and high-value cutoff.

use crate::premium::PremiumModel;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Price segment used both for candidate pooling and result bucketing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PriceTier {
    Micro,
    Low,
    Mid,
    High,
}

impl PriceTier {
    pub const ALL: [PriceTier; 4] = [PriceTier::Micro, PriceTier::Low, PriceTier::Mid, PriceTier::High];
}

impl fmt::Display for PriceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PriceTier::Micro => "Micro",
            PriceTier::Low => "Low",
            PriceTier::Mid => "Mid",
            PriceTier::High => "High",
        };
        f.write_str(s)
    }
}

/// Tier thresholds already converted to the catalog currency.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TierLimits {
    pub micro: f64,
    pub low: f64,
    pub mid: f64,
}

impl TierLimits {
    /// Bucket a value: `< micro`, `< low`, `< mid`, otherwise high.
    pub fn classify(&self, value: f64) -> PriceTier {
        if value < self.micro {
            PriceTier::Micro
        } else if value < self.low {
            PriceTier::Low
        } else if value < self.mid {
            PriceTier::Mid
        } else {
            PriceTier::High
        }
    }
}

/// Invalid market parameters.
#[derive(Debug, Error, PartialEq)]
pub enum MarketConfigError {
    #[error("exchange rate must be finite and > 0, got {0}")]
    InvalidExchangeRate(f64),
    #[error("price modifier must be finite and > 0, got {0}")]
    InvalidPriceModifier(f64),
    /// Thresholds must be finite, positive and strictly increasing.
    #[error("tier thresholds must satisfy 0 < micro < low < mid")]
    InvalidTierThresholds,
    #[error("high-value threshold must be finite and >= 0")]
    InvalidHighValueThreshold,
}

/// Currency and pricing parameters. Thresholds are in the reference
/// currency and get multiplied by `exchange_rate`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// Reference currency to catalog currency.
    pub exchange_rate: f64,
    /// Marketplace ratio applied to recipe cost and outcome prices.
    pub price_modifier: f64,
    /// Above this base price wear premiums are dampened.
    pub high_value_threshold: f64,
    pub tier_micro: f64,
    pub tier_low: f64,
    pub tier_mid: f64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            exchange_rate: 1.0,
            price_modifier: 1.0,
            high_value_threshold: 50.0,
            tier_micro: 1.0,
            tier_low: 5.0,
            tier_mid: 20.0,
        }
    }
}

impl MarketConfig {
    pub fn validate(&self) -> Result<(), MarketConfigError> {
        if !(self.exchange_rate.is_finite() && self.exchange_rate > 0.0) {
            return Err(MarketConfigError::InvalidExchangeRate(self.exchange_rate));
        }
        if !(self.price_modifier.is_finite() && self.price_modifier > 0.0) {
            return Err(MarketConfigError::InvalidPriceModifier(self.price_modifier));
        }
        if !(self.high_value_threshold.is_finite() && self.high_value_threshold >= 0.0) {
            return Err(MarketConfigError::InvalidHighValueThreshold);
        }
        let t = [self.tier_micro, self.tier_low, self.tier_mid];
        if t.iter().any(|v| !v.is_finite()) || !(0.0 < t[0] && t[0] < t[1] && t[1] < t[2]) {
            return Err(MarketConfigError::InvalidTierThresholds);
        }
        Ok(())
    }

    /// Tier thresholds in catalog currency.
    pub fn tier_limits(&self) -> TierLimits {
        TierLimits {
            micro: self.tier_micro * self.exchange_rate,
            low: self.tier_low * self.exchange_rate,
            mid: self.tier_mid * self.exchange_rate,
        }
    }

    /// Premium model for this market at the given premium scale.
    pub fn premium_model(&self, premium_scale: f64) -> PremiumModel {
        PremiumModel {
            premium_scale,
            high_value_threshold: self.high_value_threshold * self.exchange_rate,
        }
    }
}
