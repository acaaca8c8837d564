#![deny(warnings)]

//! Pricing and simulation of trade-up contracts.
//!
//! This crate provides:
//! - Market parameters (currency rate, price tiers) with validation
//! - The low-wear premium model applied to recipe inputs
//! - [`TradeUpSimulator`], which turns ten priced inputs into a weighted
//!   outcome distribution with expected value, ROI, break-even probability
//!   and standard deviation

pub mod input;
pub mod market;
pub mod premium;
pub mod simulator;

pub use input::TradeInputItem;
pub use market::{MarketConfig, MarketConfigError, PriceTier, TierLimits};
pub use premium::{raw_multiplier, PremiumModel};
pub use simulator::{
    average_wear_fraction, output_wear, RecipeFault, SimulationResult, TradeOutcome,
    TradeUpSimulator, RECIPE_SIZE,
};
