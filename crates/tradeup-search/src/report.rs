//! Search output: per-tier best recipes, retained stream and convergence history.

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use tradeup_core::Rarity;
use tradeup_econ::{PriceTier, SimulationResult, TierLimits};

/// Convergence statistics of one generation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GenerationStats {
    pub rarity: Rarity,
    pub generation: usize,
    /// Over priced individuals only; -1 when none is priced.
    pub max_roi: f64,
    pub avg_roi: f64,
    pub best_score: f64,
}

/// Everything a search run produces.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SearchReport {
    /// Best distinct recipes per cost tier, highest ROI first. Each result
    /// carries its inputs, i.e. the recipe itself.
    pub tier_top: BTreeMap<PriceTier, Vec<SimulationResult>>,
    /// Every retained (priced, ROI above the floor) evaluation.
    pub accepted: Vec<SimulationResult>,
    pub history: Vec<GenerationStats>,
}

/// Order-insensitive identity of a recipe.
fn recipe_key(result: &SimulationResult) -> Vec<(&str, &str, u64)> {
    let mut key: Vec<_> = result
        .inputs
        .iter()
        .map(|i| (i.collection.as_str(), i.name.as_str(), i.wear.to_bits()))
        .collect();
    key.sort_unstable();
    key
}

/// Bucket results by total cost and keep the `top_n` distinct highest-ROI
/// recipes of each tier. All four tiers are present in the output.
pub fn collate_tier_top(
    results: &[SimulationResult],
    limits: &TierLimits,
    top_n: usize,
) -> BTreeMap<PriceTier, Vec<SimulationResult>> {
    let mut buckets: BTreeMap<PriceTier, Vec<&SimulationResult>> =
        PriceTier::ALL.iter().map(|t| (*t, Vec::new())).collect();
    for res in results.iter().filter(|r| r.is_priced()) {
        buckets
            .entry(limits.classify(res.total_cost))
            .or_default()
            .push(res);
    }
    buckets
        .into_iter()
        .map(|(tier, mut list)| {
            list.sort_by(|a, b| b.roi.total_cmp(&a.roi));
            let mut seen = HashSet::new();
            let top = list
                .into_iter()
                .filter(|r| seen.insert(recipe_key(*r)))
                .take(top_n)
                .cloned()
                .collect();
            (tier, top)
        })
        .collect()
}
