//! Per-collection candidate selection and price-tier bucketing.

use crate::weights::GuidanceWeights;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tradeup_core::{Condition, Item, PriceCatalog, Rarity};
use tradeup_econ::{PriceTier, TierLimits};

/// Representative input item of one collection for a rarity tier.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CandidateInfo {
    pub collection: String,
    pub item: Item,
    /// Mean of every positive price of the collection's priced tier items.
    pub avg_price: f64,
    /// Highest Factory New price among the next-tier items.
    pub max_output: f64,
    pub hub_score: f64,
}

/// Candidates for one rarity, partitioned by price tier.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CandidatePools {
    /// Every candidate, best upside first.
    pub all: Vec<CandidateInfo>,
    pub micro: Vec<CandidateInfo>,
    pub low: Vec<CandidateInfo>,
    pub mid: Vec<CandidateInfo>,
    pub high: Vec<CandidateInfo>,
    /// Cheapest candidates overall, used to pad recipes.
    pub fillers: Vec<CandidateInfo>,
}

impl CandidatePools {
    pub fn tier(&self, tier: PriceTier) -> &[CandidateInfo] {
        match tier {
            PriceTier::Micro => &self.micro,
            PriceTier::Low => &self.low,
            PriceTier::Mid => &self.mid,
            PriceTier::High => &self.high,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

/// Build the candidate pools for input rarity `rarity`.
///
/// Only collections holding both `rarity` and `rarity + 1` items take part.
pub fn build_candidate_pools(
    catalog: &PriceCatalog,
    rarity: Rarity,
    weights: &GuidanceWeights,
    limits: &TierLimits,
    filler_pool_size: usize,
) -> CandidatePools {
    let next = rarity.saturating_add(1);
    let mut all = Vec::new();
    for (col, collection) in catalog.collections() {
        let outputs = collection.tier(next);
        if outputs.is_empty() {
            continue;
        }
        let priced: Vec<&Item> = collection
            .tier(rarity)
            .iter()
            .filter(|i| {
                i.has_price()
                    && catalog
                        .metadata(col, &i.name)
                        .is_some_and(|m| m.rarity == rarity)
            })
            .collect();
        let Some(representative) = priced.first() else {
            continue;
        };
        let prices: Vec<f64> = priced.iter().flat_map(|i| i.positive_prices()).collect();
        let avg_price = prices.iter().sum::<f64>() / prices.len() as f64;
        let max_output = outputs
            .iter()
            .map(|o| o.price(Condition::FactoryNew).unwrap_or(0.0))
            .fold(0.0, f64::max);
        all.push(CandidateInfo {
            collection: col.to_string(),
            item: (*representative).clone(),
            avg_price,
            max_output,
            hub_score: weights.score(&representative.name),
        });
    }
    all.sort_by(|a, b| b.max_output.total_cmp(&a.max_output));

    let bucket = |tier: PriceTier| -> Vec<CandidateInfo> {
        all.iter()
            .filter(|c| limits.classify(c.avg_price) == tier)
            .cloned()
            .collect()
    };
    let (micro, low, mid, high) = (
        bucket(PriceTier::Micro),
        bucket(PriceTier::Low),
        bucket(PriceTier::Mid),
        bucket(PriceTier::High),
    );
    let mut fillers = all.clone();
    fillers.sort_by(|a, b| a.avg_price.total_cmp(&b.avg_price));
    fillers.truncate(filler_pool_size);

    CandidatePools {
        all,
        micro,
        low,
        mid,
        high,
        fillers,
    }
}

/// Pick a candidate with probability proportional to its hub score. Falls
/// back to a uniform pick when the weights are unusable (e.g. all zero).
pub fn weighted_choice<'c, R: Rng + ?Sized>(
    rng: &mut R,
    candidates: &'c [CandidateInfo],
) -> Option<&'c CandidateInfo> {
    if candidates.is_empty() {
        return None;
    }
    match WeightedIndex::new(candidates.iter().map(|c| c.hub_score)) {
        Ok(dist) => candidates.get(dist.sample(rng)),
        Err(_) => candidates.choose(rng),
    }
}
