//! Outcome distribution and summary statistics for a single recipe.

use crate::input::TradeInputItem;
use serde::Serialize;
use thiserror::Error;
use tracing::trace;
use tradeup_core::{condition_for, Condition, PriceCatalog, Rarity};

/// Number of inputs a trade-up contract consumes.
pub const RECIPE_SIZE: usize = 10;

/// Share of the recipe cost an outcome must reach to count as break-even.
const BREAK_EVEN_RATIO: f64 = 0.99;

/// Why a recipe could not be evaluated.
#[derive(Debug, Error, Clone, PartialEq, Serialize)]
pub enum RecipeFault {
    /// A contract needs exactly [`RECIPE_SIZE`] inputs.
    #[error("recipe has {0} inputs, expected 10")]
    DegenerateRecipe(usize),
    /// The input at this slot has no price.
    #[error("input {0} is unpriced")]
    UnpricedInput(usize),
}

/// One possible result of a contract.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TradeOutcome {
    pub name: String,
    pub display_name: String,
    pub collection: String,
    pub rarity: Rarity,
    pub condition: Condition,
    pub wear: f64,
    pub probability: f64,
    /// Output price after the price modifier; 0 when the output is unpriced.
    pub price: f64,
    pub profit: f64,
}

/// Summary of one simulated recipe.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimulationResult {
    /// `f64::INFINITY` when the recipe could not be priced.
    pub total_cost: f64,
    pub expected_value: f64,
    /// -1 for faulted recipes.
    pub roi: f64,
    pub break_even_prob: f64,
    pub std_dev: f64,
    pub outcomes: Vec<TradeOutcome>,
    pub avg_wear_fraction: f64,
    /// Input rarity; outcomes are one tier higher.
    pub rarity: Rarity,
    pub inputs: Vec<TradeInputItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fault: Option<RecipeFault>,
}

impl SimulationResult {
    fn faulted(fault: RecipeFault, inputs: &[TradeInputItem], rarity: Rarity) -> Self {
        SimulationResult {
            total_cost: f64::INFINITY,
            expected_value: 0.0,
            roi: -1.0,
            break_even_prob: 0.0,
            std_dev: 0.0,
            outcomes: vec![],
            avg_wear_fraction: 0.0,
            rarity,
            inputs: inputs.to_vec(),
            fault: Some(fault),
        }
    }

    /// Whether the recipe has a finite cost.
    pub fn is_priced(&self) -> bool {
        self.total_cost.is_finite()
    }

    /// Sum of outcome probabilities.
    pub fn probability_mass(&self) -> f64 {
        self.outcomes.iter().map(|o| o.probability).sum()
    }
}

/// Mean relative wear position of the inputs, divided over the full contract size.
pub fn average_wear_fraction(inputs: &[TradeInputItem]) -> f64 {
    inputs.iter().map(TradeInputItem::wear_fraction).sum::<f64>() / RECIPE_SIZE as f64
}

/// Output wear for a range given the transferred wear fraction.
pub fn output_wear(min_wear: f64, max_wear: f64, fraction: f64) -> f64 {
    let raw = min_wear + fraction * (max_wear - min_wear);
    let rounded = (raw * 1e9).round() / 1e9;
    rounded.clamp(min_wear, max_wear)
}

/// Evaluates recipes against a price catalog.
#[derive(Clone, Copy, Debug)]
pub struct TradeUpSimulator<'a> {
    catalog: &'a PriceCatalog,
}

impl<'a> TradeUpSimulator<'a> {
    pub fn new(catalog: &'a PriceCatalog) -> Self {
        Self { catalog }
    }

    /// Simulate a contract of `inputs` at `input_rarity`. Outputs are the
    /// `input_rarity + 1` items of each input's collection.
    pub fn simulate(
        &self,
        inputs: &[TradeInputItem],
        input_rarity: Rarity,
        price_modifier: f64,
    ) -> SimulationResult {
        if inputs.len() != RECIPE_SIZE {
            return SimulationResult::faulted(
                RecipeFault::DegenerateRecipe(inputs.len()),
                inputs,
                input_rarity,
            );
        }
        if let Some(slot) = inputs.iter().position(|i| i.price == f64::INFINITY) {
            return SimulationResult::faulted(RecipeFault::UnpricedInput(slot), inputs, input_rarity);
        }

        let total_cost = price_modifier * inputs.iter().map(|i| i.price).sum::<f64>();
        let avg_fraction = average_wear_fraction(inputs);

        // First-seen order keeps outcome order stable.
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for input in inputs {
            match counts.iter_mut().find(|(c, _)| *c == input.collection) {
                Some((_, n)) => *n += 1,
                None => counts.push((input.collection.as_str(), 1)),
            }
        }

        let output_rarity = input_rarity.saturating_add(1);
        let mut outcomes = Vec::new();
        let mut expected_value = 0.0;
        let mut break_even_prob = 0.0;
        for (collection, count) in counts {
            let outputs = self.catalog.tier_items(collection, output_rarity);
            if outputs.is_empty() {
                trace!(collection, output_rarity, "no trade-up outputs");
                continue;
            }
            let prob_collection = count as f64 / RECIPE_SIZE as f64;
            let prob_item = prob_collection / outputs.len() as f64;
            for out in outputs {
                let wear = output_wear(out.min_wear, out.max_wear, avg_fraction);
                let (raw_price, condition) =
                    match self.catalog.base_price(&out.name, wear, collection) {
                        Ok(found) => found,
                        Err(_) => (0.0, condition_for(wear)),
                    };
                let price = raw_price * price_modifier;
                expected_value += price * prob_item;
                if price >= total_cost * BREAK_EVEN_RATIO {
                    break_even_prob += prob_item;
                }
                outcomes.push(TradeOutcome {
                    name: out.name.clone(),
                    display_name: out.display().to_string(),
                    collection: collection.to_string(),
                    rarity: output_rarity,
                    condition,
                    wear,
                    probability: prob_item,
                    price,
                    profit: price - total_cost,
                });
            }
        }

        let roi = if total_cost > 0.0 {
            (expected_value - total_cost) / total_cost
        } else {
            -1.0
        };
        let variance: f64 = outcomes
            .iter()
            .map(|o| o.probability * (o.price - expected_value).powi(2))
            .sum();

        SimulationResult {
            total_cost,
            expected_value,
            roi,
            break_even_prob,
            std_dev: variance.sqrt(),
            outcomes,
            avg_wear_fraction: avg_fraction,
            rarity: input_rarity,
            inputs: inputs.to_vec(),
            fault: None,
        }
    }
}
