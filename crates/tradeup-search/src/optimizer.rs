//! Evolutionary search over ten-item recipes.
//!
//! Each rarity is searched independently: a population seeded from the
//! candidate pools is scored by the simulator, then rebuilt every generation
//! from elites plus mutated single-point crossovers of top scorers.

use crate::config::SearchConfig;
use crate::pool::{build_candidate_pools, weighted_choice, CandidateInfo, CandidatePools};
use crate::report::{collate_tier_top, GenerationStats, SearchReport};
use crate::weights::GuidanceWeights;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};
use tradeup_core::{rarity_name, PriceCatalog, Rarity, CONDITION_BOUNDARIES};
use tradeup_econ::{
    MarketConfig, PremiumModel, PriceTier, SimulationResult, TierLimits, TradeInputItem,
    TradeUpSimulator,
};

/// A candidate recipe: ten input items.
pub type Recipe = Vec<TradeInputItem>;

/// Score of recipes that cannot be priced; below any priced recipe.
pub const UNPRICED_SCORE: f64 = -999_999.0;

const BOUNDARY_SNAP_PROB: f64 = 0.15;
const UNIFORM_SHIFT_PROB: f64 = 0.4;
const REPLACE_SLOT_PROB: f64 = 0.3;
const WEAR_SHIFTS: [f64; 4] = [-0.01, 0.01, 0.005, -0.005];

/// Risk-adjusted fitness: ROI and break-even chance, penalized for high spread.
pub fn fitness(result: &SimulationResult) -> f64 {
    let mut score = if result.is_priced() {
        result.roi * 100.0 + result.break_even_prob * 50.0
    } else {
        UNPRICED_SCORE
    };
    if result.std_dev > result.total_cost * 2.0 {
        score -= 20.0;
    }
    score
}

/// A simulated individual with its fitness.
#[derive(Clone, Debug)]
pub struct ScoredRecipe {
    pub score: f64,
    pub result: SimulationResult,
}

impl ScoredRecipe {
    pub fn recipe(&self) -> &Recipe {
        &self.result.inputs
    }
}

/// Picks a price tier for a seeded main ingredient: 30/30/20/20.
fn seed_tier<R: Rng + ?Sized>(rng: &mut R) -> PriceTier {
    let r: f64 = rng.gen();
    if r < 0.3 {
        PriceTier::Micro
    } else if r < 0.6 {
        PriceTier::Low
    } else if r < 0.8 {
        PriceTier::Mid
    } else {
        PriceTier::High
    }
}

/// Evolutionary optimizer bound to one catalog and one set of guidance weights.
pub struct Optimizer<'a> {
    catalog: &'a PriceCatalog,
    simulator: TradeUpSimulator<'a>,
    config: &'a SearchConfig,
    weights: &'a GuidanceWeights,
    premium: PremiumModel,
    limits: TierLimits,
    price_modifier: f64,
}

impl<'a> Optimizer<'a> {
    pub fn new(
        catalog: &'a PriceCatalog,
        market: &MarketConfig,
        config: &'a SearchConfig,
        weights: &'a GuidanceWeights,
    ) -> Self {
        Self {
            catalog,
            simulator: TradeUpSimulator::new(catalog),
            config,
            weights,
            premium: market.premium_model(config.premium_scale),
            limits: market.tier_limits(),
            price_modifier: market.price_modifier,
        }
    }

    pub fn candidate_pools(&self, rarity: Rarity) -> CandidatePools {
        build_candidate_pools(
            self.catalog,
            rarity,
            self.weights,
            &self.limits,
            self.config.filler_pool_size,
        )
    }

    /// Instantiate a candidate at `wear` (clamped to its range).
    pub fn create_item(&self, candidate: &CandidateInfo, wear: f64) -> TradeInputItem {
        TradeInputItem::resolve(
            self.catalog,
            &self.premium,
            &candidate.collection,
            &candidate.item,
            wear,
        )
    }

    /// Seed `population_size` recipes of one main and one filler candidate
    /// sharing a target wear.
    pub fn seed_population<R: Rng + ?Sized>(&self, pools: &CandidatePools, rng: &mut R) -> Vec<Recipe> {
        let mut population = Vec::with_capacity(self.config.population_size);
        for _ in 0..self.config.population_size {
            let tier = seed_tier(rng);
            let main =
                weighted_choice(rng, pools.tier(tier)).or_else(|| weighted_choice(rng, &pools.all));
            let (Some(main), Some(shape), Some(&wear)) = (
                main,
                self.config.recipe_shapes.choose(rng),
                self.config.target_wears.choose(rng),
            ) else {
                break;
            };
            let mut recipe = Vec::with_capacity(shape.main + shape.filler);
            let main_item = self.create_item(main, wear);
            recipe.extend(std::iter::repeat(main_item).take(shape.main));
            if shape.filler > 0 {
                let Some(filler) = weighted_choice(rng, &pools.fillers)
                    .or_else(|| weighted_choice(rng, &pools.all))
                else {
                    break;
                };
                let filler_item = self.create_item(filler, wear);
                recipe.extend(std::iter::repeat(filler_item).take(shape.filler));
            }
            population.push(recipe);
        }
        population
    }

    /// Simulate and score one recipe.
    pub fn evaluate(&self, recipe: &[TradeInputItem], rarity: Rarity) -> ScoredRecipe {
        let result = self.simulator.simulate(recipe, rarity, self.price_modifier);
        ScoredRecipe {
            score: fitness(&result),
            result,
        }
    }

    /// Score a population, best first.
    pub fn evaluate_population(&self, population: &[Recipe], rarity: Rarity) -> Vec<ScoredRecipe> {
        let mut scored: Vec<ScoredRecipe> = population
            .iter()
            .map(|r| self.evaluate(r, rarity))
            .collect();
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored
    }

    /// Prefix of `first` up to a random cut in `[1, len-1]`, then the suffix of `second`.
    pub fn crossover<R: Rng + ?Sized>(&self, first: &[TradeInputItem], second: &[TradeInputItem], rng: &mut R) -> Recipe {
        let len = first.len().min(second.len());
        if len < 2 {
            return first.to_vec();
        }
        let cut = rng.gen_range(1..len);
        first[..cut].iter().chain(&second[cut..]).cloned().collect()
    }

    /// Apply the wear and slot-replacement mutation operators in place.
    pub fn mutate<R: Rng + ?Sized>(&self, recipe: &mut Recipe, pools: &CandidatePools, rng: &mut R) {
        if rng.gen::<f64>() < BOUNDARY_SNAP_PROB {
            let boundary = CONDITION_BOUNDARIES[rng.gen_range(0..CONDITION_BOUNDARIES.len())];
            let target = boundary + 0.0001 + rng.gen::<f64>() * 0.001;
            for item in recipe.iter_mut() {
                if rng.gen_bool(0.5) {
                    item.set_wear(self.catalog, &self.premium, target);
                }
            }
        } else if rng.gen::<f64>() < UNIFORM_SHIFT_PROB {
            let shift = WEAR_SHIFTS[rng.gen_range(0..WEAR_SHIFTS.len())];
            for item in recipe.iter_mut() {
                let wear = item.wear + shift;
                item.set_wear(self.catalog, &self.premium, wear);
            }
        }
        if rng.gen::<f64>() < REPLACE_SLOT_PROB && !recipe.is_empty() {
            let idx = rng.gen_range(0..recipe.len());
            let pool = if rng.gen_bool(0.5) {
                &pools.fillers
            } else {
                &pools.all
            };
            if let Some(candidate) = weighted_choice(rng, pool) {
                let wear = recipe[idx].wear;
                recipe[idx] = self.create_item(candidate, wear);
            }
        }
    }

    /// Elites plus mutated crossovers until the population size is restored.
    pub fn next_generation<R: Rng + ?Sized>(
        &self,
        scored: &[ScoredRecipe],
        pools: &CandidatePools,
        rng: &mut R,
    ) -> Vec<Recipe> {
        let size = self.config.population_size;
        let mut next: Vec<Recipe> = scored
            .iter()
            .take(self.config.elitism_count)
            .map(|s| s.recipe().clone())
            .collect();
        let parents = &scored[..scored.len().min(self.config.parent_pool_size)];
        if parents.is_empty() {
            return next;
        }
        while next.len() < size {
            let (Some(p1), Some(p2)) = (parents.choose(rng), parents.choose(rng)) else {
                break;
            };
            let mut child = self.crossover(p1.recipe(), p2.recipe(), rng);
            if rng.gen::<f64>() < self.config.mutation_rate {
                self.mutate(&mut child, pools, rng);
            }
            next.push(child);
        }
        next
    }

    fn is_retained(&self, result: &SimulationResult) -> bool {
        result.is_priced() && result.roi > self.config.min_roi_to_keep
    }

    /// Run every configured rarity and collate the results. `progress`
    /// receives `(percent, message)` at least once per generation.
    pub fn run<R, P>(&self, rng: &mut R, mut progress: P) -> SearchReport
    where
        R: Rng + ?Sized,
        P: FnMut(u8, &str),
    {
        let generations = self.config.generations;
        let total_steps = (self.config.rarities.len() * generations).max(1);
        let percent = |step: usize| ((step * 100) / total_steps).min(100) as u8;
        let mut step = 0usize;
        let mut accepted = Vec::new();
        let mut history = Vec::new();

        for &rarity in &self.config.rarities {
            let label = rarity_name(rarity);
            progress(percent(step), &format!("scanning {label}"));
            let pools = self.candidate_pools(rarity);
            if pools.is_empty() {
                info!(rarity, "no eligible collections, skipping");
                step += generations;
                continue;
            }
            info!(
                rarity,
                candidates = pools.all.len(),
                fillers = pools.fillers.len(),
                guided = !self.weights.is_uniform(),
                "starting search pass"
            );

            let mut population = self.seed_population(&pools, rng);
            for generation in 0..generations {
                step += 1;
                progress(
                    percent(step),
                    &format!("[{label}] generation {}/{}", generation + 1, generations),
                );
                let scored = self.evaluate_population(&population, rarity);
                accepted.extend(
                    scored
                        .iter()
                        .filter(|s| self.is_retained(&s.result))
                        .map(|s| s.result.clone()),
                );
                let stats = generation_stats(rarity, generation, &scored);
                debug!(
                    rarity,
                    generation,
                    max_roi = stats.max_roi,
                    avg_roi = stats.avg_roi,
                    best_score = stats.best_score,
                    "generation scored"
                );
                history.push(stats);
                if generation + 1 < generations {
                    population = self.next_generation(&scored, &pools, rng);
                }
            }
        }

        progress(95, "collating results");
        let tier_top = collate_tier_top(&accepted, &self.limits, self.config.top_per_tier);
        info!(
            accepted = accepted.len(),
            generations = history.len(),
            "search finished"
        );
        progress(100, "done");
        SearchReport {
            tier_top,
            accepted,
            history,
        }
    }
}

fn generation_stats(rarity: Rarity, generation: usize, scored: &[ScoredRecipe]) -> GenerationStats {
    let rois: Vec<f64> = scored
        .iter()
        .filter(|s| s.result.is_priced())
        .map(|s| s.result.roi)
        .collect();
    let (max_roi, avg_roi) = if rois.is_empty() {
        (-1.0, -1.0)
    } else {
        (
            rois.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            rois.iter().sum::<f64>() / rois.len() as f64,
        )
    };
    GenerationStats {
        rarity,
        generation,
        max_roi,
        avg_roi,
        best_score: scored.first().map(|s| s.score).unwrap_or(UNPRICED_SCORE),
    }
}

/// Single entry point for guided and baseline passes: the two differ only in
/// the weights passed (`GuidanceWeights::uniform()` for the baseline).
pub fn run_search<R, P>(
    catalog: &PriceCatalog,
    market: &MarketConfig,
    config: &SearchConfig,
    weights: &GuidanceWeights,
    rng: &mut R,
    progress: P,
) -> SearchReport
where
    R: Rng + ?Sized,
    P: FnMut(u8, &str),
{
    Optimizer::new(catalog, market, config, weights).run(rng, progress)
}
