//! Parameters of the evolutionary search.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tradeup_core::Rarity;
use tradeup_econ::RECIPE_SIZE;

/// How many copies of the main and the filler candidate a seeded recipe holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeShape {
    pub main: usize,
    pub filler: usize,
}

impl RecipeShape {
    pub const fn new(main: usize, filler: usize) -> Self {
        Self { main, filler }
    }
}

/// Invalid search parameters.
#[derive(Debug, Error, PartialEq)]
pub enum SearchConfigError {
    #[error("population size must be > 0")]
    EmptyPopulation,
    #[error("elitism count {elitism} must be smaller than population {population}")]
    ElitismTooLarge { elitism: usize, population: usize },
    #[error("mutation rate must be within [0,1], got {0}")]
    InvalidMutationRate(f64),
    #[error("premium scale must be finite and >= 0, got {0}")]
    InvalidPremiumScale(f64),
    #[error("recipe shape {main}+{filler} does not fill 10 slots")]
    BadRecipeShape { main: usize, filler: usize },
    #[error("at least one recipe shape is required")]
    NoRecipeShapes,
    #[error("at least one target wear in [0,1] is required")]
    NoTargetWears,
    #[error("parent pool size must be > 0")]
    EmptyParentPool,
    #[error("filler pool size must be > 0")]
    EmptyFillerPool,
}

/// Search parameters. Missing fields take the defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub population_size: usize,
    /// Generations per rarity; there is no early stopping.
    pub generations: usize,
    /// Probability that a child recipe is mutated.
    pub mutation_rate: f64,
    /// Top individuals copied unchanged into the next generation.
    pub elitism_count: usize,
    /// Scale of the low-wear premium applied to inputs.
    pub premium_scale: f64,
    /// Size of the cheapest-candidate pool used for padding.
    pub filler_pool_size: usize,
    /// Parents are drawn uniformly from this many top scorers.
    pub parent_pool_size: usize,
    pub recipe_shapes: Vec<RecipeShape>,
    /// Shared starting wears for seeded recipes.
    pub target_wears: Vec<f64>,
    /// Input rarities scanned in order.
    pub rarities: Vec<Rarity>,
    /// Results at or below this ROI are not retained.
    pub min_roi_to_keep: f64,
    /// Recipes reported per price tier.
    pub top_per_tier: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            generations: 50,
            mutation_rate: 0.3,
            elitism_count: 5,
            premium_scale: 1.0,
            filler_pool_size: 40,
            parent_pool_size: 40,
            recipe_shapes: vec![
                RecipeShape::new(10, 0),
                RecipeShape::new(9, 1),
                RecipeShape::new(8, 2),
                RecipeShape::new(7, 3),
                RecipeShape::new(6, 4),
                RecipeShape::new(5, 5),
            ],
            // The long-standing default seeds: low-FN picks plus values just
            // inside / outside the FN and MW upper bounds. FT and above are
            // reached through boundary-snap mutation.
            target_wears: vec![0.005, 0.015, 0.035, 0.0699, 0.0701, 0.1499, 0.1501],
            rarities: vec![2, 3, 4, 5],
            min_roi_to_keep: -0.2,
            top_per_tier: 3,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), SearchConfigError> {
        if self.population_size == 0 {
            return Err(SearchConfigError::EmptyPopulation);
        }
        if self.elitism_count >= self.population_size {
            return Err(SearchConfigError::ElitismTooLarge {
                elitism: self.elitism_count,
                population: self.population_size,
            });
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(SearchConfigError::InvalidMutationRate(self.mutation_rate));
        }
        if !(self.premium_scale.is_finite() && self.premium_scale >= 0.0) {
            return Err(SearchConfigError::InvalidPremiumScale(self.premium_scale));
        }
        if self.recipe_shapes.is_empty() {
            return Err(SearchConfigError::NoRecipeShapes);
        }
        if let Some(bad) = self
            .recipe_shapes
            .iter()
            .find(|s| s.main + s.filler != RECIPE_SIZE || s.main == 0)
        {
            return Err(SearchConfigError::BadRecipeShape {
                main: bad.main,
                filler: bad.filler,
            });
        }
        if self.target_wears.is_empty()
            || self.target_wears.iter().any(|w| !(0.0..=1.0).contains(w))
        {
            return Err(SearchConfigError::NoTargetWears);
        }
        if self.parent_pool_size == 0 {
            return Err(SearchConfigError::EmptyParentPool);
        }
        if self.filler_pool_size == 0 {
            return Err(SearchConfigError::EmptyFillerPool);
        }
        Ok(())
    }
}
