#![deny(warnings)]

//! Evolutionary search for profitable trade-up recipes.
//!
//! - [`build_candidate_pools`] picks one representative input per collection
//!   and buckets it by average price
//! - [`GuidanceWeights`] bias candidate selection toward known good items;
//!   uniform weights give the unguided baseline
//! - [`Optimizer`] evolves recipes per rarity and [`run_search`] collates the
//!   retained results into a [`SearchReport`]

pub mod config;
pub mod optimizer;
pub mod pool;
pub mod report;
pub mod weights;

#[cfg(test)]
mod fixtures;

pub use config::{RecipeShape, SearchConfig, SearchConfigError};
pub use optimizer::{fitness, run_search, Optimizer, Recipe, ScoredRecipe, UNPRICED_SCORE};
pub use pool::{build_candidate_pools, weighted_choice, CandidateInfo, CandidatePools};
pub use report::{collate_tier_top, GenerationStats, SearchReport};
pub use weights::{GuidanceWeights, DEFAULT_HUB_SCORE};
