//! Nested catalog data model as supplied by the market-data side.

use crate::condition::Condition;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Rarity tier. Tier `T` inputs trade up into tier `T + 1` of the same collection.
pub type Rarity = u8;

/// One collectible item definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Name, unique within its collection.
    pub name: String,
    /// Optional localized/display name.
    #[serde(default, alias = "name_cn", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Lowest wear the item can be produced at.
    #[serde(rename = "min_float")]
    pub min_wear: f64,
    /// Highest wear the item can be produced at.
    #[serde(rename = "max_float")]
    pub max_wear: f64,
    /// Known market prices per condition. Non-positive entries count as missing.
    #[serde(default, rename = "price_dict")]
    pub prices: BTreeMap<Condition, f64>,
}

impl Item {
    /// Display name, falling back to the canonical name.
    pub fn display(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    /// Positive price for a condition, if recorded.
    pub fn price(&self, condition: Condition) -> Option<f64> {
        self.prices.get(&condition).copied().filter(|p| *p > 0.0)
    }

    /// All recorded positive prices.
    pub fn positive_prices(&self) -> impl Iterator<Item = f64> + '_ {
        self.prices.values().copied().filter(|p| *p > 0.0)
    }

    /// Whether at least one condition has a usable price.
    pub fn has_price(&self) -> bool {
        self.positive_prices().next().is_some()
    }

    /// Whether `0 <= min < max <= 1`.
    pub fn has_valid_wear_range(&self) -> bool {
        self.min_wear.is_finite()
            && self.max_wear.is_finite()
            && self.min_wear >= 0.0
            && self.min_wear < self.max_wear
            && self.max_wear <= 1.0
    }
}

/// Items of one collection grouped by rarity tier.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection {
    pub tiers: BTreeMap<Rarity, Vec<Item>>,
}

impl Collection {
    /// Items of a tier; empty when the tier is absent.
    pub fn tier(&self, rarity: Rarity) -> &[Item] {
        self.tiers.get(&rarity).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// The full nested catalog: collection name to tiered items.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    pub collections: BTreeMap<String, Collection>,
}

impl Catalog {
    /// Parse the JSON catalog format.
    pub fn from_json_str(s: &str) -> Result<Self, CatalogError> {
        serde_json::from_str(s).map_err(|e| CatalogError::Parse(e.to_string()))
    }

    /// Total number of item definitions across all collections and tiers.
    pub fn item_count(&self) -> usize {
        self.collections
            .values()
            .flat_map(|c| c.tiers.values())
            .map(Vec::len)
            .sum()
    }
}

/// Problems found while loading or validating a catalog.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// The catalog document could not be parsed.
    #[error("catalog parse error: {0}")]
    Parse(String),
    /// Item names must be non-empty.
    #[error("empty item name in collection {0}")]
    EmptyName(String),
    /// Wear range must satisfy 0 <= min < max <= 1.
    #[error("invalid wear range [{min}, {max}] for {collection}/{name}")]
    InvalidWearRange {
        collection: String,
        name: String,
        min: f64,
        max: f64,
    },
    /// Prices must be finite numbers.
    #[error("non-finite price for {collection}/{name}")]
    NonFinitePrice { collection: String, name: String },
    /// A name may appear only once per collection.
    #[error("duplicate item {name} in collection {collection}")]
    DuplicateItem { collection: String, name: String },
}

/// Validate catalog invariants.
pub fn validate_catalog(catalog: &Catalog) -> Result<(), CatalogError> {
    for (col, collection) in &catalog.collections {
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        for item in collection.tiers.values().flatten() {
            if item.name.trim().is_empty() {
                return Err(CatalogError::EmptyName(col.clone()));
            }
            if !seen.insert(item.name.as_str()) {
                return Err(CatalogError::DuplicateItem {
                    collection: col.clone(),
                    name: item.name.clone(),
                });
            }
            if !item.has_valid_wear_range() {
                return Err(CatalogError::InvalidWearRange {
                    collection: col.clone(),
                    name: item.name.clone(),
                    min: item.min_wear,
                    max: item.max_wear,
                });
            }
            if item.prices.values().any(|p| !p.is_finite()) {
                return Err(CatalogError::NonFinitePrice {
                    collection: col.clone(),
                    name: item.name.clone(),
                });
            }
        }
    }
    Ok(())
}
