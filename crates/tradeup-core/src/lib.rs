#![deny(warnings)]

//! Core domain models for trade-up contracts.
//!
//! This crate defines the catalog data model, wear-to-condition mapping and
//! the read-only [`PriceCatalog`] used by the simulator and the search.

pub mod catalog;
pub mod condition;
pub mod price;

pub use catalog::{validate_catalog, Catalog, CatalogError, Collection, Item, Rarity};
pub use condition::{condition_for, Condition, CONDITION_BOUNDARIES};
pub use price::{ItemMeta, PriceCatalog, PriceOverride, PricingError, WEAR_EPSILON};

/// Market name of a rarity tier, falling back to the number.
pub fn rarity_name(rarity: Rarity) -> String {
    match rarity {
        1 => "Consumer".to_string(),
        2 => "Industrial".to_string(),
        3 => "Mil-Spec".to_string(),
        4 => "Restricted".to_string(),
        5 => "Classified".to_string(),
        6 => "Covert".to_string(),
        n => n.to_string(),
    }
}
