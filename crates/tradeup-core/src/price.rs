//! Collection-scoped price and wear-range lookups.
//!
//! A [`PriceCatalog`] is built once from a [`Catalog`] and never changes.
//! Currency conversion and manual corrections produce a new instance, so a
//! catalog shared between concurrent searches always reads consistently.

use crate::catalog::{Catalog, Collection, Item, Rarity};
use crate::condition::{condition_for, Condition};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{info, warn};

/// Tolerance applied to wear-range checks.
pub const WEAR_EPSILON: f64 = 1e-9;

/// Why a price could not be resolved. These are expected outcomes; callers
/// turn them into an "unpriced" sentinel rather than failing.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PricingError {
    /// No item with this name in this collection.
    #[error("unknown item {name} in collection {collection}")]
    ItemUnknown { collection: String, name: String },
    /// Wear lies outside the item's producible range.
    #[error("wear {wear} outside [{min}, {max}]")]
    WearOutOfRange { wear: f64, min: f64, max: f64 },
    /// The item has no positive price for the resolved condition.
    #[error("no price recorded for condition {0}")]
    PriceMissing(Condition),
}

/// Wear range and tier of an item.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ItemMeta {
    pub min_wear: f64,
    pub max_wear: f64,
    pub rarity: Rarity,
}

/// A manual price correction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceOverride {
    /// Restrict to one collection; `None` applies to every collection holding the name.
    #[serde(default)]
    pub collection: Option<String>,
    pub name: String,
    pub condition: Condition,
    pub price: f64,
}

#[derive(Clone, Debug)]
struct Entry {
    meta: ItemMeta,
    prices: [Option<f64>; 5],
}

/// Denormalized, read-only view over a catalog.
#[derive(Clone, Debug)]
pub struct PriceCatalog {
    source: Catalog,
    // collection -> name -> entry
    entries: HashMap<String, HashMap<String, Entry>>,
}

impl PriceCatalog {
    /// Flatten a nested catalog. Items with an invalid wear range are skipped,
    /// and so is every repeat of a name already seen in the same collection
    /// (tiers are visited in ascending order).
    pub fn new(source: Catalog) -> Self {
        let mut entries: HashMap<String, HashMap<String, Entry>> = HashMap::new();
        let mut skipped = 0usize;
        for (col, collection) in &source.collections {
            let by_name = entries.entry(col.clone()).or_default();
            for (&rarity, items) in &collection.tiers {
                for item in items {
                    if !item.has_valid_wear_range() {
                        warn!(collection = %col, name = %item.name, "skipping item with invalid wear range");
                        skipped += 1;
                        continue;
                    }
                    if by_name.contains_key(&item.name) {
                        warn!(collection = %col, name = %item.name, rarity, "skipping duplicate item name");
                        skipped += 1;
                        continue;
                    }
                    let mut prices = [None; 5];
                    for c in Condition::ALL {
                        prices[c.index()] = item.price(c);
                    }
                    by_name.insert(
                        item.name.clone(),
                        Entry {
                            meta: ItemMeta {
                                min_wear: item.min_wear,
                                max_wear: item.max_wear,
                                rarity,
                            },
                            prices,
                        },
                    );
                }
            }
        }
        info!(
            collections = entries.len(),
            items = source.item_count() - skipped,
            skipped,
            "price catalog built"
        );
        Self { source, entries }
    }

    /// Resolve the base price of `name` in `collection` at `wear`.
    pub fn base_price(
        &self,
        name: &str,
        wear: f64,
        collection: &str,
    ) -> Result<(f64, Condition), PricingError> {
        let entry = self
            .entries
            .get(collection)
            .and_then(|m| m.get(name))
            .ok_or_else(|| PricingError::ItemUnknown {
                collection: collection.to_string(),
                name: name.to_string(),
            })?;
        let ItemMeta { min_wear, max_wear, .. } = entry.meta;
        if !(wear >= min_wear - WEAR_EPSILON && wear <= max_wear + WEAR_EPSILON) {
            return Err(PricingError::WearOutOfRange {
                wear,
                min: min_wear,
                max: max_wear,
            });
        }
        let condition = condition_for(wear);
        match entry.prices[condition.index()] {
            Some(p) if p > 0.0 => Ok((p, condition)),
            _ => Err(PricingError::PriceMissing(condition)),
        }
    }

    /// Wear range and rarity of an item.
    pub fn metadata(&self, collection: &str, name: &str) -> Option<ItemMeta> {
        self.entries
            .get(collection)
            .and_then(|m| m.get(name))
            .map(|e| e.meta)
    }

    /// Items of `collection` at `rarity`, in catalog order.
    pub fn tier_items(&self, collection: &str, rarity: Rarity) -> &[Item] {
        self.source
            .collections
            .get(collection)
            .map(|c| c.tier(rarity))
            .unwrap_or(&[])
    }

    /// Look up the full item definition, i.e. the one prices resolve against.
    pub fn item(&self, collection: &str, name: &str) -> Option<&Item> {
        self.source
            .collections
            .get(collection)?
            .tiers
            .values()
            .flatten()
            .find(|i| i.name == name && i.has_valid_wear_range())
    }

    /// Collections in name order.
    pub fn collections(&self) -> impl Iterator<Item = (&str, &Collection)> {
        self.source
            .collections
            .iter()
            .map(|(name, c)| (name.as_str(), c))
    }

    /// A new catalog with every price multiplied by `factor`, e.g. an exchange rate.
    pub fn rescaled(&self, factor: f64) -> PriceCatalog {
        let mut source = self.source.clone();
        for item in source
            .collections
            .values_mut()
            .flat_map(|c| c.tiers.values_mut())
            .flatten()
        {
            for p in item.prices.values_mut() {
                *p *= factor;
            }
        }
        PriceCatalog::new(source)
    }

    /// A new catalog with manual corrections applied. Returns the catalog and
    /// the number of (item, condition) prices that were replaced.
    pub fn with_overrides(&self, overrides: &[PriceOverride]) -> (PriceCatalog, usize) {
        let mut source = self.source.clone();
        let mut applied = 0usize;
        for ov in overrides.iter().filter(|o| o.price > 0.0 && o.price.is_finite()) {
            for (col, collection) in source.collections.iter_mut() {
                if ov.collection.as_deref().is_some_and(|c| c != col.as_str()) {
                    continue;
                }
                for item in collection
                    .tiers
                    .values_mut()
                    .flatten()
                    .filter(|i| i.name == ov.name)
                {
                    item.prices.insert(ov.condition, ov.price);
                    applied += 1;
                }
            }
        }
        (PriceCatalog::new(source), applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    fn item(name: &str, min: f64, max: f64, prices: &[(Condition, f64)]) -> Item {
        Item {
            name: name.to_string(),
            display_name: None,
            min_wear: min,
            max_wear: max,
            prices: prices.iter().copied().collect::<BTreeMap<_, _>>(),
        }
    }

    fn catalog() -> PriceCatalog {
        let mut cat = Catalog::default();
        let mut alpha = Collection::default();
        alpha.tiers.insert(
            2,
            vec![item(
                "Widget",
                0.0,
                0.5,
                &[(Condition::FactoryNew, 10.0), (Condition::MinimalWear, 6.0)],
            )],
        );
        let mut beta = Collection::default();
        beta.tiers.insert(
            2,
            vec![
                item(
                    "Widget",
                    0.1,
                    0.8,
                    &[(Condition::MinimalWear, 40.0), (Condition::FieldTested, -1.0)],
                ),
                item(
                    "Knife",
                    0.06,
                    0.15,
                    &[
                        (Condition::FactoryNew, 90.0),
                        (Condition::MinimalWear, 60.0),
                        (Condition::FieldTested, 45.0),
                    ],
                ),
            ],
        );
        cat.collections.insert("Alpha".into(), alpha);
        cat.collections.insert("Beta".into(), beta);
        PriceCatalog::new(cat)
    }

    #[test]
    fn resolves_price_and_condition() {
        let pc = catalog();
        assert_eq!(
            pc.base_price("Widget", 0.03, "Alpha"),
            Ok((10.0, Condition::FactoryNew))
        );
        assert_eq!(
            pc.base_price("Widget", 0.07, "Alpha"),
            Ok((6.0, Condition::MinimalWear))
        );
    }

    #[test]
    fn same_name_in_two_collections_does_not_bleed() {
        let pc = catalog();
        assert_eq!(
            pc.base_price("Widget", 0.12, "Beta"),
            Ok((40.0, Condition::MinimalWear))
        );
        assert_eq!(
            pc.base_price("Widget", 0.12, "Alpha"),
            Ok((6.0, Condition::MinimalWear))
        );
        // Alpha has no FT price, Beta's FT price is negative: both missing.
        assert_eq!(
            pc.base_price("Widget", 0.2, "Alpha"),
            Err(PricingError::PriceMissing(Condition::FieldTested))
        );
        assert_eq!(
            pc.base_price("Widget", 0.2, "Beta"),
            Err(PricingError::PriceMissing(Condition::FieldTested))
        );
    }

    #[test]
    fn wear_range_edges() {
        let pc = catalog();
        assert!(pc.base_price("Widget", 0.0, "Alpha").is_ok());
        // Within tolerance of max: range check passes, BS has no price.
        assert_eq!(
            pc.base_price("Widget", 0.5 + 5e-10, "Alpha"),
            Err(PricingError::PriceMissing(Condition::BattleScarred))
        );
        assert!(matches!(
            pc.base_price("Widget", 0.5 + 1e-6, "Alpha"),
            Err(PricingError::WearOutOfRange { .. })
        ));
        assert!(matches!(
            pc.base_price("Widget", 0.1 - 1e-6, "Beta"),
            Err(PricingError::WearOutOfRange { .. })
        ));
        assert!(pc.base_price("Widget", 0.1, "Beta").is_ok());
    }

    #[test]
    fn both_range_ends_resolve() {
        let pc = catalog();
        assert_eq!(
            pc.base_price("Knife", 0.06, "Beta"),
            Ok((90.0, Condition::FactoryNew))
        );
        // 0.15 is the MW/FT boundary and the item's maximum.
        assert_eq!(
            pc.base_price("Knife", 0.15, "Beta"),
            Ok((45.0, Condition::FieldTested))
        );
        assert!(pc.base_price("Knife", 0.15 + 5e-10, "Beta").is_ok());
        assert!(matches!(
            pc.base_price("Knife", 0.15 + 2e-9, "Beta"),
            Err(PricingError::WearOutOfRange { .. })
        ));
        assert!(matches!(
            pc.base_price("Knife", 0.06 - 2e-9, "Beta"),
            Err(PricingError::WearOutOfRange { .. })
        ));
    }

    #[test]
    fn duplicate_names_keep_the_first_definition() {
        let mut cat = Catalog::default();
        let mut col = Collection::default();
        col.tiers.insert(
            2,
            vec![
                item("Twin", 0.0, 0.5, &[(Condition::FactoryNew, 3.0)]),
                item("Broken", 0.7, 0.2, &[(Condition::FactoryNew, 1.0)]),
            ],
        );
        col.tiers.insert(
            3,
            vec![
                item("Twin", 0.2, 1.0, &[(Condition::FieldTested, 50.0)]),
                item("Broken", 0.0, 1.0, &[(Condition::FactoryNew, 8.0)]),
            ],
        );
        cat.collections.insert("Alpha".into(), col);
        let pc = PriceCatalog::new(cat);

        let twin = pc.item("Alpha", "Twin").unwrap();
        let meta = pc.metadata("Alpha", "Twin").unwrap();
        assert_eq!((twin.min_wear, twin.max_wear), (meta.min_wear, meta.max_wear));
        assert_eq!(meta.rarity, 2);
        assert_eq!(pc.base_price("Twin", 0.01, "Alpha"), Ok((3.0, Condition::FactoryNew)));

        // The invalid first definition is skipped, so the later one wins everywhere.
        let broken = pc.item("Alpha", "Broken").unwrap();
        assert_eq!(broken.max_wear, 1.0);
        assert_eq!(pc.metadata("Alpha", "Broken").unwrap().rarity, 3);
        assert_eq!(pc.base_price("Broken", 0.01, "Alpha"), Ok((8.0, Condition::FactoryNew)));
    }

    #[test]
    fn rescale_and_overrides_build_fresh_catalogs() {
        let pc = catalog();
        let scaled = pc.rescaled(7.0);
        assert_eq!(scaled.base_price("Widget", 0.03, "Alpha").unwrap().0, 70.0);
        assert_eq!(pc.base_price("Widget", 0.03, "Alpha").unwrap().0, 10.0);

        let overrides = vec![
            PriceOverride {
                collection: Some("Beta".into()),
                name: "Widget".into(),
                condition: Condition::FieldTested,
                price: 12.0,
            },
            PriceOverride {
                collection: None,
                name: "Widget".into(),
                condition: Condition::BattleScarred,
                price: 0.0,
            },
        ];
        let (fixed, applied) = pc.with_overrides(&overrides);
        assert_eq!(applied, 1);
        assert_eq!(
            fixed.base_price("Widget", 0.2, "Beta"),
            Ok((12.0, Condition::FieldTested))
        );
        assert!(pc.base_price("Widget", 0.2, "Beta").is_err());
    }

    #[test]
    fn metadata_and_tiers() {
        let pc = catalog();
        let meta = pc.metadata("Beta", "Widget").unwrap();
        assert_eq!(meta.rarity, 2);
        assert_eq!(meta.min_wear, 0.1);
        assert_eq!(pc.tier_items("Alpha", 2).len(), 1);
        assert!(pc.tier_items("Alpha", 3).is_empty());
        assert!(pc.tier_items("Gamma", 2).is_empty());
        assert_eq!(pc.item("Alpha", "Widget").unwrap().max_wear, 0.5);
        assert_eq!(pc.collections().count(), 2);
    }

    proptest! {
        #[test]
        fn unknown_items_never_resolve(wear in -1.0f64..2.0, name in "[a-z]{1,8}") {
            let pc = catalog();
            let unknown_name = format!("x{name}");
            let is_item_unknown = matches!(
                pc.base_price(&unknown_name, wear, "Alpha"),
                Err(PricingError::ItemUnknown { .. })
            );
            prop_assert!(is_item_unknown);
            let is_item_unknown = matches!(
                pc.base_price("Widget", wear, "Gamma"),
                Err(PricingError::ItemUnknown { .. })
            );
            prop_assert!(is_item_unknown);
        }
    }
}
