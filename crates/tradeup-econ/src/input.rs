//! Items placed into a recipe at a concrete wear value.

use crate::premium::PremiumModel;
use serde::Serialize;
use tradeup_core::{Condition, Item, PriceCatalog, PricingError};

/// An item instantiated at a specific wear, with its resolved prices.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TradeInputItem {
    pub collection: String,
    pub name: String,
    pub min_wear: f64,
    pub max_wear: f64,
    pub wear: f64,
    /// Catalog price for the resolved condition; 0 when unpriced.
    pub base_price: f64,
    /// Premium-adjusted price; `f64::INFINITY` when unpriced.
    pub price: f64,
    /// Resolved condition; `None` when the price lookup failed.
    pub condition: Option<Condition>,
    /// Why the lookup failed, if it did.
    #[serde(skip)]
    pub pricing_error: Option<PricingError>,
}

impl TradeInputItem {
    /// Place `item` of `collection` at `wear` (clamped to the item's range).
    pub fn resolve(
        catalog: &PriceCatalog,
        premium: &PremiumModel,
        collection: &str,
        item: &Item,
        wear: f64,
    ) -> Self {
        let mut input = TradeInputItem {
            collection: collection.to_string(),
            name: item.name.clone(),
            min_wear: item.min_wear,
            max_wear: item.max_wear,
            wear: item.min_wear,
            base_price: 0.0,
            price: f64::INFINITY,
            condition: None,
            pricing_error: None,
        };
        input.set_wear(catalog, premium, wear);
        input
    }

    /// Move the item to a new wear and re-resolve its price. An unpriceable
    /// wear leaves the item in the unpriced state.
    pub fn set_wear(&mut self, catalog: &PriceCatalog, premium: &PremiumModel, wear: f64) {
        let wear = wear.clamp(self.min_wear, self.max_wear);
        self.wear = wear;
        match catalog.base_price(&self.name, wear, &self.collection) {
            Ok((base, condition)) => {
                self.base_price = base;
                self.condition = Some(condition);
                self.price = premium.adjusted_price(base, wear, condition);
                self.pricing_error = None;
            }
            Err(e) => {
                self.base_price = 0.0;
                self.condition = None;
                self.price = f64::INFINITY;
                self.pricing_error = Some(e);
            }
        }
    }

    pub fn is_priced(&self) -> bool {
        self.price.is_finite()
    }

    /// Relative position of the wear inside the item's own range, in [0,1].
    pub fn wear_fraction(&self) -> f64 {
        let span = self.max_wear - self.min_wear;
        if span <= 1e-9 {
            return 0.0;
        }
        ((self.wear - self.min_wear) / span).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tradeup_core::{Catalog, Collection};

    fn setup() -> (PriceCatalog, Item) {
        let item = Item {
            name: "Widget".into(),
            display_name: None,
            min_wear: 0.02,
            max_wear: 0.5,
            prices: BTreeMap::from([(Condition::FactoryNew, 10.0)]),
        };
        let mut col = Collection::default();
        col.tiers.insert(2, vec![item.clone()]);
        let mut cat = Catalog::default();
        cat.collections.insert("Alpha".into(), col);
        (PriceCatalog::new(cat), item)
    }

    #[test]
    fn resolve_clamps_and_prices() {
        let (pc, item) = setup();
        let premium = PremiumModel {
            premium_scale: 0.0,
            ..PremiumModel::default()
        };
        let input = TradeInputItem::resolve(&pc, &premium, "Alpha", &item, 0.0);
        assert_eq!(input.wear, 0.02);
        assert_eq!(input.condition, Some(Condition::FactoryNew));
        assert_eq!(input.price, 10.0);
        assert_eq!(input.wear_fraction(), 0.0);
    }

    #[test]
    fn missing_condition_price_is_unpriced() {
        let (pc, item) = setup();
        let premium = PremiumModel::default();
        let mut input = TradeInputItem::resolve(&pc, &premium, "Alpha", &item, 0.03);
        assert!(input.is_priced());
        input.set_wear(&pc, &premium, 0.2);
        assert!(!input.is_priced());
        assert_eq!(input.wear, 0.2);
        assert_eq!(input.condition, None);
        assert_eq!(
            input.pricing_error,
            Some(PricingError::PriceMissing(Condition::FieldTested))
        );
        assert!((input.wear_fraction() - 0.375).abs() < 1e-12);
    }
}
