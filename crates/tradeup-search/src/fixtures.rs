//! Small catalogs shared by the unit tests.

use std::collections::BTreeMap;
use tradeup_core::{Catalog, Collection, Condition, Item, PriceCatalog};

pub(crate) fn item(name: &str, min: f64, max: f64, fn_price: f64) -> Item {
    let prices = BTreeMap::from([
        (Condition::FactoryNew, fn_price),
        (Condition::MinimalWear, fn_price * 0.7),
        (Condition::FieldTested, fn_price * 0.5),
        (Condition::WellWorn, fn_price * 0.4),
        (Condition::BattleScarred, fn_price * 0.3),
    ]);
    Item {
        name: name.to_string(),
        display_name: None,
        min_wear: min,
        max_wear: max,
        prices,
    }
}

/// Four collections with tier 2 inputs and tier 3 outputs spread across the
/// price tiers, plus one collection without a tier 3.
pub(crate) fn catalog() -> PriceCatalog {
    let specs: [(&str, f64, f64); 4] = [
        ("Alpha", 0.3, 20.0),
        ("Beta", 2.0, 35.0),
        ("Gamma", 8.0, 60.0),
        ("Delta", 40.0, 150.0),
    ];
    let mut cat = Catalog::default();
    for (col, input_price, output_price) in specs {
        let mut c = Collection::default();
        c.tiers.insert(
            2,
            vec![
                item(&format!("{col} Input"), 0.0, 0.8, input_price),
                item(&format!("{col} Spare"), 0.06, 0.8, input_price * 1.5),
            ],
        );
        c.tiers.insert(
            3,
            vec![
                item(&format!("{col} Prize"), 0.0, 0.7, output_price),
                item(&format!("{col} Dud"), 0.0, 1.0, output_price * 0.2),
            ],
        );
        cat.collections.insert(col.to_string(), c);
    }
    let mut orphan = Collection::default();
    orphan.tiers.insert(2, vec![item("Orphan Input", 0.0, 1.0, 1.0)]);
    cat.collections.insert("Orphan".to_string(), orphan);
    PriceCatalog::new(cat)
}
