use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use tradeup_core::{Catalog, Collection, Condition, Item, PriceCatalog};
use tradeup_econ::{MarketConfig, TradeUpSimulator};
use tradeup_search::{GuidanceWeights, Optimizer, SearchConfig};

fn item(name: String, fn_price: f64) -> Item {
    let prices = Condition::ALL
        .iter()
        .enumerate()
        .map(|(i, c)| (*c, fn_price * (1.0 - 0.15 * i as f64)))
        .collect::<BTreeMap<_, _>>();
    Item {
        name,
        display_name: None,
        min_wear: 0.0,
        max_wear: 0.8,
        prices,
    }
}

fn build_catalog(n_collections: usize) -> PriceCatalog {
    let mut catalog = Catalog::default();
    for i in 0..n_collections {
        let base = 0.2 + i as f64 * 1.5;
        let mut col = Collection::default();
        col.tiers.insert(
            2,
            (0..3).map(|k| item(format!("C{i} In{k}"), base * (1.0 + k as f64))).collect(),
        );
        col.tiers.insert(
            3,
            (0..3).map(|k| item(format!("C{i} Out{k}"), base * 6.0 / (1.0 + k as f64))).collect(),
        );
        catalog.collections.insert(format!("C{i}"), col);
    }
    PriceCatalog::new(catalog)
}

fn bench_simulate(c: &mut Criterion) {
    let catalog = build_catalog(20);
    let market = MarketConfig::default();
    let config = SearchConfig::default();
    let weights = GuidanceWeights::uniform();
    let opt = Optimizer::new(&catalog, &market, &config, &weights);
    let pools = opt.candidate_pools(2);
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let population = opt.seed_population(&pools, &mut rng);
    let sim = TradeUpSimulator::new(&catalog);
    c.bench_function("simulate 100 recipes", |b| {
        b.iter(|| {
            for recipe in &population {
                black_box(sim.simulate(recipe, 2, market.price_modifier));
            }
        })
    });
}

fn bench_generation(c: &mut Criterion) {
    let catalog = build_catalog(20);
    let market = MarketConfig::default();
    let config = SearchConfig::default();
    let weights = GuidanceWeights::uniform();
    let opt = Optimizer::new(&catalog, &market, &config, &weights);
    let pools = opt.candidate_pools(2);
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let population = opt.seed_population(&pools, &mut rng);
    c.bench_function("one generation x 100", |b| {
        b.iter(|| {
            let scored = opt.evaluate_population(&population, 2);
            black_box(opt.next_generation(&scored, &pools, &mut rng))
        })
    });
}

criterion_group!(benches, bench_simulate, bench_generation);
criterion_main!(benches);
