//! Property-based tests for the packing pipeline.
//!
//! Random orders and container catalogs are packed and the finished layouts
//! are checked for the physical invariants every run must uphold.

use std::collections::HashSet;

use proptest::prelude::*;
use stowage::geometry::intersects;
use stowage::model::{Commodity, Container, Item, expand_commodities};
use stowage::optimizer::{PackingConfig, PackingRun, pack_with_config};
use stowage::support::{Footprint, support_ratio};

const EPS: f64 = 1e-6;

// =============================================================================
// Strategies
// =============================================================================

fn arb_dim(min: u32, max: u32) -> impl Strategy<Value = f64> {
    (min..=max).prop_map(|steps| f64::from(steps) * 50.0)
}

fn arb_items(max_items: usize) -> impl Strategy<Value = Vec<Item>> {
    prop::collection::vec(
        (arb_dim(2, 16), arb_dim(2, 16), arb_dim(2, 16), 0.0..60.0f64, any::<bool>()),
        0..=max_items,
    )
    .prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(idx, (l, w, h, weight, fragile))| {
                Item::new(idx + 1, format!("item-{}", idx + 1), (l, w, h), weight, fragile)
                    .expect("generated item is valid")
            })
            .collect()
    })
}

fn arb_containers() -> impl Strategy<Value = Vec<Container>> {
    prop::collection::vec(
        (arb_dim(8, 30), arb_dim(8, 24), arb_dim(8, 24), 50.0..400.0f64),
        1..=3,
    )
    .prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(idx, (l, w, h, max_weight))| {
                Container::new(format!("c{}", idx + 1), (l, w, h), max_weight)
                    .expect("generated container is valid")
            })
            .collect()
    })
}

fn arb_order() -> impl Strategy<Value = Vec<Commodity>> {
    let names = prop::sample::select(vec!["Chair", "Chair#1", "Chair#2", "Lamp", "Lamp#1#1", "Lamp#1"]);
    prop::collection::vec((names, 0..4u32), 0..8).prop_map(|lines| {
        lines
            .into_iter()
            .map(|(name, quantity)| {
                Commodity::new(name, (100.0, 100.0, 100.0), 1.0).with_quantity(quantity)
            })
            .collect()
    })
}

fn run(items: Vec<Item>, containers: Vec<Container>) -> PackingRun {
    pack_with_config(items, containers, PackingConfig::default()).expect("inputs are valid")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn placements_never_overlap(items in arb_items(10), containers in arb_containers()) {
        let result = run(items, containers);
        for load in &result.containers {
            for (i, a) in load.placements.iter().enumerate() {
                for b in &load.placements[i + 1..] {
                    prop_assert!(!intersects(a, b), "{} overlaps {}", a.item_name, b.item_name);
                }
            }
        }
    }

    #[test]
    fn placements_stay_inside_their_container(items in arb_items(10), containers in arb_containers()) {
        let result = run(items, containers);
        for load in &result.containers {
            let c = &load.container;
            for p in &load.placements {
                let (x, y, z) = p.position_mm;
                let (l, w, h) = p.dimensions_mm;
                prop_assert!(x >= 0.0 && y >= 0.0 && z >= 0.0);
                prop_assert!(x + l <= c.length_mm + EPS);
                prop_assert!(y + w <= c.width_mm + EPS);
                prop_assert!(z + h <= c.height_mm + EPS);
            }
        }
    }

    #[test]
    fn raised_items_rest_on_an_earlier_supporting_box(items in arb_items(10), containers in arb_containers()) {
        let config = PackingConfig::default();
        let result = run(items, containers);
        for load in &result.containers {
            for p in &load.placements {
                let (x, y, z) = p.position_mm;
                if z <= EPS {
                    continue;
                }
                let footprint = Footprint::new(x, y, p.dimensions_mm.0, p.dimensions_mm.1);
                let supported = load.placements.iter().any(|base| {
                    base.placement_order < p.placement_order
                        && (base.top_z() - z).abs() <= EPS
                        && support_ratio(&footprint, base)
                            .is_some_and(|ratio| ratio >= config.support_ratio)
                });
                prop_assert!(supported, "{} floats at z = {}", p.item_name, z);
            }
        }
    }

    #[test]
    fn every_item_is_accounted_for_once(items in arb_items(12), containers in arb_containers()) {
        let expected: HashSet<usize> = items.iter().map(|i| i.id).collect();
        let result = run(items, containers);

        let mut seen = HashSet::new();
        for load in &result.containers {
            prop_assert!(!load.placements.is_empty());
            for p in &load.placements {
                prop_assert!(seen.insert(p.item_id), "item {} placed twice", p.item_id);
            }
            let orders: Vec<usize> = load.placements.iter().map(|p| p.placement_order).collect();
            prop_assert_eq!(orders, (1..=load.placements.len()).collect::<Vec<_>>());
        }
        for item in &result.unplaced {
            prop_assert!(seen.insert(item.id), "item {} both placed and unplaced", item.id);
        }
        prop_assert_eq!(seen, expected);
        prop_assert_eq!(
            result.summary.placed_items + result.summary.unplaced_items,
            result.summary.total_items
        );
    }

    #[test]
    fn expanded_item_names_are_unique(order in arb_order()) {
        let items = expand_commodities(&order).expect("order lines are valid");
        let expected: u32 = order.iter().map(|c| c.quantity).sum();
        prop_assert_eq!(items.len(), expected as usize);

        let names: HashSet<&str> = items.iter().map(|i| i.name.as_str()).collect();
        prop_assert_eq!(names.len(), items.len(), "{:?}", items.iter().map(|i| &i.name).collect::<Vec<_>>());
    }

    #[test]
    fn weight_capacity_is_respected(items in arb_items(10), containers in arb_containers()) {
        let result = run(items, containers);
        for load in &result.containers {
            prop_assert!(load.total_weight_kg <= load.container.max_weight_kg + EPS);
        }
        prop_assert!(result.validation_warnings.is_empty(), "{:?}", result.validation_warnings);
    }

    #[test]
    fn packing_is_deterministic(items in arb_items(8), containers in arb_containers()) {
        let first = run(items.clone(), containers.clone());
        let second = run(items, containers);
        prop_assert_eq!(first.containers.len(), second.containers.len());
        for (a, b) in first.containers.iter().zip(&second.containers) {
            prop_assert_eq!(&a.container.id, &b.container.id);
            prop_assert_eq!(&a.placements, &b.placements);
        }
        prop_assert_eq!(first.unplaced_names(), second.unplaced_names());
    }
}
