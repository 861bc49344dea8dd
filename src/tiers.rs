//! Weight-tier packing of a single container.
//!
//! Items are loaded bottom-up in three tiers: heavy non-fragile items first,
//! then the lighter non-fragile ones, then fragile items kept towards the
//! door. Fragile items that do not fit near the door get one more pass
//! anywhere in the container.

use std::cmp::Ordering;

use tracing::debug;

use crate::model::{Container, Item, Placement};
use crate::optimizer::PackingConfig;
use crate::search::{SearchParams, shelf_pack};

/// Items of one container split into loading tiers.
///
/// Every tier is sorted heaviest first; equal weights keep their input order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WeightTiers {
    pub heavy: Vec<Item>,
    pub medium: Vec<Item>,
    pub fragile: Vec<Item>,
}

/// Result of packing one container.
#[derive(Clone, Debug, Default)]
pub struct ContainerPacking {
    /// All placements, `placement_order` running 1..=n.
    pub placements: Vec<Placement>,
    /// Items that did not fit into this container.
    pub leftover: Vec<Item>,
}

fn sort_heaviest_first(items: &mut [Item]) {
    items.sort_by(|a, b| {
        b.weight_kg
            .partial_cmp(&a.weight_kg)
            .unwrap_or(Ordering::Equal)
    });
}

/// Upper median: the element at index `len / 2` of the ascending weights.
fn median_weight(items: &[Item]) -> Option<f64> {
    if items.is_empty() {
        return None;
    }
    let mut weights: Vec<f64> = items.iter().map(|i| i.weight_kg).collect();
    weights.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    Some(weights[weights.len() / 2])
}

/// Splits items into heavy, medium and fragile tiers.
pub fn split_tiers(items: &[Item]) -> WeightTiers {
    let (mut fragile, mut non_fragile): (Vec<Item>, Vec<Item>) =
        items.iter().cloned().partition(|i| i.fragile);
    sort_heaviest_first(&mut fragile);
    sort_heaviest_first(&mut non_fragile);

    let (heavy, medium) = match median_weight(&non_fragile) {
        Some(median) => non_fragile.into_iter().partition(|i| i.weight_kg >= median),
        None => (Vec::new(), Vec::new()),
    };

    WeightTiers {
        heavy,
        medium,
        fragile,
    }
}

/// Packs `items` into `container` tier by tier.
pub fn pack_container(container: &Container, items: &[Item], config: &PackingConfig) -> ContainerPacking {
    let tiers = split_tiers(items);
    debug!(
        container = %container.id,
        heavy = tiers.heavy.len(),
        medium = tiers.medium.len(),
        fragile = tiers.fragile.len(),
        "packing container by weight tiers"
    );

    let mut placements: Vec<Placement> = Vec::new();
    let mut leftover: Vec<Item> = Vec::new();
    let mut used_height = 0.0;

    for tier in [&tiers.heavy, &tiers.medium] {
        if tier.is_empty() {
            continue;
        }
        let params = SearchParams::new(used_height, placements.len() + 1);
        let outcome = shelf_pack(tier, container, &placements, &params, config);
        used_height = outcome.used_height;
        placements.extend(outcome.placements);
        leftover.extend(outcome.leftover);
    }

    if !tiers.fragile.is_empty() {
        let params = SearchParams::new(used_height, placements.len() + 1).prefer_front(true);
        let near_door = shelf_pack(&tiers.fragile, container, &placements, &params, config);
        placements.extend(near_door.placements);

        if near_door.leftover.is_empty() {
            return ContainerPacking {
                placements,
                leftover,
            };
        }

        debug!(
            container = %container.id,
            retried = near_door.leftover.len(),
            "retrying fragile items without door preference"
        );
        let params = SearchParams::new(used_height, placements.len() + 1);
        let anywhere = shelf_pack(&near_door.leftover, container, &placements, &params, config);
        placements.extend(anywhere.placements);
        leftover.extend(anywhere.leftover);
    }

    ContainerPacking {
        placements,
        leftover,
    }
}
