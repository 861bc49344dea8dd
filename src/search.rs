//! Grid-based placement search ("shelf packing") for one batch of items.
//!
//! For each item, in input order, every grid cell of the container floor is
//! tried. The item drops onto the highest box that fully qualifies as
//! support (see [`crate::support`]) or onto the floor, is rejected if it
//! pokes through the ceiling or collides, and the surviving candidates are
//! scored. The best one is committed before the next item is considered.

use tracing::{debug, trace, warn};

use crate::geometry::collides_with_any;
use crate::model::{Container, Item, Placement};
use crate::optimizer::PackingConfig;
use crate::support::{Footprint, support_height};
use crate::types::{BoundingBox, Dimensional, Vec3};

/// Parameters of one search pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchParams {
    /// Height reported back when nothing is placed. Does not restrict candidates.
    pub start_z: f64,
    /// Placement order assigned to the first committed item.
    pub start_order: usize,
    /// Ceiling for this pass; `None` means the container height.
    pub max_height: Option<f64>,
    /// Penalise positions in the rear part of the container.
    pub prefer_front: bool,
}

impl SearchParams {
    pub fn new(start_z: f64, start_order: usize) -> Self {
        Self {
            start_z,
            start_order,
            max_height: None,
            prefer_front: false,
        }
    }

    pub fn with_max_height(mut self, max_height: f64) -> Self {
        self.max_height = Some(max_height);
        self
    }

    pub fn prefer_front(mut self, prefer_front: bool) -> Self {
        self.prefer_front = prefer_front;
        self
    }
}

/// Result of one search pass.
#[derive(Clone, Debug, Default)]
pub struct ShelfOutcome {
    /// Placements committed by this pass, in placement order.
    pub placements: Vec<Placement>,
    /// Highest top surface among this pass's placements, or `start_z`.
    pub used_height: f64,
    /// Items for which no valid position existed, in input order.
    pub leftover: Vec<Item>,
}

/// Places `items` into `container` on top of the already committed `existing`
/// placements.
///
/// Deterministic: the same inputs (including the order of `existing`) always
/// yield the same outcome.
pub fn shelf_pack(
    items: &[Item],
    container: &Container,
    existing: &[Placement],
    params: &SearchParams,
    config: &PackingConfig,
) -> ShelfOutcome {
    let max_height = params.max_height.unwrap_or(container.height_mm);
    let mut committed: Vec<Placement> = existing.to_vec();
    let mut loaded_weight: f64 = existing.iter().map(|p| p.weight_kg).sum();
    let mut order = params.start_order;
    let mut leftover = Vec::new();

    for item in items {
        if config.enforce_weight_limit
            && loaded_weight + item.weight_kg > container.max_weight_kg + config.general_epsilon
        {
            debug!(
                container = %container.id,
                item = %item.name,
                loaded_weight,
                "item would exceed the weight limit"
            );
            leftover.push(item.clone());
            continue;
        }

        match find_best_position(item, container, &committed, max_height, params.prefer_front, config) {
            Some(position) => {
                trace!(container = %container.id, item = %item.name, ?position, order, "item placed");
                committed.push(Placement::new(item, position, order));
                loaded_weight += item.weight_kg;
                order += 1;
            }
            None => {
                debug!(container = %container.id, item = %item.name, "no valid position");
                leftover.push(item.clone());
            }
        }
    }

    let placements = committed.split_off(existing.len());
    let used_height = placements
        .iter()
        .map(Placement::top_z)
        .reduce(f64::max)
        .unwrap_or(params.start_z);

    ShelfOutcome {
        placements,
        used_height,
        leftover,
    }
}

/// Score of a candidate position. Higher is better.
#[derive(Clone, Copy, Debug, PartialEq)]
struct PlacementScore {
    value: f64,
}

impl PlacementScore {
    fn evaluate(x: f64, z: f64, prefer_front: bool, container: &Container, config: &PackingConfig) -> Self {
        let stacked = z > 0.0;
        let stacking_bonus = if stacked { config.stacking_bonus } else { 0.0 };
        let rear_penalty = if prefer_front && x > container.length_mm * config.front_zone_ratio {
            config.rear_penalty
        } else {
            0.0
        };
        Self {
            value: stacking_bonus - rear_penalty - config.height_penalty * z,
        }
    }
}

/// Finds the best position for one item or `None` if no grid cell is valid.
fn find_best_position(
    item: &Item,
    container: &Container,
    committed: &[Placement],
    max_height: f64,
    prefer_front: bool,
    config: &PackingConfig,
) -> Option<(f64, f64, f64)> {
    let step_x = config.grid_step.min(item.length_mm).max(config.min_grid_step);
    let step_y = config.grid_step.min(item.width_mm).max(config.min_grid_step);
    let nx = axis_position_count(container.length_mm, item.length_mm, step_x, config.general_epsilon);
    let ny = axis_position_count(container.width_mm, item.width_mm, step_y, config.general_epsilon);
    if nx.saturating_mul(ny) > config.max_candidates {
        warn!(
            container = %container.id,
            item = %item.name,
            candidates = nx.saturating_mul(ny),
            max = config.max_candidates,
            "candidate grid too large, item left unplaced"
        );
        return None;
    }
    let xs = axis_positions(container.length_mm, item.length_mm, step_x, config.general_epsilon);
    let ys = axis_positions(container.width_mm, item.width_mm, step_y, config.general_epsilon);

    let mut best: Option<((f64, f64, f64), PlacementScore)> = None;

    for &x in &xs {
        for &y in &ys {
            let footprint = Footprint::new(x, y, item.length_mm, item.width_mm);
            let z = support_height(&footprint, committed, config.support_ratio);

            if z + item.height_mm > max_height + config.general_epsilon {
                continue;
            }

            let candidate = BoundingBox::from_position_and_dims(Vec3::new(x, y, z), item.dimensions());
            if collides_with_any(&candidate, committed) {
                continue;
            }

            let score = PlacementScore::evaluate(x, z, prefer_front, container, config);
            update_best(&mut best, (x, y, z), score, config);
        }
    }

    best.map(|(position, _)| position)
}

/// Keeps the earliest enumerated candidate on ties.
fn update_best(
    best: &mut Option<((f64, f64, f64), PlacementScore)>,
    position: (f64, f64, f64),
    score: PlacementScore,
    config: &PackingConfig,
) {
    match best {
        None => *best = Some((position, score)),
        Some((_, current)) => {
            if score.value > current.value + config.general_epsilon {
                *best = Some((position, score));
            }
        }
    }
}

/// Number of grid coordinates [`axis_positions`] yields for the same arguments.
fn axis_position_count(container_len: f64, object_len: f64, step: f64, epsilon: f64) -> usize {
    let max_pos = container_len - object_len;
    if max_pos < -epsilon || step.is_nan() || step <= 0.0 {
        return 0;
    }
    // Saturating float to int cast; an absurd count is caught by the candidate cap.
    ((max_pos.max(0.0) + epsilon) / step).floor() as usize + 1
}

/// Grid coordinates along one axis: `0, step, 2·step, …` while the object
/// still fits. Empty when the object is longer than the container.
fn axis_positions(container_len: f64, object_len: f64, step: f64, epsilon: f64) -> Vec<f64> {
    let count = axis_position_count(container_len, object_len, step, epsilon);
    let max_pos = (container_len - object_len).max(0.0);
    (0..count).map(|index| (step * index as f64).min(max_pos)).collect()
}
