//! Multi-container allocation.
//!
//! Containers are tried smallest volume first. Each container is packed with
//! the weight-tier packer, checked by the validator, and whatever does not
//! fit is carried over to the next container. Items still left when the
//! catalog is exhausted are reported as unplaced; that is a normal outcome,
//! not an error.

use std::cmp::Ordering;
use std::ops::ControlFlow;
use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use utoipa::ToSchema;

use crate::model::{Commodity, Container, Item, Placement, ValidationError, expand_commodities};
use crate::tiers::pack_container;
use crate::types::{Dimensional, MM3_PER_M3};
use crate::validator::validate_layout;

/// Tuning of the placement heuristics.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PackingConfig {
    /// Upper bound for the candidate grid step in mm (the item's own extent is used when smaller)
    pub grid_step: f64,
    /// Lower bound for the grid step in mm, so tiny items do not explode the grid
    pub min_grid_step: f64,
    /// Grid cells tried per item at most; an item needing more is left unplaced
    pub max_candidates: usize,
    /// Share of a footprint a single box must carry before an item may rest on it (0.0 to 1.0)
    pub support_ratio: f64,
    /// Share of the container length, measured from the door, where fragile items go unpenalised
    pub front_zone_ratio: f64,
    /// Score bonus for a stacked position
    pub stacking_bonus: f64,
    /// Score penalty for a fragile item beyond the front zone
    pub rear_penalty: f64,
    /// Score penalty per mm of height
    pub height_penalty: f64,
    /// General numerical tolerance
    pub general_epsilon: f64,
    /// Refuse items that would push a container above `max_weight_kg`
    pub enforce_weight_limit: bool,
}

impl PackingConfig {
    pub const DEFAULT_GRID_STEP: f64 = 200.0;
    pub const DEFAULT_MIN_GRID_STEP: f64 = 1.0;
    pub const DEFAULT_MAX_CANDIDATES: usize = 4_000_000;
    pub const DEFAULT_SUPPORT_RATIO: f64 = 0.80;
    pub const DEFAULT_FRONT_ZONE_RATIO: f64 = 0.6;
    pub const DEFAULT_STACKING_BONUS: f64 = 100.0;
    pub const DEFAULT_REAR_PENALTY: f64 = 50.0;
    pub const DEFAULT_HEIGHT_PENALTY: f64 = 0.001;
    pub const DEFAULT_GENERAL_EPSILON: f64 = 1e-6;
    pub const DEFAULT_ENFORCE_WEIGHT_LIMIT: bool = true;

    pub fn builder() -> PackingConfigBuilder {
        PackingConfigBuilder::default()
    }
}

impl Default for PackingConfig {
    fn default() -> Self {
        Self {
            grid_step: Self::DEFAULT_GRID_STEP,
            min_grid_step: Self::DEFAULT_MIN_GRID_STEP,
            max_candidates: Self::DEFAULT_MAX_CANDIDATES,
            support_ratio: Self::DEFAULT_SUPPORT_RATIO,
            front_zone_ratio: Self::DEFAULT_FRONT_ZONE_RATIO,
            stacking_bonus: Self::DEFAULT_STACKING_BONUS,
            rear_penalty: Self::DEFAULT_REAR_PENALTY,
            height_penalty: Self::DEFAULT_HEIGHT_PENALTY,
            general_epsilon: Self::DEFAULT_GENERAL_EPSILON,
            enforce_weight_limit: Self::DEFAULT_ENFORCE_WEIGHT_LIMIT,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PackingConfigBuilder {
    config: PackingConfig,
}

impl PackingConfigBuilder {
    pub fn grid_step(mut self, step: f64) -> Self {
        self.config.grid_step = step;
        self
    }

    pub fn min_grid_step(mut self, step: f64) -> Self {
        self.config.min_grid_step = step;
        self
    }

    pub fn max_candidates(mut self, max: usize) -> Self {
        self.config.max_candidates = max;
        self
    }

    pub fn support_ratio(mut self, ratio: f64) -> Self {
        self.config.support_ratio = ratio;
        self
    }

    pub fn front_zone_ratio(mut self, ratio: f64) -> Self {
        self.config.front_zone_ratio = ratio;
        self
    }

    pub fn general_epsilon(mut self, epsilon: f64) -> Self {
        self.config.general_epsilon = epsilon;
        self
    }

    pub fn enforce_weight_limit(mut self, enforce: bool) -> Self {
        self.config.enforce_weight_limit = enforce;
        self
    }

    /// Finishes the configuration. Values outside their valid range are
    /// replaced by the defaults with a warning.
    pub fn build(self) -> PackingConfig {
        let mut config = self.config;
        let defaults = PackingConfig::default();

        let positive = |value: f64| value.is_finite() && value > 0.0;
        let ratio = |value: f64| (0.0..=1.0).contains(&value);

        if !positive(config.grid_step) {
            warn!(value = config.grid_step, "grid_step must be greater than 0, using default");
            config.grid_step = defaults.grid_step;
        }
        if !positive(config.min_grid_step) {
            warn!(value = config.min_grid_step, "min_grid_step must be greater than 0, using default");
            config.min_grid_step = defaults.min_grid_step;
        }
        if config.min_grid_step > config.grid_step {
            warn!(
                min_grid_step = config.min_grid_step,
                grid_step = config.grid_step,
                "min_grid_step exceeds grid_step, using grid_step"
            );
            config.min_grid_step = config.grid_step;
        }
        if config.max_candidates == 0 {
            warn!("max_candidates must be at least 1, using default");
            config.max_candidates = defaults.max_candidates;
        }
        if !ratio(config.support_ratio) {
            warn!(value = config.support_ratio, "support_ratio must be between 0 and 1, using default");
            config.support_ratio = defaults.support_ratio;
        }
        if !ratio(config.front_zone_ratio) {
            warn!(
                value = config.front_zone_ratio,
                "front_zone_ratio must be between 0 and 1, using default"
            );
            config.front_zone_ratio = defaults.front_zone_ratio;
        }
        if !positive(config.general_epsilon) {
            warn!(value = config.general_epsilon, "general_epsilon must be greater than 0, using default");
            config.general_epsilon = defaults.general_epsilon;
        }
        config
    }
}

/// Precondition failures. Raised before any packing starts.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum PackingError {
    #[error("at least one container must be supplied")]
    EmptyCatalog,
    #[error("invalid container: {0}")]
    InvalidContainer(ValidationError),
    #[error("invalid item: {0}")]
    InvalidItem(ValidationError),
    #[error("item id {0} is used more than once")]
    DuplicateItemId(usize),
    #[error("item name `{0}` is used more than once")]
    DuplicateItemName(String),
}

/// One container of the result with everything loaded into it.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct ContainerLoad {
    pub container: Container,
    pub placements: Vec<Placement>,
    pub total_weight_kg: f64,
    pub utilization_percent: f64,
    /// Validator findings for this container; empty for a sound layout.
    pub warnings: Vec<String>,
}

impl ContainerLoad {
    fn new(container: Container, placements: Vec<Placement>, warnings: Vec<String>) -> Self {
        let total_weight_kg = placements.iter().map(|p| p.weight_kg).sum();
        let used_volume: f64 = placements
            .iter()
            .map(|p| p.dimensions_mm.0 * p.dimensions_mm.1 * p.dimensions_mm.2)
            .sum();
        let utilization_percent = (used_volume / container.volume()) * 100.0;
        Self {
            container,
            placements,
            total_weight_kg,
            utilization_percent,
            warnings,
        }
    }
}

/// Totals over a whole run.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct PackingSummary {
    pub total_items: usize,
    pub total_weight_kg: f64,
    pub total_volume_m3: f64,
    pub containers_tried: usize,
    pub containers_used: usize,
    pub placed_items: usize,
    pub unplaced_items: usize,
    pub note: String,
}

/// Result of a packing run.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct PackingRun {
    /// Containers that received at least one item, in the order they were tried.
    pub containers: Vec<ContainerLoad>,
    /// Items that fit in none of the containers.
    pub unplaced: Vec<Item>,
    /// All validator findings, prefixed with the container id.
    pub validation_warnings: Vec<String>,
    pub summary: PackingSummary,
}

impl PackingRun {
    pub fn is_complete(&self) -> bool {
        self.unplaced.is_empty()
    }

    pub fn container_count(&self) -> usize {
        self.containers.len()
    }

    pub fn unplaced_count(&self) -> usize {
        self.unplaced.len()
    }

    pub fn unplaced_names(&self) -> Vec<String> {
        self.unplaced.iter().map(|i| i.name.clone()).collect()
    }

    pub fn total_packed_weight(&self) -> f64 {
        self.containers.iter().map(|c| c.total_weight_kg).sum()
    }

    pub fn average_utilization(&self) -> f64 {
        if self.containers.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.containers.iter().map(|c| c.utilization_percent).sum();
        sum / self.containers.len() as f64
    }
}

/// Events emitted while packing, for live progress streams.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type")]
pub enum PackEvent {
    /// A container is about to be packed.
    ContainerStarted {
        container_id: String,
        dims_mm: (f64, f64, f64),
        max_weight_kg: f64,
        candidate_items: usize,
    },
    /// An item was placed.
    ItemPlaced {
        container_id: String,
        placement: Placement,
    },
    /// Items that did not fit move on to the next container.
    ItemsCarriedOver { container_id: String, count: usize },
    /// The validator flagged the finished layout.
    ValidationWarning { container_id: String, message: String },
    /// Packing finished.
    Finished {
        containers_used: usize,
        unplaced: usize,
    },
}

/// Packs items with the default configuration.
pub fn pack(items: Vec<Item>, containers: Vec<Container>) -> Result<PackingRun, PackingError> {
    pack_with_config(items, containers, PackingConfig::default())
}

pub fn pack_with_config(
    items: Vec<Item>,
    containers: Vec<Container>,
    config: PackingConfig,
) -> Result<PackingRun, PackingError> {
    pack_with_progress(items, containers, config, |_| {})
}

/// Expands order lines by quantity and packs them.
pub fn pack_commodities(
    commodities: &[Commodity],
    containers: Vec<Container>,
    config: PackingConfig,
) -> Result<PackingRun, PackingError> {
    let items = expand_commodities(commodities).map_err(PackingError::InvalidItem)?;
    pack_with_config(items, containers, config)
}

fn check_inputs(items: &[Item], containers: &[Container]) -> Result<(), PackingError> {
    if containers.is_empty() {
        return Err(PackingError::EmptyCatalog);
    }
    for container in containers {
        container.validate().map_err(PackingError::InvalidContainer)?;
    }
    let mut ids = HashSet::with_capacity(items.len());
    let mut names = HashSet::with_capacity(items.len());
    for item in items {
        Item::new(item.id, item.name.as_str(), item.dims(), item.weight_kg, item.fragile)
            .map_err(PackingError::InvalidItem)?;
        if !ids.insert(item.id) {
            return Err(PackingError::DuplicateItemId(item.id));
        }
        if !names.insert(item.name.as_str()) {
            return Err(PackingError::DuplicateItemName(item.name.clone()));
        }
    }
    Ok(())
}

/// Packs items across the catalog, reporting each step to `on_event`.
pub fn pack_with_progress(
    items: Vec<Item>,
    containers: Vec<Container>,
    config: PackingConfig,
    mut on_event: impl FnMut(&PackEvent),
) -> Result<PackingRun, PackingError> {
    pack_until_stopped(items, containers, config, |event| {
        on_event(event);
        ControlFlow::Continue(())
    })
}

/// Like [`pack_with_progress`], but `on_event` may break to stop the run.
///
/// After a break no further event is delivered and no further container is
/// packed. Everything not yet loaded is reported as unplaced.
pub fn pack_until_stopped(
    items: Vec<Item>,
    containers: Vec<Container>,
    config: PackingConfig,
    mut on_event: impl FnMut(&PackEvent) -> ControlFlow<()>,
) -> Result<PackingRun, PackingError> {
    check_inputs(&items, &containers)?;

    let total_items = items.len();
    let total_weight_kg: f64 = items.iter().map(|i| i.weight_kg).sum();
    let total_volume_m3 = items.iter().map(|i| i.volume()).sum::<f64>() / MM3_PER_M3;

    // Smallest container first; stable, so equal volumes keep catalog order.
    let mut catalog = containers;
    catalog.sort_by(|a, b| {
        a.volume()
            .partial_cmp(&b.volume())
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                a.max_weight_kg
                    .partial_cmp(&b.max_weight_kg)
                    .unwrap_or(Ordering::Equal)
            })
    });

    let mut loads: Vec<ContainerLoad> = Vec::new();
    let mut validation_warnings: Vec<String> = Vec::new();
    let mut current = items;
    let mut containers_tried = 0;
    let mut stopped = false;
    let mut emit = |event: PackEvent, stopped: &mut bool| {
        if !*stopped {
            *stopped = on_event(&event).is_break();
        }
    };

    for container in catalog {
        if current.is_empty() || stopped {
            break;
        }
        containers_tried += 1;

        emit(
            PackEvent::ContainerStarted {
                container_id: container.id.clone(),
                dims_mm: container.dims(),
                max_weight_kg: container.max_weight_kg,
                candidate_items: current.len(),
            },
            &mut stopped,
        );
        if stopped {
            break;
        }

        let packing = pack_container(&container, &current, &config);
        for placement in &packing.placements {
            emit(
                PackEvent::ItemPlaced {
                    container_id: container.id.clone(),
                    placement: placement.clone(),
                },
                &mut stopped,
            );
        }

        let warnings = validate_layout(&container, &packing.placements, config.general_epsilon);
        for message in &warnings {
            warn!(container = %container.id, %message, "layout validation failed");
            emit(
                PackEvent::ValidationWarning {
                    container_id: container.id.clone(),
                    message: message.clone(),
                },
                &mut stopped,
            );
            validation_warnings.push(format!("{}: {}", container.id, message));
        }

        debug!(
            container = %container.id,
            placed = packing.placements.len(),
            leftover = packing.leftover.len(),
            "container packed"
        );
        if !packing.leftover.is_empty() {
            emit(
                PackEvent::ItemsCarriedOver {
                    container_id: container.id.clone(),
                    count: packing.leftover.len(),
                },
                &mut stopped,
            );
        }

        if !packing.placements.is_empty() {
            loads.push(ContainerLoad::new(container, packing.placements, warnings));
        }
        current = packing.leftover;
    }

    let unplaced = current;
    let placed_items = total_items - unplaced.len();
    let note = if unplaced.is_empty() {
        "All items successfully packed across containers."
    } else {
        "Some items could not be placed due to space or weight limits."
    };

    if stopped {
        info!(
            items = total_items,
            containers_used = loads.len(),
            "packing stopped by the event consumer"
        );
    } else {
        info!(
            items = total_items,
            containers_used = loads.len(),
            unplaced = unplaced.len(),
            "packing finished"
        );
        emit(
            PackEvent::Finished {
                containers_used: loads.len(),
                unplaced: unplaced.len(),
            },
            &mut stopped,
        );
    }

    Ok(PackingRun {
        summary: PackingSummary {
            total_items,
            total_weight_kg,
            total_volume_m3,
            containers_tried,
            containers_used: loads.len(),
            placed_items,
            unplaced_items: unplaced.len(),
            note: note.to_string(),
        },
        containers: loads,
        unplaced,
        validation_warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: usize, dims: (f64, f64, f64), weight: f64) -> Item {
        Item::new(id, format!("item-{id}"), dims, weight, false).unwrap()
    }

    fn container(id: &str, dims: (f64, f64, f64), max_weight: f64) -> Container {
        Container::new(id, dims, max_weight).unwrap()
    }

    #[test]
    fn builder_replaces_out_of_range_values() {
        let config = PackingConfig::builder()
            .grid_step(0.0)
            .min_grid_step(f64::NAN)
            .max_candidates(0)
            .support_ratio(-0.5)
            .front_zone_ratio(1.5)
            .general_epsilon(-1.0)
            .build();
        assert_eq!(config, PackingConfig::default());
    }

    #[test]
    fn builder_keeps_valid_values() {
        let config = PackingConfig::builder()
            .grid_step(50.0)
            .support_ratio(0.0)
            .front_zone_ratio(1.0)
            .build();
        assert_eq!(config.grid_step, 50.0);
        assert_eq!(config.support_ratio, 0.0);
        assert_eq!(config.front_zone_ratio, 1.0);

        let capped = PackingConfig::builder().grid_step(0.5).build();
        assert_eq!(capped.min_grid_step, 0.5);
    }

    #[test]
    fn zero_grid_step_still_places_items() {
        let config = PackingConfig::builder().grid_step(0.0).build();
        let run = pack_with_config(
            vec![item(1, (100.0, 100.0, 100.0), 1.0)],
            vec![container("c", (500.0, 500.0, 500.0), 10.0)],
            config,
        )
        .unwrap();
        assert!(run.is_complete());
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let result = pack(vec![item(1, (10.0, 10.0, 10.0), 1.0)], Vec::new());
        assert_eq!(result.unwrap_err(), PackingError::EmptyCatalog);
    }

    #[test]
    fn invalid_records_are_rejected_before_packing() {
        let bad_container = Container {
            id: "bad".to_string(),
            length_mm: 0.0,
            width_mm: 10.0,
            height_mm: 10.0,
            max_weight_kg: 10.0,
        };
        let result = pack(vec![item(1, (1.0, 1.0, 1.0), 1.0)], vec![bad_container]);
        assert!(matches!(result, Err(PackingError::InvalidContainer(_))));

        let mut bad_item = item(1, (1.0, 1.0, 1.0), 1.0);
        bad_item.height_mm = -3.0;
        let result = pack(vec![bad_item], vec![container("c", (10.0, 10.0, 10.0), 10.0)]);
        assert!(matches!(result, Err(PackingError::InvalidItem(_))));
    }

    #[test]
    fn duplicate_item_ids_are_rejected() {
        let result = pack(
            vec![item(1, (1.0, 1.0, 1.0), 1.0), item(1, (2.0, 2.0, 2.0), 1.0)],
            vec![container("c", (10.0, 10.0, 10.0), 10.0)],
        );
        assert_eq!(result.unwrap_err(), PackingError::DuplicateItemId(1));
    }

    #[test]
    fn duplicate_item_names_are_rejected() {
        let mut twin = item(2, (2.0, 2.0, 2.0), 1.0);
        twin.name = "item-1".to_string();
        let result = pack(
            vec![item(1, (1.0, 1.0, 1.0), 1.0), twin],
            vec![container("c", (10.0, 10.0, 10.0), 10.0)],
        );
        assert_eq!(
            result.unwrap_err(),
            PackingError::DuplicateItemName("item-1".to_string())
        );
    }

    #[test]
    fn repeated_order_lines_pack_under_distinct_names() {
        let run = pack_commodities(
            &[
                Commodity::new("Chair", (500.0, 500.0, 900.0), 7.0),
                Commodity::new("Chair", (500.0, 500.0, 900.0), 7.0),
                Commodity::new("Lamp", (300.0, 300.0, 600.0), 2.0).with_quantity(2),
                Commodity::new("Lamp#1", (300.0, 300.0, 600.0), 2.0),
            ],
            vec![container("closet", (400.0, 400.0, 400.0), 100.0)],
            PackingConfig::default(),
        )
        .unwrap();

        let names = run.unplaced_names();
        assert_eq!(names.len(), 5);
        let unique: HashSet<&String> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn no_items_yields_empty_complete_run() {
        let run = pack(Vec::new(), vec![container("c", (10.0, 10.0, 10.0), 10.0)]).unwrap();
        assert!(run.is_complete());
        assert_eq!(run.container_count(), 0);
        assert_eq!(run.summary.containers_tried, 0);
        assert_eq!(run.average_utilization(), 0.0);
    }

    #[test]
    fn overflow_moves_to_next_container() {
        let items: Vec<Item> = (1..=3).map(|id| item(id, (400.0, 400.0, 400.0), 10.0)).collect();
        let catalog = vec![
            container("large", (800.0, 400.0, 400.0), 100.0),
            container("small", (400.0, 400.0, 400.0), 100.0),
        ];

        let run = pack(items, catalog).unwrap();
        let ids: Vec<&str> = run.containers.iter().map(|c| c.container.id.as_str()).collect();
        assert_eq!(ids, vec!["small", "large"]);
        assert_eq!(run.containers[0].placements.len(), 1);
        assert_eq!(run.containers[1].placements.len(), 2);
        assert!(run.is_complete());
        assert_eq!(run.summary.placed_items, 3);
        assert_eq!(run.total_packed_weight(), 30.0);
        assert!((run.containers[0].utilization_percent - 100.0).abs() < 1e-9);
    }

    #[test]
    fn weight_limit_spills_over_to_next_container() {
        let items: Vec<Item> = (1..=3).map(|id| item(id, (100.0, 100.0, 100.0), 40.0)).collect();
        let catalog = vec![
            container("a", (1000.0, 1000.0, 1000.0), 100.0),
            container("b", (1000.0, 1000.0, 1001.0), 100.0),
        ];

        let run = pack(items, catalog).unwrap();
        assert_eq!(run.containers.len(), 2);
        assert_eq!(run.containers[0].placements.len(), 2);
        assert_eq!(run.containers[1].placements.len(), 1);
        assert!(run.containers.iter().all(|c| c.total_weight_kg <= 100.0));
    }

    #[test]
    fn unplaced_items_are_reported_not_raised() {
        let run = pack(
            vec![item(1, (500.0, 500.0, 500.0), 1.0), item(2, (50.0, 50.0, 50.0), 1.0)],
            vec![container("tiny", (100.0, 100.0, 100.0), 10.0)],
        )
        .unwrap();

        assert!(!run.is_complete());
        assert_eq!(run.unplaced_names(), vec!["item-1".to_string()]);
        assert_eq!(run.summary.unplaced_items, 1);
        assert_eq!(
            run.summary.note,
            "Some items could not be placed due to space or weight limits."
        );
    }

    #[test]
    fn progress_events_are_reported_in_order() {
        let mut events = Vec::new();
        let run = pack_with_progress(
            vec![item(1, (100.0, 100.0, 100.0), 1.0), item(2, (900.0, 900.0, 900.0), 1.0)],
            vec![container("c", (500.0, 500.0, 500.0), 10.0)],
            PackingConfig::default(),
            |evt| events.push(evt.clone()),
        )
        .unwrap();

        assert_eq!(run.container_count(), 1);
        assert!(matches!(events.first(), Some(PackEvent::ContainerStarted { candidate_items: 2, .. })));
        assert!(matches!(&events[1], PackEvent::ItemPlaced { placement, .. } if placement.item_id == 1));
        assert!(matches!(events[2], PackEvent::ItemsCarriedOver { count: 1, .. }));
        assert!(matches!(
            events.last(),
            Some(PackEvent::Finished {
                containers_used: 1,
                unplaced: 1
            })
        ));
    }

    #[test]
    fn breaking_consumer_stops_before_the_next_container() {
        let items: Vec<Item> = (1..=3).map(|id| item(id, (400.0, 400.0, 400.0), 10.0)).collect();
        let catalog = vec![
            container("small", (400.0, 400.0, 400.0), 100.0),
            container("large", (800.0, 400.0, 400.0), 100.0),
        ];

        let mut events = Vec::new();
        let run = pack_until_stopped(items, catalog, PackingConfig::default(), |evt| {
            events.push(evt.clone());
            match evt {
                PackEvent::ItemPlaced { .. } => ControlFlow::Break(()),
                _ => ControlFlow::Continue(()),
            }
        })
        .unwrap();

        assert_eq!(events.len(), 2);
        assert!(matches!(events[1], PackEvent::ItemPlaced { .. }));
        assert_eq!(run.summary.containers_tried, 1);
        assert_eq!(run.container_count(), 1);
        assert_eq!(run.unplaced_count(), 2);
    }

    #[test]
    fn summary_totals_cover_all_items() {
        let run = pack_commodities(
            &[Commodity::new("Drum", (500.0, 500.0, 800.0), 20.0).with_quantity(2)],
            vec![container("c", (1200.0, 1000.0, 1000.0), 1000.0)],
            PackingConfig::default(),
        )
        .unwrap();

        assert_eq!(run.summary.total_items, 2);
        assert_eq!(run.summary.total_weight_kg, 40.0);
        assert!((run.summary.total_volume_m3 - 0.4).abs() < 1e-9);
        assert_eq!(
            run.summary.note,
            "All items successfully packed across containers."
        );
    }
}
