//! Data model for container loading.
//!
//! - `Commodity`: a caller-supplied order line with a quantity
//! - `Item`: one physical box to be loaded
//! - `Container`: a candidate load space with a weight capacity
//! - `Placement`: an item positioned inside a container
//!
//! Constructors validate their inputs so that the search never sees a
//! degenerate box.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
use serde_json::json;
use thiserror::Error;
use utoipa::ToSchema;

use crate::types::{BoundingBox, Dimensional, Vec3};

/// Validation error for item and container data.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),
    #[error("Invalid weight: {0}")]
    InvalidWeight(String),
}

fn validate_dimension(value: f64, owner: &str, name: &str) -> Result<(), ValidationError> {
    if value <= 0.0 || !value.is_finite() {
        return Err(ValidationError::InvalidDimension(format!(
            "{owner}: {name} must be positive, got: {value}"
        )));
    }
    Ok(())
}

fn validate_dims(dims: (f64, f64, f64), owner: &str) -> Result<(), ValidationError> {
    validate_dimension(dims.0, owner, "length_mm")?;
    validate_dimension(dims.1, owner, "width_mm")?;
    validate_dimension(dims.2, owner, "height_mm")?;
    Ok(())
}

/// Item weights may be zero (packaging, documents), never negative.
fn validate_item_weight(value: f64, owner: &str) -> Result<(), ValidationError> {
    if value < 0.0 || !value.is_finite() {
        return Err(ValidationError::InvalidWeight(format!(
            "{owner}: weight_kg must not be negative, got: {value}"
        )));
    }
    Ok(())
}

fn validate_capacity(value: f64, owner: &str) -> Result<(), ValidationError> {
    if value <= 0.0 || !value.is_finite() {
        return Err(ValidationError::InvalidWeight(format!(
            "{owner}: max_weight_kg must be positive, got: {value}"
        )));
    }
    Ok(())
}

/// One physical box to be loaded.
///
/// `id` is the identity placements refer back to; it is unique within a run.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct Item {
    pub id: usize,
    pub name: String,
    pub length_mm: f64,
    pub width_mm: f64,
    pub height_mm: f64,
    pub weight_kg: f64,
    pub fragile: bool,
}

impl Item {
    /// Creates a new item after validating dimensions and weight.
    ///
    /// # Examples
    /// ```
    /// use stowage::model::Item;
    ///
    /// assert!(Item::new(1, "crate", (400.0, 300.0, 200.0), 12.0, false).is_ok());
    /// assert!(Item::new(2, "bad", (-1.0, 300.0, 200.0), 12.0, false).is_err());
    /// ```
    pub fn new(
        id: usize,
        name: impl Into<String>,
        dims: (f64, f64, f64),
        weight_kg: f64,
        fragile: bool,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        validate_dims(dims, &name)?;
        validate_item_weight(weight_kg, &name)?;
        Ok(Self {
            id,
            name,
            length_mm: dims.0,
            width_mm: dims.1,
            height_mm: dims.2,
            weight_kg,
            fragile,
        })
    }

    /// (length, width, height) as a tuple.
    #[inline]
    pub fn dims(&self) -> (f64, f64, f64) {
        (self.length_mm, self.width_mm, self.height_mm)
    }
}

impl Dimensional for Item {
    fn dimensions(&self) -> Vec3 {
        Vec3::from_tuple(self.dims())
    }
}

fn default_quantity() -> u32 {
    1
}

/// An order line: an item description with a quantity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "name": "Monitor",
    "length_mm": 600.0,
    "width_mm": 400.0,
    "height_mm": 200.0,
    "weight_kg": 8.5,
    "quantity": 2,
    "fragile": true
}))]
pub struct Commodity {
    pub name: String,
    pub length_mm: f64,
    pub width_mm: f64,
    pub height_mm: f64,
    pub weight_kg: f64,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub fragile: bool,
    #[serde(default)]
    pub requires_refrigeration: bool,
}

impl Commodity {
    /// Shorthand for a single, non-fragile line.
    pub fn new(name: impl Into<String>, dims: (f64, f64, f64), weight_kg: f64) -> Self {
        Self {
            name: name.into(),
            length_mm: dims.0,
            width_mm: dims.1,
            height_mm: dims.2,
            weight_kg,
            quantity: 1,
            fragile: false,
            requires_refrigeration: false,
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn fragile(mut self) -> Self {
        self.fragile = true;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_dims((self.length_mm, self.width_mm, self.height_mm), &self.name)?;
        validate_item_weight(self.weight_kg, &self.name)
    }

    /// Volume of a single unit in mm³.
    pub fn unit_volume(&self) -> f64 {
        self.length_mm * self.width_mm * self.height_mm
    }
}

/// Expands commodities into individual items.
///
/// Ids are assigned sequentially from 1 across the whole list. A name that
/// occurs more than once in the order, through a quantity above one or
/// through repeated lines, is numbered `name#k` with one counter per name
/// over the whole order. Numbers that would clash with a name given
/// verbatim elsewhere in the order are skipped, so every item name is unique.
pub fn expand_commodities(commodities: &[Commodity]) -> Result<Vec<Item>, ValidationError> {
    let mut copies: HashMap<&str, u32> = HashMap::new();
    for commodity in commodities {
        commodity.validate()?;
        *copies.entry(commodity.name.as_str()).or_default() += commodity.quantity;
    }
    let verbatim: HashSet<&str> = copies
        .iter()
        .filter(|&(_, &count)| count == 1)
        .map(|(&name, _)| name)
        .collect();

    let mut counters: HashMap<&str, u32> = HashMap::new();
    let mut taken: HashSet<String> = HashSet::new();
    let mut items = Vec::new();
    for commodity in commodities {
        let base = commodity.name.as_str();
        for _ in 0..commodity.quantity {
            let name = if copies.get(base).copied().unwrap_or(0) > 1 {
                let counter = counters.entry(base).or_default();
                loop {
                    *counter += 1;
                    let candidate = format!("{base}#{counter}");
                    if !verbatim.contains(candidate.as_str()) && !taken.contains(&candidate) {
                        break candidate;
                    }
                }
            } else {
                base.to_string()
            };
            taken.insert(name.clone());
            items.push(Item {
                id: items.len() + 1,
                name,
                length_mm: commodity.length_mm,
                width_mm: commodity.width_mm,
                height_mm: commodity.height_mm,
                weight_kg: commodity.weight_kg,
                fragile: commodity.fragile,
            });
        }
    }
    Ok(items)
}

/// A candidate load space (truck body, trailer, ULD, ...).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": "van-1",
    "length_mm": 3000.0,
    "width_mm": 1800.0,
    "height_mm": 1800.0,
    "max_weight_kg": 1200.0
}))]
pub struct Container {
    pub id: String,
    pub length_mm: f64,
    pub width_mm: f64,
    pub height_mm: f64,
    pub max_weight_kg: f64,
}

impl Container {
    /// Creates a new container after validating dimensions and capacity.
    pub fn new(
        id: impl Into<String>,
        dims: (f64, f64, f64),
        max_weight_kg: f64,
    ) -> Result<Self, ValidationError> {
        let container = Self {
            id: id.into(),
            length_mm: dims.0,
            width_mm: dims.1,
            height_mm: dims.2,
            max_weight_kg,
        };
        container.validate()?;
        Ok(container)
    }

    /// Re-checks a container that arrived through deserialization.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let owner = format!("container {}", self.id);
        validate_dims((self.length_mm, self.width_mm, self.height_mm), &owner)?;
        validate_capacity(self.max_weight_kg, &owner)
    }

    #[inline]
    pub fn dims(&self) -> (f64, f64, f64) {
        (self.length_mm, self.width_mm, self.height_mm)
    }
}

impl Dimensional for Container {
    fn dimensions(&self) -> Vec3 {
        Vec3::from_tuple(self.dims())
    }
}

/// An item positioned inside a container.
///
/// `position_mm` is the minimum corner; the box is never rotated.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct Placement {
    pub item_id: usize,
    pub item_name: String,
    #[schema(value_type = [f64; 3], example = json!([600.0, 400.0, 200.0]))]
    pub dimensions_mm: (f64, f64, f64),
    #[schema(value_type = [f64; 3], example = json!([0.0, 0.0, 0.0]))]
    pub position_mm: (f64, f64, f64),
    pub weight_kg: f64,
    /// 1-based order in which items were loaded into this container.
    pub placement_order: usize,
    pub fragile: bool,
}

impl Placement {
    pub fn new(item: &Item, position_mm: (f64, f64, f64), placement_order: usize) -> Self {
        Self {
            item_id: item.id,
            item_name: item.name.clone(),
            dimensions_mm: item.dims(),
            position_mm,
            weight_kg: item.weight_kg,
            placement_order,
            fragile: item.fragile,
        }
    }

    /// Height of the top surface.
    #[inline]
    pub fn top_z(&self) -> f64 {
        self.position_mm.2 + self.dimensions_mm.2
    }

    #[inline]
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_position_and_dims(
            Vec3::from_tuple(self.position_mm),
            Vec3::from_tuple(self.dimensions_mm),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_rejects_non_positive_dimensions() {
        assert!(matches!(
            Item::new(1, "flat", (100.0, 0.0, 100.0), 1.0, false),
            Err(ValidationError::InvalidDimension(_))
        ));
        assert!(Item::new(1, "nan", (f64::NAN, 1.0, 1.0), 1.0, false).is_err());
    }

    #[test]
    fn item_accepts_zero_weight_but_not_negative() {
        assert!(Item::new(1, "paper", (10.0, 10.0, 10.0), 0.0, false).is_ok());
        assert!(matches!(
            Item::new(1, "anti", (10.0, 10.0, 10.0), -0.5, false),
            Err(ValidationError::InvalidWeight(_))
        ));
    }

    #[test]
    fn container_requires_positive_capacity() {
        assert!(Container::new("van", (1000.0, 1000.0, 1000.0), 500.0).is_ok());
        assert!(matches!(
            Container::new("van", (1000.0, 1000.0, 1000.0), 0.0),
            Err(ValidationError::InvalidWeight(_))
        ));
        assert!(Container::new("van", (1000.0, -1.0, 1000.0), 10.0).is_err());
    }

    #[test]
    fn expand_assigns_sequential_ids_and_unique_names() {
        let commodities = vec![
            Commodity::new("Chair", (500.0, 500.0, 900.0), 7.0).with_quantity(3),
            Commodity::new("Lamp", (300.0, 300.0, 600.0), 2.0).fragile(),
        ];

        let items = expand_commodities(&commodities).unwrap();
        let ids: Vec<usize> = items.iter().map(|i| i.id).collect();
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();

        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(names, vec!["Chair#1", "Chair#2", "Chair#3", "Lamp"]);
        assert!(items[3].fragile);
    }

    #[test]
    fn repeated_lines_share_one_counter() {
        let commodities = vec![
            Commodity::new("Chair", (500.0, 500.0, 900.0), 7.0),
            Commodity::new("Desk", (1200.0, 600.0, 750.0), 30.0),
            Commodity::new("Chair", (500.0, 500.0, 900.0), 7.0).with_quantity(2),
        ];

        let items = expand_commodities(&commodities).unwrap();
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Chair#1", "Desk", "Chair#2", "Chair#3"]);
    }

    #[test]
    fn numbering_skips_names_given_verbatim() {
        let commodities = vec![
            Commodity::new("Chair", (500.0, 500.0, 900.0), 7.0),
            Commodity::new("Chair", (500.0, 500.0, 900.0), 7.0),
            Commodity::new("Lamp", (300.0, 300.0, 600.0), 2.0).with_quantity(2),
            Commodity::new("Lamp#1", (300.0, 300.0, 600.0), 2.0),
        ];

        let items = expand_commodities(&commodities).unwrap();
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Chair#1", "Chair#2", "Lamp#2", "Lamp#3", "Lamp#1"]);

        let unique: HashSet<&str> = names.iter().copied().collect();
        assert_eq!(unique.len(), items.len());
    }

    #[test]
    fn expand_skips_zero_quantity_and_rejects_bad_lines() {
        let empty = vec![Commodity::new("Ghost", (1.0, 1.0, 1.0), 1.0).with_quantity(0)];
        assert!(expand_commodities(&empty).unwrap().is_empty());

        let bad = vec![Commodity::new("Broken", (1.0, 1.0, 0.0), 1.0)];
        assert!(expand_commodities(&bad).is_err());
    }

    #[test]
    fn commodity_defaults_when_deserialized() {
        let json = r#"{"name": "Box", "length_mm": 10, "width_mm": 10, "height_mm": 10, "weight_kg": 1}"#;
        let commodity: Commodity = serde_json::from_str(json).unwrap();
        assert_eq!(commodity.quantity, 1);
        assert!(!commodity.fragile);
        assert!(!commodity.requires_refrigeration);
    }

    #[test]
    fn placement_copies_item_box() {
        let item = Item::new(7, "tv", (1200.0, 200.0, 800.0), 15.0, true).unwrap();
        let placement = Placement::new(&item, (0.0, 400.0, 0.0), 3);

        assert_eq!(placement.item_id, 7);
        assert_eq!(placement.dimensions_mm, (1200.0, 200.0, 800.0));
        assert_eq!(placement.top_z(), 800.0);
        assert_eq!(placement.placement_order, 3);
        assert!(placement.fragile);
        assert_eq!(placement.bounding_box().max, Vec3::new(1200.0, 600.0, 800.0));
    }
}
