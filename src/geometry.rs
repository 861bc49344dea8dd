//! Collision detection and footprint overlap for placed boxes.
//!
//! These predicates are the only authority the search and the validator use
//! to decide whether two boxes collide.

use crate::model::Placement;
use crate::types::BoundingBox;

/// Checks whether two placements overlap in space.
///
/// Axis-aligned bounding box test: two boxes do NOT intersect as soon as they
/// are separated (or merely touching) along at least one axis.
///
/// # Example
/// ```
/// use stowage::geometry::intersects;
/// use stowage::model::{Item, Placement};
///
/// let item = Item::new(1, "a", (10.0, 10.0, 10.0), 1.0, false).unwrap();
/// let a = Placement::new(&item, (0.0, 0.0, 0.0), 1);
/// let b = Placement::new(&item, (10.0, 0.0, 0.0), 2);
/// assert!(!intersects(&a, &b));
/// ```
pub fn intersects(a: &Placement, b: &Placement) -> bool {
    a.bounding_box().intersects(&b.bounding_box())
}

/// Checks a candidate box against every committed placement.
pub fn collides_with_any(candidate: &BoundingBox, placements: &[Placement]) -> bool {
    placements
        .iter()
        .any(|p| p.bounding_box().intersects(candidate))
}

/// Length of the overlap of two intervals, at least 0.0.
///
/// # Example
/// ```
/// use stowage::geometry::overlap_1d;
///
/// assert_eq!(overlap_1d(0.0, 5.0, 3.0, 8.0), 2.0);
/// ```
pub fn overlap_1d(a1: f64, a2: f64, b1: f64, b2: f64) -> f64 {
    (a2.min(b2) - a1.max(b1)).max(0.0)
}
