//! Post-hoc layout checks.
//!
//! Runs over a finished container and reports anything that should be
//! impossible: boxes outside the container, overlapping boxes, or a load
//! above the weight capacity. Findings are diagnostics only; the layout is
//! never modified.

use std::fmt;

use crate::geometry::intersects;
use crate::model::{Container, Placement};

/// Container axis, for bounds findings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Length,
    Width,
    Height,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Length => write!(f, "length"),
            Axis::Width => write!(f, "width"),
            Axis::Height => write!(f, "height"),
        }
    }
}

/// A single finding of the validator.
#[derive(Clone, Debug, PartialEq)]
pub enum LayoutViolation {
    NegativePosition {
        item: String,
        position: (f64, f64, f64),
    },
    ExceedsContainer {
        item: String,
        axis: Axis,
    },
    Overlap {
        first: String,
        first_position: (f64, f64, f64),
        second: String,
        second_position: (f64, f64, f64),
    },
    Overweight {
        container: String,
        load_kg: f64,
        max_kg: f64,
    },
}

impl fmt::Display for LayoutViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutViolation::NegativePosition { item, position } => write!(
                f,
                "Item {} has negative position: ({}, {}, {})",
                item, position.0, position.1, position.2
            ),
            LayoutViolation::ExceedsContainer { item, axis } => {
                write!(f, "Item {} exceeds container {}", item, axis)
            }
            LayoutViolation::Overlap {
                first,
                first_position: a,
                second,
                second_position: b,
            } => write!(
                f,
                "Overlap detected: {} at ({},{},{}) and {} at ({},{},{})",
                first, a.0, a.1, a.2, second, b.0, b.1, b.2
            ),
            LayoutViolation::Overweight {
                container,
                load_kg,
                max_kg,
            } => write!(
                f,
                "Container {} load {:.2}kg exceeds max weight {:.2}kg",
                container, load_kg, max_kg
            ),
        }
    }
}

/// Collects every violation in `placements`.
pub fn find_violations(container: &Container, placements: &[Placement], epsilon: f64) -> Vec<LayoutViolation> {
    let mut violations = Vec::new();

    for (i, p) in placements.iter().enumerate() {
        let (x, y, z) = p.position_mm;
        let (l, w, h) = p.dimensions_mm;

        if x < 0.0 || y < 0.0 || z < 0.0 {
            violations.push(LayoutViolation::NegativePosition {
                item: p.item_name.clone(),
                position: p.position_mm,
            });
        }

        for (axis, end, limit) in [
            (Axis::Length, x + l, container.length_mm),
            (Axis::Width, y + w, container.width_mm),
            (Axis::Height, z + h, container.height_mm),
        ] {
            if end > limit + epsilon {
                violations.push(LayoutViolation::ExceedsContainer {
                    item: p.item_name.clone(),
                    axis,
                });
            }
        }

        for other in &placements[i + 1..] {
            if intersects(p, other) {
                violations.push(LayoutViolation::Overlap {
                    first: p.item_name.clone(),
                    first_position: p.position_mm,
                    second: other.item_name.clone(),
                    second_position: other.position_mm,
                });
            }
        }
    }

    let load_kg: f64 = placements.iter().map(|p| p.weight_kg).sum();
    if load_kg > container.max_weight_kg + epsilon {
        violations.push(LayoutViolation::Overweight {
            container: container.id.clone(),
            load_kg,
            max_kg: container.max_weight_kg,
        });
    }

    violations
}

/// Human-readable findings for a finished container; empty when the layout is sound.
pub fn validate_layout(container: &Container, placements: &[Placement], epsilon: f64) -> Vec<String> {
    find_violations(container, placements, epsilon)
        .iter()
        .map(ToString::to_string)
        .collect()
}
