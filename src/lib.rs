//! Heuristic 3D container loading.
//!
//! Orders are expanded into individual boxes, split into weight tiers and
//! placed axis-aligned on a coarse grid inside the smallest container that
//! takes them. What does not fit moves on to the next container; every
//! finished layout is checked again by an independent validator.
//!
//! ```
//! use stowage::model::{Commodity, Container};
//! use stowage::optimizer::{PackingConfig, pack_commodities};
//!
//! let order = vec![Commodity::new("crate", (500.0, 500.0, 500.0), 10.0).with_quantity(2)];
//! let van = Container::new("van", (1000.0, 1000.0, 1000.0), 100.0).unwrap();
//!
//! let run = pack_commodities(&order, vec![van], PackingConfig::default()).unwrap();
//! assert!(run.is_complete());
//! assert_eq!(run.containers[0].placements.len(), 2);
//! ```

pub mod api;
pub mod config;
pub mod geometry;
pub mod model;
pub mod optimizer;
pub mod requirements;
pub mod search;
pub mod support;
pub mod tiers;
pub mod types;
pub mod validator;

pub use model::{Commodity, Container, Item, Placement, ValidationError};
pub use optimizer::{
    PackEvent, PackingConfig, PackingError, PackingRun, pack, pack_commodities, pack_until_stopped,
};
pub use requirements::{LoadRequirements, calculate_load_requirements};
