//! Aggregate load requirements of an order.
//!
//! A quick estimate that needs no container catalog: total weight and
//! volume, special handling flags and a vehicle size with 20% headroom.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::{Commodity, ValidationError};
use crate::types::MM3_PER_M3;

/// Orders above either threshold need a vehicle rather than a parcel service.
const TRANSPORT_WEIGHT_THRESHOLD_KG: f64 = 10.0;
const TRANSPORT_VOLUME_THRESHOLD_M3: f64 = 0.1;
const CAPACITY_HEADROOM: f64 = 1.2;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VehicleCapacity {
    pub min_weight_kg: f64,
    pub min_volume_m3: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LoadRequirements {
    /// Rounded to two decimals.
    pub total_weight_kg: f64,
    /// Rounded to three decimals.
    pub total_volume_m3: f64,
    pub is_fragile_item: bool,
    pub needs_refrigeration: bool,
    pub needs_transport: bool,
    pub recommended_vehicle_capacity: VehicleCapacity,
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Sums weight and volume over all lines, honouring quantities.
pub fn calculate_load_requirements(commodities: &[Commodity]) -> Result<LoadRequirements, ValidationError> {
    let mut total_weight = 0.0;
    let mut total_volume = 0.0;
    let mut is_fragile_item = false;
    let mut needs_refrigeration = false;

    for commodity in commodities {
        commodity.validate()?;
        let quantity = f64::from(commodity.quantity);
        total_weight += commodity.weight_kg * quantity;
        total_volume += commodity.unit_volume() * quantity / MM3_PER_M3;
        is_fragile_item |= commodity.fragile;
        needs_refrigeration |= commodity.requires_refrigeration;
    }

    Ok(LoadRequirements {
        total_weight_kg: round_to(total_weight, 2),
        total_volume_m3: round_to(total_volume, 3),
        is_fragile_item,
        needs_refrigeration,
        needs_transport: total_weight > TRANSPORT_WEIGHT_THRESHOLD_KG
            || total_volume > TRANSPORT_VOLUME_THRESHOLD_M3,
        recommended_vehicle_capacity: VehicleCapacity {
            min_weight_kg: total_weight * CAPACITY_HEADROOM,
            min_volume_m3: total_volume * CAPACITY_HEADROOM,
        },
    })
}
