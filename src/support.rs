//! Support calculation for stacking.
//!
//! A footprint may rest on a placed box only if that box alone carries at
//! least `min_ratio` of the footprint's area. Otherwise the item goes to the
//! floor. Partial support from several boxes is never summed.

use crate::geometry::overlap_1d;
use crate::model::Placement;

/// Rectangle in the XY plane: a candidate item's footprint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Footprint {
    pub x: f64,
    pub y: f64,
    pub length: f64,
    pub width: f64,
}

impl Footprint {
    pub fn new(x: f64, y: f64, length: f64, width: f64) -> Self {
        Self {
            x,
            y,
            length,
            width,
        }
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.length * self.width
    }
}

/// Fraction of `footprint` covered by the footprint of `placement`.
///
/// Returns `None` when the two footprints do not overlap at all.
pub fn support_ratio(footprint: &Footprint, placement: &Placement) -> Option<f64> {
    let (px, py, _) = placement.position_mm;
    let (pl, pw, _) = placement.dimensions_mm;

    let over_x = overlap_1d(footprint.x, footprint.x + footprint.length, px, px + pl);
    let over_y = overlap_1d(footprint.y, footprint.y + footprint.width, py, py + pw);
    if over_x <= 0.0 || over_y <= 0.0 {
        return None;
    }

    let area = footprint.area();
    if area <= 0.0 {
        return None;
    }
    Some(over_x * over_y / area)
}

/// Height at which `footprint` comes to rest.
///
/// The highest top surface among placements that qualify as support, or
/// `0.0` (the container floor) when none does.
pub fn support_height(footprint: &Footprint, placements: &[Placement], min_ratio: f64) -> f64 {
    placements
        .iter()
        .filter(|p| support_ratio(footprint, p).is_some_and(|ratio| ratio >= min_ratio))
        .map(Placement::top_z)
        .fold(0.0, f64::max)
}
