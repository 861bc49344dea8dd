//! Geometry primitives shared by the packing engine.
//!
//! All lengths are millimetres in the container's local frame:
//! x runs along the container length, y along its width and z along its height.

use std::ops::Add;

/// Cubic millimetres per cubic metre.
pub const MM3_PER_M3: f64 = 1_000_000_000.0;

/// A 3D vector or point in millimetres.
///
/// Used both for positions (minimum corner of a box) and for box extents
/// (length, width, height).
///
/// # Examples
/// ```
/// use stowage::types::Vec3;
///
/// let position = Vec3::new(0.0, 200.0, 0.0);
/// let dims = Vec3::new(400.0, 300.0, 250.0);
/// assert_eq!((position + dims).y, 500.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn from_tuple(tuple: (f64, f64, f64)) -> Self {
        Self::new(tuple.0, tuple.1, tuple.2)
    }

    /// Product of all components. Meaningful for extents.
    #[inline]
    pub fn volume(&self) -> f64 {
        self.x * self.y * self.z
    }
}

impl Add for Vec3 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

/// Objects with a box-shaped extent.
pub trait Dimensional {
    /// Returns (length, width, height).
    fn dimensions(&self) -> Vec3;

    fn volume(&self) -> f64 {
        self.dimensions().volume()
    }
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner (position)
    pub min: Vec3,
    /// Maximum corner (position + dimensions)
    pub max: Vec3,
}

impl BoundingBox {
    #[inline]
    pub fn from_position_and_dims(position: Vec3, dims: Vec3) -> Self {
        Self {
            min: position,
            max: position + dims,
        }
    }

    /// Strict overlap in all three axes. Boxes sharing a face do not intersect.
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        !(self.min.x >= other.max.x
            || self.max.x <= other.min.x
            || self.min.y >= other.max.y
            || self.max.y <= other.min.y
            || self.min.z >= other.max.z
            || self.max.z <= other.min.z)
    }
}
