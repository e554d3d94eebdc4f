//! Small math toolkit: vectors, boxes, rectangles and colors.

pub mod color;
pub mod geometry;
pub mod vector;

pub use color::Color;
pub use geometry::{Aabb, Rect};
pub use vector::{distance_sq, distance_xz, lerp, Vec3};

/// Tolerance for length checks.
pub const EPSILON: f32 = 1e-6;
