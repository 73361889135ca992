//! # rising_math - Ground-Plane Math
//!
//! Vector, box and segment primitives plus the spatial queries every
//! gameplay system relies on: horizontal distance, circle-versus-box
//! resolution, line of sight and shortest-arc turning.

pub mod vector;
pub mod bounds;
pub mod ray;
pub mod intersect;
pub mod spatial;

pub use vector::*;
pub use bounds::*;
pub use ray::*;
pub use intersect::*;
pub use spatial::*;

/// Common math constants
pub mod consts {
    pub const PI: f32 = core::f32::consts::PI;
    pub const TAU: f32 = PI * 2.0;
    pub const EPSILON: f32 = 1e-6;
}

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

pub mod prelude {
    pub use crate::vector::{Vec2, Vec3};
    pub use crate::bounds::AABB;
    pub use crate::ray::{Ray, Segment};
    pub use crate::intersect::{ray_aabb, segment_aabb};
    pub use crate::spatial::{
        eye_point, flatten, horizontal_direction, horizontal_distance,
        horizontal_distance_squared, line_of_sight, nearest_point_on_volume,
        resolve_circle_vs_volume, turn_towards, CircleContact, EYE_HEIGHT,
    };
    pub use crate::lerp;
}
