//! Ground-plane spatial helpers shared by combat, AI and locomotion
//!
//! Every gameplay range check measures distance on the XZ plane, ignoring
//! height. Agents are treated as vertical circles of a given radius when
//! tested against level geometry.

use serde::{Deserialize, Serialize};

use crate::bounds::AABB;
use crate::consts::{EPSILON, PI, TAU};
use crate::intersect::segment_aabb;
use crate::ray::Segment;
use crate::vector::Vec3;

/// Vertical offset from an agent's ground position to its eyes
pub const EYE_HEIGHT: f32 = 1.5;

/// Zero the vertical component
#[inline]
pub fn flatten(v: Vec3) -> Vec3 {
    v.flat()
}

#[inline]
pub fn horizontal_distance_squared(a: Vec3, b: Vec3) -> f32 {
    let dx = b.x - a.x;
    let dz = b.z - a.z;
    dx * dx + dz * dz
}

/// Euclidean distance on the XZ plane
#[inline]
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    horizontal_distance_squared(a, b).sqrt()
}

/// Unit XZ direction from `from` to `to`, or None when they coincide
#[inline]
pub fn horizontal_direction(from: Vec3, to: Vec3) -> Option<Vec3> {
    let dir = (to - from).flat().normalize_or_zero();
    (dir != Vec3::ZERO).then_some(dir)
}

/// Lift a ground position to eye height
#[inline]
pub fn eye_point(ground: Vec3) -> Vec3 {
    ground.with_y(ground.y + EYE_HEIGHT)
}

/// Closest point on or inside the box
#[inline]
pub fn nearest_point_on_volume(point: Vec3, volume: &AABB) -> Vec3 {
    volume.closest_point(point)
}

/// Result of testing a ground circle against a box
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CircleContact {
    pub colliding: bool,
    /// Unit XZ direction that moves the circle out of the box
    pub push_direction: Vec3,
    /// Distance to move along `push_direction` to stop overlapping
    pub overlap: f32,
}

impl CircleContact {
    pub const NONE: Self = Self {
        colliding: false,
        push_direction: Vec3::ZERO,
        overlap: 0.0,
    };
}

/// Test a circle on the XZ plane against the footprint of a box
///
/// A center inside the footprint is pushed out through the nearest face.
/// Ties between faces resolve in the order +X, -X, +Z, -Z, so a degenerate
/// box always pushes along +X.
pub fn resolve_circle_vs_volume(center: Vec3, radius: f32, volume: &AABB) -> CircleContact {
    if !center.is_finite() || !radius.is_finite() || !volume.is_valid() {
        return CircleContact::NONE;
    }

    let closest = nearest_point_on_volume(center, volume);
    let offset = Vec3::new(center.x - closest.x, 0.0, center.z - closest.z);
    let dist_sq = offset.length_squared();

    if dist_sq > EPSILON * EPSILON {
        if dist_sq >= radius * radius {
            return CircleContact::NONE;
        }
        let dist = dist_sq.sqrt();
        return CircleContact {
            colliding: true,
            push_direction: offset / dist,
            overlap: radius - dist,
        };
    }

    let faces = [
        (volume.max.x - center.x, Vec3::X),
        (center.x - volume.min.x, Vec3::NEG_X),
        (volume.max.z - center.z, Vec3::Z),
        (center.z - volume.min.z, Vec3::NEG_Z),
    ];
    let mut best = faces[0];
    for face in &faces[1..] {
        if face.0 < best.0 {
            best = *face;
        }
    }

    CircleContact {
        colliding: true,
        push_direction: best.1,
        overlap: best.0.max(0.0) + radius,
    }
}

/// True iff no volume blocks the segment between the two eye points
pub fn line_of_sight<'a>(
    origin_eye: Vec3,
    target_eye: Vec3,
    volumes: impl IntoIterator<Item = &'a AABB>,
) -> bool {
    let segment = Segment::new(origin_eye, target_eye);
    volumes
        .into_iter()
        .all(|volume| !matches!(segment_aabb(&segment, volume), Some(t) if t < 1.0 - 1e-4))
}

/// Heading angle of an XZ direction, zero along +Z
#[inline]
pub fn yaw(direction: Vec3) -> f32 {
    direction.x.atan2(direction.z)
}

/// Unit XZ direction for a heading angle
#[inline]
pub fn from_yaw(yaw: f32) -> Vec3 {
    Vec3::new(yaw.sin(), 0.0, yaw.cos())
}

/// Wrap an angle into [-PI, PI]
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped < -PI { wrapped + TAU } else { wrapped }
}

/// Rotate `facing` toward `desired` along the shortest arc, at most `max_angle` radians
pub fn turn_towards(facing: Vec3, desired: Vec3, max_angle: f32) -> Vec3 {
    let desired = desired.flat().normalize_or_zero();
    if desired == Vec3::ZERO {
        return facing;
    }
    let facing = facing.flat().normalize_or_zero();
    if facing == Vec3::ZERO {
        return desired;
    }

    let current = yaw(facing);
    let delta = wrap_angle(yaw(desired) - current);
    if delta.abs() <= max_angle {
        return desired;
    }
    from_yaw(current + delta.signum() * max_angle.max(0.0))
}
