//! Intersection tests against axis-aligned boxes
//!
//! Both tests use the slab method. Axes the direction does not move along
//! are handled explicitly, so a ray grazing a face never produces NaN.

use crate::bounds::AABB;
use crate::ray::{Ray, Segment};
use crate::vector::Vec3;

const PARALLEL_EPSILON: f32 = 1e-8;

/// Clip the parametric line `origin + dir * t` against the box.
/// Returns the entry and exit parameters when the line crosses the box.
fn slab_interval(origin: Vec3, dir: Vec3, aabb: &AABB) -> Option<(f32, f32)> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;

    for (o, d, min, max) in [
        (origin.x, dir.x, aabb.min.x, aabb.max.x),
        (origin.y, dir.y, aabb.min.y, aabb.max.y),
        (origin.z, dir.z, aabb.min.z, aabb.max.z),
    ] {
        if d.abs() < PARALLEL_EPSILON {
            if o < min || o > max {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let t1 = (min - o) * inv;
        let t2 = (max - o) * inv;
        t_enter = t_enter.max(t1.min(t2));
        t_exit = t_exit.min(t1.max(t2));
        if t_enter > t_exit {
            return None;
        }
    }

    Some((t_enter, t_exit))
}

/// Ray-AABB intersection using the slab method
///
/// Returns the distance along the ray to the first intersection point,
/// zero when the origin is inside, or None if the ray misses the box.
pub fn ray_aabb(ray: &Ray, aabb: &AABB) -> Option<f32> {
    if !ray.is_valid() {
        return aabb.contains_point(ray.origin).then_some(0.0);
    }
    let (t_enter, t_exit) = slab_interval(ray.origin, ray.direction, aabb)?;
    if t_exit < 0.0 {
        return None;
    }
    Some(t_enter.max(0.0))
}

/// Segment-AABB intersection
///
/// Returns the fraction in [0, 1] along the segment where it first touches
/// the box, zero when the start is inside, or None if the segment misses.
pub fn segment_aabb(segment: &Segment, aabb: &AABB) -> Option<f32> {
    let (t_enter, t_exit) = slab_interval(segment.start, segment.delta(), aabb)?;
    if t_exit < 0.0 || t_enter > 1.0 {
        return None;
    }
    Some(t_enter.max(0.0))
}
