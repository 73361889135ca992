//! Rays and finite segments for sight and sweep queries

use crate::vector::Vec3;

/// 3D ray
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// Ray origin point
    pub origin: Vec3,
    /// Ray direction (normalized, zero for a degenerate ray)
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray with normalized direction
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Create a ray from two points
    #[inline]
    pub fn from_points(start: Vec3, end: Vec3) -> Self {
        Self::new(start, end - start)
    }

    /// Get a point at distance t along the ray
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Check if the ray direction is valid (non-zero length)
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.direction.length_squared() > 1e-10
    }
}

/// Finite line segment between two points
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: Vec3,
    pub end: Vec3,
}

impl Segment {
    #[inline]
    pub const fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn delta(&self) -> Vec3 {
        self.end - self.start
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.delta().length()
    }

    /// Point at fraction `t` in [0, 1]
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.start + self.delta() * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_from_points() {
        let ray = Ray::from_points(Vec3::ZERO, Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(ray.origin, Vec3::ZERO);
        assert!((ray.direction.z - 1.0).abs() < 0.001);
        assert!((ray.at(2.0).z - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_degenerate_ray() {
        let ray = Ray::from_points(Vec3::ONE, Vec3::ONE);
        assert!(!ray.is_valid());
    }

    #[test]
    fn test_segment_at() {
        let seg = Segment::new(Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0));
        assert_eq!(seg.at(0.25), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(seg.length(), 4.0);
    }
}
