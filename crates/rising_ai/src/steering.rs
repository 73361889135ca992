//! Steering behaviors
//!
//! Every behavior returns a desired ground velocity. Outputs are summed by
//! the caller and handed to locomotion.

use rand::Rng;
use rising_core::AgentId;
use rising_math::{consts::TAU, horizontal_distance, Vec3};
use serde::{Deserialize, Serialize};

/// Output of a steering behavior
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SteeringOutput {
    /// Desired velocity on the ground plane
    pub linear: Vec3,
}

impl SteeringOutput {
    /// Zero output
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn from_velocity(linear: Vec3) -> Self {
        Self { linear: linear.flat() }
    }

    /// Add another steering output
    pub fn add(&mut self, other: &SteeringOutput) {
        self.linear += other.linear;
    }

    /// Get magnitude of linear component
    pub fn magnitude(&self) -> f32 {
        self.linear.length()
    }

    pub fn is_zero(&self) -> bool {
        self.linear == Vec3::ZERO
    }
}

/// Head straight for `target` at `speed`
pub fn seek(position: Vec3, target: Vec3, speed: f32) -> SteeringOutput {
    SteeringOutput::from_velocity((target - position).flat().normalize_or_zero() * speed)
}

/// Seek, but stop once within `threshold` of the target
pub fn arrive(position: Vec3, target: Vec3, speed: f32, threshold: f32) -> SteeringOutput {
    if horizontal_distance(position, target) <= threshold {
        SteeringOutput::zero()
    } else {
        seek(position, target, speed)
    }
}

/// Push away from neighbors closer than `distance`
///
/// Each close neighbor contributes a unit vector pointing away from it. The
/// contributions are averaged, then normalized and scaled to `speed`.
/// Neighbors sitting exactly on top of the agent are split along X by id
/// order, so the two always push in opposite directions.
pub fn separation(
    self_id: AgentId,
    position: Vec3,
    neighbors: &[(AgentId, Vec3)],
    distance: f32,
    speed: f32,
) -> SteeringOutput {
    let mut sum = Vec3::ZERO;
    let mut count = 0u32;

    for &(id, other) in neighbors {
        if id == self_id {
            continue;
        }
        let d = horizontal_distance(position, other);
        if d >= distance {
            continue;
        }
        let away = if d > 1e-5 {
            (position - other).flat() / d
        } else if self_id < id {
            Vec3::NEG_X
        } else {
            Vec3::X
        };
        sum += away;
        count += 1;
    }

    if count == 0 {
        return SteeringOutput::zero();
    }
    let average = sum / count as f32;
    SteeringOutput::from_velocity(average.normalize_or_zero() * speed)
}

/// Uniformly random point within `radius` of `anchor` on the ground plane
pub fn pick_wander_target<R: Rng + ?Sized>(anchor: Vec3, radius: f32, rng: &mut R) -> Vec3 {
    let angle = rng.random::<f32>() * TAU;
    let r = radius.max(0.0) * rng.random::<f32>().sqrt();
    Vec3::new(anchor.x + angle.cos() * r, anchor.y, anchor.z + angle.sin() * r)
}

/// Uniformly random duration in `[min, max]`
pub fn sample_interval<R: Rng + ?Sized>(min: f32, max: f32, rng: &mut R) -> f32 {
    if !(max > min) {
        return min.max(0.0);
    }
    rng.random_range(min..=max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_seek_and_arrive() {
        let out = seek(Vec3::ZERO, Vec3::new(0.0, 5.0, 4.0), 2.0);
        assert!((out.linear - Vec3::new(0.0, 0.0, 2.0)).length() < 1e-6);

        let stopped = arrive(Vec3::ZERO, Vec3::ground(0.2, 0.0), 2.0, 0.3);
        assert!(stopped.is_zero());
    }

    #[test]
    fn test_separation_is_symmetric() {
        let a = (AgentId::new(0, 0), Vec3::ZERO);
        let b = (AgentId::new(1, 0), Vec3::ground(0.1, 0.0));
        let all = [a, b];

        let push_a = separation(a.0, a.1, &all, 1.2, 3.0);
        let push_b = separation(b.0, b.1, &all, 1.2, 3.0);
        assert!((push_a.linear + push_b.linear).length() < 1e-5);
        assert!((push_a.magnitude() - 3.0).abs() < 1e-5);
        assert!(push_a.linear.x < 0.0);
    }

    #[test]
    fn test_separation_coincident() {
        let a = (AgentId::new(0, 0), Vec3::ZERO);
        let b = (AgentId::new(1, 0), Vec3::ZERO);
        let all = [a, b];
        let push_a = separation(a.0, a.1, &all, 1.2, 3.0);
        let push_b = separation(b.0, b.1, &all, 1.2, 3.0);
        assert_eq!(push_a.linear, Vec3::NEG_X * 3.0);
        assert_eq!(push_b.linear, Vec3::X * 3.0);
    }

    #[test]
    fn test_separation_ignores_far() {
        let a = (AgentId::new(0, 0), Vec3::ZERO);
        let far = (AgentId::new(1, 0), Vec3::ground(5.0, 0.0));
        assert!(separation(a.0, a.1, &[a, far], 1.2, 3.0).is_zero());
    }

    #[test]
    fn test_wander_target_within_radius() {
        let mut rng = StdRng::seed_from_u64(7);
        let anchor = Vec3::ground(3.0, -2.0);
        for _ in 0..100 {
            let target = pick_wander_target(anchor, 4.0, &mut rng);
            assert!(horizontal_distance(anchor, target) <= 4.0 + 1e-4);
        }
    }

    #[test]
    fn test_interval_bounds() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let t = sample_interval(2.0, 5.0, &mut rng);
            assert!((2.0..=5.0).contains(&t));
        }
        assert_eq!(sample_interval(3.0, 1.0, &mut rng), 3.0);
    }
}
