//! Navigation
//!
//! The core never does path or physics math itself. It asks these
//! questions and issues destinations and speeds back.

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::Rng;
use std::fmt;

pub trait Navigation: fmt::Debug {
    /// A random reachable point within `radius` of `origin`.
    fn sample_reachable(&self, origin: Vec3, radius: f32, rng: &mut SmallRng) -> Option<Vec3>;

    /// Whether the route from `from` to `to` follows one-way traffic flow.
    fn respects_traffic(&self, from: Vec3, to: Vec3) -> bool;

    /// Whether a ray from `from` reaches `to` with nothing in between.
    fn line_of_sight(&self, from: Vec3, to: Vec3) -> bool;

    /// Projects a point onto the ground.
    fn ground(&self, point: Vec3) -> Vec3 {
        Vec3::new(point.x, 0.0, point.z)
    }
}

/// Flat, unobstructed square of ground with two-way streets everywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpenGround {
    /// Half the side length of the playable square
    pub half_extent: f32,
}

impl OpenGround {
    pub fn new(half_extent: f32) -> Self {
        Self { half_extent }
    }

    fn clamp(&self, point: Vec3) -> Vec3 {
        let e = self.half_extent;
        Vec3::new(point.x.clamp(-e, e), 0.0, point.z.clamp(-e, e))
    }
}

impl Default for OpenGround {
    fn default() -> Self {
        Self::new(200.0)
    }
}

impl Navigation for OpenGround {
    fn sample_reachable(&self, origin: Vec3, radius: f32, rng: &mut SmallRng) -> Option<Vec3> {
        if radius <= 0.0 {
            return None;
        }
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        let distance = radius * rng.gen::<f32>().sqrt();
        let offset = Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance);
        Some(self.clamp(origin + offset))
    }

    fn respects_traffic(&self, _from: Vec3, _to: Vec3) -> bool {
        true
    }

    fn line_of_sight(&self, _from: Vec3, _to: Vec3) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_samples_stay_in_radius_and_bounds() {
        let ground = OpenGround::new(50.0);
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..100 {
            let p = ground.sample_reachable(Vec3::new(45.0, 0.0, 0.0), 20.0, &mut rng).unwrap();
            assert!(p.x <= 50.0 && p.x >= -50.0);
            assert!(p.distance(Vec3::new(45.0, 0.0, 0.0)) <= 20.0 + 1e-3);
        }
    }

    #[test]
    fn test_zero_radius() {
        let ground = OpenGround::default();
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(ground.sample_reachable(Vec3::ZERO, 0.0, &mut rng), None);
    }
}
