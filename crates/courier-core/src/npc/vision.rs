//! Vision Test
//!
//! Cheap "can this NPC see the target" check: a guaranteed-visible inner
//! radius, a hard outer radius, a forward dot-product cone and an optional
//! line-of-sight ray.

use glam::Vec3;

use crate::world::Navigation;

/// Parameters of one vision test. Unset limits are not checked.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VisionQuery {
    /// Minimum dot product between forward and the direction to the target
    pub fov_min: Option<f32>,
    /// Targets at or inside this distance are always visible
    pub range_min: Option<f32>,
    /// Targets beyond this distance are never visible
    pub range_max: Option<f32>,
    pub line_of_sight: bool,
}

impl VisionQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fov(mut self, fov_min: f32) -> Self {
        self.fov_min = Some(fov_min);
        self
    }

    pub fn with_range(mut self, min: f32, max: f32) -> Self {
        self.range_min = Some(min);
        self.range_max = Some(max);
        self
    }

    pub fn with_max_range(mut self, max: f32) -> Self {
        self.range_max = Some(max);
        self
    }

    pub fn with_line_of_sight(mut self) -> Self {
        self.line_of_sight = true;
        self
    }

    /// Runs the test from `eye`, facing `forward`, against `target`.
    ///
    /// Inside the minimum range the target is visible regardless of facing
    /// or occluders. Otherwise it must be within the maximum range, inside
    /// the cone, and (when requested) unobstructed.
    pub fn can_see(&self, eye: Vec3, forward: Vec3, target: Vec3, nav: &dyn Navigation) -> bool {
        let distance = eye.distance(target);

        if let Some(min) = self.range_min {
            if distance <= min {
                return true;
            }
        }
        if let Some(max) = self.range_max {
            if distance > max {
                return false;
            }
        }
        if let Some(fov) = self.fov_min {
            let direction = (target - eye).normalize_or_zero();
            if forward.normalize_or_zero().dot(direction) < fov {
                return false;
            }
        }
        if self.line_of_sight {
            return nav.line_of_sight(eye, target);
        }
        true
    }
}
