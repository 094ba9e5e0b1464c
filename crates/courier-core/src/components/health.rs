//! Health Pool
//!
//! Whole-point health with a collision damage model: light bumps do
//! nothing, hard hits are scaled and capped, and hits closer together than
//! the debounce window count once.

use courier_events::Notification;

use crate::config::PlayerConfig;
use crate::notify::Notifier;

/// How a collision force becomes damage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitModel {
    pub min_force: f32,
    pub force_scale: f32,
    pub max_damage: f32,
    pub debounce: f32,
}

impl HitModel {
    /// Damage for a force, or `None` if the force is too light.
    pub fn damage_for(&self, force: f32) -> Option<f32> {
        let force = force.abs();
        if force <= self.min_force {
            return None;
        }
        Some((force * self.force_scale).min(self.max_damage))
    }
}

impl From<&PlayerConfig> for HitModel {
    fn from(config: &PlayerConfig) -> Self {
        Self {
            min_force: config.min_hit_force,
            force_scale: config.hit_force_scale,
            max_damage: config.max_hit_damage,
            debounce: config.hit_debounce,
        }
    }
}

#[derive(Debug)]
pub struct HealthPool {
    current: f32,
    max: f32,
    total_damage: f32,
    model: HitModel,
    last_hit_at: Option<f32>,
    pub events: Notifier<Notification>,
}

impl HealthPool {
    pub fn new(max: f32, model: HitModel) -> Self {
        Self {
            current: max,
            max,
            total_damage: 0.0,
            model,
            last_hit_at: None,
            events: Notifier::new(),
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }

    /// Damage taken over the whole attempt.
    pub fn total_damage(&self) -> f32 {
        self.total_damage
    }

    /// Removes whole points of health. Returns the amount actually removed.
    pub fn damage(&mut self, amount: f32) -> f32 {
        let amount = amount.floor();
        if amount <= 0.0 {
            return 0.0;
        }
        let applied = amount.min(self.current);
        self.current -= applied;
        self.total_damage += applied;
        self.publish();
        applied
    }

    /// Restores health up to the maximum.
    pub fn heal(&mut self, amount: f32) -> f32 {
        if amount <= 0.0 {
            return 0.0;
        }
        let applied = amount.min(self.max - self.current);
        self.current += applied;
        self.publish();
        applied
    }

    /// Applies a collision. Returns the damage dealt, or `None` when the hit
    /// was too light or fell inside the debounce window.
    pub fn hit(&mut self, force: f32, now: f32) -> Option<f32> {
        if let Some(last) = self.last_hit_at {
            if now - last < self.model.debounce {
                return None;
            }
        }
        let damage = self.model.damage_for(force)?;
        self.last_hit_at = Some(now);
        Some(self.damage(damage))
    }

    /// Back to full health with a clean damage tally.
    pub fn reset(&mut self) {
        self.current = self.max;
        self.total_damage = 0.0;
        self.last_hit_at = None;
        self.publish();
    }

    fn publish(&mut self) {
        self.events.publish(Notification::PlayerHealthChanged {
            health: self.current,
            max_health: self.max,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> HealthPool {
        HealthPool::new(100.0, HitModel::from(&PlayerConfig::default()))
    }

    #[test]
    fn test_light_hits_ignored() {
        let mut health = pool();
        assert_eq!(health.hit(10.0, 0.0), None);
        assert_eq!(health.current(), 100.0);
    }

    #[test]
    fn test_hit_scaled_floored_and_capped() {
        let mut health = pool();
        // 50 * 0.25 = 12.5 -> 12
        assert_eq!(health.hit(50.0, 0.0), Some(12.0));
        assert_eq!(health.current(), 88.0);

        // 1000 * 0.25 capped at 40
        assert_eq!(health.hit(-1000.0, 1.0), Some(40.0));
        assert_eq!(health.current(), 48.0);
        assert_eq!(health.total_damage(), 52.0);
    }

    #[test]
    fn test_debounce() {
        let mut health = pool();
        assert!(health.hit(100.0, 1.0).is_some());
        assert_eq!(health.hit(100.0, 1.3), None);
        assert!(health.hit(100.0, 1.6).is_some());
    }

    #[test]
    fn test_clamped_at_zero_and_max() {
        let mut health = pool();
        assert_eq!(health.damage(250.0), 100.0);
        assert!(health.is_depleted());
        assert_eq!(health.heal(500.0), 100.0);
        assert_eq!(health.current(), 100.0);
    }

    #[test]
    fn test_changes_published() {
        let mut health = pool();
        health.damage(5.0);
        health.heal(2.0);
        let notes = health.events.drain_unread();
        assert_eq!(notes.len(), 2);
        assert_eq!(
            notes[1],
            Notification::PlayerHealthChanged {
                health: 97.0,
                max_health: 100.0
            }
        );
    }
}
