//! The Player
//!
//! Position and velocity come from the excluded physics layer. The core
//! owns the inventory, health, arrest hold and knockback queue.

use courier_events::{Notification, NpcId};
use glam::Vec3;
use tracing::info;

use super::health::{HealthPool, HitModel};
use super::inventory::Inventory;
use crate::config::PlayerConfig;
use crate::notify::Notifier;
use crate::timers::DeferredCheck;

#[derive(Debug)]
pub struct Player {
    pub position: Vec3,
    pub velocity: Vec3,
    pub forward: Vec3,
    pub inventory: Inventory,
    pub health: HealthPool,
    controls_enabled: bool,
    spawn_position: Vec3,
    arrested_by: Option<NpcId>,
    pinned_at: Option<Vec3>,
    release: DeferredCheck,
    pending_impulse: Vec3,
    pub events: Notifier<Notification>,
}

impl Player {
    pub fn new(position: Vec3, config: &PlayerConfig) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            forward: Vec3::Z,
            inventory: Inventory::new(),
            health: HealthPool::new(config.max_health, HitModel::from(config)),
            controls_enabled: true,
            spawn_position: position,
            arrested_by: None,
            pinned_at: None,
            release: DeferredCheck::idle(),
            pending_impulse: Vec3::ZERO,
            events: Notifier::new(),
        }
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    pub fn controls_enabled(&self) -> bool {
        self.controls_enabled
    }

    pub fn is_arrested(&self) -> bool {
        self.arrested_by.is_some()
    }

    pub fn arrested_by(&self) -> Option<NpcId> {
        self.arrested_by
    }

    /// Pins the player in place with controls disabled until `duration`
    /// seconds from now. Returns false if already held.
    pub fn arrest(&mut self, by: NpcId, now: f32, duration: f32) -> bool {
        if self.arrested_by.is_some() {
            return false;
        }
        self.arrested_by = Some(by);
        self.controls_enabled = false;
        self.pinned_at = Some(self.position);
        self.velocity = Vec3::ZERO;
        self.release.schedule(now, duration);
        info!(npc = %by, duration, "player arrested");
        self.events.publish(Notification::PlayerArrested {
            npc: by,
            release_at: now + duration,
        });
        true
    }

    /// Keeps an arrested player pinned. Returns true on the tick the arrest
    /// ends.
    pub fn poll_release(&mut self, now: f32) -> bool {
        if let Some(pin) = self.pinned_at {
            self.position = pin;
            self.velocity = Vec3::ZERO;
        }
        if !self.release.poll(now) {
            return false;
        }
        self.arrested_by = None;
        self.pinned_at = None;
        self.controls_enabled = true;
        info!("player released");
        self.events.publish(Notification::PlayerReleased);
        true
    }

    /// Queues a knockback impulse for the physics layer.
    pub fn apply_impulse(&mut self, impulse: Vec3) {
        self.pending_impulse += impulse;
    }

    /// Takes the accumulated impulse.
    pub fn take_impulse(&mut self) -> Vec3 {
        std::mem::replace(&mut self.pending_impulse, Vec3::ZERO)
    }

    /// Back to spawn with full health and nothing pending.
    pub fn reset(&mut self) {
        self.position = self.spawn_position;
        self.velocity = Vec3::ZERO;
        self.forward = Vec3::Z;
        self.inventory.clear();
        self.health.reset();
        self.controls_enabled = true;
        self.arrested_by = None;
        self.pinned_at = None;
        self.release.cancel();
        self.pending_impulse = Vec3::ZERO;
    }
}
