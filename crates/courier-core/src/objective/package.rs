//! Package Objective
//!
//! A deliverable with health, a delivery target and a time-to-live that
//! starts on pickup. Packages are the only objectives the level depends on,
//! and [`Package::deliver`] is the only way one leaves play.

use courier_events::{
    Carrier, DeliveryId, Notification, ObjectiveId, ObjectiveStatus, PackageId,
};
use glam::Vec3;
use tracing::{debug, info};

use super::{
    check_completion, check_failure, fail, reset_status, start, NoPrerequisites, Objective,
    ObjectiveRecord, PrerequisiteReset, PrerequisiteStatus, StatusSnapshot,
};
use crate::config::PackageConfig;
use crate::notify::Notifier;
use crate::timers::DeferredCheck;

/// Where a package has to go.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeliveryTarget {
    pub id: DeliveryId,
    pub position: Vec3,
}

#[derive(Debug)]
pub struct Package {
    id: PackageId,
    record: ObjectiveRecord,
    name: String,
    health: f32,
    max_health: f32,
    carrier: Option<Carrier>,
    position: Vec3,
    spawn_position: Vec3,
    target: DeliveryTarget,
    ttl: f32,
    delivery_radius: f32,
    ttl_check: DeferredCheck,
    retired: bool,
    final_health: Option<f32>,
    /// Status, hand-off and damage notifications
    pub events: Notifier<Notification>,
}

impl Package {
    pub fn new(
        id: PackageId,
        objective: ObjectiveId,
        position: Vec3,
        target: DeliveryTarget,
        config: &PackageConfig,
    ) -> Self {
        Self {
            id,
            record: ObjectiveRecord::new(objective),
            name: format!("Deliver {}", id),
            health: config.max_health,
            max_health: config.max_health,
            carrier: None,
            position,
            spawn_position: position,
            target,
            ttl: config.ttl_after_pickup,
            delivery_radius: config.delivery_radius,
            ttl_check: DeferredCheck::idle(),
            retired: false,
            final_health: None,
            events: Notifier::new(),
        }
    }

    pub fn id(&self) -> PackageId {
        self.id
    }

    pub fn objective_id(&self) -> ObjectiveId {
        self.record.id()
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        self.max_health
    }

    pub fn carrier(&self) -> Option<Carrier> {
        self.carrier
    }

    pub fn is_collected(&self) -> bool {
        self.carrier.is_some()
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> DeliveryTarget {
        self.target
    }

    pub fn ttl(&self) -> f32 {
        self.ttl
    }

    pub fn ttl_check(&self) -> &DeferredCheck {
        &self.ttl_check
    }

    /// True once delivered or destroyed.
    pub fn is_retired(&self) -> bool {
        self.retired
    }

    /// Health recorded when the package was retired.
    pub fn final_health(&self) -> Option<f32> {
        self.final_health
    }

    /// Still worth carrying (and stealing): neither retired nor terminal.
    pub fn is_undelivered(&self) -> bool {
        !self.retired && !self.record.status().is_terminal()
    }

    /// Keeps a carried package's position in step with its carrier.
    pub fn follow_carrier(&mut self, carrier_position: Vec3) {
        if self.carrier.is_some() {
            self.position = carrier_position;
        }
    }

    /// Picks the package up. No-op if it is already held or retired.
    pub fn collect(&mut self, carrier: Carrier, carrier_position: Vec3, now: f32) -> bool {
        if self.carrier.is_some() || self.retired {
            return false;
        }

        self.carrier = Some(carrier);
        self.position = carrier_position;
        if self.record.status() == ObjectiveStatus::NotStarted {
            start(self, now);
        }
        // The deadline counts from the first pickup, not from a hand-off.
        let started = self.record.start_time().unwrap_or(now);
        self.ttl_check.schedule_at(started + self.ttl);
        debug!(package = %self.id, %carrier, "package collected");
        self.events.publish(Notification::PackageCollected {
            package: self.id,
            carrier,
        });
        true
    }

    /// Puts the package back into the world at the carrier's last position,
    /// projected to the ground.
    pub fn drop_at(&mut self, carrier_position: Vec3) -> Option<Carrier> {
        let carrier = self.carrier.take()?;
        self.position = Vec3::new(carrier_position.x, 0.0, carrier_position.z);
        debug!(package = %self.id, %carrier, "package dropped");
        self.events.publish(Notification::PackageDropped {
            package: self.id,
            carrier,
        });
        Some(carrier)
    }

    /// Moves the package from its current carrier to `to`. Equivalent to a
    /// drop followed immediately by a collect.
    pub fn transfer(&mut self, to: Carrier, to_position: Vec3, now: f32) -> bool {
        let Some(from) = self.drop_at(to_position) else {
            return false;
        };
        if !self.collect(to, to_position, now) {
            return false;
        }
        info!(package = %self.id, %from, %to, "package changed hands");
        self.events.publish(Notification::PackageStolen {
            package: self.id,
            from,
            to,
        });
        true
    }

    /// Applies collision damage, floored to whole points. Returns true if
    /// the damage failed the package.
    pub fn apply_damage(&mut self, amount: f32, now: f32) -> bool {
        let amount = amount.floor();
        if self.retired || amount <= 0.0 {
            return false;
        }

        self.health = (self.health - amount).max(0.0);
        self.events.publish(Notification::PackageDamaged {
            package: self.id,
            amount,
            health: self.health,
        });
        check_failure(self, &NoPrerequisites, now)
    }

    /// Polls the deferred TTL check. Returns true if it fired and failed
    /// the package.
    pub fn poll_ttl(&mut self, now: f32) -> bool {
        if self.ttl_check.poll(now) {
            return check_failure(self, &NoPrerequisites, now);
        }
        false
    }

    /// Completes the package if it is inside its delivery radius.
    pub fn try_complete(&mut self, now: f32) -> bool {
        check_completion(self, &NoPrerequisites, now)
    }

    /// Retires the package for good. A failed delivery also fails the
    /// objective. Callers remove it from every inventory.
    pub fn deliver(&mut self, success: bool, now: f32) -> bool {
        if self.retired {
            return false;
        }

        if !success && !self.record.status().is_terminal() {
            fail(self, now);
        }
        self.final_health = Some(self.health);
        self.carrier = None;
        self.retired = true;
        self.ttl_check.cancel();
        info!(
            package = %self.id,
            success,
            health = self.health,
            status = %self.record.status(),
            "package retired"
        );
        self.events.publish(Notification::PackageDelivered {
            package: self.id,
            success,
            final_health: self.health,
        });
        true
    }

    /// Returns the package to its spawn point with full health and a fresh
    /// objective. Cancels any pending TTL check.
    pub fn reset(&mut self) {
        self.ttl_check.cancel();
        self.health = self.max_health;
        self.carrier = None;
        self.position = self.spawn_position;
        self.retired = false;
        self.final_health = None;
        reset_status(self, &mut NoPrerequisites);
    }
}

impl Objective for Package {
    fn record(&self) -> &ObjectiveRecord {
        &self.record
    }

    fn record_mut(&mut self) -> &mut ObjectiveRecord {
        &mut self.record
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> String {
        format!(
            "Bring {} to {} within {:.0}s of pickup",
            self.id, self.target.id, self.ttl
        )
    }

    fn primary_completion_condition(&self, _now: f32) -> bool {
        self.position.distance(self.target.position) < self.delivery_radius
    }

    fn primary_failure_condition(&self, now: f32) -> bool {
        self.health <= 0.0
            || (self.is_collected() && self.record.elapsed_since_start(now) > self.ttl)
    }

    fn raise_updated(&mut self, status: ObjectiveStatus) {
        self.events.publish(Notification::ObjectiveUpdated {
            objective: self.record.id(),
            name: self.name.clone(),
            status,
        });
    }
}

/// Every package in the level, indexed by [`PackageId`].
#[derive(Debug, Default)]
pub struct PackageRoster {
    packages: Vec<Package>,
}

impl PackageRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next pushed package should carry.
    pub fn next_id(&self) -> PackageId {
        PackageId(self.packages.len() as u32)
    }

    pub fn push(&mut self, package: Package) -> PackageId {
        let id = package.id();
        self.packages.push(package);
        id
    }

    pub fn get(&self, id: PackageId) -> Option<&Package> {
        self.packages.get(id.index() as usize)
    }

    pub fn get_mut(&mut self, id: PackageId) -> Option<&mut Package> {
        self.packages.get_mut(id.index() as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Package> {
        self.packages.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Package> {
        self.packages.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Captures every package's objective status.
    pub fn snapshot(&self) -> StatusSnapshot {
        let mut snapshot = StatusSnapshot::new();
        for package in &self.packages {
            snapshot.insert(package.objective_id(), package.status());
        }
        snapshot
    }

    fn by_objective_mut(&mut self, id: ObjectiveId) -> Option<&mut Package> {
        self.packages.iter_mut().find(|p| p.objective_id() == id)
    }
}

impl PrerequisiteStatus for PackageRoster {
    fn status_of(&self, id: ObjectiveId) -> Option<ObjectiveStatus> {
        self.packages
            .iter()
            .find(|p| p.objective_id() == id)
            .map(|p| p.status())
    }
}

impl PrerequisiteReset for PackageRoster {
    fn reset_prerequisite(&mut self, id: ObjectiveId) {
        if let Some(package) = self.by_objective_mut(id) {
            package.reset();
        }
    }
}
