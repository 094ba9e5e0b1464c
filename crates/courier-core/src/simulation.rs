//! Simulation
//!
//! Owns one level attempt and runs it a tick at a time. Each tick runs its
//! phases in a fixed order:
//!
//! 1. Advance the clock and hold an arrested player in place
//! 2. Resolve collisions reported since the last tick (reclaims, crashes,
//!    damage) so their cooldown flags are visible to this tick's updates
//! 3. Poll crash recovery
//! 4. Pickups, bandit HQ drop-offs and deliveries
//! 5. NPC state machines
//! 6. Package TTL checks
//! 7. Level evaluation against a status snapshot
//! 8. Telemetry sampling
//! 9. Stamp every notification raised this tick into the log

use courier_events::{
    Carrier, CooldownKind, DeliveryId, HqId, Notification, NpcId, ObjectiveId, ObjectiveStatus,
    PackageId, Role, RunReport, SessionId, StateId, TerminatingState,
};
use glam::Vec3;
use rand::Rng;
use tracing::{debug, info};

use crate::config::SimConfig;
use crate::context::SimState;
use crate::error::SimError;
use crate::events::{NotificationLog, NotificationLogger};
use crate::npc::{Npc, Transition};
use crate::objective::{DeliveryTarget, Level, Objective, Package};
use crate::telemetry::RunTelemetry;
use crate::world::{DeliveryLocation, Navigation};

/// A player-to-NPC contact reported by the physics layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    pub npc: NpcId,
    pub impulse: f32,
}

/// What happened during one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSummary {
    pub tick: u64,
    pub transitions: Vec<(NpcId, Transition)>,
    pub notifications: usize,
    pub level_status: ObjectiveStatus,
    pub outcome: Option<TerminatingState>,
}

#[derive(Debug)]
pub struct Simulation {
    state: SimState,
    npcs: Vec<Npc>,
    level: Level,
    telemetry: RunTelemetry,
    log: NotificationLog,
    logger: NotificationLogger,
    session: SessionId,
    attempt_id: String,
    collisions: Vec<Collision>,
    outcome: Option<TerminatingState>,
}

impl Simulation {
    pub fn new(
        config: SimConfig,
        seed: u64,
        navigation: Box<dyn Navigation>,
        player_spawn: Vec3,
        session: SessionId,
    ) -> Self {
        let interval = config.telemetry.sample_interval;
        let mut state = SimState::new(config, seed, navigation, player_spawn);
        let attempt_id = next_attempt_id(&mut state);
        let mut level = Level::new(ObjectiveId(0), "Deliver everything");
        level.begin(state.now());

        Self {
            state,
            npcs: Vec::new(),
            level,
            telemetry: RunTelemetry::new(interval),
            log: NotificationLog::new(),
            logger: NotificationLogger::null(),
            session,
            attempt_id,
            collisions: Vec::new(),
            outcome: None,
        }
    }

    /// Mirrors the notification log to a JSONL file.
    pub fn with_logger(mut self, logger: NotificationLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    /// Mutable access for the physics layer (positions and velocities).
    pub fn state_mut(&mut self) -> &mut SimState {
        &mut self.state
    }

    pub fn config(&self) -> &SimConfig {
        &self.state.config
    }

    pub fn now(&self) -> f32 {
        self.state.now()
    }

    pub fn npcs(&self) -> &[Npc] {
        &self.npcs
    }

    pub fn npcs_mut(&mut self) -> &mut [Npc] {
        &mut self.npcs
    }

    pub fn npc(&self, id: NpcId) -> Option<&Npc> {
        self.npcs.get(id.index() as usize)
    }

    pub fn npc_mut(&mut self, id: NpcId) -> Option<&mut Npc> {
        self.npcs.get_mut(id.index() as usize)
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn telemetry(&self) -> &RunTelemetry {
        &self.telemetry
    }

    pub fn log(&self) -> &NotificationLog {
        &self.log
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn attempt_id(&self) -> &str {
        &self.attempt_id
    }

    /// Set once the level is won or lost.
    pub fn outcome(&self) -> Option<TerminatingState> {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn add_delivery(&mut self, position: Vec3) -> DeliveryId {
        let id = DeliveryId(self.state.deliveries.len() as u32);
        self.state.deliveries.push(DeliveryLocation {
            id,
            position,
            radius: self.state.config.collision.delivery_zone_radius,
        });
        id
    }

    pub fn add_hq(&mut self, position: Vec3) -> HqId {
        let radius = self.state.config.collision.hq_radius;
        self.state.hqs.add(position, radius)
    }

    /// Places a package bound for `delivery` and adds it to the level.
    pub fn spawn_package(
        &mut self,
        position: Vec3,
        delivery: DeliveryId,
    ) -> Result<PackageId, SimError> {
        let location = self
            .state
            .deliveries
            .get(delivery.index() as usize)
            .ok_or(SimError::UnknownDelivery(delivery))?;
        let target = DeliveryTarget {
            id: location.id,
            position: location.position,
        };

        let id = self.state.packages.next_id();
        let objective = ObjectiveId(id.index() + 1);
        let package = Package::new(id, objective, position, target, &self.state.config.package);
        self.state.packages.push(package);
        self.level.add_prerequisite(objective);
        debug!(package = %id, %delivery, "package spawned");
        Ok(id)
    }

    pub fn spawn_npc(&mut self, role: Role, position: Vec3) -> Result<NpcId, SimError> {
        let id = NpcId(self.npcs.len() as u32);
        self.npcs.push(Npc::new(id, role, position)?);
        debug!(npc = %id, %role, "npc spawned");
        Ok(id)
    }

    /// Queues a contact for the next tick.
    pub fn report_collision(&mut self, npc: NpcId, impulse: f32) -> Result<(), SimError> {
        if self.npc(npc).is_none() {
            return Err(SimError::UnknownNpc(npc));
        }
        self.collisions.push(Collision { npc, impulse });
        Ok(())
    }

    /// Advances the attempt by `dt` seconds. A finished attempt no longer
    /// advances.
    pub fn tick(&mut self, dt: f32) -> Result<TickSummary, SimError> {
        if self.outcome.is_some() {
            return Ok(TickSummary {
                tick: self.state.clock.tick,
                transitions: Vec::new(),
                notifications: 0,
                level_status: self.level.status(),
                outcome: self.outcome,
            });
        }

        self.state.clock = self.state.clock.advanced(dt);
        let now = self.state.now();
        self.state.player.poll_release(now);

        self.resolve_collisions(now)?;
        for npc in self.npcs.iter_mut() {
            npc.body.poll_recovery(now);
        }

        self.sync_carried();
        self.resolve_pickups(now);
        self.resolve_hq_arrivals(now);
        self.resolve_deliveries(now);

        let transitions = self.update_npcs()?;

        let expired: Vec<PackageId> = self
            .state
            .packages
            .iter_mut()
            .filter_map(|p| p.poll_ttl(now).then(|| p.id()))
            .collect();
        for id in expired {
            info!(package = %id, "package expired");
            self.retire(id, false, now);
        }

        let level_status = self.evaluate_level(now);
        self.telemetry.sample(now, &self.state.player);
        let notifications = self.flush_notifications()?;

        Ok(TickSummary {
            tick: self.state.clock.tick,
            transitions,
            notifications,
            level_status,
            outcome: self.outcome,
        })
    }

    fn resolve_collisions(&mut self, now: f32) -> Result<(), SimError> {
        let pending = std::mem::take(&mut self.collisions);
        for Collision { npc, impulse } in pending {
            let player_position = self.state.player.position;
            let crash_impulse = self.state.config.collision.crash_impulse;
            let crash_recovery = self.state.config.collision.crash_recovery;
            let npc = self
                .npcs
                .get_mut(npc.index() as usize)
                .ok_or(SimError::UnknownNpc(npc))?;
            self.telemetry.record_collision(npc.role());

            // Ramming a bandit takes back everything it carries
            if npc.role() == Role::Bandit && !npc.body.inventory.is_empty() {
                let mut reclaimed = 0;
                for id in npc.body.inventory.take_all() {
                    self.state.hqs.release(id);
                    let Some(package) = self.state.packages.get_mut(id) else {
                        continue;
                    };
                    package.drop_at(npc.body.position);
                    if package.collect(Carrier::Player, player_position, now) {
                        self.state.player.inventory.add(id);
                        reclaimed += 1;
                    }
                }
                self.telemetry.record_reclaim(reclaimed);
                npc.body.request_cooldown(CooldownKind::Apprehended);
                info!(npc = %npc.id(), reclaimed, "packages reclaimed");
            }

            if impulse.abs() > crash_impulse {
                npc.body.crash(now, crash_recovery);
                if npc.role().is_enemy() {
                    npc.body.request_cooldown(CooldownKind::EngineFailure);
                }
                debug!(npc = %npc.id(), impulse, "npc crashed");
            }

            if let Some(damage) = self.state.player.health.hit(impulse, now) {
                self.damage_carried(damage, now);
            }
        }
        Ok(())
    }

    /// Passes collision damage on to every package the player carries.
    fn damage_carried(&mut self, damage: f32, now: f32) {
        if damage <= 0.0 {
            return;
        }
        let scale = self.state.config.package.collision_damage_scale;
        let carried: Vec<PackageId> = self.state.player.inventory.iter().collect();
        for id in carried {
            let destroyed = self
                .state
                .packages
                .get_mut(id)
                .map(|p| p.apply_damage(damage * scale, now))
                .unwrap_or(false);
            if destroyed {
                info!(package = %id, "package destroyed");
                self.retire(id, false, now);
            }
        }
    }

    fn sync_carried(&mut self) {
        let player = self.state.player.position;
        for package in self.state.packages.iter_mut() {
            let position = match package.carrier() {
                Some(Carrier::Player) => player,
                Some(Carrier::Npc(id)) => match self.npcs.get(id.index() as usize) {
                    Some(npc) => npc.body.position,
                    None => continue,
                },
                None => continue,
            };
            package.follow_carrier(position);
        }
    }

    fn resolve_pickups(&mut self, now: f32) {
        if !self.state.player.controls_enabled() {
            return;
        }
        let player = self.state.player.position;
        let radius = self.state.config.package.pickup_radius;
        for package in self.state.packages.iter_mut() {
            if package.is_collected() || package.is_retired() {
                continue;
            }
            if package.position().distance(player) > radius {
                continue;
            }
            if package.collect(Carrier::Player, player, now) {
                self.state.player.inventory.add(package.id());
            }
        }
    }

    /// A bandit inside the HQ claimed for a package it carries stashes it
    /// for good.
    fn resolve_hq_arrivals(&mut self, now: f32) {
        let mut stashed = Vec::new();
        for npc in self.npcs.iter().filter(|n| n.role() == Role::Bandit) {
            for id in npc.body.inventory.iter() {
                let arrived = self
                    .state
                    .hqs
                    .claimed_hq(id)
                    .map(|hq| hq.contains(npc.body.position))
                    .unwrap_or(false);
                if arrived {
                    stashed.push((npc.id(), id));
                }
            }
        }
        for (npc, id) in stashed {
            info!(%npc, package = %id, "package stashed at HQ");
            self.retire(id, false, now);
        }
    }

    /// Every carried package bound for a zone the player is in gets a
    /// completion check.
    fn resolve_deliveries(&mut self, now: f32) {
        let player = self.state.player.position;
        if !self.state.deliveries.iter().any(|d| d.contains(player)) {
            return;
        }
        let carried: Vec<PackageId> = self.state.player.inventory.iter().collect();
        for id in carried {
            let completed = self
                .state
                .packages
                .get_mut(id)
                .map(|p| p.try_complete(now))
                .unwrap_or(false);
            if completed {
                self.retire(id, true, now);
            }
        }
    }

    fn update_npcs(&mut self) -> Result<Vec<(NpcId, Transition)>, SimError> {
        let mut transitions = Vec::new();
        let mut ctx = self.state.context();
        for npc in self.npcs.iter_mut() {
            if let Some(transition) = npc.update(&mut ctx)? {
                if transition.to == StateId::Chase {
                    self.telemetry.record_chase(npc.role());
                }
                transitions.push((npc.id(), transition));
            }
        }
        for record in self.state.attacks.drain(..) {
            self.telemetry.record_attack(record.outcome);
        }
        Ok(transitions)
    }

    /// Takes a package out of play and out of every inventory.
    fn retire(&mut self, id: PackageId, success: bool, now: f32) {
        if let Some(package) = self.state.packages.get_mut(id) {
            if package.deliver(success, now) {
                let health = package.final_health().unwrap_or(0.0);
                self.telemetry.record_retired(success, health);
            }
        }
        self.state.player.inventory.remove(id);
        for npc in self.npcs.iter_mut() {
            npc.body.inventory.remove(id);
        }
        self.state.hqs.release(id);
    }

    fn evaluate_level(&mut self, now: f32) -> ObjectiveStatus {
        let snapshot = self.state.packages.snapshot();
        let status = self.level.evaluate(&snapshot, now);
        if self.outcome.is_some() {
            return status;
        }

        self.outcome = match status {
            ObjectiveStatus::Complete => Some(TerminatingState::Win),
            ObjectiveStatus::Failed => Some(TerminatingState::Lose),
            // Mixed results can satisfy neither combinator
            ObjectiveStatus::InProgress
                if !self.level.tracked().is_empty() && snapshot.all_terminal() =>
            {
                Some(TerminatingState::Lose)
            }
            _ => None,
        };
        if let Some(outcome) = self.outcome {
            info!(%outcome, elapsed = self.attempt_duration(), "attempt finished");
        }
        status
    }

    fn attempt_duration(&self) -> f32 {
        match self.level.status() {
            ObjectiveStatus::Complete | ObjectiveStatus::Failed => {
                self.level.record().duration_at_complete()
            }
            _ => self.level.record().elapsed_since_start(self.now()),
        }
    }

    /// Moves every unread notification into the log. Returns how many.
    fn flush_notifications(&mut self) -> Result<usize, SimError> {
        let mut pending = Vec::new();
        pending.append(&mut self.state.player.events.drain_unread());
        pending.append(&mut self.state.player.health.events.drain_unread());
        for package in self.state.packages.iter_mut() {
            pending.append(&mut package.events.drain_unread());
        }
        for npc in self.npcs.iter_mut() {
            pending.append(&mut npc.machine_mut().events.drain_unread());
        }
        pending.append(&mut self.state.outbox);
        pending.append(&mut self.level.events.drain_unread());

        let count = pending.len();
        let timestamp = self.state.clock;
        for notification in pending {
            let entry = self.log.record(notification, timestamp);
            self.logger.log(entry)?;
        }
        Ok(count)
    }

    /// Starts the attempt over: packages back at their spawn points with
    /// fresh objectives, nothing carried, every pending timer cancelled,
    /// NPCs back in their initial state.
    pub fn restart(&mut self) -> Result<(), SimError> {
        let now = self.state.now();
        self.level.reset(&mut self.state.packages);
        self.state.player.reset();
        for npc in self.npcs.iter_mut() {
            npc.reset();
        }
        self.state.hqs.clear_claims();
        self.state.attacks.clear();
        self.collisions.clear();

        self.telemetry = RunTelemetry::starting_at(now, self.state.config.telemetry.sample_interval);
        self.outcome = None;
        self.attempt_id = next_attempt_id(&mut self.state);
        self.level.begin(now);
        info!(attempt = %self.attempt_id, "attempt restarted");
        self.flush_notifications()?;
        Ok(())
    }

    /// Ends the attempt and builds its report. Only a win is graded.
    pub fn finish(&mut self, terminating: TerminatingState) -> Result<RunReport, SimError> {
        self.flush_notifications()?;
        self.logger.flush()?;

        let player = &self.state.player;
        let duration = self.attempt_duration();
        let mut report = RunReport::new(self.session, self.attempt_id.clone());
        report.terminating_state = terminating;
        report.final_package_health = self.telemetry.average_package_health();
        report.final_player_health = player.health.current();
        report.avg_player_health = self.telemetry.average_player_health(player.health.current());
        report.avg_speed = self.telemetry.average_speed();
        report.attempt_duration_seconds = duration;
        report.num_bandit_steals = self.telemetry.bandit_steals;
        report.num_reclaimed_packages = self.telemetry.reclaimed_packages;
        report.num_destroyed_packages = self.telemetry.destroyed_packages;
        report.num_delivered_packages = self.telemetry.delivered_packages;
        report.num_bandit_chases = self.telemetry.bandit_chases;
        report.num_police_chases = self.telemetry.police_chases;
        report.num_civilian_collisions = self.telemetry.civilian_collisions;
        report.num_bandit_collisions = self.telemetry.bandit_collisions;
        report.num_police_collisions = self.telemetry.police_collisions;
        report.num_collisions = self.telemetry.total_collisions();
        report.num_times_pulled_over = self.telemetry.times_pulled_over;
        report.total_damage_taken = player.health.total_damage();

        if terminating == TerminatingState::Win {
            let inputs = self
                .telemetry
                .grade_inputs(player.health.current(), duration);
            let grade = self.state.config.grading.grade(&inputs)?;
            report.final_letter_grade = grade.letter;
            report.final_number_grade = grade.total;
            report.category_scores = grade.breakdown;
        }

        info!(
            attempt = %report.attempt_id,
            state = %report.terminating_state,
            grade = %report.final_letter_grade,
            score = report.final_number_grade,
            "attempt report ready"
        );
        Ok(report)
    }

    /// Records an out-of-band notification, e.g. from a scenario driver.
    pub fn publish(&mut self, notification: Notification) {
        self.state.outbox.push(notification);
    }
}

/// Attempt ids come from the seeded generator so reruns match.
fn next_attempt_id(state: &mut SimState) -> String {
    let bytes: [u8; 16] = state.rng.gen();
    uuid::Builder::from_random_bytes(bytes)
        .into_uuid()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::OpenGround;
    use uuid::Uuid;

    fn sim() -> Simulation {
        Simulation::new(
            SimConfig::default(),
            7,
            Box::new(OpenGround::default()),
            Vec3::ZERO,
            SessionId(Uuid::nil()),
        )
    }

    #[test]
    fn test_spawn_package_requires_known_delivery() {
        let mut sim = sim();
        let err = sim.spawn_package(Vec3::ZERO, DeliveryId(3)).unwrap_err();
        assert!(matches!(err, SimError::UnknownDelivery(DeliveryId(3))));

        let delivery = sim.add_delivery(Vec3::new(50.0, 0.0, 0.0));
        let package = sim.spawn_package(Vec3::new(1.0, 0.0, 0.0), delivery).unwrap();
        assert_eq!(package, PackageId(0));
        assert_eq!(sim.level().tracked(), &[ObjectiveId(1)]);
    }

    #[test]
    fn test_unknown_collision_target() {
        let mut sim = sim();
        assert!(matches!(
            sim.report_collision(NpcId(0), 5.0),
            Err(SimError::UnknownNpc(NpcId(0)))
        ));
    }

    #[test]
    fn test_empty_level_does_not_finish() {
        let mut sim = sim();
        for _ in 0..10 {
            let summary = sim.tick(0.1).unwrap();
            assert_eq!(summary.level_status, ObjectiveStatus::InProgress);
        }
        assert!(!sim.is_finished());
    }

    #[test]
    fn test_pickup_and_delivery_wins() {
        let mut sim = sim();
        let delivery = sim.add_delivery(Vec3::new(40.0, 0.0, 0.0));
        let package = sim.spawn_package(Vec3::new(1.0, 0.0, 0.0), delivery).unwrap();

        sim.tick(0.1).unwrap();
        assert!(sim.state().player.inventory.contains(package));

        sim.state_mut().player.position = Vec3::new(40.0, 0.0, 1.0);
        let summary = sim.tick(0.1).unwrap();
        assert_eq!(summary.outcome, Some(TerminatingState::Win));
        assert!(sim.state().player.inventory.is_empty());
        assert_eq!(sim.telemetry().delivered_packages, 1);

        let report = sim.finish(TerminatingState::Win).unwrap();
        assert!(report.is_graded());
        assert_eq!(report.num_delivered_packages, 1);
        assert_eq!(report.final_package_health, 100.0);
        assert_eq!(sim.log().count_kind("package_delivered"), 1);
    }

    #[test]
    fn test_wrong_zone_does_not_fail() {
        let mut sim = sim();
        let near = sim.add_delivery(Vec3::new(20.0, 0.0, 0.0));
        let far = sim.add_delivery(Vec3::new(-100.0, 0.0, 0.0));
        let package = sim.spawn_package(Vec3::ZERO, far).unwrap();

        sim.tick(0.1).unwrap();
        let zone = sim.state().deliveries[near.index() as usize].position;
        sim.state_mut().player.position = zone;
        sim.tick(0.1).unwrap();

        let package = sim.state().packages.get(package).unwrap();
        assert_eq!(package.status(), ObjectiveStatus::InProgress);
        assert!(!package.is_retired());
    }

    #[test]
    fn test_lose_report_is_ungraded() {
        let mut sim = sim();
        let report = sim.finish(TerminatingState::Lose).unwrap();
        assert!(!report.is_graded());
        assert_eq!(report.final_number_grade, -1);
        assert!(report.category_scores.is_empty());
    }
}
