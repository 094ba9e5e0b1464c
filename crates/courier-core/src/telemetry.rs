//! Run Telemetry
//!
//! Counters and samples accumulated over one attempt. The simulation feeds
//! it from values returned by lifecycle operations and state updates.

use courier_events::Role;
use grader::GradeInputs;

use crate::components::Player;
use crate::npc::AttackOutcome;
use crate::timers::DeferredCheck;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunTelemetry {
    pub bandit_steals: u32,
    pub reclaimed_packages: u32,
    pub destroyed_packages: u32,
    pub delivered_packages: u32,
    pub bandit_chases: u32,
    pub police_chases: u32,
    pub civilian_collisions: u32,
    pub bandit_collisions: u32,
    pub police_collisions: u32,
    pub times_pulled_over: u32,
    retired_health: Vec<f32>,
    speed_sum: f32,
    health_sum: f32,
    samples: u32,
    sampler: DeferredCheck,
    interval: f32,
}

impl RunTelemetry {
    /// Starts sampling every `interval` seconds from time zero.
    pub fn new(interval: f32) -> Self {
        Self::starting_at(0.0, interval)
    }

    /// Starts sampling every `interval` seconds from `start`.
    pub fn starting_at(start: f32, interval: f32) -> Self {
        let mut sampler = DeferredCheck::idle();
        sampler.schedule_at(start);
        Self {
            sampler,
            interval,
            ..Default::default()
        }
    }

    pub fn record_collision(&mut self, role: Role) {
        match role {
            Role::Civilian => self.civilian_collisions += 1,
            Role::Bandit => self.bandit_collisions += 1,
            Role::Police => self.police_collisions += 1,
        }
    }

    pub fn record_chase(&mut self, role: Role) {
        match role {
            Role::Bandit => self.bandit_chases += 1,
            Role::Police => self.police_chases += 1,
            Role::Civilian => {}
        }
    }

    pub fn record_attack(&mut self, outcome: AttackOutcome) {
        match outcome {
            AttackOutcome::Stole(_) => self.bandit_steals += 1,
            AttackOutcome::Arrested => self.times_pulled_over += 1,
            AttackOutcome::Missed => {}
        }
    }

    pub fn record_reclaim(&mut self, count: u32) {
        self.reclaimed_packages += count;
    }

    /// Records a package leaving play.
    pub fn record_retired(&mut self, success: bool, final_health: f32) {
        if success {
            self.delivered_packages += 1;
        } else {
            self.destroyed_packages += 1;
        }
        self.retired_health.push(final_health);
    }

    /// Samples the player's speed and health when the interval has passed.
    pub fn sample(&mut self, now: f32, player: &Player) -> bool {
        if !self.sampler.poll(now) {
            return false;
        }
        self.speed_sum += player.speed();
        self.health_sum += player.health.current();
        self.samples += 1;
        let next = self.sampler.due_at().unwrap_or(now) + self.interval;
        self.sampler.schedule_at(next);
        true
    }

    pub fn total_collisions(&self) -> u32 {
        self.civilian_collisions + self.bandit_collisions + self.police_collisions
    }

    pub fn sample_count(&self) -> u32 {
        self.samples
    }

    pub fn average_speed(&self) -> f32 {
        if self.samples == 0 {
            return 0.0;
        }
        self.speed_sum / self.samples as f32
    }

    /// Average sampled player health, or `fallback` before the first sample.
    pub fn average_player_health(&self, fallback: f32) -> f32 {
        if self.samples == 0 {
            return fallback;
        }
        self.health_sum / self.samples as f32
    }

    /// Average final health over every retired package.
    pub fn average_package_health(&self) -> f32 {
        if self.retired_health.is_empty() {
            return 0.0;
        }
        self.retired_health.iter().sum::<f32>() / self.retired_health.len() as f32
    }

    /// Values the grader reads.
    pub fn grade_inputs(&self, player_health: f32, duration: f32) -> GradeInputs {
        GradeInputs {
            package_health: self.average_package_health(),
            player_health,
            completion_time: duration,
            police_pullovers: self.times_pulled_over as f32,
            collisions: self.total_collisions() as f32,
            bandit_steals: self.bandit_steals as f32,
        }
    }
}
