//! NPC Behavior
//!
//! Every non-player vehicle is an [`NpcBody`] (what the physics layer and
//! the states read and write) driven by a [`StateMachine`] whose states and
//! predicates come from its role.
//!
//! # Modules
//!
//! - [`vision`]: The shared vision test
//! - [`machine`]: State table and transition engine
//! - [`states`]: Idle, Chase, Attack, Flee and the cooldowns
//! - [`roles`]: Civilian, Bandit and Police predicates and attacks

pub mod machine;
pub mod roles;
pub mod states;
pub mod vision;

use courier_events::{CooldownKind, NpcId, Role, StateId};
use glam::Vec3;
use tracing::debug;

use crate::components::Inventory;
use crate::context::SimContext;
use crate::error::SimError;
use crate::timers::DeferredCheck;
use crate::world::Navigation;

pub use machine::{StateMachine, Transition};
pub use roles::{behavior_for, AttackOutcome, AttackRecord, RoleBehavior};
pub use states::BehaviorState;
pub use vision::VisionQuery;

/// Physical state of an NPC and the movement intents issued to it.
#[derive(Debug)]
pub struct NpcBody {
    pub id: NpcId,
    pub role: Role,
    pub position: Vec3,
    pub velocity: Vec3,
    pub forward: Vec3,
    /// False while the physics layer has navigation switched off
    pub nav_enabled: bool,
    pub inventory: Inventory,
    destination: Option<Vec3>,
    speed: f32,
    cooldown: Option<CooldownKind>,
    crash_recovery: DeferredCheck,
    home: Vec3,
}

impl NpcBody {
    pub fn new(id: NpcId, role: Role, position: Vec3) -> Self {
        Self {
            id,
            role,
            position,
            velocity: Vec3::ZERO,
            forward: Vec3::Z,
            nav_enabled: true,
            inventory: Inventory::new(),
            destination: None,
            speed: 0.0,
            cooldown: None,
            crash_recovery: DeferredCheck::idle(),
            home: position,
        }
    }

    pub fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    pub fn set_destination(&mut self, destination: Vec3) {
        self.destination = Some(destination);
    }

    pub fn clear_destination(&mut self) {
        self.destination = None;
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    /// Distance left to the current destination.
    pub fn remaining_distance(&self) -> Option<f32> {
        self.destination.map(|d| self.position.distance(d))
    }

    pub fn distance_to(&self, point: Vec3) -> f32 {
        self.position.distance(point)
    }

    pub fn can_see(&self, target: Vec3, query: &VisionQuery, nav: &dyn Navigation) -> bool {
        query.can_see(self.position, self.forward, target, nav)
    }

    /// Set while the NPC must sit out a cooldown.
    pub fn cooldown(&self) -> Option<CooldownKind> {
        self.cooldown
    }

    pub fn in_cooldown(&self) -> bool {
        self.cooldown.is_some()
    }

    /// Flags the NPC for a cooldown. Civilians have none, and a request
    /// made during a cooldown is ignored.
    pub fn request_cooldown(&mut self, kind: CooldownKind) -> bool {
        if self.role == Role::Civilian || self.cooldown.is_some() {
            return false;
        }
        debug!(npc = %self.id, ?kind, "cooldown requested");
        self.cooldown = Some(kind);
        true
    }

    pub fn clear_cooldown(&mut self) {
        self.cooldown = None;
    }

    /// Switches navigation off for a recovery window.
    pub fn crash(&mut self, now: f32, recovery: f32) {
        self.nav_enabled = false;
        self.clear_destination();
        self.crash_recovery.schedule(now, recovery);
    }

    /// Turns navigation back on when the recovery window ends.
    pub fn poll_recovery(&mut self, now: f32) -> bool {
        if self.crash_recovery.poll(now) {
            self.nav_enabled = true;
            return true;
        }
        false
    }

    pub fn is_recovering(&self) -> bool {
        self.crash_recovery.is_pending()
    }

    /// Back to the spawn point with nothing pending.
    pub fn reset(&mut self) {
        self.position = self.home;
        self.velocity = Vec3::ZERO;
        self.forward = Vec3::Z;
        self.nav_enabled = true;
        self.inventory.clear();
        self.destination = None;
        self.speed = 0.0;
        self.cooldown = None;
        self.crash_recovery.cancel();
    }
}

/// A non-player vehicle.
#[derive(Debug)]
pub struct Npc {
    pub body: NpcBody,
    machine: StateMachine,
    behavior: &'static dyn RoleBehavior,
}

impl Npc {
    /// Creates an NPC with its role's states. Fails if the role's wiring is
    /// incomplete.
    pub fn new(id: NpcId, role: Role, position: Vec3) -> Result<Self, SimError> {
        let behavior = behavior_for(role);
        let machine = StateMachine::for_role(id, behavior)?;
        Ok(Self {
            body: NpcBody::new(id, role, position),
            machine,
            behavior,
        })
    }

    pub fn id(&self) -> NpcId {
        self.body.id
    }

    pub fn role(&self) -> Role {
        self.body.role
    }

    pub fn current_state(&self) -> Option<StateId> {
        self.machine.current()
    }

    pub fn machine(&self) -> &StateMachine {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut StateMachine {
        &mut self.machine
    }

    /// Runs one state-machine step.
    pub fn update(&mut self, ctx: &mut SimContext) -> Result<Option<Transition>, SimError> {
        self.machine.update(&mut self.body, self.behavior, ctx)
    }

    /// Forces a transition, bypassing the current state's logic.
    pub fn force_state(
        &mut self,
        to: StateId,
        ctx: &mut SimContext,
    ) -> Result<Transition, SimError> {
        self.machine.transition(to, &mut self.body, self.behavior, ctx)
    }

    /// Back to spawn, re-entering the role's initial state on the next update.
    pub fn reset(&mut self) {
        self.body.reset();
        self.machine.reset();
    }
}
