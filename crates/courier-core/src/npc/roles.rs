//! Role Specializations
//!
//! Predicates and attacks layered on the shared states. Each role is a
//! stateless unit type; per-NPC state lives in the body and the states.

use courier_events::{Carrier, CooldownKind, NpcId, PackageId, Role, StateId};
use std::fmt;
use tracing::info;

use super::NpcBody;
use crate::config::SimConfig;
use crate::context::SimContext;

/// What an attack achieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackOutcome {
    /// Nothing to take, or the target was already held
    Missed,
    Stole(PackageId),
    Arrested,
}

/// An attack carried out during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackRecord {
    pub npc: NpcId,
    pub role: Role,
    pub outcome: AttackOutcome,
}

pub trait RoleBehavior: fmt::Debug + Sync {
    fn role(&self) -> Role;

    /// States every NPC of this role registers.
    fn states(&self) -> &'static [StateId];

    fn initial_state(&self) -> StateId {
        StateId::Idle
    }

    fn chase_speed(&self, _config: &SimConfig) -> f32 {
        0.0
    }

    fn attack_range(&self, _config: &SimConfig) -> f32 {
        0.0
    }

    /// A state an idle NPC should pick back up, checked before chasing.
    fn resume_from_idle(&self, _body: &NpcBody) -> Option<StateId> {
        None
    }

    /// Whether an idle NPC should start a chase.
    fn should_chase(&self, _body: &NpcBody, _ctx: &SimContext) -> bool {
        false
    }

    /// Whether a chase in progress is still worth it.
    fn keep_chasing(&self, body: &NpcBody, ctx: &SimContext) -> bool {
        self.should_chase(body, ctx)
    }

    /// Whether to attack again after the first attack of an Attack visit.
    fn keep_attacking(&self, _body: &NpcBody, _ctx: &SimContext) -> bool {
        false
    }

    fn attack(&self, _body: &mut NpcBody, _ctx: &mut SimContext) -> AttackOutcome {
        AttackOutcome::Missed
    }
}

/// Wanders and nothing else.
#[derive(Debug, Clone, Copy)]
pub struct Civilian;

/// Steals packages and runs.
#[derive(Debug, Clone, Copy)]
pub struct Bandit;

/// Pulls over a speeding player.
#[derive(Debug, Clone, Copy)]
pub struct Police;

static CIVILIAN: Civilian = Civilian;
static BANDIT: Bandit = Bandit;
static POLICE: Police = Police;

/// The behavior shared by every NPC of a role.
pub fn behavior_for(role: Role) -> &'static dyn RoleBehavior {
    match role {
        Role::Civilian => &CIVILIAN,
        Role::Bandit => &BANDIT,
        Role::Police => &POLICE,
    }
}

fn can_see_player(body: &NpcBody, ctx: &SimContext) -> bool {
    body.can_see(ctx.player.position, &ctx.config.vision.query(), ctx.navigation)
}

impl RoleBehavior for Civilian {
    fn role(&self) -> Role {
        Role::Civilian
    }

    fn states(&self) -> &'static [StateId] {
        &[StateId::Idle]
    }
}

impl RoleBehavior for Bandit {
    fn role(&self) -> Role {
        Role::Bandit
    }

    fn states(&self) -> &'static [StateId] {
        &[
            StateId::Idle,
            StateId::Chase,
            StateId::Attack,
            StateId::Flee,
            StateId::Apprehended,
            StateId::EngineFailure,
        ]
    }

    fn chase_speed(&self, config: &SimConfig) -> f32 {
        config.bandit.chase_speed
    }

    fn attack_range(&self, config: &SimConfig) -> f32 {
        config.bandit.attack_range
    }

    /// A bandit still holding loot after a cooldown goes back to fleeing.
    fn resume_from_idle(&self, body: &NpcBody) -> Option<StateId> {
        if body.inventory.is_empty() {
            None
        } else {
            Some(StateId::Flee)
        }
    }

    /// Empty-handed, the player has loot, and the player is in view.
    fn should_chase(&self, body: &NpcBody, ctx: &SimContext) -> bool {
        body.inventory.is_empty() && ctx.player_has_undelivered() && can_see_player(body, ctx)
    }

    /// Keep swinging until something is stolen.
    fn keep_attacking(&self, body: &NpcBody, ctx: &SimContext) -> bool {
        body.inventory.is_empty() && ctx.player_has_undelivered()
    }

    /// Takes one random package from the player and knocks the player back
    /// in proportion to the bandit's actual speed.
    fn attack(&self, body: &mut NpcBody, ctx: &mut SimContext) -> AttackOutcome {
        let Some(id) = ctx.player.inventory.take_random(ctx.rng) else {
            return AttackOutcome::Missed;
        };
        let Some(package) = ctx.packages.get_mut(id) else {
            return AttackOutcome::Missed;
        };
        if !package.transfer(Carrier::Npc(body.id), body.position, ctx.now) {
            ctx.player.inventory.add(id);
            return AttackOutcome::Missed;
        }
        body.inventory.add(id);

        let direction = (ctx.player.position - body.position).normalize_or_zero();
        ctx.player
            .apply_impulse(direction * body.velocity.length() * ctx.config.bandit.knockback_scale);
        info!(npc = %body.id, package = %id, "bandit stole a package");
        AttackOutcome::Stole(id)
    }
}

impl RoleBehavior for Police {
    fn role(&self) -> Role {
        Role::Police
    }

    fn states(&self) -> &'static [StateId] {
        &[
            StateId::Idle,
            StateId::Chase,
            StateId::Attack,
            StateId::Apprehended,
            StateId::EngineFailure,
        ]
    }

    fn chase_speed(&self, config: &SimConfig) -> f32 {
        config.police.chase_speed
    }

    fn attack_range(&self, config: &SimConfig) -> f32 {
        config.police.attack_range
    }

    /// The player is free, speeding and in view.
    fn should_chase(&self, body: &NpcBody, ctx: &SimContext) -> bool {
        ctx.player.controls_enabled()
            && ctx.player.speed() > ctx.config.police.speed_limit
            && can_see_player(body, ctx)
    }

    /// Once the lights are on, the chase lasts as long as the player is in
    /// view and free.
    fn keep_chasing(&self, body: &NpcBody, ctx: &SimContext) -> bool {
        ctx.player.controls_enabled() && can_see_player(body, ctx)
    }

    /// Holds the player, then sits out a cooldown so arrests cannot chain.
    fn attack(&self, body: &mut NpcBody, ctx: &mut SimContext) -> AttackOutcome {
        let duration = ctx.config.police.arrest_duration;
        if !ctx.player.arrest(body.id, ctx.now, duration) {
            return AttackOutcome::Missed;
        }
        body.request_cooldown(CooldownKind::Apprehended);
        AttackOutcome::Arrested
    }
}
