//! Behavior States
//!
//! Each state answers one question per tick: stay, or move to which state.
//! States are a closed set keyed by [`StateId`]; entering a state resets its
//! counters, so a second visit behaves exactly like the first.

pub mod attack;
pub mod chase;
pub mod cooldown;
pub mod flee;
pub mod idle;

use courier_events::{CooldownKind, StateId};

use super::roles::RoleBehavior;
use super::NpcBody;
use crate::context::SimContext;

pub use attack::AttackState;
pub use chase::ChaseState;
pub use cooldown::CooldownState;
pub use flee::FleeState;
pub use idle::IdleState;

#[derive(Debug, Clone, PartialEq)]
pub enum BehaviorState {
    Idle(IdleState),
    Chase(ChaseState),
    Attack(AttackState),
    Flee(FleeState),
    Cooldown(CooldownState),
}

impl BehaviorState {
    /// A fresh state for an identifier.
    pub fn for_id(id: StateId) -> Self {
        match id {
            StateId::Idle => BehaviorState::Idle(IdleState::default()),
            StateId::Chase => BehaviorState::Chase(ChaseState::default()),
            StateId::Attack => BehaviorState::Attack(AttackState::default()),
            StateId::Flee => BehaviorState::Flee(FleeState::default()),
            StateId::Apprehended => {
                BehaviorState::Cooldown(CooldownState::new(CooldownKind::Apprehended))
            }
            StateId::EngineFailure => {
                BehaviorState::Cooldown(CooldownState::new(CooldownKind::EngineFailure))
            }
        }
    }

    pub fn id(&self) -> StateId {
        match self {
            BehaviorState::Idle(_) => StateId::Idle,
            BehaviorState::Chase(_) => StateId::Chase,
            BehaviorState::Attack(_) => StateId::Attack,
            BehaviorState::Flee(_) => StateId::Flee,
            BehaviorState::Cooldown(state) => state.kind().state(),
        }
    }

    pub fn enter(&mut self, body: &mut NpcBody, role: &dyn RoleBehavior, ctx: &mut SimContext) {
        match self {
            BehaviorState::Idle(state) => state.enter(body, ctx),
            BehaviorState::Chase(state) => state.enter(body, role, ctx),
            BehaviorState::Attack(state) => state.enter(),
            BehaviorState::Flee(state) => state.enter(body, ctx),
            BehaviorState::Cooldown(state) => state.enter(body, ctx),
        }
    }

    pub fn update(
        &mut self,
        body: &mut NpcBody,
        role: &dyn RoleBehavior,
        ctx: &mut SimContext,
    ) -> Option<StateId> {
        match self {
            BehaviorState::Idle(state) => state.update(body, role, ctx),
            BehaviorState::Chase(state) => state.update(body, role, ctx),
            BehaviorState::Attack(state) => state.update(body, role, ctx),
            BehaviorState::Flee(state) => state.update(body, ctx),
            BehaviorState::Cooldown(state) => state.update(body, ctx),
        }
    }

    pub fn as_idle(&self) -> Option<&IdleState> {
        match self {
            BehaviorState::Idle(state) => Some(state),
            _ => None,
        }
    }
}
