//! State Machine
//!
//! Holds one live state out of a fixed table and applies the transition a
//! state asks for immediately, within the same tick. A pending cooldown
//! pre-empts whatever non-cooldown state is current.

use courier_events::{Notification, NpcId, Role, StateId};
use std::collections::BTreeMap;
use tracing::debug;

use super::roles::RoleBehavior;
use super::states::BehaviorState;
use super::NpcBody;
use crate::context::SimContext;
use crate::error::SimError;
use crate::notify::Notifier;

/// A state change that took effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: StateId,
    pub to: StateId,
}

#[derive(Debug)]
pub struct StateMachine {
    npc: NpcId,
    role: Role,
    states: BTreeMap<StateId, BehaviorState>,
    initial: StateId,
    current: Option<StateId>,
    /// State-changed notifications carrying the new state
    pub events: Notifier<Notification>,
}

impl StateMachine {
    /// Builds a machine over `registered` states. The initial state must be
    /// one of them.
    pub fn new(
        npc: NpcId,
        role: Role,
        registered: &[StateId],
        initial: StateId,
    ) -> Result<Self, SimError> {
        if !registered.contains(&initial) {
            return Err(SimError::InvalidInitialState {
                role,
                state: initial,
            });
        }
        let states = registered
            .iter()
            .map(|id| (*id, BehaviorState::for_id(*id)))
            .collect();
        Ok(Self {
            npc,
            role,
            states,
            initial,
            current: None,
            events: Notifier::new(),
        })
    }

    /// Builds a machine with a role's states and initial state.
    pub fn for_role(npc: NpcId, behavior: &dyn RoleBehavior) -> Result<Self, SimError> {
        Self::new(
            npc,
            behavior.role(),
            behavior.states(),
            behavior.initial_state(),
        )
    }

    /// The live state, `None` before the first update.
    pub fn current(&self) -> Option<StateId> {
        self.current
    }

    pub fn initial(&self) -> StateId {
        self.initial
    }

    pub fn is_registered(&self, id: StateId) -> bool {
        self.states.contains_key(&id)
    }

    pub fn state(&self, id: StateId) -> Option<&BehaviorState> {
        self.states.get(&id)
    }

    fn missing(&self, state: StateId) -> SimError {
        SimError::MissingState {
            npc: self.npc,
            role: self.role,
            state,
        }
    }

    /// Runs the current state and applies the transition it returns.
    ///
    /// Enters the initial state on the first call. A transition to an
    /// unregistered state is an error.
    pub fn update(
        &mut self,
        body: &mut NpcBody,
        behavior: &dyn RoleBehavior,
        ctx: &mut SimContext,
    ) -> Result<Option<Transition>, SimError> {
        let current = match self.current {
            Some(id) => id,
            None => {
                let initial = self.initial;
                let missing = self.missing(initial);
                self.states
                    .get_mut(&initial)
                    .ok_or(missing)?
                    .enter(body, behavior, ctx);
                self.current = Some(initial);
                initial
            }
        };

        let next = match body.cooldown() {
            Some(kind) if !current.is_cooldown() => Some(kind.state()),
            _ => {
                let missing = self.missing(current);
                self.states
                    .get_mut(&current)
                    .ok_or(missing)?
                    .update(body, behavior, ctx)
            }
        };

        match next {
            Some(to) if to != current => self.transition(to, body, behavior, ctx).map(Some),
            _ => Ok(None),
        }
    }

    /// Switches to `to`, entering it fresh and publishing the change.
    pub fn transition(
        &mut self,
        to: StateId,
        body: &mut NpcBody,
        behavior: &dyn RoleBehavior,
        ctx: &mut SimContext,
    ) -> Result<Transition, SimError> {
        let from = self.current.unwrap_or(self.initial);
        let missing = self.missing(to);
        self.states
            .get_mut(&to)
            .ok_or(missing)?
            .enter(body, behavior, ctx);
        self.current = Some(to);

        debug!(npc = %self.npc, role = %self.role, %from, %to, "state transition");
        self.events.publish(Notification::StateChanged {
            npc: self.npc,
            role: self.role,
            from,
            to,
        });
        Ok(Transition { from, to })
    }

    /// Forgets the live state and every state's timers; the next update
    /// re-enters the initial state.
    pub fn reset(&mut self) {
        for (id, state) in self.states.iter_mut() {
            *state = BehaviorState::for_id(*id);
        }
        self.current = None;
    }
}
