//! Cooldowns: fixed-duration timeouts that ignore every other transition.

use courier_events::{CooldownKind, Notification, StateId};
use tracing::debug;

use crate::context::SimContext;
use crate::npc::NpcBody;
use crate::timers::DeferredCheck;

#[derive(Debug, Clone, PartialEq)]
pub struct CooldownState {
    kind: CooldownKind,
    timer: DeferredCheck,
    startup_cue: DeferredCheck,
}

impl CooldownState {
    pub fn new(kind: CooldownKind) -> Self {
        Self {
            kind,
            timer: DeferredCheck::idle(),
            startup_cue: DeferredCheck::idle(),
        }
    }

    pub fn kind(&self) -> CooldownKind {
        self.kind
    }

    pub fn remaining(&self, now: f32) -> Option<f32> {
        self.timer.remaining(now)
    }

    pub fn enter(&mut self, body: &mut NpcBody, ctx: &mut SimContext) {
        let cooldowns = &ctx.config.cooldown;
        let duration = match self.kind {
            CooldownKind::Apprehended => cooldowns.apprehended,
            CooldownKind::EngineFailure => cooldowns.engine_failure,
        };
        self.timer.schedule(ctx.now, duration);
        match self.kind {
            CooldownKind::EngineFailure => self
                .startup_cue
                .schedule(ctx.now, (duration - cooldowns.startup_cue_lead).max(0.0)),
            CooldownKind::Apprehended => self.startup_cue.cancel(),
        }
        body.clear_destination();
        body.set_speed(0.0);
        debug!(npc = %body.id, kind = ?self.kind, duration, "cooldown started");
    }

    pub fn update(&mut self, body: &mut NpcBody, ctx: &mut SimContext) -> Option<StateId> {
        if self.startup_cue.poll(ctx.now) {
            ctx.outbox.push(Notification::EngineStartupCue { npc: body.id });
        }
        if self.timer.poll(ctx.now) {
            body.clear_cooldown();
            return Some(StateId::Idle);
        }
        None
    }
}
