//! Idle: wander between random reachable points until something happens.

use courier_events::StateId;
use tracing::debug;

use crate::context::SimContext;
use crate::npc::roles::RoleBehavior;
use crate::npc::NpcBody;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdleState {
    /// Consecutive picks that went against traffic
    patience: u32,
    waiting_on_path: bool,
    traffic_waived: bool,
    destinations_picked: u32,
}

impl IdleState {
    pub fn patience(&self) -> u32 {
        self.patience
    }

    pub fn is_waiting_on_path(&self) -> bool {
        self.waiting_on_path
    }

    pub fn is_traffic_waived(&self) -> bool {
        self.traffic_waived
    }

    pub fn destinations_picked(&self) -> u32 {
        self.destinations_picked
    }

    pub fn enter(&mut self, body: &mut NpcBody, ctx: &mut SimContext) {
        *self = Self::default();
        body.clear_destination();
        body.set_speed(ctx.config.wander.speed);
    }

    pub fn update(
        &mut self,
        body: &mut NpcBody,
        role: &dyn RoleBehavior,
        ctx: &mut SimContext,
    ) -> Option<StateId> {
        if let Some(kind) = body.cooldown() {
            return Some(kind.state());
        }
        if let Some(resume) = role.resume_from_idle(body) {
            return Some(resume);
        }
        if role.should_chase(body, ctx) {
            return Some(StateId::Chase);
        }
        if !body.nav_enabled {
            return None;
        }

        let wander = &ctx.config.wander;

        if let Some(destination) = body.destination() {
            let arrived = body
                .remaining_distance()
                .map(|d| d < wander.arrival_distance)
                .unwrap_or(true);
            let wrong_way = !self.traffic_waived
                && !ctx.navigation.respects_traffic(body.position, destination);
            if !arrived && !wrong_way {
                return None;
            }
            if wrong_way {
                self.note_wrong_way(body, wander.traffic_patience);
            }
            body.clear_destination();
        }

        let Some(candidate) = ctx
            .navigation
            .sample_reachable(body.position, wander.radius, ctx.rng)
        else {
            self.waiting_on_path = true;
            return None;
        };

        if !self.traffic_waived && !ctx.navigation.respects_traffic(body.position, candidate) {
            self.note_wrong_way(body, wander.traffic_patience);
            return None;
        }

        body.set_destination(candidate);
        body.set_speed(wander.speed);
        self.waiting_on_path = false;
        self.patience = 0;
        self.destinations_picked += 1;
        None
    }

    fn note_wrong_way(&mut self, body: &NpcBody, limit: u32) {
        self.waiting_on_path = true;
        self.patience += 1;
        if !self.traffic_waived && self.patience >= limit {
            self.traffic_waived = true;
            debug!(npc = %body.id, attempts = self.patience, "traffic rules waived");
        }
    }
}
