//! Flee: run from the player with stolen goods, now and then making for an
//! HQ to stash them.

use courier_events::{HqId, Notification, StateId};
use rand::Rng;
use tracing::debug;

use crate::context::SimContext;
use crate::npc::NpcBody;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FleeState {
    heading_to: Option<HqId>,
    waypoints: u32,
}

impl FleeState {
    /// The HQ the bandit is making for, if any.
    pub fn heading_to(&self) -> Option<HqId> {
        self.heading_to
    }

    pub fn waypoints(&self) -> u32 {
        self.waypoints
    }

    pub fn enter(&mut self, body: &mut NpcBody, ctx: &mut SimContext) {
        *self = Self::default();
        body.clear_destination();
        body.set_speed(ctx.config.bandit.flee_speed);
    }

    pub fn update(&mut self, body: &mut NpcBody, ctx: &mut SimContext) -> Option<StateId> {
        if body.inventory.is_empty() {
            return Some(StateId::Idle);
        }
        if !body.nav_enabled {
            return None;
        }

        if let Some(hq) = self.heading_to.and_then(|id| ctx.hqs.get(id)) {
            body.set_destination(hq.position);
            return None;
        }

        let arrived = body
            .remaining_distance()
            .map(|d| d < ctx.config.wander.arrival_distance)
            .unwrap_or(true);
        if !arrived {
            return None;
        }

        if ctx.rng.gen::<f32>() < ctx.config.bandit.secure_package_chance {
            if let Some(package) = body.inventory.first() {
                if let Some((hq, fresh)) = ctx.hqs.claim(package, ctx.rng) {
                    if fresh {
                        ctx.outbox.push(Notification::PackageClaimed { package, hq });
                    }
                    debug!(npc = %body.id, %package, %hq, "securing package");
                    self.heading_to = Some(hq);
                    if let Some(target) = ctx.hqs.get(hq) {
                        body.set_destination(target.position);
                    }
                    return None;
                }
            }
        }

        // Only accept waypoints that gain distance; otherwise hold and retry
        let threat = ctx.player.position;
        let current = body.distance_to(threat);
        if let Some(candidate) =
            ctx.navigation
                .sample_reachable(body.position, ctx.config.bandit.flee_radius, ctx.rng)
        {
            if candidate.distance(threat) > current {
                body.set_destination(candidate);
                self.waypoints += 1;
            }
        }
        None
    }
}
