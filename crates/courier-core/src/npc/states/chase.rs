//! Chase: re-target the player every tick until close enough to attack.

use courier_events::StateId;

use crate::context::SimContext;
use crate::npc::roles::RoleBehavior;
use crate::npc::NpcBody;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChaseState {
    retargets: u32,
}

impl ChaseState {
    pub fn retargets(&self) -> u32 {
        self.retargets
    }

    pub fn enter(&mut self, body: &mut NpcBody, role: &dyn RoleBehavior, ctx: &mut SimContext) {
        self.retargets = 0;
        body.set_speed(role.chase_speed(ctx.config));
    }

    pub fn update(
        &mut self,
        body: &mut NpcBody,
        role: &dyn RoleBehavior,
        ctx: &mut SimContext,
    ) -> Option<StateId> {
        // Crash recovery: wait it out
        if !body.nav_enabled {
            return None;
        }

        let target = ctx.player.position;
        if body.distance_to(target) < role.attack_range(ctx.config) {
            return Some(StateId::Attack);
        }
        if !role.keep_chasing(body, ctx) {
            return Some(StateId::Idle);
        }

        body.set_destination(target);
        self.retargets += 1;

        let exhausted = body
            .remaining_distance()
            .map(|d| d < ctx.config.wander.arrival_distance)
            .unwrap_or(true);
        if exhausted {
            return Some(StateId::Idle);
        }
        None
    }
}
