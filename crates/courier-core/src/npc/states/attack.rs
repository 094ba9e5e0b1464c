//! Attack: act on the player once per visit, or repeatedly while the role
//! wants to.

use courier_events::StateId;

use crate::context::SimContext;
use crate::npc::roles::{AttackOutcome, AttackRecord, RoleBehavior};
use crate::npc::NpcBody;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttackState {
    attempts: u32,
}

impl AttackState {
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn enter(&mut self) {
        self.attempts = 0;
    }

    pub fn update(
        &mut self,
        body: &mut NpcBody,
        role: &dyn RoleBehavior,
        ctx: &mut SimContext,
    ) -> Option<StateId> {
        let target = ctx.player.position;
        // Vision only narrows this when attack_range exceeds vision.range_min.
        let in_reach = body.distance_to(target) <= role.attack_range(ctx.config)
            && body.can_see(target, &ctx.config.vision.query(), ctx.navigation);
        if !in_reach {
            return Some(StateId::Idle);
        }
        if self.attempts > 0 && !role.keep_attacking(body, ctx) {
            return Some(StateId::Idle);
        }

        let outcome = role.attack(body, ctx);
        self.attempts += 1;
        ctx.attacks.push(AttackRecord {
            npc: body.id,
            role: body.role,
            outcome,
        });

        match outcome {
            AttackOutcome::Stole(_) => Some(StateId::Flee),
            AttackOutcome::Arrested => Some(StateId::Idle),
            AttackOutcome::Missed if role.keep_attacking(body, ctx) => None,
            AttackOutcome::Missed => Some(StateId::Idle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::context::SimState;
    use crate::npc::roles::Bandit;
    use crate::world::OpenGround;
    use courier_events::{NpcId, Role};
    use glam::Vec3;

    fn state_with_reach(attack_range: f32) -> SimState {
        let mut config = SimConfig::default();
        config.bandit.attack_range = attack_range;
        SimState::new(config, 5, Box::new(OpenGround::default()), Vec3::ZERO)
    }

    #[test]
    fn test_long_reach_still_needs_sight() {
        // Past range_min and behind the bandit
        let mut state = state_with_reach(20.0);
        let mut body = NpcBody::new(NpcId(0), Role::Bandit, Vec3::new(0.0, 0.0, 15.0));
        let mut attack = AttackState::default();

        let next = attack.update(&mut body, &Bandit, &mut state.context());
        assert_eq!(next, Some(StateId::Idle));
        assert_eq!(attack.attempts(), 0);
        assert!(state.attacks.is_empty());
    }

    #[test]
    fn test_close_target_is_attacked_from_any_angle() {
        let mut state = state_with_reach(4.0);
        let mut body = NpcBody::new(NpcId(0), Role::Bandit, Vec3::new(0.0, 0.0, 3.0));
        let mut attack = AttackState::default();

        // Nothing to steal, so the single swing misses and the bandit gives up
        let next = attack.update(&mut body, &Bandit, &mut state.context());
        assert_eq!(next, Some(StateId::Idle));
        assert_eq!(attack.attempts(), 1);
        assert_eq!(state.attacks.len(), 1);
        assert_eq!(state.attacks[0].outcome, AttackOutcome::Missed);
    }
}
