//! Stand-in Physics
//!
//! Moves the player and NPCs in straight lines between ticks, the way the
//! excluded physics layer would, and reports contacts as collisions.
//! The player runs on autopilot: fetch the nearest loose package, then
//! head for the delivery target of whatever it carries.

use courier_events::NpcId;
use glam::Vec3;
use std::collections::BTreeSet;

use crate::error::SimError;
use crate::simulation::Simulation;

#[derive(Debug, Clone)]
pub struct Driver {
    /// Autopilot cruising speed
    pub player_speed: f32,
    /// Distance at which the player and an NPC touch
    pub contact_distance: f32,
    touching: BTreeSet<NpcId>,
}

impl Default for Driver {
    fn default() -> Self {
        Self::new(16.0, 2.0)
    }
}

impl Driver {
    pub fn new(player_speed: f32, contact_distance: f32) -> Self {
        Self {
            player_speed,
            contact_distance,
            touching: BTreeSet::new(),
        }
    }

    /// Where the autopilot wants to go, if anywhere.
    pub fn autopilot_target(&self, sim: &Simulation) -> Option<Vec3> {
        let state = sim.state();
        let player = state.player.position;
        if let Some(carried) = state
            .player
            .inventory
            .iter()
            .find_map(|id| state.packages.get(id))
        {
            return Some(carried.target().position);
        }
        state
            .packages
            .iter()
            .filter(|p| !p.is_collected() && !p.is_retired())
            .map(|p| p.position())
            .min_by(|a, b| a.distance(player).total_cmp(&b.distance(player)))
    }

    /// Moves everything by one step of `dt` seconds and reports new contacts.
    pub fn step(&mut self, sim: &mut Simulation, dt: f32) -> Result<(), SimError> {
        let target = self.autopilot_target(sim);
        let speed = self.player_speed;

        let player = &mut sim.state_mut().player;
        let knockback = player.take_impulse();
        if player.controls_enabled() {
            player.velocity = match target {
                Some(target) => (target - player.position).normalize_or_zero() * speed,
                None => Vec3::ZERO,
            };
            if player.velocity != Vec3::ZERO {
                player.forward = player.velocity.normalize();
            }
            player.position += (player.velocity + knockback) * dt;
        }
        let player_position = player.position;
        let player_velocity = player.velocity;

        let mut contacts = Vec::new();
        for npc in sim.npcs_mut() {
            let body = &mut npc.body;
            body.velocity = Vec3::ZERO;
            if body.nav_enabled {
                if let Some(destination) = body.destination() {
                    let offset = destination - body.position;
                    let distance = offset.length();
                    if distance > f32::EPSILON {
                        let direction = offset / distance;
                        let travel = (body.speed() * dt).min(distance);
                        body.position += direction * travel;
                        body.velocity = direction * body.speed();
                        body.forward = direction;
                    }
                }
            }

            let touching = body.position.distance(player_position) < self.contact_distance;
            if touching && self.touching.insert(body.id) {
                contacts.push((body.id, (player_velocity - body.velocity).length()));
            } else if !touching {
                self.touching.remove(&body.id);
            }
        }

        for (npc, impulse) in contacts {
            sim.report_collision(npc, impulse)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::world::OpenGround;
    use courier_events::{Role, SessionId};
    use uuid::Uuid;

    fn sim() -> Simulation {
        Simulation::new(
            SimConfig::default(),
            3,
            Box::new(OpenGround::default()),
            Vec3::ZERO,
            SessionId(Uuid::nil()),
        )
    }

    #[test]
    fn test_autopilot_fetches_then_delivers() {
        let mut sim = sim();
        let delivery = sim.add_delivery(Vec3::new(0.0, 0.0, 60.0));
        sim.spawn_package(Vec3::new(10.0, 0.0, 0.0), delivery).unwrap();
        let driver = Driver::default();

        assert_eq!(driver.autopilot_target(&sim), Some(Vec3::new(10.0, 0.0, 0.0)));

        sim.state_mut().player.position = Vec3::new(9.0, 0.0, 0.0);
        sim.tick(0.1).unwrap();
        assert_eq!(driver.autopilot_target(&sim), Some(Vec3::new(0.0, 0.0, 60.0)));
    }

    #[test]
    fn test_contact_reported_once() {
        let mut sim = sim();
        sim.spawn_npc(Role::Civilian, Vec3::new(1.0, 0.0, 0.0)).unwrap();
        let mut driver = Driver::default();

        driver.step(&mut sim, 0.05).unwrap();
        sim.tick(0.05).unwrap();
        driver.step(&mut sim, 0.05).unwrap();
        sim.tick(0.05).unwrap();

        assert_eq!(sim.telemetry().civilian_collisions, 1);
    }
}
