//! Demo Level
//!
//! Delivery zones on a ring, packages scattered around the player's spawn,
//! bandit HQs on the outskirts and NPCs spread over the map.

use courier_events::{Role, SessionId};
use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;
use tracing::info;

use crate::config::SimConfig;
use crate::error::SimError;
use crate::simulation::Simulation;
use crate::world::OpenGround;

/// How much of everything the demo level holds.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoLayout {
    pub half_extent: f32,
    pub deliveries: usize,
    pub packages: usize,
    pub hqs: usize,
    pub civilians: usize,
    pub bandits: usize,
    pub police: usize,
}

impl Default for DemoLayout {
    fn default() -> Self {
        Self {
            half_extent: 150.0,
            deliveries: 3,
            packages: 3,
            hqs: 2,
            civilians: 6,
            bandits: 2,
            police: 2,
        }
    }
}

/// Points evenly spaced on a circle, starting at `phase` radians.
fn ring(count: usize, radius: f32, phase: f32) -> Vec<Vec3> {
    (0..count)
        .map(|i| {
            let angle = phase + TAU * i as f32 / count as f32;
            Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius)
        })
        .collect()
}

/// Builds the demo level. The same seed always yields the same layout.
pub fn build_demo(
    config: SimConfig,
    seed: u64,
    session: SessionId,
    layout: &DemoLayout,
) -> Result<Simulation, SimError> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let extent = layout.half_extent;
    let mut sim = Simulation::new(
        config,
        seed,
        Box::new(OpenGround::new(extent)),
        Vec3::ZERO,
        session,
    );

    let phase = rng.gen_range(0.0..TAU);
    let deliveries: Vec<_> = ring(layout.deliveries, extent * 0.6, phase)
        .into_iter()
        .map(|p| sim.add_delivery(p))
        .collect();

    for (i, position) in ring(layout.packages, 20.0, -phase).into_iter().enumerate() {
        if let Some(&delivery) = deliveries.get(i % deliveries.len().max(1)) {
            sim.spawn_package(position, delivery)?;
        }
    }

    for position in ring(layout.hqs, extent * 0.9, phase + TAU / 6.0) {
        sim.add_hq(position);
    }

    let roles = [
        (Role::Civilian, layout.civilians),
        (Role::Bandit, layout.bandits),
        (Role::Police, layout.police),
    ];
    for (role, count) in roles {
        for _ in 0..count {
            let position = Vec3::new(
                rng.gen_range(-extent..extent),
                0.0,
                rng.gen_range(-extent..extent),
            );
            sim.spawn_npc(role, position)?;
        }
    }

    info!(
        seed,
        packages = sim.state().packages.len(),
        npcs = sim.npcs().len(),
        "demo level built"
    );
    Ok(sim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_demo_layout_counts() {
        let layout = DemoLayout::default();
        let sim = build_demo(SimConfig::default(), 42, SessionId(Uuid::nil()), &layout).unwrap();

        assert_eq!(sim.state().packages.len(), 3);
        assert_eq!(sim.state().deliveries.len(), 3);
        assert_eq!(sim.state().hqs.len(), 2);
        assert_eq!(sim.npcs().len(), 10);
        assert_eq!(sim.level().tracked().len(), 3);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let layout = DemoLayout::default();
        let a = build_demo(SimConfig::default(), 9, SessionId(Uuid::nil()), &layout).unwrap();
        let b = build_demo(SimConfig::default(), 9, SessionId(Uuid::nil()), &layout).unwrap();

        let positions = |sim: &Simulation| -> Vec<Vec3> {
            sim.npcs().iter().map(|n| n.body.position).collect()
        };
        assert_eq!(positions(&a), positions(&b));
        assert_eq!(a.attempt_id(), b.attempt_id());
    }
}
