//! Lifecycle tests
//!
//! Package, level and NPC behavior driven through the simulation tick loop.

use courier_core::objective::Objective;
use courier_core::world::OpenGround;
use courier_core::{SimConfig, Simulation};
use courier_events::{
    Carrier, NpcId, ObjectiveStatus, PackageId, Role, SessionId, StateId, TerminatingState,
};
use glam::Vec3;
use uuid::Uuid;

fn sim_with(config: SimConfig) -> Simulation {
    Simulation::new(
        config,
        1,
        Box::new(OpenGround::default()),
        Vec3::ZERO,
        SessionId(Uuid::nil()),
    )
}

fn ticks(sim: &mut Simulation, count: u32, dt: f32) {
    for _ in 0..count {
        sim.tick(dt).unwrap();
    }
}

fn status(sim: &Simulation, id: PackageId) -> ObjectiveStatus {
    sim.state().packages.get(id).unwrap().status()
}

#[test]
fn test_ttl_failure_after_pickup() {
    let mut config = SimConfig::default();
    config.package.ttl_after_pickup = 10.0;
    let mut sim = sim_with(config);
    let delivery = sim.add_delivery(Vec3::new(100.0, 0.0, 0.0));
    let package = sim.spawn_package(Vec3::new(1.0, 0.0, 0.0), delivery).unwrap();

    // Picked up at t = 0.5, due at t = 10.5
    ticks(&mut sim, 1, 0.5);
    assert_eq!(status(&sim, package), ObjectiveStatus::InProgress);

    ticks(&mut sim, 20, 0.5);
    assert_eq!(sim.now(), 10.5);
    assert_eq!(status(&sim, package), ObjectiveStatus::InProgress);

    let summary = sim.tick(0.5).unwrap();
    assert_eq!(status(&sim, package), ObjectiveStatus::Failed);
    assert!(sim.state().packages.get(package).unwrap().is_retired());
    assert!(sim.state().player.inventory.is_empty());
    assert_eq!(sim.telemetry().destroyed_packages, 1);

    // Its only prerequisite failed, so the level fails with it
    assert_eq!(summary.level_status, ObjectiveStatus::Failed);
    assert_eq!(summary.outcome, Some(TerminatingState::Lose));
}

#[test]
fn test_health_failure_precedes_ttl() {
    let mut sim = sim_with(SimConfig::default());
    let delivery = sim.add_delivery(Vec3::new(100.0, 0.0, 0.0));
    let package = sim.spawn_package(Vec3::new(1.0, 0.0, 0.0), delivery).unwrap();
    let civilian = sim.spawn_npc(Role::Civilian, Vec3::new(30.0, 0.0, 30.0)).unwrap();
    ticks(&mut sim, 1, 1.0);

    let mut health = Vec::new();
    for _ in 0..3 {
        sim.report_collision(civilian, 200.0).unwrap();
        sim.tick(1.0).unwrap();
        health.push(sim.state().packages.get(package).unwrap().health());
    }

    assert_eq!(health, vec![60.0, 20.0, 0.0]);
    assert!(sim.now() < 120.0);
    assert_eq!(status(&sim, package), ObjectiveStatus::Failed);
    assert_eq!(sim.telemetry().civilian_collisions, 3);
    assert_eq!(sim.state().player.health.current(), 0.0);
    assert_eq!(sim.outcome(), Some(TerminatingState::Lose));
}

#[test]
fn test_mixed_results_do_not_complete_level() {
    let mut config = SimConfig::default();
    config.package.ttl_after_pickup = 5.0;
    let mut sim = sim_with(config);
    let near = sim.add_delivery(Vec3::new(40.0, 0.0, 0.0));
    let far = sim.add_delivery(Vec3::new(-150.0, 0.0, 0.0));
    let a = sim.spawn_package(Vec3::new(1.0, 0.0, 0.0), near).unwrap();
    let b = sim.spawn_package(Vec3::new(0.0, 0.0, 1.0), near).unwrap();
    let c = sim.spawn_package(Vec3::new(-1.0, 0.0, 0.0), far).unwrap();

    ticks(&mut sim, 1, 0.5);
    assert_eq!(sim.state().player.inventory.len(), 3);

    sim.state_mut().player.position = Vec3::new(40.0, 0.0, 0.0);
    let summary = sim.tick(0.5).unwrap();
    assert_eq!(status(&sim, a), ObjectiveStatus::Complete);
    assert_eq!(status(&sim, b), ObjectiveStatus::Complete);
    assert_eq!(status(&sim, c), ObjectiveStatus::InProgress);
    assert_eq!(summary.level_status, ObjectiveStatus::InProgress);
    assert_eq!(summary.outcome, None);

    ticks(&mut sim, 10, 0.5);
    assert_eq!(status(&sim, c), ObjectiveStatus::Failed);
    assert_eq!(sim.level().status(), ObjectiveStatus::InProgress);
    assert_eq!(sim.outcome(), Some(TerminatingState::Lose));

    let report = sim.finish(TerminatingState::Lose).unwrap();
    assert_eq!(report.num_delivered_packages, 2);
    assert_eq!(report.num_destroyed_packages, 1);
    assert!(!report.is_graded());
}

#[test]
fn test_bandit_steal_and_reclaim() {
    let mut sim = sim_with(SimConfig::default());
    let delivery = sim.add_delivery(Vec3::new(100.0, 0.0, 0.0));
    let package = sim.spawn_package(Vec3::new(1.0, 0.0, 0.0), delivery).unwrap();
    let bandit = sim.spawn_npc(Role::Bandit, Vec3::new(2.0, 0.0, 0.0)).unwrap();
    let state = |sim: &Simulation| sim.npc(bandit).unwrap().current_state();

    // Pickup, then the bandit spots the loot
    sim.tick(0.1).unwrap();
    assert_eq!(state(&sim), Some(StateId::Chase));
    sim.tick(0.1).unwrap();
    assert_eq!(state(&sim), Some(StateId::Attack));
    sim.tick(0.1).unwrap();
    assert_eq!(state(&sim), Some(StateId::Flee));

    let carried = sim.state().packages.get(package).unwrap().carrier();
    assert_eq!(carried, Some(Carrier::Npc(bandit)));
    assert!(sim.state().player.inventory.is_empty());
    assert_eq!(sim.telemetry().bandit_steals, 1);
    assert_eq!(sim.telemetry().bandit_chases, 1);

    // Ramming the bandit takes it back and benches the bandit
    sim.report_collision(bandit, 5.0).unwrap();
    sim.tick(0.1).unwrap();
    assert!(sim.state().player.inventory.contains(package));
    assert_eq!(
        sim.state().packages.get(package).unwrap().carrier(),
        Some(Carrier::Player)
    );
    assert_eq!(sim.telemetry().reclaimed_packages, 1);
    assert_eq!(state(&sim), Some(StateId::Apprehended));
    assert_eq!(sim.log().count_kind("package_stolen"), 1);
}

#[test]
fn test_stolen_package_keeps_pickup_deadline() {
    let mut config = SimConfig::default();
    config.package.ttl_after_pickup = 3.0;
    let mut sim = sim_with(config);
    let delivery = sim.add_delivery(Vec3::new(100.0, 0.0, 0.0));
    let package = sim.spawn_package(Vec3::new(1.0, 0.0, 0.0), delivery).unwrap();
    let bandit = sim.spawn_npc(Role::Bandit, Vec3::new(2.0, 0.0, 0.0)).unwrap();

    // Picked up at t = 0.1, stolen at t = 0.3, reclaimed at t = 0.4
    ticks(&mut sim, 3, 0.1);
    assert_eq!(
        sim.state().packages.get(package).unwrap().carrier(),
        Some(Carrier::Npc(bandit))
    );
    sim.report_collision(bandit, 5.0).unwrap();
    ticks(&mut sim, 1, 0.1);
    assert!(sim.state().player.inventory.contains(package));

    let due = sim.state().packages.get(package).unwrap().ttl_check().due_at();
    assert!(due.is_some_and(|due| (due - 3.1).abs() < 1e-3));

    ticks(&mut sim, 26, 0.1);
    assert_eq!(status(&sim, package), ObjectiveStatus::InProgress);
    ticks(&mut sim, 2, 0.1);
    assert_eq!(status(&sim, package), ObjectiveStatus::Failed);
    assert_eq!(sim.outcome(), Some(TerminatingState::Lose));
}

#[test]
fn test_bandit_stashes_at_hq() {
    let mut config = SimConfig::default();
    config.bandit.secure_package_chance = 1.0;
    let mut sim = sim_with(config);
    let delivery = sim.add_delivery(Vec3::new(100.0, 0.0, 0.0));
    let package = sim.spawn_package(Vec3::new(1.0, 0.0, 0.0), delivery).unwrap();
    let hq = sim.add_hq(Vec3::new(-60.0, 0.0, 0.0));
    let bandit = sim.spawn_npc(Role::Bandit, Vec3::new(2.0, 0.0, 0.0)).unwrap();

    ticks(&mut sim, 4, 0.1);
    assert_eq!(
        sim.state().hqs.claimed_hq(package).map(|h| h.id),
        Some(hq)
    );
    assert_eq!(
        sim.npc(bandit).unwrap().body.destination(),
        Some(Vec3::new(-60.0, 0.0, 0.0))
    );

    // The physics layer delivers the bandit to its HQ
    sim.npc_mut(bandit).unwrap().body.position = Vec3::new(-59.0, 0.0, 0.0);
    sim.tick(0.1).unwrap();

    let stolen = sim.state().packages.get(package).unwrap();
    assert!(stolen.is_retired());
    assert_eq!(stolen.status(), ObjectiveStatus::Failed);
    assert!(sim.npc(bandit).unwrap().body.inventory.is_empty());
    assert_eq!(sim.outcome(), Some(TerminatingState::Lose));
    assert_eq!(sim.log().count_kind("package_claimed"), 1);
}

#[test]
fn test_police_pull_over() {
    let mut config = SimConfig::default();
    config.police.arrest_duration = 2.0;
    let mut sim = sim_with(config);
    let police = sim.spawn_npc(Role::Police, Vec3::new(3.0, 0.0, 0.0)).unwrap();
    sim.state_mut().player.velocity = Vec3::new(0.0, 0.0, 20.0);
    let state = |sim: &Simulation| sim.npc(police).unwrap().current_state();

    sim.tick(0.5).unwrap();
    assert_eq!(state(&sim), Some(StateId::Chase));
    sim.tick(0.5).unwrap();
    assert_eq!(state(&sim), Some(StateId::Attack));
    sim.tick(0.5).unwrap();
    assert!(sim.state().player.is_arrested());
    assert_eq!(sim.state().player.arrested_by(), Some(police));
    assert_eq!(sim.telemetry().times_pulled_over, 1);

    sim.tick(0.5).unwrap();
    assert_eq!(state(&sim), Some(StateId::Apprehended));

    // Arrested at t = 1.5 for 2 s
    ticks(&mut sim, 4, 0.5);
    assert!(!sim.state().player.is_arrested());
    assert!(sim.state().player.controls_enabled());
    assert_eq!(sim.log().count_kind("player_released"), 1);
}

#[test]
fn test_crash_benches_enemies() {
    let mut sim = sim_with(SimConfig::default());
    let bandit = sim.spawn_npc(Role::Bandit, Vec3::new(50.0, 0.0, 50.0)).unwrap();
    let civilian = sim.spawn_npc(Role::Civilian, Vec3::new(-50.0, 0.0, 50.0)).unwrap();
    sim.tick(0.1).unwrap();

    sim.report_collision(bandit, 25.0).unwrap();
    sim.report_collision(civilian, 25.0).unwrap();
    sim.tick(0.1).unwrap();

    let bandit = sim.npc(bandit).unwrap();
    assert!(!bandit.body.nav_enabled);
    assert_eq!(bandit.current_state(), Some(StateId::EngineFailure));
    let civilian = sim.npc(civilian).unwrap();
    assert!(!civilian.body.nav_enabled);
    assert_eq!(civilian.current_state(), Some(StateId::Idle));

    // Recovery window is 3 s
    ticks(&mut sim, 31, 0.1);
    assert!(sim.npc(NpcId(1)).unwrap().body.nav_enabled);
}

#[test]
fn test_restart_cancels_pending_checks() {
    let mut config = SimConfig::default();
    config.package.ttl_after_pickup = 2.0;
    let mut sim = sim_with(config);
    let delivery = sim.add_delivery(Vec3::new(100.0, 0.0, 0.0));
    let package = sim.spawn_package(Vec3::new(1.0, 0.0, 0.0), delivery).unwrap();
    let first_attempt = sim.attempt_id().to_string();

    sim.tick(0.5).unwrap();
    assert!(sim.state().packages.get(package).unwrap().ttl_check().is_pending());

    sim.state_mut().player.position = Vec3::new(-80.0, 0.0, 0.0);
    sim.restart().unwrap();
    assert_ne!(sim.attempt_id(), first_attempt);
    assert_eq!(sim.state().player.position, Vec3::ZERO);

    // Keep the player away from the package so it stays put
    sim.state_mut().player.position = Vec3::new(-80.0, 0.0, 0.0);
    ticks(&mut sim, 10, 0.5);

    let reset = sim.state().packages.get(package).unwrap();
    assert_eq!(reset.status(), ObjectiveStatus::NotStarted);
    assert!(!reset.ttl_check().is_pending());
    assert_eq!(reset.position(), Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(sim.level().status(), ObjectiveStatus::InProgress);
    assert_eq!(sim.outcome(), None);
}
