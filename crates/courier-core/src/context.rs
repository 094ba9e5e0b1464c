//! Simulation Context
//!
//! Everything a state update or objective check may read or touch, passed
//! in explicitly. [`SimState`] owns it; [`SimContext`] is the borrowed view
//! handed to each NPC update while the NPC list is borrowed separately.

use courier_events::{Notification, SimTimestamp};
use glam::Vec3;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::components::Player;
use crate::config::SimConfig;
use crate::npc::roles::AttackRecord;
use crate::objective::PackageRoster;
use crate::world::{BanditHqs, DeliveryLocation, Navigation};

/// Owned world state outside the NPC list.
#[derive(Debug)]
pub struct SimState {
    pub clock: SimTimestamp,
    pub config: SimConfig,
    pub rng: SmallRng,
    pub navigation: Box<dyn Navigation>,
    pub player: Player,
    pub packages: PackageRoster,
    pub hqs: BanditHqs,
    pub deliveries: Vec<DeliveryLocation>,
    /// Notifications raised by states, drained at the end of each tick
    pub outbox: Vec<Notification>,
    /// Attacks carried out this tick
    pub attacks: Vec<AttackRecord>,
}

impl SimState {
    pub fn new(
        config: SimConfig,
        seed: u64,
        navigation: Box<dyn Navigation>,
        player_spawn: Vec3,
    ) -> Self {
        let player = Player::new(player_spawn, &config.player);
        Self {
            clock: SimTimestamp::start(),
            config,
            rng: SmallRng::seed_from_u64(seed),
            navigation,
            player,
            packages: PackageRoster::new(),
            hqs: BanditHqs::new(),
            deliveries: Vec::new(),
            outbox: Vec::new(),
            attacks: Vec::new(),
        }
    }

    pub fn now(&self) -> f32 {
        self.clock.seconds
    }

    /// Borrows the state as a context for one round of updates.
    pub fn context(&mut self) -> SimContext<'_> {
        SimContext {
            now: self.clock.seconds,
            config: &self.config,
            navigation: self.navigation.as_ref(),
            rng: &mut self.rng,
            player: &mut self.player,
            packages: &mut self.packages,
            hqs: &mut self.hqs,
            outbox: &mut self.outbox,
            attacks: &mut self.attacks,
        }
    }
}

pub struct SimContext<'a> {
    pub now: f32,
    pub config: &'a SimConfig,
    pub navigation: &'a dyn Navigation,
    pub rng: &'a mut SmallRng,
    pub player: &'a mut Player,
    pub packages: &'a mut PackageRoster,
    pub hqs: &'a mut BanditHqs,
    pub outbox: &'a mut Vec<Notification>,
    pub attacks: &'a mut Vec<AttackRecord>,
}

impl SimContext<'_> {
    /// Whether the player carries anything still worth stealing.
    pub fn player_has_undelivered(&self) -> bool {
        self.player.inventory.iter().any(|id| {
            self.packages
                .get(id)
                .map(|p| p.is_undelivered())
                .unwrap_or(false)
        })
    }
}
