//! Components
//!
//! State held by the player and NPCs: inventories, health, the player itself.

pub mod health;
pub mod inventory;
pub mod player;

pub use health::{HealthPool, HitModel};
pub use inventory::Inventory;
pub use player::Player;
