//! World Collaborators
//!
//! Navigation queries answered by the excluded navmesh layer, and the fixed
//! locations packages move between.

pub mod locations;
pub mod navigation;

pub use locations::{BanditHq, BanditHqs, DeliveryLocation};
pub use navigation::{Navigation, OpenGround};
