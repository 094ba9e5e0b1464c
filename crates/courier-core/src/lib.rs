//! Core courier simulation: objectives, NPC behavior and the tick loop.
//!
//! # Modules
//!
//! - [`objective`]: The objective lifecycle, packages and the level
//! - [`npc`]: NPC bodies, the state machine, behavior states and roles
//! - [`simulation`]: The per-tick driver owning one level attempt
//! - [`telemetry`]: Run statistics feeding the report and the grader
//! - [`events`]: The notification log and its JSONL writer
//! - [`setup`]: Demo level and stand-in physics for headless runs

pub mod components;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod notify;
pub mod npc;
pub mod objective;
pub mod setup;
pub mod simulation;
pub mod telemetry;
pub mod timers;
pub mod world;

pub use config::SimConfig;
pub use context::{SimContext, SimState};
pub use error::SimError;
pub use npc::{Npc, NpcBody};
pub use objective::{Level, Objective, Package};
pub use simulation::{Simulation, TickSummary};
pub use telemetry::RunTelemetry;
pub use timers::DeferredCheck;
