//! Simulation errors.
//!
//! Wiring problems (a role missing a state it transitions to, an unknown
//! entity reference) surface here. Precondition violations on objectives are
//! not errors; those functions log and return `false`.

use courier_events::{DeliveryId, HqId, NpcId, PackageId, Role, SessionError, StateId};
use grader::GradeError;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("{role} {npc} has no registered {state} state")]
    MissingState {
        npc: NpcId,
        role: Role,
        state: StateId,
    },
    #[error("initial state {state} is not registered for {role}")]
    InvalidInitialState { role: Role, state: StateId },
    #[error("unknown package {0}")]
    UnknownPackage(PackageId),
    #[error("unknown npc {0}")]
    UnknownNpc(NpcId),
    #[error("unknown delivery location {0}")]
    UnknownDelivery(DeliveryId),
    #[error("unknown bandit HQ {0}")]
    UnknownHq(HqId),
    #[error("grading failed: {0}")]
    Grade(#[from] GradeError),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("session error: {0}")]
    Session(#[from] SessionError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
