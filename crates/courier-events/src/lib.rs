//! Shared data types for the courier simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! It is a dependency for all other crates in the workspace.

pub mod ids;
pub mod notification;
pub mod report;
pub mod session;
pub mod timestamp;
pub mod types;

// Re-export identifier types
pub use ids::{DeliveryId, HqId, NpcId, ObjectiveId, PackageId};

// Re-export timestamp types
pub use timestamp::SimTimestamp;

// Re-export shared enums
pub use types::{
    Carrier, CooldownKind, LetterGrade, ObjectiveStatus, PrereqOperator, Role, StateId,
    TerminatingState,
};

// Re-export notification types
pub use notification::{generate_notification_id, LoggedNotification, Notification};

// Re-export report types
pub use report::{CategoryScore, RunReport};

// Re-export session types
pub use session::{SessionError, SessionId};
