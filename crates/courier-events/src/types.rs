//! Shared Enumerations
//!
//! Status and role enums used by the core, the grader, and anything that
//! consumes notifications.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::NpcId;

/// Lifecycle of an objective.
///
/// Transitions only `NotStarted -> InProgress -> {Complete, Failed}`; a reset
/// returns to `NotStarted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveStatus {
    #[default]
    NotStarted,
    InProgress,
    Complete,
    Failed,
}

impl ObjectiveStatus {
    /// Returns true for `Complete` and `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, ObjectiveStatus::Complete | ObjectiveStatus::Failed)
    }
}

impl fmt::Display for ObjectiveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectiveStatus::NotStarted => write!(f, "not_started"),
            ObjectiveStatus::InProgress => write!(f, "in_progress"),
            ObjectiveStatus::Complete => write!(f, "complete"),
            ObjectiveStatus::Failed => write!(f, "failed"),
        }
    }
}

/// How prerequisite statuses combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrereqOperator {
    /// Every prerequisite must match
    #[default]
    And,
    /// At least one prerequisite must match
    Or,
}

/// NPC role, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Civilian,
    Bandit,
    Police,
}

impl Role {
    /// Roles that chase and attack the player.
    pub fn is_enemy(self) -> bool {
        matches!(self, Role::Bandit | Role::Police)
    }

    /// Returns all role variants.
    pub fn all() -> &'static [Role] {
        &[Role::Civilian, Role::Bandit, Role::Police]
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Civilian => write!(f, "civilian"),
            Role::Bandit => write!(f, "bandit"),
            Role::Police => write!(f, "police"),
        }
    }
}

/// Behavior state identifiers. Transitions name their target with one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateId {
    Idle,
    Chase,
    Attack,
    Flee,
    Apprehended,
    EngineFailure,
}

impl StateId {
    /// Returns true for the fixed-duration cooldown states.
    pub fn is_cooldown(self) -> bool {
        matches!(self, StateId::Apprehended | StateId::EngineFailure)
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateId::Idle => write!(f, "idle"),
            StateId::Chase => write!(f, "chase"),
            StateId::Attack => write!(f, "attack"),
            StateId::Flee => write!(f, "flee"),
            StateId::Apprehended => write!(f, "apprehended"),
            StateId::EngineFailure => write!(f, "engine_failure"),
        }
    }
}

/// Which cooldown an NPC is forced into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CooldownKind {
    /// Caught by the player, or resting after an arrest
    Apprehended,
    /// Crashed and stalled
    EngineFailure,
}

impl CooldownKind {
    /// The state that implements this cooldown.
    pub fn state(self) -> StateId {
        match self {
            CooldownKind::Apprehended => StateId::Apprehended,
            CooldownKind::EngineFailure => StateId::EngineFailure,
        }
    }
}

/// Whoever currently holds a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum Carrier {
    Player,
    Npc(NpcId),
}

impl fmt::Display for Carrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Carrier::Player => write!(f, "player"),
            Carrier::Npc(id) => write!(f, "{}", id),
        }
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminatingState {
    Win,
    Lose,
    Quit,
    Restart,
}

impl fmt::Display for TerminatingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminatingState::Win => write!(f, "win"),
            TerminatingState::Lose => write!(f, "lose"),
            TerminatingState::Quit => write!(f, "quit"),
            TerminatingState::Restart => write!(f, "restart"),
        }
    }
}

/// Letter grade for a finished run. `I` marks an incomplete run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LetterGrade {
    S,
    A,
    B,
    C,
    D,
    F,
    I,
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LetterGrade::S => "S",
            LetterGrade::A => "A",
            LetterGrade::B => "B",
            LetterGrade::C => "C",
            LetterGrade::D => "D",
            LetterGrade::F => "F",
            LetterGrade::I => "I",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        assert!(!ObjectiveStatus::NotStarted.is_terminal());
        assert!(!ObjectiveStatus::InProgress.is_terminal());
        assert!(ObjectiveStatus::Complete.is_terminal());
        assert!(ObjectiveStatus::Failed.is_terminal());
    }

    #[test]
    fn test_cooldown_kind_maps_to_state() {
        assert_eq!(CooldownKind::Apprehended.state(), StateId::Apprehended);
        assert_eq!(CooldownKind::EngineFailure.state(), StateId::EngineFailure);
        assert!(CooldownKind::EngineFailure.state().is_cooldown());
        assert!(!StateId::Chase.is_cooldown());
    }

    #[test]
    fn test_role_enemies() {
        assert!(!Role::Civilian.is_enemy());
        assert!(Role::Bandit.is_enemy());
        assert!(Role::Police.is_enemy());
        assert_eq!(Role::all().len(), 3);
    }

    #[test]
    fn test_enum_serialization() {
        assert_eq!(
            serde_json::to_string(&ObjectiveStatus::InProgress).unwrap(),
            r#""in_progress""#
        );
        assert_eq!(
            serde_json::to_string(&StateId::EngineFailure).unwrap(),
            r#""engine_failure""#
        );
        assert_eq!(serde_json::to_string(&LetterGrade::S).unwrap(), r#""S""#);
        assert_eq!(
            serde_json::to_string(&TerminatingState::Restart).unwrap(),
            r#""restart""#
        );
    }

    #[test]
    fn test_carrier_serialization() {
        let json = serde_json::to_string(&Carrier::Npc(NpcId(4))).unwrap();
        assert_eq!(json, r#"{"type":"npc","id":4}"#);

        let player: Carrier = serde_json::from_str(r#"{"type":"player"}"#).unwrap();
        assert_eq!(player, Carrier::Player);
    }
}
