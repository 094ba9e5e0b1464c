//! Notification Types
//!
//! Everything the core publishes for presentation and telemetry consumers:
//! objective status changes, NPC state changes, package hand-offs, arrests.
//! Notifications are fire-and-forget; the core never waits on a consumer.

use serde::{Deserialize, Serialize};

use crate::ids::{HqId, NpcId, ObjectiveId, PackageId};
use crate::timestamp::SimTimestamp;
use crate::types::{Carrier, ObjectiveStatus, Role, StateId};

/// A single published change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    /// An objective moved to a new status
    ObjectiveUpdated {
        objective: ObjectiveId,
        name: String,
        status: ObjectiveStatus,
    },
    /// An NPC's state machine switched states
    StateChanged {
        npc: NpcId,
        role: Role,
        from: StateId,
        to: StateId,
    },
    /// A package was picked up
    PackageCollected { package: PackageId, carrier: Carrier },
    /// A package was put back into the world
    PackageDropped { package: PackageId, carrier: Carrier },
    /// A package changed hands by force
    PackageStolen {
        package: PackageId,
        from: Carrier,
        to: Carrier,
    },
    /// A bandit chose the HQ it will bring a package to
    PackageClaimed { package: PackageId, hq: HqId },
    /// A package was retired for good
    PackageDelivered {
        package: PackageId,
        success: bool,
        final_health: f32,
    },
    /// A package lost health
    PackageDamaged {
        package: PackageId,
        amount: f32,
        health: f32,
    },
    /// The player's health changed
    PlayerHealthChanged { health: f32, max_health: f32 },
    /// Police pinned the player in place
    PlayerArrested { npc: NpcId, release_at: f32 },
    /// The player regained control after an arrest
    PlayerReleased,
    /// An NPC is about to recover from an engine failure
    EngineStartupCue { npc: NpcId },
}

impl Notification {
    /// Short snake_case label for the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Notification::ObjectiveUpdated { .. } => "objective_updated",
            Notification::StateChanged { .. } => "state_changed",
            Notification::PackageCollected { .. } => "package_collected",
            Notification::PackageDropped { .. } => "package_dropped",
            Notification::PackageStolen { .. } => "package_stolen",
            Notification::PackageClaimed { .. } => "package_claimed",
            Notification::PackageDelivered { .. } => "package_delivered",
            Notification::PackageDamaged { .. } => "package_damaged",
            Notification::PlayerHealthChanged { .. } => "player_health_changed",
            Notification::PlayerArrested { .. } => "player_arrested",
            Notification::PlayerReleased => "player_released",
            Notification::EngineStartupCue { .. } => "engine_startup_cue",
        }
    }

    /// Returns the package this notification concerns, if any.
    pub fn package(&self) -> Option<PackageId> {
        match self {
            Notification::PackageCollected { package, .. }
            | Notification::PackageDropped { package, .. }
            | Notification::PackageStolen { package, .. }
            | Notification::PackageClaimed { package, .. }
            | Notification::PackageDelivered { package, .. }
            | Notification::PackageDamaged { package, .. } => Some(*package),
            _ => None,
        }
    }

    /// Returns the NPC this notification concerns, if any.
    pub fn npc(&self) -> Option<NpcId> {
        match self {
            Notification::StateChanged { npc, .. }
            | Notification::PlayerArrested { npc, .. }
            | Notification::EngineStartupCue { npc } => Some(*npc),
            Notification::PackageStolen { from, to, .. } => match (from, to) {
                (Carrier::Npc(id), _) | (_, Carrier::Npc(id)) => Some(*id),
                _ => None,
            },
            _ => None,
        }
    }
}

/// A notification stamped with when it happened, as written to the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedNotification {
    pub notification_id: String,
    pub timestamp: SimTimestamp,
    #[serde(flatten)]
    pub notification: Notification,
}

impl LoggedNotification {
    /// Creates a new logged notification.
    pub fn new(
        notification_id: impl Into<String>,
        timestamp: SimTimestamp,
        notification: Notification,
    ) -> Self {
        Self {
            notification_id: notification_id.into(),
            timestamp,
            notification,
        }
    }

    /// Serializes to a single JSONL line (no trailing newline).
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parses a single JSONL line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// Generates a notification ID with the given sequence number.
pub fn generate_notification_id(sequence: u64) -> String {
    format!("ntf_{:08}", sequence)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_tagging() {
        let n = Notification::StateChanged {
            npc: NpcId(2),
            role: Role::Bandit,
            from: StateId::Idle,
            to: StateId::Chase,
        };

        let json = serde_json::to_string(&n).unwrap();
        assert!(json.contains(r#""kind":"state_changed""#));
        assert!(json.contains(r#""to":"chase""#));
        assert_eq!(n.kind(), "state_changed");
    }

    #[test]
    fn test_logged_notification_jsonl() {
        let logged = LoggedNotification::new(
            generate_notification_id(1),
            SimTimestamp::new(10, 0.5),
            Notification::PackageCollected {
                package: PackageId(1),
                carrier: Carrier::Player,
            },
        );

        let line = logged.to_jsonl().unwrap();
        assert!(!line.contains('\n'));
        assert!(line.contains(r#""kind":"package_collected""#));

        let parsed = LoggedNotification::from_jsonl(&line).unwrap();
        assert_eq!(parsed, logged);
    }

    #[test]
    fn test_notification_subjects() {
        let stolen = Notification::PackageStolen {
            package: PackageId(5),
            from: Carrier::Player,
            to: Carrier::Npc(NpcId(9)),
        };
        assert_eq!(stolen.package(), Some(PackageId(5)));
        assert_eq!(stolen.npc(), Some(NpcId(9)));

        assert_eq!(Notification::PlayerReleased.package(), None);
        assert_eq!(Notification::PlayerReleased.npc(), None);
    }

    #[test]
    fn test_generate_notification_id() {
        assert_eq!(generate_notification_id(1), "ntf_00000001");
        assert_eq!(generate_notification_id(4242), "ntf_00004242");
    }
}
