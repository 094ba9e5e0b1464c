//! Identifier Types
//!
//! Small copyable handles for every entity the core tracks. They display with
//! a type prefix (`pkg_0003`) so logs and JSONL output stay readable.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// Returns the raw index.
            pub fn index(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "_{:04}"), self.0)
            }
        }
    };
}

entity_id!(
    /// Identifies any objective (package or level).
    ObjectiveId,
    "obj"
);
entity_id!(
    /// Identifies a package in the world.
    PackageId,
    "pkg"
);
entity_id!(
    /// Identifies a non-player vehicle.
    NpcId,
    "npc"
);
entity_id!(
    /// Identifies a bandit drop-off headquarters.
    HqId,
    "hq"
);
entity_id!(
    /// Identifies a delivery location.
    DeliveryId,
    "dest"
);
