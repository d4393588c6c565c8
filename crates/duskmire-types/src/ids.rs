//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Every entity in the game has a strongly-typed ID to prevent accidental
//! mixing of identifiers at compile time. All IDs use UUID v7 (time-ordered)
//! so that audit rows and battle logs sort chronologically by key.
//!
//! The `new()` constructors exist for app-side generation (attempt records,
//! battle sessions, tests); content IDs normally arrive from the authoring
//! pipeline already minted.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for an actor (a player character that can act).
    ActorId
}

define_id! {
    /// Unique identifier for an item kind.
    ItemId
}

define_id! {
    /// Unique identifier for a progression track (a job or a skill).
    TrackId
}

define_id! {
    /// Unique identifier for an authored action definition (recipe or
    /// gathering node).
    ActionDefId
}

define_id! {
    /// Unique identifier for an authored monster template.
    MonsterId
}

define_id! {
    /// Unique identifier for a battle session.
    BattleId
}

define_id! {
    /// Unique identifier for an action-attempt audit record.
    AttemptId
}
