//! The versioned load/commit interface the engine runs transactions against.
//!
//! Every mutating operation in the engine follows the same shape: load a
//! versioned snapshot, mutate the local copy, commit the whole snapshot
//! back. The commit either publishes everything (state, audit record) or
//! nothing -- a failed commit leaves the store exactly as it was, and a
//! [`StoreError::VersionConflict`] tells the caller to retry from a fresh
//! load. Serialization of concurrent writers per actor (and per battle) is
//! therefore a property of the interface, not a convention.

use duskmire_types::{ActionAttempt, ActorId, ActorState, BattleId, BattleSession};

use crate::error::StoreError;

// ---------------------------------------------------------------------------
// Versioned snapshots
// ---------------------------------------------------------------------------

/// An actor aggregate together with the row version it was loaded at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedActor {
    /// The row version this snapshot was taken from.
    pub version: u64,
    /// The actor aggregate.
    pub state: ActorState,
}

/// A battle session together with the row version it was loaded at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedBattle {
    /// The row version this snapshot was taken from.
    pub version: u64,
    /// The battle session.
    pub session: BattleSession,
}

// ---------------------------------------------------------------------------
// EngineStore
// ---------------------------------------------------------------------------

/// Storage interface for actor aggregates and battle sessions.
///
/// Implementations must guarantee that a commit with a stale version writes
/// nothing and returns [`StoreError::VersionConflict`], and that a
/// successful [`commit_actor`](Self::commit_actor) publishes the snapshot
/// and the attempt record atomically.
pub trait EngineStore {
    /// Load the actor aggregate at its current version.
    fn load_actor(&self, id: ActorId) -> Result<VersionedActor, StoreError>;

    /// Publish a mutated actor snapshot, optionally appending an
    /// attempt-history record in the same atomic step. Returns the new row
    /// version.
    fn commit_actor(
        &self,
        actor: VersionedActor,
        attempt: Option<ActionAttempt>,
    ) -> Result<u64, StoreError>;

    /// Create a battle row. Fails if the session ID already exists.
    fn insert_battle(&self, session: BattleSession) -> Result<(), StoreError>;

    /// Load a battle session at its current version.
    fn load_battle(&self, id: BattleId) -> Result<VersionedBattle, StoreError>;

    /// Publish a mutated battle snapshot. Returns the new row version.
    fn commit_battle(&self, battle: VersionedBattle) -> Result<u64, StoreError>;
}
