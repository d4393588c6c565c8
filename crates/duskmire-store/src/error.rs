//! Error types for the storage layer.

use duskmire_types::{ActorId, BattleId};

/// Errors that can occur in the storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No actor row exists for the given ID.
    #[error("actor not found: {0}")]
    ActorNotFound(ActorId),

    /// An actor row already exists for the given ID.
    #[error("actor already exists: {0}")]
    ActorExists(ActorId),

    /// No battle row exists for the given ID.
    #[error("battle not found: {0}")]
    BattleNotFound(BattleId),

    /// A battle row already exists for the given ID.
    #[error("battle already exists: {0}")]
    BattleExists(BattleId),

    /// The row changed between load and commit. The whole operation must be
    /// retried from a fresh load; nothing was written.
    #[error("version conflict: snapshot at {expected}, row at {actual}")]
    VersionConflict {
        /// The version the writer loaded.
        expected: u64,
        /// The version the row holds now.
        actual: u64,
    },
}

impl StoreError {
    /// Whether retrying the whole operation from a fresh load can succeed.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::VersionConflict { .. })
    }
}
