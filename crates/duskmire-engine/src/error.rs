//! Error types for the simulation engine.
//!
//! The variants split into the taxonomy the callers care about:
//!
//! - business errors reported to the player with no state change
//!   (insufficient materials, locked track, missing or disabled content,
//!   terminal battle);
//! - invariant violations that reject the input outright (negative XP
//!   delta, malformed stack cap, level out of range);
//! - storage failures, including the retryable optimistic-lock conflict --
//!   check [`EngineError::is_retryable`] and retry the whole operation from
//!   scratch, never a part of it.

use duskmire_types::{ActionDefId, ActorId, BattleStatus, ItemId, MonsterId, TrackId};

use duskmire_store::StoreError;

/// Errors that can occur during engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// No action definition exists for the given ID.
    #[error("action not found: {0}")]
    ActionNotFound(ActionDefId),

    /// The action definition exists but is disabled.
    #[error("action is inactive: {0}")]
    ActionInactive(ActionDefId),

    /// The actor has not unlocked the progression track the operation needs.
    #[error("track not unlocked: {0}")]
    TrackNotUnlocked(TrackId),

    /// The actor does not hold enough of a required input material.
    #[error("insufficient materials: need {required} of {item}, have {available}")]
    InsufficientMaterials {
        /// The missing item.
        item: ItemId,
        /// Units the action requires.
        required: u32,
        /// Units the actor holds across all stacks.
        available: u64,
    },

    /// A yield or requirement references an item with no definition.
    #[error("item not found: {0}")]
    ItemNotFound(ItemId),

    /// A battle references a monster template with no definition.
    #[error("monster not found: {0}")]
    MonsterNotFound(MonsterId),

    /// The battle session is already in a terminal state.
    #[error("battle is already over: {0:?}")]
    BattleOver(BattleStatus),

    /// XP deltas must be non-negative; progression never moves backwards.
    #[error("negative XP delta: {delta}")]
    NegativeXpDelta {
        /// The rejected delta.
        delta: i64,
    },

    /// The requested level does not exist on the curve.
    #[error("level {level} out of range (max {max_level})")]
    LevelOutOfRange {
        /// The rejected level.
        level: u32,
        /// The curve's cap.
        max_level: u32,
    },

    /// A stackable item was configured with a stack cap below 1.
    #[error("invalid stack cap {cap} for item {item}")]
    InvalidStackCap {
        /// The misconfigured item.
        item: ItemId,
        /// The rejected cap.
        cap: u32,
    },

    /// The actor exceeded the attempt rate limit; try again later.
    #[error("rate limited: {actor}")]
    RateLimited {
        /// The throttled actor.
        actor: ActorId,
    },

    /// An arithmetic overflow occurred during a computation.
    #[error("arithmetic overflow: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },

    /// A storage operation failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl EngineError {
    /// Whether retrying the whole operation from a fresh load can succeed.
    ///
    /// True exactly for optimistic-lock conflicts. Retrying means repeating
    /// the entire attempt -- including the success roll -- against fresh
    /// state, never replaying part of a previous attempt.
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Store(err) => err.is_retryable(),
            _ => false,
        }
    }
}
