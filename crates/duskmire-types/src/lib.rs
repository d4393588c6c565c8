//! Shared type definitions for the Duskmire simulation engine.
//!
//! This crate holds the data vocabulary the rest of the workspace speaks:
//! strongly-typed IDs, the actor aggregate, authored-content definitions,
//! battle sessions, and the attempt audit record. It contains invariant
//! helpers but no game logic -- formulas and state machines live in
//! `duskmire-engine`, persistence in `duskmire-store`.
//!
//! # Modules
//!
//! - [`ids`] -- UUID v7 newtype identifiers
//! - [`enums`] -- action families, battle statuses, curve kinds, yield quantities
//! - [`structs`] -- actor aggregate, content definitions, battle session, audit record
//! - [`slots`] -- the fixed 8-slot skill loadout

pub mod enums;
pub mod ids;
pub mod slots;
pub mod structs;

// Re-export everything at the crate root for convenience.
pub use enums::{
    ActionFamily, BattleEventKind, BattleStatus, CurveKind, JOB_MAX_LEVEL, SKILL_BASE_XP,
    SKILL_MAX_LEVEL, YieldQuantity,
};
pub use ids::{ActionDefId, ActorId, AttemptId, BattleId, ItemId, MonsterId, TrackId};
pub use slots::{SLOT_COUNT, SkillSlots, SlotIndex};
pub use structs::{
    ActionAttempt, ActionDefinition, ActorState, BattleEvent, BattleSession, CombatantStats,
    InventoryStack, ItemDefinition, ItemRequirement, MonsterTemplate, ProgressionTrack,
    ResourcePool, YieldEntry,
};
