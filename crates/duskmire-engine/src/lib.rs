//! Progression and economy simulation engine for Duskmire.
//!
//! This crate is the authoritative logic layer: it turns player actions
//! (craft, gather, fight, idle time) into state changes, without touching
//! I/O itself. It sits between `duskmire-types` (the data vocabulary) and
//! the hosting layer, and reaches persistence only through the traits in
//! `duskmire-store`.
//!
//! The pure components ([`progression`], [`regen`], [`inventory`],
//! [`battle`], [`chance`]) have no shared mutable state and are safe to
//! call concurrently. [`engine::SimEngine`] composes them into atomic,
//! per-request operations over a versioned store.
//!
//! # Modules
//!
//! - [`battle`] -- turn-based combat state machine and the shared damage formula
//! - [`chance`] -- success-chance, XP-award, and yield-roll formulas
//! - [`config`] -- tunable parameters ([`TuningConfig`])
//! - [`engine`] -- the transactional façade ([`SimEngine`])
//! - [`error`] -- error taxonomy ([`EngineError`])
//! - [`inventory`] -- stack-aware inventory operations
//! - [`progression`] -- XP curves, level derivation, XP application
//! - [`ratelimit`] -- per-actor sliding-window throttle
//! - [`regen`] -- whole-minute HP/SP regeneration

pub mod battle;
pub mod chance;
pub mod config;
pub mod engine;
pub mod error;
pub mod inventory;
pub mod progression;
pub mod ratelimit;
pub mod regen;

// Re-export primary types at the crate root for convenience.
pub use battle::{DAMAGE_VARIANCE, ExchangeOutcome, flee, resolve_exchange, roll_damage};
pub use chance::{roll_pct, roll_quantity, success_chance_pct, xp_award};
pub use config::{ChanceParams, RateLimitParams, TuningConfig, XpAwardParams};
pub use engine::{AttemptOutcome, ItemAward, SimEngine};
pub use error::EngineError;
pub use inventory::{add_to_stacks, count_item, has_item, remove_from_stacks};
pub use progression::{
    BoundedLinearCurve, Curve, ExponentialCurve, LevelProgress, XpApplied, apply_xp, curve_for,
    level_from_xp, progress, track_level, xp_for_level,
};
pub use ratelimit::SlidingWindowLimiter;
pub use regen::{REGEN_TICK_MS, RegenOutcome, apply_regen};
