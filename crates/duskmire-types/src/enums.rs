//! Enumeration types for the Duskmire simulation engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Action families
// ---------------------------------------------------------------------------

/// The family of an authored action, which selects the success-chance and
/// XP-award parameter sets applied to an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ActionFamily {
    /// Combine input materials into an output item. Inputs are always
    /// consumed, even when the attempt fails.
    Crafting,
    /// Harvest items from a node. Has no inputs to consume.
    Gathering,
}

// ---------------------------------------------------------------------------
// Battle state machine
// ---------------------------------------------------------------------------

/// The lifecycle state of a battle session.
///
/// `Active` is the only non-terminal state. Transitions are
/// `Active -> Won | Lost | Fled`; every transition out of a terminal state
/// is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum BattleStatus {
    /// The battle is in progress and exchanges can be resolved.
    Active,
    /// The monster was defeated.
    Won,
    /// The player was defeated.
    Lost,
    /// The player ran from the battle.
    Fled,
}

impl BattleStatus {
    /// Whether this status admits no further transitions.
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Active)
    }
}

/// The kind of a single narrative event within a battle exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum BattleEventKind {
    /// The player struck the monster.
    PlayerStrike,
    /// The monster struck the player.
    MonsterStrike,
    /// The player fled the battle.
    Fled,
}

// ---------------------------------------------------------------------------
// Progression curves
// ---------------------------------------------------------------------------

/// Maximum level on the bounded linear (job) curve.
pub const JOB_MAX_LEVEL: u32 = 10;

/// Maximum level on the exponential (skill) curve.
pub const SKILL_MAX_LEVEL: u32 = 99;

/// Default base XP for the exponential skill curve.
pub const SKILL_BASE_XP: u64 = 100;

/// Which XP curve a progression track uses.
///
/// Job tracks use a short bounded linear curve; skill tracks use a long
/// exponential curve. The parameters live in the data so authored content
/// can introduce additional track shapes without a code change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum CurveKind {
    /// Advancing from level `n` to `n + 1` costs `100 * n` XP, capped at
    /// `max_level`.
    BoundedLinear {
        /// The level at which the curve stops awarding levels.
        max_level: u32,
    },
    /// Reaching level `L` (for `L >= 2`) costs
    /// `floor(curve_base^(L - 2) * base_xp)` XP, capped at `max_level`.
    Exponential {
        /// The level at which the curve stops awarding levels.
        max_level: u32,
        /// XP cost of the very first level-up.
        base_xp: u64,
        /// Per-level cost multiplier, e.g. `1.10`.
        #[ts(as = "String")]
        curve_base: Decimal,
    },
}

impl CurveKind {
    /// The standard job curve: bounded linear, capped at level 10.
    pub const fn job() -> Self {
        Self::BoundedLinear {
            max_level: JOB_MAX_LEVEL,
        }
    }

    /// The standard skill curve: exponential with a 1.10 base, capped at
    /// level 99.
    pub fn skill() -> Self {
        Self::Exponential {
            max_level: SKILL_MAX_LEVEL,
            base_xp: SKILL_BASE_XP,
            curve_base: Decimal::new(110, 2),
        }
    }

    /// The level cap of this curve.
    pub const fn max_level(&self) -> u32 {
        match self {
            Self::BoundedLinear { max_level } | Self::Exponential { max_level, .. } => *max_level,
        }
    }
}

// ---------------------------------------------------------------------------
// Yield quantities
// ---------------------------------------------------------------------------

/// How many units a yield-table row grants when it is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum YieldQuantity {
    /// Always grant exactly this many units.
    Fixed(u32),
    /// Grant a uniformly random count in `min..=max`.
    Range {
        /// Inclusive lower bound.
        min: u32,
        /// Inclusive upper bound.
        max: u32,
    },
}
