//! Tunable parameters for the outcome formulas and the rate limiter.
//!
//! Everything probability- or reward-shaped in the engine reads from
//! [`TuningConfig`] so that game balance can be adjusted (and tests can pin
//! outcomes) without touching formula code. All chances are expressed as
//! whole percentages (0--100); there is no floating point anywhere in the
//! pipeline.

// ---------------------------------------------------------------------------
// ChanceParams
// ---------------------------------------------------------------------------

/// Parameters of the clamped linear success-chance formula.
///
/// `chance_pct = clamp(floor_pct, ceiling_pct, base_pct + (level - tier) * step_pct)`
///
/// Setting `floor_pct == ceiling_pct` pins the chance outright, which is how
/// tests force deterministic success or failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChanceParams {
    /// Chance in percent when level equals the action tier.
    pub base_pct: u32,
    /// Percentage points gained (or lost) per level of difference.
    pub step_pct: u32,
    /// Lower clamp in percent.
    pub floor_pct: u32,
    /// Upper clamp in percent.
    pub ceiling_pct: u32,
}

impl ChanceParams {
    /// Crafting defaults: `clamp(20, 95, 55 + (level - difficulty) * 7)`.
    pub const fn crafting() -> Self {
        Self {
            base_pct: 55,
            step_pct: 7,
            floor_pct: 20,
            ceiling_pct: 95,
        }
    }

    /// Gathering defaults: `clamp(30, 98, 65 + (level - danger) * 6)`.
    pub const fn gathering() -> Self {
        Self {
            base_pct: 65,
            step_pct: 6,
            floor_pct: 30,
            ceiling_pct: 98,
        }
    }
}

// ---------------------------------------------------------------------------
// XpAwardParams
// ---------------------------------------------------------------------------

/// Parameters of the asymmetric XP award.
///
/// Failed attempts still teach: the failure award is smaller but never zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XpAwardParams {
    /// Base XP on success.
    pub success_base: u32,
    /// Extra XP per action tier on success.
    pub success_per_tier: u32,
    /// Base XP on failure.
    pub failure_base: u32,
    /// Extra XP per action tier on failure.
    pub failure_per_tier: u32,
}

impl XpAwardParams {
    /// Crafting defaults: `15 + 5 * difficulty` on success, `5 + 2 * difficulty`
    /// on failure.
    pub const fn crafting() -> Self {
        Self {
            success_base: 15,
            success_per_tier: 5,
            failure_base: 5,
            failure_per_tier: 2,
        }
    }

    /// Gathering defaults: `8 + 3 * danger` on success, `3 + danger` on failure.
    pub const fn gathering() -> Self {
        Self {
            success_base: 8,
            success_per_tier: 3,
            failure_base: 3,
            failure_per_tier: 1,
        }
    }
}

// ---------------------------------------------------------------------------
// RateLimitParams
// ---------------------------------------------------------------------------

/// Sliding-window rate limit applied to attempt calls, per actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitParams {
    /// Window length in seconds (default: 60).
    pub window_secs: i64,
    /// Attempts allowed within one window (default: 30).
    pub max_attempts: u32,
}

impl Default for RateLimitParams {
    fn default() -> Self {
        Self {
            window_secs: 60,
            max_attempts: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// TuningConfig
// ---------------------------------------------------------------------------

/// The full set of engine tunables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TuningConfig {
    /// Success chance for crafting attempts.
    pub crafting_chance: ChanceParams,
    /// Success chance for gathering attempts.
    pub gathering_chance: ChanceParams,
    /// XP awards for crafting attempts.
    pub crafting_xp: XpAwardParams,
    /// XP awards for gathering attempts.
    pub gathering_xp: XpAwardParams,
    /// Per-actor attempt throttle.
    pub rate_limit: RateLimitParams,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            crafting_chance: ChanceParams::crafting(),
            gathering_chance: ChanceParams::gathering(),
            crafting_xp: XpAwardParams::crafting(),
            gathering_xp: XpAwardParams::gathering(),
            rate_limit: RateLimitParams::default(),
        }
    }
}
