//! Time-based HP/SP regeneration.
//!
//! Regeneration is quantized to whole-minute ticks against the pool's
//! watermark (`last_regen_at`). Partial minutes are never consumed: a call
//! that finds less than one full tick elapsed returns the pool unchanged,
//! and a call that consumes N ticks advances the watermark by exactly
//! N minutes -- not to `now` -- so the sub-minute remainder carries over to
//! the next call. Repeated polling at any frequency therefore neither loses
//! nor double-counts a single tick.
//!
//! Pure function: the caller persists the returned watermark.

use chrono::{DateTime, Duration, Utc};
use duskmire_types::ResourcePool;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Length of one regeneration tick in milliseconds.
pub const REGEN_TICK_MS: i64 = 60_000;

/// The result of applying regeneration to a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegenOutcome {
    /// New current HP, clamped to the pool's max.
    pub hp: u32,
    /// New current SP, clamped to the pool's max.
    pub sp: u32,
    /// New watermark: the old one advanced by the consumed ticks only.
    pub last_regen_at: DateTime<Utc>,
    /// Whether at least one whole tick elapsed. When false, the other
    /// fields echo the pool unchanged.
    pub did_update: bool,
}

/// Apply regeneration for the whole ticks elapsed between the pool's
/// watermark and `now`.
pub fn apply_regen(now: DateTime<Utc>, pool: &ResourcePool) -> Result<RegenOutcome, EngineError> {
    let elapsed_ms = now
        .signed_duration_since(pool.last_regen_at)
        .num_milliseconds();
    let ticks = elapsed_ms.checked_div(REGEN_TICK_MS).unwrap_or(0);
    if ticks <= 0 {
        return Ok(RegenOutcome {
            hp: pool.current_hp,
            sp: pool.current_sp,
            last_regen_at: pool.last_regen_at,
            did_update: false,
        });
    }

    let ticks_u64 = u64::try_from(ticks).map_err(|_| EngineError::ArithmeticOverflow {
        context: String::from("tick count conversion in apply_regen"),
    })?;
    let hp = regained(pool.current_hp, pool.max_hp, pool.hp_regen_per_minute, ticks_u64);
    let sp = regained(pool.current_sp, pool.max_sp, pool.sp_regen_per_minute, ticks_u64);

    let consumed_ms = ticks
        .checked_mul(REGEN_TICK_MS)
        .ok_or_else(|| EngineError::ArithmeticOverflow {
            context: String::from("consumed milliseconds overflow in apply_regen"),
        })?;
    let last_regen_at = pool
        .last_regen_at
        .checked_add_signed(Duration::milliseconds(consumed_ms))
        .ok_or_else(|| EngineError::ArithmeticOverflow {
            context: String::from("watermark advance overflow in apply_regen"),
        })?;

    Ok(RegenOutcome {
        hp,
        sp,
        last_regen_at,
        did_update: true,
    })
}

/// Current value plus `ticks * per_minute`, clamped to `max`.
fn regained(current: u32, max: u32, per_minute: u32, ticks: u64) -> u32 {
    let gain = ticks.saturating_mul(u64::from(per_minute));
    let total = u64::from(current).saturating_add(gain).min(u64::from(max));
    // total <= max which fits in u32.
    u32::try_from(total).unwrap_or(max)
}
