//! XP curves and level derivation.
//!
//! One [`Curve`] strategy interface with two concrete implementations:
//! a short bounded linear curve for job tracks and a long exponential curve
//! for skill tracks. Everything above the per-level cost -- level
//! derivation, prefix sums, progress fractions, XP application -- is shared
//! and works on `&dyn Curve`, so the two curves can never drift apart in
//! behavior.
//!
//! All functions here are pure: no side effects, no ambient state, safe to
//! call concurrently and to replay.

use duskmire_types::{CurveKind, ProgressionTrack};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

// ---------------------------------------------------------------------------
// Curve strategy
// ---------------------------------------------------------------------------

/// The per-level cost schedule of an XP curve.
pub trait Curve {
    /// The level at which this curve stops awarding levels.
    fn max_level(&self) -> u32;

    /// XP required to advance from `level` to `level + 1`.
    ///
    /// Returns `None` when `level` is 0, at or above the cap, or when the
    /// cost overflows.
    fn xp_to_advance(&self, level: u32) -> Option<u64>;
}

/// Advancing from level `n` costs `100 * n` XP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundedLinearCurve {
    /// The level cap.
    pub max_level: u32,
}

impl Curve for BoundedLinearCurve {
    fn max_level(&self) -> u32 {
        self.max_level
    }

    fn xp_to_advance(&self, level: u32) -> Option<u64> {
        if level == 0 || level >= self.max_level {
            return None;
        }
        u64::from(level).checked_mul(100)
    }
}

/// Reaching level `L` (for `L >= 2`) costs `floor(curve_base^(L-2) * base_xp)`.
///
/// The power is computed by iterated [`Decimal`] multiplication, so the
/// schedule is exact and identical on every platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExponentialCurve {
    /// The level cap.
    pub max_level: u32,
    /// XP cost of the very first level-up.
    pub base_xp: u64,
    /// Per-level cost multiplier.
    pub curve_base: Decimal,
}

impl Curve for ExponentialCurve {
    fn max_level(&self) -> u32 {
        self.max_level
    }

    fn xp_to_advance(&self, level: u32) -> Option<u64> {
        if level == 0 || level >= self.max_level {
            return None;
        }
        // Cost from level n to n+1 is floor(curve_base^(n-1) * base_xp).
        let mut cost = Decimal::from(self.base_xp);
        let mut step = 1u32;
        while step < level {
            cost = cost.checked_mul(self.curve_base)?;
            step = step.checked_add(1)?;
        }
        decimal_trunc_u64(cost)
    }
}

/// Build the strategy for a track's stored curve kind.
pub fn curve_for(kind: &CurveKind) -> Box<dyn Curve> {
    match kind {
        CurveKind::BoundedLinear { max_level } => Box::new(BoundedLinearCurve {
            max_level: *max_level,
        }),
        CurveKind::Exponential {
            max_level,
            base_xp,
            curve_base,
        } => Box::new(ExponentialCurve {
            max_level: *max_level,
            base_xp: *base_xp,
            curve_base: *curve_base,
        }),
    }
}

/// Truncate a non-negative [`Decimal`] to a `u64`.
///
/// After `trunc()` the value is mathematically an integer but may still
/// carry a non-zero scale, so the scale factor is divided out of the
/// mantissa.
fn decimal_trunc_u64(value: Decimal) -> Option<u64> {
    if value.is_sign_negative() {
        return None;
    }
    let truncated = value.trunc();
    let mantissa = truncated.mantissa();
    let divisor: i128 = 10_i128.checked_pow(truncated.scale())?;
    let integral = mantissa.checked_div(divisor)?;
    u64::try_from(integral).ok()
}

// ---------------------------------------------------------------------------
// Derived queries
// ---------------------------------------------------------------------------

/// Derive the level for an XP total by greedily consuming per-level costs
/// starting at level 1.
pub fn level_from_xp(curve: &dyn Curve, total_xp: u64) -> u32 {
    let mut level = 1u32;
    let mut remaining = total_xp;
    while level < curve.max_level() {
        let Some(cost) = curve.xp_to_advance(level) else {
            break;
        };
        if remaining < cost {
            break;
        }
        remaining = remaining.saturating_sub(cost);
        level = level.saturating_add(1);
    }
    level
}

/// Total XP required to reach `level` (the prefix sum of per-level costs).
///
/// Level 1 requires 0 XP. Levels outside `1..=max_level` are rejected.
pub fn xp_for_level(curve: &dyn Curve, level: u32) -> Result<u64, EngineError> {
    if level == 0 || level > curve.max_level() {
        return Err(EngineError::LevelOutOfRange {
            level,
            max_level: curve.max_level(),
        });
    }
    let mut total = 0u64;
    let mut step = 1u32;
    while step < level {
        let cost = curve
            .xp_to_advance(step)
            .ok_or_else(|| EngineError::ArithmeticOverflow {
                context: format!("xp_to_advance overflow at level {step}"),
            })?;
        total = total
            .checked_add(cost)
            .ok_or_else(|| EngineError::ArithmeticOverflow {
                context: format!("xp_for_level prefix sum overflow at level {step}"),
            })?;
        step = step.saturating_add(1);
    }
    Ok(total)
}

// ---------------------------------------------------------------------------
// Progress and XP application
// ---------------------------------------------------------------------------

/// Position within the current level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelProgress {
    /// The derived level.
    pub level: u32,
    /// XP accumulated past the current level's threshold.
    pub xp_into_level: u64,
    /// XP still needed for the next level, or `None` at the cap.
    pub xp_to_next: Option<u64>,
    /// Fraction of the current level completed, in `[0, 1]`. Exactly 1 at
    /// the cap.
    pub pct: Decimal,
}

/// The result of applying an XP delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpApplied {
    /// The level derived from the new total.
    pub new_level: u32,
    /// The new XP total, truncated at the curve's cap.
    pub new_total_xp: u64,
    /// Whether at least one level boundary was crossed.
    pub leveled_up: bool,
    /// Position within the new level.
    pub progress: LevelProgress,
}

/// Compute progress within the current level for an XP total.
pub fn progress(curve: &dyn Curve, total_xp: u64) -> LevelProgress {
    let level = level_from_xp(curve, total_xp);
    let threshold = xp_for_level(curve, level).unwrap_or(0);
    let xp_into_level = total_xp.saturating_sub(threshold);
    curve.xp_to_advance(level).map_or(
        LevelProgress {
            level,
            xp_into_level,
            xp_to_next: None,
            pct: Decimal::ONE,
        },
        |cost| {
            let pct = Decimal::from(xp_into_level)
                .checked_div(Decimal::from(cost))
                .unwrap_or(Decimal::ZERO)
                .min(Decimal::ONE);
            LevelProgress {
                level,
                xp_into_level,
                xp_to_next: Some(cost.saturating_sub(xp_into_level)),
                pct,
            }
        },
    )
}

/// Apply an XP delta to a total.
///
/// Negative deltas are rejected; progression never moves backwards. The new
/// total is silently truncated at the XP required for the curve's max level,
/// so no delta can ever produce a level beyond the cap.
pub fn apply_xp(curve: &dyn Curve, total_xp: u64, delta: i64) -> Result<XpApplied, EngineError> {
    if delta < 0 {
        return Err(EngineError::NegativeXpDelta { delta });
    }
    let delta_xp = u64::try_from(delta).unwrap_or(0);
    let old_level = level_from_xp(curve, total_xp);
    let cap = xp_for_level(curve, curve.max_level())?;
    let new_total_xp = total_xp.saturating_add(delta_xp).min(cap);
    let new_level = level_from_xp(curve, new_total_xp);
    Ok(XpApplied {
        new_level,
        new_total_xp,
        leveled_up: new_level > old_level,
        progress: progress(curve, new_total_xp),
    })
}

/// The current level of a progression track.
pub fn track_level(track: &ProgressionTrack) -> u32 {
    level_from_xp(curve_for(&track.curve).as_ref(), track.total_xp)
}

#[cfg(test)]
mod tests {
    use duskmire_types::CurveKind;
    use proptest::prelude::*;

    use super::*;

    fn job_curve() -> Box<dyn Curve> {
        curve_for(&CurveKind::job())
    }

    fn skill_curve() -> Box<dyn Curve> {
        curve_for(&CurveKind::skill())
    }

    // -----------------------------------------------------------------------
    // Bounded linear curve
    // -----------------------------------------------------------------------

    #[test]
    fn linear_per_level_costs() {
        let curve = job_curve();
        assert_eq!(curve.xp_to_advance(1), Some(100));
        assert_eq!(curve.xp_to_advance(2), Some(200));
        assert_eq!(curve.xp_to_advance(9), Some(900));
        // At the cap there is nothing left to advance to.
        assert_eq!(curve.xp_to_advance(10), None);
        assert_eq!(curve.xp_to_advance(0), None);
    }

    #[test]
    fn linear_prefix_sums() {
        let curve = job_curve();
        assert_eq!(xp_for_level(curve.as_ref(), 1).ok(), Some(0));
        assert_eq!(xp_for_level(curve.as_ref(), 2).ok(), Some(100));
        assert_eq!(xp_for_level(curve.as_ref(), 3).ok(), Some(300));
        // 100 * (1 + 2 + ... + 9) = 4500 to reach the cap.
        assert_eq!(xp_for_level(curve.as_ref(), 10).ok(), Some(4500));
    }

    #[test]
    fn linear_level_boundaries() {
        let curve = job_curve();
        assert_eq!(level_from_xp(curve.as_ref(), 0), 1);
        assert_eq!(level_from_xp(curve.as_ref(), 99), 1);
        assert_eq!(level_from_xp(curve.as_ref(), 100), 2);
        assert_eq!(level_from_xp(curve.as_ref(), 299), 2);
        assert_eq!(level_from_xp(curve.as_ref(), 300), 3);
        assert_eq!(level_from_xp(curve.as_ref(), 4499), 9);
        assert_eq!(level_from_xp(curve.as_ref(), 4500), 10);
    }

    #[test]
    fn linear_level_never_exceeds_cap() {
        let curve = job_curve();
        assert_eq!(level_from_xp(curve.as_ref(), u64::MAX), 10);
    }

    // -----------------------------------------------------------------------
    // Exponential curve
    // -----------------------------------------------------------------------

    #[test]
    fn exponential_per_level_costs() {
        let curve = skill_curve();
        // base_xp 100 with curve_base 1.10: 100, 110, 121, 133 (floored).
        assert_eq!(curve.xp_to_advance(1), Some(100));
        assert_eq!(curve.xp_to_advance(2), Some(110));
        assert_eq!(curve.xp_to_advance(3), Some(121));
        assert_eq!(curve.xp_to_advance(4), Some(133));
        assert_eq!(curve.xp_to_advance(99), None);
    }

    #[test]
    fn exponential_prefix_sums() {
        let curve = skill_curve();
        assert_eq!(xp_for_level(curve.as_ref(), 1).ok(), Some(0));
        assert_eq!(xp_for_level(curve.as_ref(), 2).ok(), Some(100));
        assert_eq!(xp_for_level(curve.as_ref(), 3).ok(), Some(210));
        assert_eq!(xp_for_level(curve.as_ref(), 4).ok(), Some(331));
    }

    #[test]
    fn exponential_costs_are_monotone() {
        let curve = skill_curve();
        let mut previous = 0u64;
        for level in 1..99 {
            let cost = curve.xp_to_advance(level).unwrap_or(0);
            assert!(cost >= previous, "cost shrank at level {level}");
            previous = cost;
        }
    }

    #[test]
    fn exponential_level_never_exceeds_cap() {
        let curve = skill_curve();
        assert_eq!(level_from_xp(curve.as_ref(), u64::MAX), 99);
    }

    // -----------------------------------------------------------------------
    // Round trips
    // -----------------------------------------------------------------------

    #[test]
    fn threshold_xp_derives_back_to_level() {
        for curve in [job_curve(), skill_curve()] {
            for level in 1..=curve.max_level() {
                let threshold = xp_for_level(curve.as_ref(), level).unwrap_or(0);
                assert_eq!(
                    level_from_xp(curve.as_ref(), threshold),
                    level,
                    "round trip failed at level {level}"
                );
            }
        }
    }

    #[test]
    fn level_out_of_range_rejected() {
        let curve = job_curve();
        assert!(matches!(
            xp_for_level(curve.as_ref(), 0),
            Err(EngineError::LevelOutOfRange { .. })
        ));
        assert!(matches!(
            xp_for_level(curve.as_ref(), 11),
            Err(EngineError::LevelOutOfRange { .. })
        ));
    }

    // -----------------------------------------------------------------------
    // apply_xp
    // -----------------------------------------------------------------------

    #[test]
    fn apply_xp_accumulates_without_level_up() {
        let curve = job_curve();
        let applied = apply_xp(curve.as_ref(), 0, 40);
        assert!(applied.is_ok());
        if let Ok(result) = applied {
            assert_eq!(result.new_total_xp, 40);
            assert_eq!(result.new_level, 1);
            assert!(!result.leveled_up);
        }
    }

    #[test]
    fn apply_xp_crosses_level_boundary() {
        let curve = job_curve();
        let applied = apply_xp(curve.as_ref(), 90, 40);
        assert!(applied.is_ok());
        if let Ok(result) = applied {
            assert_eq!(result.new_total_xp, 130);
            assert_eq!(result.new_level, 2);
            assert!(result.leveled_up);
        }
    }

    #[test]
    fn apply_xp_multiple_levels_in_one_delta() {
        let curve = job_curve();
        // 0 -> 300 crosses both level 2 (100) and level 3 (300).
        let applied = apply_xp(curve.as_ref(), 0, 300);
        assert!(applied.is_ok_and(|r| r.new_level == 3 && r.leveled_up));
    }

    #[test]
    fn apply_xp_truncates_at_cap() {
        let curve = job_curve();
        let applied = apply_xp(curve.as_ref(), 4400, 1_000_000);
        assert!(applied.is_ok());
        if let Ok(result) = applied {
            assert_eq!(result.new_total_xp, 4500);
            assert_eq!(result.new_level, 10);
            assert!(result.leveled_up);
        }
    }

    #[test]
    fn apply_xp_rejects_negative_delta() {
        let curve = job_curve();
        let applied = apply_xp(curve.as_ref(), 500, -1);
        assert!(matches!(
            applied,
            Err(EngineError::NegativeXpDelta { delta: -1 })
        ));
    }

    #[test]
    fn apply_xp_zero_delta_is_noop() {
        let curve = job_curve();
        let applied = apply_xp(curve.as_ref(), 250, 0);
        assert!(applied.is_ok_and(|r| r.new_total_xp == 250 && !r.leveled_up));
    }

    // -----------------------------------------------------------------------
    // progress
    // -----------------------------------------------------------------------

    #[test]
    fn progress_midway_through_level_one() {
        let curve = job_curve();
        let p = progress(curve.as_ref(), 50);
        assert_eq!(p.level, 1);
        assert_eq!(p.xp_into_level, 50);
        assert_eq!(p.xp_to_next, Some(50));
        assert_eq!(p.pct, Decimal::new(5, 1)); // 0.5
    }

    #[test]
    fn progress_just_after_level_up() {
        let curve = job_curve();
        let p = progress(curve.as_ref(), 100);
        assert_eq!(p.level, 2);
        assert_eq!(p.xp_into_level, 0);
        assert_eq!(p.xp_to_next, Some(200));
        assert_eq!(p.pct, Decimal::ZERO);
    }

    #[test]
    fn progress_at_cap_is_complete() {
        let curve = job_curve();
        let p = progress(curve.as_ref(), 4500);
        assert_eq!(p.level, 10);
        assert_eq!(p.xp_to_next, None);
        assert_eq!(p.pct, Decimal::ONE);
    }

    // -----------------------------------------------------------------------
    // Properties
    // -----------------------------------------------------------------------

    proptest! {
        #[test]
        fn level_is_monotone_in_xp(xp in 0u64..10_000, delta in 0u64..10_000) {
            let curve = job_curve();
            let before = level_from_xp(curve.as_ref(), xp);
            let after = level_from_xp(curve.as_ref(), xp.saturating_add(delta));
            prop_assert!(after >= before);
        }

        #[test]
        fn apply_xp_never_exceeds_cap(xp in 0u64..5_000, delta in 0i64..1_000_000) {
            let curve = job_curve();
            let applied = apply_xp(curve.as_ref(), xp, delta);
            prop_assert!(applied.is_ok());
            if let Ok(result) = applied {
                prop_assert!(result.new_level <= 10);
                prop_assert!(result.new_total_xp <= 4500);
            }
        }

        #[test]
        fn skill_roundtrip_random_levels(level in 1u32..=99) {
            let curve = skill_curve();
            let threshold = xp_for_level(curve.as_ref(), level).unwrap_or(0);
            prop_assert_eq!(level_from_xp(curve.as_ref(), threshold), level);
        }
    }
}
