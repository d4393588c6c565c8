//! Success-chance, XP-award, and yield-roll formulas.
//!
//! All probabilities are whole percentages rolled against `0..100`, so every
//! outcome is exactly reproducible from an injected RNG and there is no
//! floating-point drift between processes.

use duskmire_types::YieldQuantity;
use rand::Rng;

use crate::config::{ChanceParams, XpAwardParams};

/// Compute the clamped success chance in percent.
///
/// `clamp(floor, ceiling, base + (actor_level - tier) * step)`. The level
/// difference may be negative; the clamp guarantees the result stays inside
/// `floor_pct..=ceiling_pct` for any level/tier combination.
pub fn success_chance_pct(params: &ChanceParams, actor_level: u32, tier: u32) -> u32 {
    let diff = i64::from(actor_level).saturating_sub(i64::from(tier));
    let raw = i64::from(params.base_pct).saturating_add(diff.saturating_mul(i64::from(params.step_pct)));
    let clamped = raw.clamp(i64::from(params.floor_pct), i64::from(params.ceiling_pct));
    u32::try_from(clamped).unwrap_or(params.floor_pct)
}

/// Roll a percentage chance. A chance of 100 always succeeds; 0 never does.
pub fn roll_pct(chance_pct: u32, rng: &mut impl Rng) -> bool {
    let roll: u32 = rng.random_range(0..100);
    roll < chance_pct
}

/// Compute the XP award for an attempt outcome.
///
/// Deliberately asymmetric and non-zero on failure: failed attempts still
/// teach.
pub fn xp_award(params: &XpAwardParams, tier: u32, success: bool) -> u32 {
    if success {
        params
            .success_base
            .saturating_add(tier.saturating_mul(params.success_per_tier))
    } else {
        params
            .failure_base
            .saturating_add(tier.saturating_mul(params.failure_per_tier))
    }
}

/// Roll the unit count for a selected yield row.
pub fn roll_quantity(quantity: YieldQuantity, rng: &mut impl Rng) -> u32 {
    match quantity {
        YieldQuantity::Fixed(n) => n,
        YieldQuantity::Range { min, max } => {
            if min >= max {
                min
            } else {
                rng.random_range(min..=max)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    // -----------------------------------------------------------------------
    // Success chance
    // -----------------------------------------------------------------------

    #[test]
    fn crafting_chance_at_matched_level() {
        // Level 5 against difficulty 5: 55 + 0 * 7 = 55, inside the clamp.
        let pct = success_chance_pct(&ChanceParams::crafting(), 5, 5);
        assert_eq!(pct, 55);
    }

    #[test]
    fn crafting_chance_clamps_to_ceiling() {
        // Level 99 against difficulty 1: raw 55 + 98 * 7, clamped to 95.
        let pct = success_chance_pct(&ChanceParams::crafting(), 99, 1);
        assert_eq!(pct, 95);
    }

    #[test]
    fn crafting_chance_clamps_to_floor() {
        // Level 1 against difficulty 50: deep negative, clamped to 20.
        let pct = success_chance_pct(&ChanceParams::crafting(), 1, 50);
        assert_eq!(pct, 20);
    }

    #[test]
    fn gathering_chance_clamps_to_floor() {
        // Level 1 against danger 10: raw 65 - 54 = 11, clamped to 30.
        let pct = success_chance_pct(&ChanceParams::gathering(), 1, 10);
        assert_eq!(pct, 30);
    }

    #[test]
    fn gathering_chance_clamps_to_ceiling() {
        let pct = success_chance_pct(&ChanceParams::gathering(), 90, 1);
        assert_eq!(pct, 98);
    }

    #[test]
    fn gathering_chance_one_step_above() {
        // Level 3 against danger 2: 65 + 6 = 71.
        let pct = success_chance_pct(&ChanceParams::gathering(), 3, 2);
        assert_eq!(pct, 71);
    }

    proptest! {
        #[test]
        fn crafting_chance_always_within_clamp(level in 0u32..200, tier in 0u32..200) {
            let pct = success_chance_pct(&ChanceParams::crafting(), level, tier);
            prop_assert!((20..=95).contains(&pct));
        }

        #[test]
        fn gathering_chance_always_within_clamp(level in 0u32..200, tier in 0u32..200) {
            let pct = success_chance_pct(&ChanceParams::gathering(), level, tier);
            prop_assert!((30..=98).contains(&pct));
        }
    }

    // -----------------------------------------------------------------------
    // Rolls
    // -----------------------------------------------------------------------

    #[test]
    fn pct_100_always_succeeds() {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..200 {
            assert!(roll_pct(100, &mut rng));
        }
    }

    #[test]
    fn pct_0_never_succeeds() {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..200 {
            assert!(!roll_pct(0, &mut rng));
        }
    }

    // -----------------------------------------------------------------------
    // XP awards
    // -----------------------------------------------------------------------

    #[test]
    fn crafting_xp_tier_5() {
        let params = XpAwardParams::crafting();
        assert_eq!(xp_award(&params, 5, true), 40); // 15 + 5*5
        assert_eq!(xp_award(&params, 5, false), 15); // 5 + 2*5
    }

    #[test]
    fn gathering_xp_tier_4() {
        let params = XpAwardParams::gathering();
        assert_eq!(xp_award(&params, 4, true), 20); // 8 + 3*4
        assert_eq!(xp_award(&params, 4, false), 7); // 3 + 4
    }

    #[test]
    fn failure_xp_is_never_zero_at_tier_0() {
        assert_eq!(xp_award(&XpAwardParams::crafting(), 0, false), 5);
        assert_eq!(xp_award(&XpAwardParams::gathering(), 0, false), 3);
    }

    // -----------------------------------------------------------------------
    // Yield quantities
    // -----------------------------------------------------------------------

    #[test]
    fn fixed_quantity_is_exact() {
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(roll_quantity(YieldQuantity::Fixed(3), &mut rng), 3);
    }

    #[test]
    fn range_quantity_stays_in_bounds() {
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..100 {
            let n = roll_quantity(YieldQuantity::Range { min: 2, max: 5 }, &mut rng);
            assert!((2..=5).contains(&n));
        }
    }

    #[test]
    fn degenerate_range_returns_min() {
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(
            roll_quantity(YieldQuantity::Range { min: 4, max: 4 }, &mut rng),
            4
        );
        // A malformed range (min > max) degrades to min rather than panicking.
        assert_eq!(
            roll_quantity(YieldQuantity::Range { min: 6, max: 2 }, &mut rng),
            6
        );
    }
}
