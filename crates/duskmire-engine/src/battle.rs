//! The turn-based battle state machine.
//!
//! One exchange is: the player strikes, and if the monster survives, the
//! monster strikes back. A monster reduced to 0 HP ends the exchange
//! immediately with [`BattleStatus::Won`] -- it never gets the
//! counter-attack. A player reduced to 0 HP ends it with
//! [`BattleStatus::Lost`]. Every sub-action appends exactly one narrative
//! event to the session log.
//!
//! Both sides share one damage formula:
//! `max(1, strength - vitality / 2 + roll(0..=2))` -- at least 1 damage per
//! hit regardless of stat disparity, with a bounded random variance.

use duskmire_types::{
    BattleEvent, BattleEventKind, BattleSession, BattleStatus, CombatantStats, MonsterTemplate,
};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Inclusive upper bound of the random damage variance.
pub const DAMAGE_VARIANCE: u32 = 2;

/// The result of one resolved exchange (or flee).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeOutcome {
    /// Session status after the exchange.
    pub status: BattleStatus,
    /// The turn this exchange resolved as.
    pub turn: u32,
    /// The events this exchange appended to the session log, in order.
    pub events: Vec<BattleEvent>,
}

/// Roll damage for one strike.
///
/// `max(1, strength - vitality / 2 + roll(0..=2))`. The floor of 1
/// guarantees every strike matters, even against an overwhelming defender.
pub fn roll_damage(attacker_strength: u32, defender_vitality: u32, rng: &mut impl Rng) -> u32 {
    let mitigation = i64::from(defender_vitality.checked_div(2).unwrap_or(0));
    let variance = i64::from(rng.random_range(0..=DAMAGE_VARIANCE));
    let raw = i64::from(attacker_strength)
        .saturating_sub(mitigation)
        .saturating_add(variance);
    if raw < 1 {
        1
    } else {
        u32::try_from(raw).unwrap_or(u32::MAX)
    }
}

/// Resolve one full exchange on an active session.
///
/// Rejects terminal sessions with [`EngineError::BattleOver`]. The turn
/// number increases by exactly one per resolved exchange, terminal or not.
pub fn resolve_exchange(
    session: &mut BattleSession,
    player: &CombatantStats,
    monster: &MonsterTemplate,
    rng: &mut impl Rng,
) -> Result<ExchangeOutcome, EngineError> {
    if session.status.is_terminal() {
        return Err(EngineError::BattleOver(session.status));
    }

    let turn = session.turn_number.saturating_add(1);
    session.turn_number = turn;
    let mut events = Vec::new();

    // Player strikes first.
    let player_damage = roll_damage(player.strength, monster.stats.vitality, rng);
    session.monster_hp = session.monster_hp.saturating_sub(player_damage);
    let monster_down = session.monster_hp == 0;
    events.push(BattleEvent {
        turn,
        kind: BattleEventKind::PlayerStrike,
        damage: player_damage,
        hp_remaining: session.monster_hp,
        target_defeated: monster_down,
    });

    if monster_down {
        // No counter-attack from a dead monster.
        session.status = BattleStatus::Won;
    } else {
        let monster_damage = roll_damage(monster.stats.strength, player.vitality, rng);
        session.player_hp = session.player_hp.saturating_sub(monster_damage);
        let player_down = session.player_hp == 0;
        events.push(BattleEvent {
            turn,
            kind: BattleEventKind::MonsterStrike,
            damage: monster_damage,
            hp_remaining: session.player_hp,
            target_defeated: player_down,
        });
        if player_down {
            session.status = BattleStatus::Lost;
        }
    }

    session.log.extend(events.iter().copied());
    Ok(ExchangeOutcome {
        status: session.status,
        turn,
        events,
    })
}

/// Flee an active battle.
///
/// Consumes a turn and moves the session to the terminal
/// [`BattleStatus::Fled`] state. Rejected on terminal sessions.
pub fn flee(session: &mut BattleSession) -> Result<ExchangeOutcome, EngineError> {
    if session.status.is_terminal() {
        return Err(EngineError::BattleOver(session.status));
    }
    let turn = session.turn_number.saturating_add(1);
    session.turn_number = turn;
    session.status = BattleStatus::Fled;
    let event = BattleEvent {
        turn,
        kind: BattleEventKind::Fled,
        damage: 0,
        hp_remaining: session.player_hp,
        target_defeated: false,
    };
    session.log.push(event);
    Ok(ExchangeOutcome {
        status: BattleStatus::Fled,
        turn,
        events: vec![event],
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use duskmire_types::{ActorId, BattleId, MonsterId, ResourcePool};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn monster(strength: u32, vitality: u32, max_hp: u32) -> MonsterTemplate {
        MonsterTemplate {
            id: MonsterId::new(),
            name: String::from("Fen Lurker"),
            stats: CombatantStats { strength, vitality },
            max_hp,
        }
    }

    fn session_against(template: &MonsterTemplate, player_hp: u32) -> BattleSession {
        let pool = ResourcePool {
            current_hp: player_hp,
            max_hp: player_hp.max(1),
            current_sp: 10,
            max_sp: 10,
            hp_regen_per_minute: 0,
            sp_regen_per_minute: 0,
            last_regen_at: Utc::now(),
        };
        BattleSession::start(BattleId::new(), ActorId::new(), template, &pool, Utc::now())
    }

    // -----------------------------------------------------------------------
    // Damage formula
    // -----------------------------------------------------------------------

    #[test]
    fn damage_stays_in_the_variance_band() {
        // strength 20 vs vitality 10: 20 - 5 = 15, plus 0..=2 -> 15..=17.
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..200 {
            let damage = roll_damage(20, 10, &mut rng);
            assert!((15..=17).contains(&damage), "damage {damage} out of band");
        }
    }

    #[test]
    fn damage_floors_at_one() {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..100 {
            assert_eq!(roll_damage(1, 200, &mut rng), 1);
        }
    }

    proptest! {
        #[test]
        fn damage_is_always_at_least_one(
            strength in 0u32..1_000,
            vitality in 0u32..1_000,
            seed in 0u64..1_000,
        ) {
            let mut rng = SmallRng::seed_from_u64(seed);
            prop_assert!(roll_damage(strength, vitality, &mut rng) >= 1);
        }
    }

    // -----------------------------------------------------------------------
    // Exchange resolution
    // -----------------------------------------------------------------------

    #[test]
    fn lethal_player_strike_skips_the_counter_attack() {
        let template = monster(50, 0, 1);
        let mut session = session_against(&template, 100);
        let player = CombatantStats {
            strength: 10,
            vitality: 5,
        };
        let mut rng = SmallRng::seed_from_u64(7);
        let outcome = resolve_exchange(&mut session, &player, &template, &mut rng);
        assert!(outcome.is_ok());
        if let Ok(result) = outcome {
            assert_eq!(result.status, BattleStatus::Won);
            assert_eq!(result.turn, 1);
            // Exactly one event: the monster never got to strike back.
            assert_eq!(result.events.len(), 1);
            assert!(
                result
                    .events
                    .first()
                    .is_some_and(|e| e.kind == BattleEventKind::PlayerStrike && e.target_defeated)
            );
        }
        assert_eq!(session.monster_hp, 0);
        assert_eq!(session.player_hp, 100);
        assert_eq!(session.log.len(), 1);
    }

    #[test]
    fn player_defeat_ends_with_lost() {
        // Monster too tough to kill and strong enough to one-shot the player.
        let template = monster(50, 100, 1_000);
        let mut session = session_against(&template, 1);
        let player = CombatantStats {
            strength: 10,
            vitality: 0,
        };
        let mut rng = SmallRng::seed_from_u64(7);
        let outcome = resolve_exchange(&mut session, &player, &template, &mut rng);
        assert!(outcome.is_ok());
        if let Ok(result) = outcome {
            assert_eq!(result.status, BattleStatus::Lost);
            assert_eq!(result.events.len(), 2);
            assert!(
                result
                    .events
                    .get(1)
                    .is_some_and(|e| e.kind == BattleEventKind::MonsterStrike && e.target_defeated)
            );
        }
        assert_eq!(session.player_hp, 0);
    }

    #[test]
    fn survivable_exchange_stays_active_and_counts_turns() {
        let template = monster(1, 1_000, 1_000);
        let mut session = session_against(&template, 1_000);
        let player = CombatantStats {
            strength: 1,
            vitality: 1_000,
        };
        let mut rng = SmallRng::seed_from_u64(7);

        for expected_turn in 1..=5 {
            let outcome = resolve_exchange(&mut session, &player, &template, &mut rng);
            assert!(outcome.is_ok());
            if let Ok(result) = outcome {
                assert_eq!(result.status, BattleStatus::Active);
                assert_eq!(result.turn, expected_turn);
                assert_eq!(result.events.len(), 2);
            }
        }
        assert_eq!(session.turn_number, 5);
        assert_eq!(session.log.len(), 10);
    }

    #[test]
    fn terminal_session_rejects_further_exchanges() {
        let template = monster(50, 0, 1);
        let mut session = session_against(&template, 100);
        let player = CombatantStats {
            strength: 10,
            vitality: 5,
        };
        let mut rng = SmallRng::seed_from_u64(7);
        let _ = resolve_exchange(&mut session, &player, &template, &mut rng);
        assert_eq!(session.status, BattleStatus::Won);

        let again = resolve_exchange(&mut session, &player, &template, &mut rng);
        assert!(matches!(
            again,
            Err(EngineError::BattleOver(BattleStatus::Won))
        ));
        // Nothing changed.
        assert_eq!(session.turn_number, 1);
        assert_eq!(session.log.len(), 1);
    }

    // -----------------------------------------------------------------------
    // Flee
    // -----------------------------------------------------------------------

    #[test]
    fn flee_terminates_the_session() {
        let template = monster(5, 5, 50);
        let mut session = session_against(&template, 100);
        let outcome = flee(&mut session);
        assert!(outcome.is_ok());
        if let Ok(result) = outcome {
            assert_eq!(result.status, BattleStatus::Fled);
            assert_eq!(result.events.len(), 1);
            assert!(
                result
                    .events
                    .first()
                    .is_some_and(|e| e.kind == BattleEventKind::Fled && e.damage == 0)
            );
        }
        assert_eq!(session.status, BattleStatus::Fled);
        assert_eq!(session.turn_number, 1);
    }

    #[test]
    fn flee_rejected_after_terminal() {
        let template = monster(5, 5, 50);
        let mut session = session_against(&template, 100);
        let _ = flee(&mut session);
        assert!(matches!(
            flee(&mut session),
            Err(EngineError::BattleOver(BattleStatus::Fled))
        ));
    }
}
