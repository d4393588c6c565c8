//! The transactional entry point composing the pure components against the
//! store.
//!
//! [`SimEngine`] is what per-request handlers call. Every operation follows
//! the same discipline: load a versioned snapshot, run pure logic on the
//! local copy, commit the whole snapshot back in one step. An error at any
//! point -- insufficient materials, disabled content, a version conflict --
//! leaves the store untouched, because nothing is published until the final
//! commit. A version conflict is surfaced as a retryable error and the
//! caller repeats the entire operation (including the success roll) against
//! fresh state.
//!
//! Randomness and the current time are injected on every call, so outcomes
//! replay exactly under test.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use duskmire_store::{ContentSource, EngineStore};
use duskmire_types::{
    ActionAttempt, ActionDefId, ActionFamily, ActorId, AttemptId, BattleId, BattleSession, ItemId,
    MonsterId, SlotIndex, TrackId,
};

use crate::battle::ExchangeOutcome;
use crate::chance;
use crate::config::TuningConfig;
use crate::error::EngineError;
use crate::inventory;
use crate::progression::{apply_xp, curve_for, level_from_xp};
use crate::ratelimit::SlidingWindowLimiter;
use crate::regen::RegenOutcome;

// ---------------------------------------------------------------------------
// Outcome types
// ---------------------------------------------------------------------------

/// One item grant produced by a successful attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAward {
    /// The granted item.
    pub item_id: ItemId,
    /// Units granted.
    pub quantity: u32,
}

/// The structured result of one craft/gather attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptOutcome {
    /// Whether the success roll passed.
    pub success: bool,
    /// The clamped chance the roll was made against, in percent.
    pub chance_pct: u32,
    /// XP awarded to the action's track (non-zero even on failure).
    pub xp_gained: u32,
    /// Items granted. Empty on failure.
    pub outputs: Vec<ItemAward>,
    /// Whether the XP award crossed a level boundary.
    pub leveled_up: bool,
    /// The track's level after the award.
    pub new_level: u32,
}

// ---------------------------------------------------------------------------
// SimEngine
// ---------------------------------------------------------------------------

/// The engine façade: outcome pipeline, battle coordination, regen, and
/// loadout management over one store and one content source.
#[derive(Debug)]
pub struct SimEngine<S, C> {
    store: S,
    content: C,
    tuning: TuningConfig,
    limiter: SlidingWindowLimiter,
}

impl<S: EngineStore, C: ContentSource> SimEngine<S, C> {
    /// Build an engine over a store and a content source.
    pub fn new(store: S, content: C, tuning: TuningConfig) -> Self {
        let limiter = SlidingWindowLimiter::new(&tuning.rate_limit);
        Self {
            store,
            content,
            tuning,
            limiter,
        }
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// The underlying content source.
    pub const fn content(&self) -> &C {
        &self.content
    }

    // -----------------------------------------------------------------------
    // Attempts (craft / gather)
    // -----------------------------------------------------------------------

    /// Run one craft or gather attempt as a single atomic unit.
    ///
    /// Pipeline: rate limit, content lookup, actor load, unlock check,
    /// input sufficiency and consumption (crafting only -- materials are
    /// spent whether or not the roll succeeds), success roll, output grant,
    /// XP application, attempt-history record, one commit.
    pub fn attempt(
        &self,
        actor_id: ActorId,
        action_id: ActionDefId,
        now: DateTime<Utc>,
        rng: &mut impl Rng,
    ) -> Result<AttemptOutcome, EngineError> {
        self.limiter.acquire(actor_id, now)?;

        let action = self
            .content
            .action(action_id)
            .ok_or(EngineError::ActionNotFound(action_id))?;
        if !action.enabled {
            return Err(EngineError::ActionInactive(action_id));
        }

        let mut actor = self.store.load_actor(actor_id)?;
        let track = actor
            .state
            .tracks
            .get(&action.track)
            .ok_or(EngineError::TrackNotUnlocked(action.track))?;
        let curve_kind = track.curve.clone();
        let total_xp = track.total_xp;
        let curve = curve_for(&curve_kind);
        let level = level_from_xp(curve.as_ref(), total_xp);

        let (chance_params, xp_params) = match action.family {
            ActionFamily::Crafting => (&self.tuning.crafting_chance, &self.tuning.crafting_xp),
            ActionFamily::Gathering => (&self.tuning.gathering_chance, &self.tuning.gathering_xp),
        };

        if action.family == ActionFamily::Crafting {
            for req in &action.inputs {
                let available = inventory::count_item(&actor.state.stacks, req.item_id);
                if available < u64::from(req.quantity) {
                    return Err(EngineError::InsufficientMaterials {
                        item: req.item_id,
                        required: req.quantity,
                        available,
                    });
                }
            }
            // Materials are spent whether or not the craft succeeds.
            for req in &action.inputs {
                if !inventory::remove_from_stacks(&mut actor.state.stacks, req.item_id, req.quantity)
                {
                    return Err(EngineError::InsufficientMaterials {
                        item: req.item_id,
                        required: req.quantity,
                        available: inventory::count_item(&actor.state.stacks, req.item_id),
                    });
                }
            }
        }

        let chance_pct = chance::success_chance_pct(chance_params, level, action.tier);
        let success = chance::roll_pct(chance_pct, rng);

        let mut outputs = Vec::new();
        if success {
            for entry in &action.yields {
                let selected = match action.family {
                    ActionFamily::Crafting => true,
                    ActionFamily::Gathering => chance::roll_pct(entry.weight_pct, rng),
                };
                if !selected {
                    continue;
                }
                let quantity = chance::roll_quantity(entry.quantity, rng);
                if quantity == 0 {
                    continue;
                }
                let item = self
                    .content
                    .item(entry.item_id)
                    .ok_or(EngineError::ItemNotFound(entry.item_id))?;
                inventory::add_to_stacks(&mut actor.state.stacks, item, quantity)?;
                outputs.push(ItemAward {
                    item_id: entry.item_id,
                    quantity,
                });
            }
        }

        let xp_gained = chance::xp_award(xp_params, action.tier, success);
        let applied = apply_xp(curve.as_ref(), total_xp, i64::from(xp_gained))?;
        if let Some(track) = actor.state.tracks.get_mut(&action.track) {
            track.total_xp = applied.new_total_xp;
        }

        let record = ActionAttempt {
            id: AttemptId::new(),
            actor_id,
            action_id,
            success,
            xp_gained,
            created_at: now,
        };
        self.store.commit_actor(actor, Some(record))?;
        tracing::debug!(
            actor = %actor_id,
            action = %action_id,
            success,
            chance = chance_pct,
            xp = xp_gained,
            "attempt committed"
        );

        Ok(AttemptOutcome {
            success,
            chance_pct,
            xp_gained,
            outputs,
            leveled_up: applied.leveled_up,
            new_level: applied.new_level,
        })
    }

    // -----------------------------------------------------------------------
    // Regen
    // -----------------------------------------------------------------------

    /// Apply whole-minute regeneration to an actor's pool and persist the
    /// advanced watermark.
    ///
    /// When less than one tick has elapsed, nothing is committed -- frequent
    /// polling costs no writes and no regen.
    pub fn apply_regen(
        &self,
        actor_id: ActorId,
        now: DateTime<Utc>,
    ) -> Result<RegenOutcome, EngineError> {
        let mut actor = self.store.load_actor(actor_id)?;
        let outcome = crate::regen::apply_regen(now, &actor.state.pool)?;
        if outcome.did_update {
            actor.state.pool.current_hp = outcome.hp;
            actor.state.pool.current_sp = outcome.sp;
            actor.state.pool.last_regen_at = outcome.last_regen_at;
            self.store.commit_actor(actor, None)?;
        }
        Ok(outcome)
    }

    // -----------------------------------------------------------------------
    // Battles
    // -----------------------------------------------------------------------

    /// Open a battle between an actor and a monster template.
    pub fn start_battle(
        &self,
        actor_id: ActorId,
        monster_id: MonsterId,
        now: DateTime<Utc>,
    ) -> Result<BattleSession, EngineError> {
        let actor = self.store.load_actor(actor_id)?;
        let monster = self
            .content
            .monster(monster_id)
            .ok_or(EngineError::MonsterNotFound(monster_id))?;
        let session =
            BattleSession::start(BattleId::new(), actor_id, monster, &actor.state.pool, now);
        self.store.insert_battle(session.clone())?;
        tracing::info!(battle = %session.id, actor = %actor_id, monster = %monster_id, "battle started");
        Ok(session)
    }

    /// Resolve one exchange on a battle session and persist it.
    ///
    /// Concurrent exchange calls on the same session lose the version race
    /// and surface as a retryable conflict rather than applying out of
    /// order.
    pub fn resolve_exchange(
        &self,
        battle_id: BattleId,
        rng: &mut impl Rng,
    ) -> Result<ExchangeOutcome, EngineError> {
        let mut row = self.store.load_battle(battle_id)?;
        let actor = self.store.load_actor(row.session.actor_id)?;
        let monster = self
            .content
            .monster(row.session.monster_id)
            .ok_or(EngineError::MonsterNotFound(row.session.monster_id))?;
        let outcome = crate::battle::resolve_exchange(
            &mut row.session,
            &actor.state.stats,
            monster,
            rng,
        )?;
        self.store.commit_battle(row)?;
        tracing::debug!(
            battle = %battle_id,
            status = ?outcome.status,
            turn = outcome.turn,
            "exchange resolved"
        );
        Ok(outcome)
    }

    /// Flee a battle session and persist the terminal state.
    pub fn flee(&self, battle_id: BattleId) -> Result<ExchangeOutcome, EngineError> {
        let mut row = self.store.load_battle(battle_id)?;
        let outcome = crate::battle::flee(&mut row.session)?;
        self.store.commit_battle(row)?;
        tracing::debug!(battle = %battle_id, "battle fled");
        Ok(outcome)
    }

    // -----------------------------------------------------------------------
    // Skill slots
    // -----------------------------------------------------------------------

    /// Put an unlocked track into a loadout slot, returning whatever the
    /// slot held before.
    pub fn assign_skill_slot(
        &self,
        actor_id: ActorId,
        slot: SlotIndex,
        track: TrackId,
    ) -> Result<Option<TrackId>, EngineError> {
        let mut actor = self.store.load_actor(actor_id)?;
        if !actor.state.tracks.contains_key(&track) {
            return Err(EngineError::TrackNotUnlocked(track));
        }
        let displaced = actor.state.slots.assign(slot, track);
        self.store.commit_actor(actor, None)?;
        Ok(displaced)
    }

    /// Empty a loadout slot, returning the track it held.
    pub fn clear_skill_slot(
        &self,
        actor_id: ActorId,
        slot: SlotIndex,
    ) -> Result<Option<TrackId>, EngineError> {
        let mut actor = self.store.load_actor(actor_id)?;
        let cleared = actor.state.slots.clear(slot);
        self.store.commit_actor(actor, None)?;
        Ok(cleared)
    }
}
