//! Core entity structs for the Duskmire simulation engine.
//!
//! Covers the actor aggregate (resource pool, combat stats, progression
//! tracks, inventory stacks, skill slots), authored content definitions
//! (actions, items, monsters), battle sessions, and the immutable
//! action-attempt audit record.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{ActionFamily, BattleEventKind, BattleStatus, CurveKind, YieldQuantity};
use crate::ids::{ActionDefId, ActorId, AttemptId, BattleId, ItemId, MonsterId, TrackId};
use crate::slots::SkillSlots;

// ---------------------------------------------------------------------------
// ResourcePool
// ---------------------------------------------------------------------------

/// An actor's HP/SP pool with regeneration rates and the regen watermark.
///
/// Invariant: `0 <= current <= max` for both HP and SP. `last_regen_at` only
/// advances forward, and only in whole-minute increments -- the regen clock
/// never consumes a partial minute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ResourcePool {
    /// Current hit points.
    pub current_hp: u32,
    /// Maximum hit points.
    pub max_hp: u32,
    /// Current skill points.
    pub current_sp: u32,
    /// Maximum skill points.
    pub max_sp: u32,
    /// HP regained per whole minute of elapsed time.
    pub hp_regen_per_minute: u32,
    /// SP regained per whole minute of elapsed time.
    pub sp_regen_per_minute: u32,
    /// The timestamp up to which regeneration has already been applied.
    pub last_regen_at: DateTime<Utc>,
}

impl ResourcePool {
    /// Reduce current HP by `amount`, flooring at 0.
    pub const fn apply_damage(&mut self, amount: u32) {
        self.current_hp = self.current_hp.saturating_sub(amount);
    }

    /// Restore current HP by `amount`, clamped to `max_hp`.
    pub fn apply_heal(&mut self, amount: u32) {
        self.current_hp = self.current_hp.saturating_add(amount).min(self.max_hp);
    }

    /// Spend `amount` SP. Returns `false` (and leaves the pool unchanged)
    /// if the pool holds less than `amount`.
    pub const fn spend_sp(&mut self, amount: u32) -> bool {
        if self.current_sp < amount {
            return false;
        }
        self.current_sp = self.current_sp.saturating_sub(amount);
        true
    }
}

// ---------------------------------------------------------------------------
// Combat stats
// ---------------------------------------------------------------------------

/// The two stats the damage formula reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CombatantStats {
    /// Offensive stat: base damage dealt per strike.
    pub strength: u32,
    /// Defensive stat: every 2 points absorb 1 damage per incoming strike.
    pub vitality: u32,
}

// ---------------------------------------------------------------------------
// ProgressionTrack
// ---------------------------------------------------------------------------

/// Per-(actor, job-or-skill) leveling state.
///
/// Deliberately stores only the accumulated XP and the curve -- the level is
/// always recomputed from `total_xp`, so it can never drift out of sync with
/// the XP that justifies it. `total_xp` is monotonically non-decreasing and
/// never exceeds the total required for the curve's max level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ProgressionTrack {
    /// Accumulated experience points on this track.
    pub total_xp: u64,
    /// The curve that maps `total_xp` to a level.
    pub curve: CurveKind,
}

impl ProgressionTrack {
    /// A fresh track with zero XP on the given curve.
    pub const fn new(curve: CurveKind) -> Self {
        Self { total_xp: 0, curve }
    }
}

// ---------------------------------------------------------------------------
// InventoryStack
// ---------------------------------------------------------------------------

/// One row of a holder's inventory.
///
/// For a stackable item: `1 <= quantity <= stack_cap`, and a holder may have
/// several rows of the same item (overflow stacks). For a non-stackable
/// item every row has `quantity == 1`. Rows are kept in acquisition order,
/// oldest first; removal drains oldest rows first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct InventoryStack {
    /// The item this stack holds.
    pub item_id: ItemId,
    /// Units currently in this stack.
    pub quantity: u32,
    /// Maximum units a single stack of this item may hold.
    pub stack_cap: u32,
    /// Whether this item stacks at all.
    pub stackable: bool,
}

// ---------------------------------------------------------------------------
// Authored content (read-only)
// ---------------------------------------------------------------------------

/// One required input of a crafting recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ItemRequirement {
    /// The item consumed.
    pub item_id: ItemId,
    /// Units consumed per attempt.
    pub quantity: u32,
}

/// One row of an action's yield table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct YieldEntry {
    /// The item granted.
    pub item_id: ItemId,
    /// Units granted when this row is selected.
    pub quantity: YieldQuantity,
    /// Selection chance in percent (0--100). Gathering rolls each row
    /// independently against this; crafting grants every row on success.
    pub weight_pct: u32,
}

/// An authored recipe or gathering node, consumed read-only by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ActionDefinition {
    /// Identifier referenced by attempt requests.
    pub id: ActionDefId,
    /// Display name.
    pub name: String,
    /// Which outcome formulas apply.
    pub family: ActionFamily,
    /// The progression track that gates and is trained by this action.
    pub track: TrackId,
    /// Difficulty (crafting) or danger tier (gathering).
    pub tier: u32,
    /// Materials consumed per attempt. Empty for gathering nodes.
    pub inputs: Vec<ItemRequirement>,
    /// Items granted on success.
    pub yields: Vec<YieldEntry>,
    /// Disabled definitions exist but reject attempts.
    pub enabled: bool,
}

/// An authored item kind, consumed read-only by the inventory ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ItemDefinition {
    /// Identifier referenced by stacks, requirements, and yields.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Whether multiple units share a stack row.
    pub stackable: bool,
    /// Per-stack quantity cap. Must be at least 1 for stackable items.
    pub stack_cap: u32,
}

/// An authored monster, consumed read-only when a battle starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MonsterTemplate {
    /// Identifier referenced by battle sessions.
    pub id: MonsterId,
    /// Display name.
    pub name: String,
    /// The monster's combat stats.
    pub stats: CombatantStats,
    /// Hit points a fresh instance of this monster spawns with.
    pub max_hp: u32,
}

// ---------------------------------------------------------------------------
// ActionAttempt
// ---------------------------------------------------------------------------

/// Immutable audit record, one per craft/gather attempt.
///
/// Written in the same commit as the attempt's state changes and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ActionAttempt {
    /// Record identifier (time-ordered).
    pub id: AttemptId,
    /// Who attempted.
    pub actor_id: ActorId,
    /// Which action was attempted.
    pub action_id: ActionDefId,
    /// Whether the success roll passed.
    pub success: bool,
    /// XP awarded (non-zero even on failure).
    pub xp_gained: u32,
    /// When the attempt was committed.
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Battle
// ---------------------------------------------------------------------------

/// One narrative event inside a battle exchange.
///
/// A killing blow is an ordinary strike event with `target_defeated` set;
/// no separate victory row is emitted, so a lethal exchange logs exactly
/// one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct BattleEvent {
    /// The exchange this event belongs to (1-based).
    pub turn: u32,
    /// What happened.
    pub kind: BattleEventKind,
    /// Damage dealt by this event (0 for flee).
    pub damage: u32,
    /// The target's HP after the event resolved.
    pub hp_remaining: u32,
    /// Whether this event reduced its target to 0 HP.
    pub target_defeated: bool,
}

impl core::fmt::Display for BattleEvent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.kind {
            BattleEventKind::PlayerStrike => {
                if self.target_defeated {
                    write!(f, "turn {}: you strike for {} -- the foe falls", self.turn, self.damage)
                } else {
                    write!(
                        f,
                        "turn {}: you strike for {} (foe at {})",
                        self.turn, self.damage, self.hp_remaining
                    )
                }
            }
            BattleEventKind::MonsterStrike => {
                if self.target_defeated {
                    write!(f, "turn {}: the foe strikes for {} -- you fall", self.turn, self.damage)
                } else {
                    write!(
                        f,
                        "turn {}: the foe strikes for {} (you at {})",
                        self.turn, self.damage, self.hp_remaining
                    )
                }
            }
            BattleEventKind::Fled => write!(f, "turn {}: you flee the battle", self.turn),
        }
    }
}

/// A turn-based battle between one actor and one monster instance.
///
/// Holds its own HP copies for the duration of the fight; the authoritative
/// actor pool is reconciled by the caller at terminal status. `turn_number`
/// strictly increases with every resolved exchange and `status` is terminal
/// once it leaves [`BattleStatus::Active`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct BattleSession {
    /// Session identifier.
    pub id: BattleId,
    /// The player side.
    pub actor_id: ActorId,
    /// The monster template this instance was spawned from.
    pub monster_id: MonsterId,
    /// Player HP within this battle.
    pub player_hp: u32,
    /// Player SP within this battle.
    pub player_sp: u32,
    /// Monster HP within this battle.
    pub monster_hp: u32,
    /// Number of resolved exchanges.
    pub turn_number: u32,
    /// Lifecycle state.
    pub status: BattleStatus,
    /// Ordered narrative log, one event per sub-action.
    pub log: Vec<BattleEvent>,
    /// When the battle began.
    pub started_at: DateTime<Utc>,
}

impl BattleSession {
    /// Open a fresh session: the player enters with their current pool, the
    /// monster spawns at its template's full HP.
    pub fn start(
        id: BattleId,
        actor_id: ActorId,
        monster: &MonsterTemplate,
        pool: &ResourcePool,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            actor_id,
            monster_id: monster.id,
            player_hp: pool.current_hp,
            player_sp: pool.current_sp,
            monster_hp: monster.max_hp,
            turn_number: 0,
            status: BattleStatus::Active,
            log: Vec::new(),
            started_at,
        }
    }
}

// ---------------------------------------------------------------------------
// ActorState
// ---------------------------------------------------------------------------

/// The full per-actor aggregate the store versions as one row.
///
/// Everything an attempt or an exchange reads or writes for one actor lives
/// here, so a single optimistic version check covers the whole economy
/// transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ActorState {
    /// The actor this aggregate belongs to.
    pub actor_id: ActorId,
    /// HP/SP pool and regen watermark.
    pub pool: ResourcePool,
    /// Combat stats.
    pub stats: CombatantStats,
    /// Unlocked progression tracks, keyed by track.
    pub tracks: BTreeMap<TrackId, ProgressionTrack>,
    /// Inventory rows, oldest first.
    pub stacks: Vec<InventoryStack>,
    /// The 8-slot skill loadout.
    pub slots: SkillSlots,
}
