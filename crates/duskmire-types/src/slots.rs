//! The fixed 8-slot skill loadout.
//!
//! Slot access is index-based over a fixed-size array, with the index range
//! enforced by the [`SlotIndex`] newtype -- there is no way to address a
//! ninth slot, and no field-name string is ever built from an index.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::TrackId;

/// Number of skill slots every actor has.
pub const SLOT_COUNT: usize = 8;

// ---------------------------------------------------------------------------
// SlotIndex
// ---------------------------------------------------------------------------

/// A validated slot position in `0..8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SlotIndex(u8);

impl SlotIndex {
    /// Wrap a raw index, or `None` if it is out of range.
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < SLOT_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// The raw index value.
    pub const fn get(self) -> u8 {
        self.0
    }
}

// ---------------------------------------------------------------------------
// SkillSlots
// ---------------------------------------------------------------------------

/// An actor's skill loadout: exactly 8 positions, each optionally holding a
/// progression track.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SkillSlots {
    slots: [Option<TrackId>; SLOT_COUNT],
}

impl SkillSlots {
    /// An empty loadout.
    pub const fn new() -> Self {
        Self {
            slots: [None; SLOT_COUNT],
        }
    }

    /// The track in the given slot, if any.
    pub fn get(&self, index: SlotIndex) -> Option<TrackId> {
        self.slots.get(usize::from(index.get())).copied().flatten()
    }

    /// Put `track` into the given slot, returning whatever it displaced.
    pub fn assign(&mut self, index: SlotIndex, track: TrackId) -> Option<TrackId> {
        self.slots
            .get_mut(usize::from(index.get()))
            .and_then(|slot| slot.replace(track))
    }

    /// Empty the given slot, returning the track it held.
    pub fn clear(&mut self, index: SlotIndex) -> Option<TrackId> {
        self.slots
            .get_mut(usize::from(index.get()))
            .and_then(Option::take)
    }

    /// Whether any slot holds the given track.
    pub fn contains(&self, track: TrackId) -> bool {
        self.slots.iter().any(|slot| *slot == Some(track))
    }

    /// Iterate the slots in position order.
    pub fn iter(&self) -> impl Iterator<Item = Option<TrackId>> + '_ {
        self.slots.iter().copied()
    }

    /// How many slots are occupied.
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}
