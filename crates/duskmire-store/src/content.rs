//! Read-only lookup of authored content.
//!
//! Recipes, gathering nodes, items, and monsters are authored elsewhere and
//! consumed here through [`ContentSource`]. A definition can exist and still
//! be disabled -- the lookup returns it either way, and callers decide how
//! to report `enabled == false` (the engine distinguishes "not found" from
//! "found but inactive").

use std::collections::BTreeMap;

use duskmire_types::{
    ActionDefId, ActionDefinition, ItemDefinition, ItemId, MonsterId, MonsterTemplate,
};

// ---------------------------------------------------------------------------
// ContentSource
// ---------------------------------------------------------------------------

/// Lookup interface over authored content.
pub trait ContentSource {
    /// The action definition with the given ID, enabled or not.
    fn action(&self, id: ActionDefId) -> Option<&ActionDefinition>;

    /// The item definition with the given ID.
    fn item(&self, id: ItemId) -> Option<&ItemDefinition>;

    /// The monster template with the given ID.
    fn monster(&self, id: MonsterId) -> Option<&MonsterTemplate>;
}

// ---------------------------------------------------------------------------
// StaticContent
// ---------------------------------------------------------------------------

/// An in-memory [`ContentSource`] loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct StaticContent {
    actions: BTreeMap<ActionDefId, ActionDefinition>,
    items: BTreeMap<ItemId, ItemDefinition>,
    monsters: BTreeMap<MonsterId, MonsterTemplate>,
}

impl StaticContent {
    /// An empty content set.
    pub const fn new() -> Self {
        Self {
            actions: BTreeMap::new(),
            items: BTreeMap::new(),
            monsters: BTreeMap::new(),
        }
    }

    /// Register an action definition, replacing any previous one with the
    /// same ID.
    pub fn insert_action(&mut self, def: ActionDefinition) {
        self.actions.insert(def.id, def);
    }

    /// Register an item definition, replacing any previous one with the
    /// same ID.
    pub fn insert_item(&mut self, def: ItemDefinition) {
        self.items.insert(def.id, def);
    }

    /// Register a monster template, replacing any previous one with the
    /// same ID.
    pub fn insert_monster(&mut self, template: MonsterTemplate) {
        self.monsters.insert(template.id, template);
    }
}

impl ContentSource for StaticContent {
    fn action(&self, id: ActionDefId) -> Option<&ActionDefinition> {
        self.actions.get(&id)
    }

    fn item(&self, id: ItemId) -> Option<&ItemDefinition> {
        self.items.get(&id)
    }

    fn monster(&self, id: MonsterId) -> Option<&MonsterTemplate> {
        self.monsters.get(&id)
    }
}
