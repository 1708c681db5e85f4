//! Spell templates and the catalog abstraction the cast pipeline consults,
//! mirroring [`ironspire_inventory::ItemCatalog`]'s pluggable-content shape
//! (§9 Design Notes: explicit context, not a global singleton).

use rustc_hash::FxHashMap;

use crate::cast::SpellRequirements;

pub trait SpellCatalog {
    fn requirements(&self, entry: u32) -> Option<SpellRequirements>;
}

/// A simple in-memory catalog backed by a hash map, used by tests and by
/// any node that loads spell templates into memory wholesale at startup.
#[derive(Debug, Default)]
pub struct StaticSpellCatalog {
    entries: FxHashMap<u32, SpellRequirements>,
}

impl StaticSpellCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entry: u32, requirements: SpellRequirements) {
        self.entries.insert(entry, requirements);
    }
}

impl SpellCatalog for StaticSpellCatalog {
    fn requirements(&self, entry: u32) -> Option<SpellRequirements> {
        self.entries.get(&entry).copied()
    }
}
