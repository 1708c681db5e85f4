//! Per-instance item state, owned by the inventory's low-id arena (§9
//! Design Notes: "an inventory owns item records keyed by a low id; slots
//! hold ids ... GUIDs remain the external identity"). A world instance that
//! needs to spawn an item into the grid for replication builds a
//! `Guid::new(GuidKind::Item, record.entry, record.low_id)` from this data.

/// One item instance living somewhere in an [`crate::Inventory`] or one of
/// its bags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemRecord {
    pub low_id: u32,
    pub entry: u32,
    pub stack_count: u32,
    pub durability: u32,
    pub max_durability: u32,
    pub bound: bool,
}

impl ItemRecord {
    pub fn new(low_id: u32, entry: u32, stack_count: u32) -> Self {
        Self {
            low_id,
            entry,
            stack_count,
            durability: 0,
            max_durability: 0,
            bound: false,
        }
    }
}

/// Mints monotonically increasing low ids for items within one inventory.
/// Mirrors [`ironspire_core::GuidGenerator`] but is scoped per-inventory
/// rather than per-instance, since item low ids only need to be unique
/// within the inventory that owns the arena.
#[derive(Debug, Default)]
pub struct ItemIdGenerator {
    next: u32,
}

impl ItemIdGenerator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn generate(&mut self) -> u32 {
        let id = self.next;
        self.next = self.next.checked_add(1).expect("item low-id generator exhausted");
        id
    }

    /// Advances the generator so the next [`Self::generate`] is past
    /// `low_id`, used when restoring a persisted inventory whose item ids
    /// were minted by a previous generator instance.
    pub fn advance_past(&mut self, low_id: u32) {
        self.next = self.next.max(low_id.saturating_add(1));
    }
}
