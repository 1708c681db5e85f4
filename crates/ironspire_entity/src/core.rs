//! Composition pieces shared by every game object variant (§2, §3).

use ironspire_core::Guid;
use ironspire_field::FieldMap;

use crate::movement_info::MovementInfo;

/// The state every [`crate::object::GameObject`] variant carries regardless
/// of kind: its identity, its field map, and whether it has been despawned.
///
/// `despawned` is sticky once set; nothing in this crate ever clears it.
/// Despawn is terminal for the object's lifetime in an instance (§4.3).
#[derive(Debug)]
pub struct BaseObject {
    guid: Guid,
    fields: FieldMap,
    despawned: bool,
}

impl BaseObject {
    pub fn new(guid: Guid, cell_count: usize) -> Self {
        let mut fields = FieldMap::new(cell_count);
        fields.set::<u64>(crate::fields::object::GUID, guid.raw());
        Self {
            guid,
            fields,
            despawned: false,
        }
    }

    pub fn guid(&self) -> Guid {
        self.guid
    }

    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut FieldMap {
        &mut self.fields
    }

    pub fn is_despawned(&self) -> bool {
        self.despawned
    }

    /// Marks the object despawned. Idempotent: despawning an already
    /// despawned object is a no-op, not an error (§4.3 edge case).
    pub fn despawn(&mut self) {
        self.despawned = true;
    }
}

/// Shared state of every `Unit` variant: a [`BaseObject`] plus the
/// authoritative [`MovementInfo`] (§3, C4).
#[derive(Debug)]
pub struct UnitCore {
    pub base: BaseObject,
    pub movement: MovementInfo,
}

impl UnitCore {
    pub fn new(guid: Guid, cell_count: usize) -> Self {
        Self {
            base: BaseObject::new(guid, cell_count),
            movement: MovementInfo::default(),
        }
    }
}

/// Shared state of every `Item` variant: just a [`BaseObject`]. Items have
/// no movement state of their own (§2).
#[derive(Debug)]
pub struct ItemCore {
    pub base: BaseObject,
}

impl ItemCore {
    pub fn new(guid: Guid, cell_count: usize) -> Self {
        Self {
            base: BaseObject::new(guid, cell_count),
        }
    }
}
