//! [`GameObject`]: the tagged union over every variant, and the match-
//! dispatched behavior common to all of them (§2, §9 Design Notes).

use bytes::{Buf, BufMut};
use ironspire_core::Guid;

use crate::variants::{BagObject, CreatureObject, DynamicObjectCore, ItemObject, PlayerObject, UnitObject};

/// Every concrete game object kind an instance can hold, as a single flat
/// enum rather than a class hierarchy. Callers match on this for
/// kind-specific behavior and use [`UnitLike`]/[`ItemLike`] (via the
/// `as_unit`/`as_item` family below) for the shared behavior.
///
/// [`UnitLike`]: crate::variants::UnitLike
/// [`ItemLike`]: crate::variants::ItemLike
#[derive(Debug)]
pub enum GameObject {
    Unit(UnitObject),
    Player(PlayerObject),
    Creature(CreatureObject),
    Item(ItemObject),
    Bag(BagObject),
    DynamicObject(DynamicObjectCore),
}

impl GameObject {
    pub fn guid(&self) -> Guid {
        match self {
            GameObject::Unit(o) => o.unit_core().base.guid(),
            GameObject::Player(o) => o.unit_core().base.guid(),
            GameObject::Creature(o) => o.unit_core().base.guid(),
            GameObject::Item(o) => o.item_core().base.guid(),
            GameObject::Bag(o) => o.item_core().base.guid(),
            GameObject::DynamicObject(o) => o.base().guid(),
        }
    }

    pub fn is_despawned(&self) -> bool {
        match self {
            GameObject::Unit(o) => o.unit_core().base.is_despawned(),
            GameObject::Player(o) => o.unit_core().base.is_despawned(),
            GameObject::Creature(o) => o.unit_core().base.is_despawned(),
            GameObject::Item(o) => o.item_core().base.is_despawned(),
            GameObject::Bag(o) => o.item_core().base.is_despawned(),
            GameObject::DynamicObject(o) => o.base().is_despawned(),
        }
    }

    /// Marks the object despawned. Idempotent (§4.3).
    pub fn despawn(&mut self) {
        match self {
            GameObject::Unit(o) => o.unit_core_mut().base.despawn(),
            GameObject::Player(o) => o.unit_core_mut().base.despawn(),
            GameObject::Creature(o) => o.unit_core_mut().base.despawn(),
            GameObject::Item(o) => o.item_core_mut().base.despawn(),
            GameObject::Bag(o) => o.item_core_mut().base.despawn(),
            GameObject::DynamicObject(o) => o.base_mut().despawn(),
        }
    }

    pub fn has_pending_changes(&self) -> bool {
        match self {
            GameObject::Unit(o) => o.unit_core().base.fields().has_changes(),
            GameObject::Player(o) => o.unit_core().base.fields().has_changes(),
            GameObject::Creature(o) => o.unit_core().base.fields().has_changes(),
            GameObject::Item(o) => o.item_core().base.fields().has_changes(),
            GameObject::Bag(o) => o.item_core().base.fields().has_changes(),
            GameObject::DynamicObject(o) => o.base().fields().has_changes(),
        }
    }

    /// Writes the full non-zero field set, for a subscriber just entering
    /// view of this object (C8 spawn notification).
    pub fn write_initial_block(&self, buf: &mut impl BufMut) {
        match self {
            GameObject::Unit(o) => o.unit_core().base.fields().serialize_initial(buf),
            GameObject::Player(o) => o.unit_core().base.fields().serialize_initial(buf),
            GameObject::Creature(o) => o.unit_core().base.fields().serialize_initial(buf),
            GameObject::Item(o) => o.item_core().base.fields().serialize_initial(buf),
            GameObject::Bag(o) => o.item_core().base.fields().serialize_initial(buf),
            GameObject::DynamicObject(o) => o.base().fields().serialize_initial(buf),
        }
    }

    /// Writes only the fields dirtied since the last [`Self::clear_changes`],
    /// for a subscriber that already has this object in view (C8 update
    /// notification).
    pub fn write_delta_block(&self, buf: &mut impl BufMut) {
        match self {
            GameObject::Unit(o) => o.unit_core().base.fields().serialize_delta(buf),
            GameObject::Player(o) => o.unit_core().base.fields().serialize_delta(buf),
            GameObject::Creature(o) => o.unit_core().base.fields().serialize_delta(buf),
            GameObject::Item(o) => o.item_core().base.fields().serialize_delta(buf),
            GameObject::Bag(o) => o.item_core().base.fields().serialize_delta(buf),
            GameObject::DynamicObject(o) => o.base().fields().serialize_delta(buf),
        }
    }

    /// Applies a block written by [`Self::write_initial_block`] or
    /// [`Self::write_delta_block`] as an observer would (tests and tooling
    /// only; a live instance never applies blocks to its own authoritative
    /// objects).
    pub fn apply_block(&mut self, buf: &mut impl Buf) {
        match self {
            GameObject::Unit(o) => o.unit_core_mut().base.fields_mut().apply_block(buf),
            GameObject::Player(o) => o.unit_core_mut().base.fields_mut().apply_block(buf),
            GameObject::Creature(o) => o.unit_core_mut().base.fields_mut().apply_block(buf),
            GameObject::Item(o) => o.item_core_mut().base.fields_mut().apply_block(buf),
            GameObject::Bag(o) => o.item_core_mut().base.fields_mut().apply_block(buf),
            GameObject::DynamicObject(o) => o.base_mut().fields_mut().apply_block(buf),
        }
    }

    pub fn clear_changes(&mut self) {
        match self {
            GameObject::Unit(o) => o.unit_core_mut().base.fields_mut().clear_changes(),
            GameObject::Player(o) => o.unit_core_mut().base.fields_mut().clear_changes(),
            GameObject::Creature(o) => o.unit_core_mut().base.fields_mut().clear_changes(),
            GameObject::Item(o) => o.item_core_mut().base.fields_mut().clear_changes(),
            GameObject::Bag(o) => o.item_core_mut().base.fields_mut().clear_changes(),
            GameObject::DynamicObject(o) => o.base_mut().fields_mut().clear_changes(),
        }
    }

    pub fn as_unit(&self) -> Option<&dyn crate::variants::UnitLike> {
        match self {
            GameObject::Unit(o) => Some(o),
            GameObject::Player(o) => Some(o),
            GameObject::Creature(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_unit_mut(&mut self) -> Option<&mut dyn crate::variants::UnitLike> {
        match self {
            GameObject::Unit(o) => Some(o),
            GameObject::Player(o) => Some(o),
            GameObject::Creature(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_item(&self) -> Option<&dyn crate::variants::ItemLike> {
        match self {
            GameObject::Item(o) => Some(o),
            GameObject::Bag(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_item_mut(&mut self) -> Option<&mut dyn crate::variants::ItemLike> {
        match self {
            GameObject::Item(o) => Some(o),
            GameObject::Bag(o) => Some(o),
            _ => None,
        }
    }
}
