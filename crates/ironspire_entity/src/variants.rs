//! The concrete game object variants and the trait sets shared across them
//! (§2, §9 Design Notes: "tagged variant plus small trait sets, not
//! inheritance").
//!
//! Field-map-backed scalars (class, race, template entry, ...) are read
//! and written only through the field map; these structs hold no shadow
//! copies of replicated state, so there is exactly one place a value can
//! go stale. The one exception is [`BagObject::slots`], which is
//! server-only state that never crosses the wire.

use ironspire_core::Guid;

use crate::core::{ItemCore, UnitCore};
use crate::fields;
use crate::movement_info::MovementInfo;

/// Behavior common to every unit-family variant (`Unit`, `Player`, `Creature`).
pub trait UnitLike {
    fn unit_core(&self) -> &UnitCore;
    fn unit_core_mut(&mut self) -> &mut UnitCore;

    fn movement(&self) -> &MovementInfo {
        &self.unit_core().movement
    }

    fn movement_mut(&mut self) -> &mut MovementInfo {
        &mut self.unit_core_mut().movement
    }

    fn health(&self) -> u32 {
        self.unit_core().base.fields().get(fields::unit::HEALTH)
    }

    fn set_health(&mut self, value: u32) {
        let max = self.max_health();
        self.unit_core_mut()
            .base
            .fields_mut()
            .set(fields::unit::HEALTH, value.min(max));
    }

    fn max_health(&self) -> u32 {
        self.unit_core().base.fields().get(fields::unit::MAX_HEALTH)
    }

    fn set_max_health(&mut self, value: u32) {
        self.unit_core_mut()
            .base
            .fields_mut()
            .set(fields::unit::MAX_HEALTH, value);
    }

    fn is_alive(&self) -> bool {
        self.health() > 0
    }

    fn level(&self) -> u32 {
        self.unit_core().base.fields().get(fields::unit::LEVEL)
    }

    fn set_level(&mut self, value: u32) {
        self.unit_core_mut().base.fields_mut().set(fields::unit::LEVEL, value);
    }

    fn target_guid(&self) -> Guid {
        Guid::from_raw(self.unit_core().base.fields().get(fields::unit::TARGET_GUID))
    }

    fn set_target_guid(&mut self, guid: Guid) {
        self.unit_core_mut()
            .base
            .fields_mut()
            .set(fields::unit::TARGET_GUID, guid.raw());
    }

    fn is_in_combat(&self) -> bool {
        let state: u32 = self.unit_core().base.fields().get(fields::unit::COMBAT_STATE);
        state & fields::COMBAT_STATE_IN_COMBAT != 0
    }

    fn set_in_combat(&mut self, in_combat: bool) {
        let fields = self.unit_core_mut().base.fields_mut();
        if in_combat {
            fields.add_flag(fields::unit::COMBAT_STATE, fields::COMBAT_STATE_IN_COMBAT);
        } else {
            fields.remove_flag(fields::unit::COMBAT_STATE, fields::COMBAT_STATE_IN_COMBAT);
        }
    }
}

/// Behavior common to every item-family variant (`Item`, `Bag`).
pub trait ItemLike {
    fn item_core(&self) -> &ItemCore;
    fn item_core_mut(&mut self) -> &mut ItemCore;

    fn stack_count(&self) -> u32 {
        self.item_core().base.fields().get(fields::item::STACK_COUNT)
    }

    fn set_stack_count(&mut self, value: u32) {
        self.item_core_mut()
            .base
            .fields_mut()
            .set(fields::item::STACK_COUNT, value);
    }

    fn owner_guid(&self) -> Guid {
        Guid::from_raw(self.item_core().base.fields().get(fields::item::OWNER_GUID))
    }

    fn set_owner_guid(&mut self, guid: Guid) {
        self.item_core_mut()
            .base
            .fields_mut()
            .set(fields::item::OWNER_GUID, guid.raw());
    }

    fn contained_in(&self) -> Guid {
        Guid::from_raw(self.item_core().base.fields().get(fields::item::CONTAINED_GUID))
    }

    fn set_contained_in(&mut self, guid: Guid) {
        self.item_core_mut()
            .base
            .fields_mut()
            .set(fields::item::CONTAINED_GUID, guid.raw());
    }

    fn is_bound(&self) -> bool {
        let flags: u32 = self.item_core().base.fields().get(fields::item::ITEM_FLAGS);
        flags & fields::ITEM_FLAG_BOUND != 0
    }

    fn set_bound(&mut self, bound: bool) {
        let fields = self.item_core_mut().base.fields_mut();
        if bound {
            fields.add_flag(fields::item::ITEM_FLAGS, fields::ITEM_FLAG_BOUND);
        } else {
            fields.remove_flag(fields::item::ITEM_FLAGS, fields::ITEM_FLAG_BOUND);
        }
    }
}

/// A plain unit: NPCs driven by the movement/combat pipelines but without a
/// player's account-facing fields or a creature's AI template.
#[derive(Debug)]
pub struct UnitObject {
    core: UnitCore,
}

impl UnitObject {
    pub fn new(guid: Guid) -> Self {
        Self {
            core: UnitCore::new(guid, fields::unit::END as usize),
        }
    }
}

impl UnitLike for UnitObject {
    fn unit_core(&self) -> &UnitCore {
        &self.core
    }
    fn unit_core_mut(&mut self) -> &mut UnitCore {
        &mut self.core
    }
}

#[derive(Debug)]
pub struct PlayerObject {
    core: UnitCore,
}

impl PlayerObject {
    pub fn new(guid: Guid) -> Self {
        Self {
            core: UnitCore::new(guid, fields::player::END as usize),
        }
    }

    pub fn class(&self) -> u32 {
        self.core.base.fields().get(fields::player::CLASS)
    }

    pub fn set_class(&mut self, value: u32) {
        self.core.base.fields_mut().set(fields::player::CLASS, value);
    }

    pub fn race(&self) -> u32 {
        self.core.base.fields().get(fields::player::RACE)
    }

    pub fn set_race(&mut self, value: u32) {
        self.core.base.fields_mut().set(fields::player::RACE, value);
    }

    pub fn xp(&self) -> u32 {
        self.core.base.fields().get(fields::player::XP)
    }

    pub fn set_xp(&mut self, value: u32) {
        self.core.base.fields_mut().set(fields::player::XP, value);
    }
}

impl UnitLike for PlayerObject {
    fn unit_core(&self) -> &UnitCore {
        &self.core
    }
    fn unit_core_mut(&mut self) -> &mut UnitCore {
        &mut self.core
    }
}

#[derive(Debug)]
pub struct CreatureObject {
    core: UnitCore,
}

impl CreatureObject {
    pub fn new(guid: Guid) -> Self {
        Self {
            core: UnitCore::new(guid, fields::creature::END as usize),
        }
    }

    pub fn template_entry(&self) -> u32 {
        self.core.base.fields().get(fields::creature::TEMPLATE_ENTRY)
    }

    pub fn set_template_entry(&mut self, value: u32) {
        self.core
            .base
            .fields_mut()
            .set(fields::creature::TEMPLATE_ENTRY, value);
    }

    pub fn ai_state(&self) -> u32 {
        self.core.base.fields().get(fields::creature::AI_STATE)
    }

    pub fn set_ai_state(&mut self, value: u32) {
        self.core.base.fields_mut().set(fields::creature::AI_STATE, value);
    }
}

impl UnitLike for CreatureObject {
    fn unit_core(&self) -> &UnitCore {
        &self.core
    }
    fn unit_core_mut(&mut self) -> &mut UnitCore {
        &mut self.core
    }
}

#[derive(Debug)]
pub struct ItemObject {
    core: ItemCore,
}

impl ItemObject {
    pub fn new(guid: Guid) -> Self {
        Self {
            core: ItemCore::new(guid, fields::item::END as usize),
        }
    }
}

impl ItemLike for ItemObject {
    fn item_core(&self) -> &ItemCore {
        &self.core
    }
    fn item_core_mut(&mut self) -> &mut ItemCore {
        &mut self.core
    }
}

/// A container item. `slots` is server-only: the contained item guids are
/// never part of the field map, since a client learns bag contents by
/// seeing the contained items spawn with [`ItemLike::contained_in`] set,
/// not by reading the bag's own fields (C6).
#[derive(Debug)]
pub struct BagObject {
    core: ItemCore,
    slots: Vec<Guid>,
}

impl BagObject {
    pub fn new(guid: Guid, num_slots: u32) -> Self {
        let mut core = ItemCore::new(guid, fields::bag::END as usize);
        core.base.fields_mut().set(fields::bag::NUM_SLOTS, num_slots);
        Self {
            core,
            slots: vec![Guid::NONE; num_slots as usize],
        }
    }

    pub fn num_slots(&self) -> usize {
        self.slots.len()
    }

    pub fn slot(&self, index: usize) -> Guid {
        self.slots[index]
    }

    pub fn set_slot(&mut self, index: usize, guid: Guid) {
        self.slots[index] = guid;
    }

    pub fn first_empty_slot(&self) -> Option<usize> {
        self.slots.iter().position(|g| g.is_none())
    }
}

impl ItemLike for BagObject {
    fn item_core(&self) -> &ItemCore {
        &self.core
    }
    fn item_core_mut(&mut self) -> &mut ItemCore {
        &mut self.core
    }
}

/// A transient, non-unit, non-item world object: spell ground effects,
/// traps, and the like. Carries only the base object fields plus its own
/// small extension (§2).
#[derive(Debug)]
pub struct DynamicObjectCore {
    base: crate::core::BaseObject,
}

impl DynamicObjectCore {
    pub fn new(guid: Guid) -> Self {
        Self {
            base: crate::core::BaseObject::new(guid, fields::dynamic_object::END as usize),
        }
    }

    pub fn base(&self) -> &crate::core::BaseObject {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut crate::core::BaseObject {
        &mut self.base
    }

    pub fn duration_ms(&self) -> u32 {
        self.base.fields().get(fields::dynamic_object::DURATION_MS)
    }

    pub fn set_duration_ms(&mut self, value: u32) {
        self.base
            .fields_mut()
            .set(fields::dynamic_object::DURATION_MS, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ironspire_core::GuidKind;

    #[test]
    fn unit_health_is_clamped_to_max_health() {
        let mut unit = UnitObject::new(Guid::new(GuidKind::Unit, 1, 1));
        unit.set_max_health(100);
        unit.set_health(500);
        assert_eq!(unit.health(), 100);
    }

    #[test]
    fn bag_tracks_empty_slots() {
        let bag = BagObject::new(Guid::new(GuidKind::Bag, 1, 1), 16);
        assert_eq!(bag.num_slots(), 16);
        assert_eq!(bag.first_empty_slot(), Some(0));
    }

    #[test]
    fn player_class_round_trips_through_field_map() {
        let mut player = PlayerObject::new(Guid::new(GuidKind::Player, 1, 1));
        player.set_class(3);
        assert_eq!(player.class(), 3);
    }
}
