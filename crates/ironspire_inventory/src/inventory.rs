//! The inventory engine itself: create-items, equip validation, swap, and
//! remove (§4.6), plus the invariants §8 makes testable.

use rustc_hash::FxHashMap;

use crate::catalog::{ItemCatalog, ItemClass, ItemTemplate, InventoryType};
use crate::error::InventoryError;
use crate::item::{ItemIdGenerator, ItemRecord};
use crate::slot::{
    EquipSlot, SlotAddress, BAG_BAR_RANGE, BAG_BAR_SLOTS, KEY_RING_RANGE, PACK_RANGE, PACK_SLOTS,
};

/// Server-only metadata for an equipped bag: its slot count and contents.
/// Keyed by the bag item's own low id in [`Inventory::bags`], mirroring how
/// [`ironspire_entity::BagObject::slots`] is server-only state.
#[derive(Debug, Clone)]
pub struct BagMeta {
    pub num_slots: u8,
    pub is_quiver: bool,
    pub slots: Vec<Option<u32>>,
}

impl BagMeta {
    fn new(num_slots: u8, is_quiver: bool) -> Self {
        Self {
            num_slots,
            is_quiver,
            slots: vec![None; num_slots as usize],
        }
    }

    fn empty_count(&self) -> u32 {
        self.slots.iter().filter(|s| s.is_none()).count() as u32
    }
}

/// A stat/equip-transition hook a `Player` object implements so the
/// inventory engine never needs to know about unit stats directly (§9
/// Design Notes: explicit context instead of a signal bus).
pub trait EquipmentHook {
    fn on_equip(&mut self, template: &ItemTemplate);
    fn on_unequip(&mut self, template: &ItemTemplate);
}

/// A no-op hook for callers (and tests) that don't need stat application.
pub struct NoopHook;
impl EquipmentHook for NoopHook {
    fn on_equip(&mut self, _: &ItemTemplate) {}
    fn on_unequip(&mut self, _: &ItemTemplate) {}
}

#[derive(Debug, Default)]
pub struct CreateItemsReport {
    pub created_low_ids: Vec<u32>,
    pub filled_existing_stacks: u32,
}

/// Checks whether `slot` accepts `inv_type`, per the fixed equip table
/// (§4.6).
fn equip_slot_accepts(slot: EquipSlot, inv_type: InventoryType) -> bool {
    use EquipSlot::*;
    use InventoryType::*;
    matches!(
        (slot, inv_type),
        (Head, InventoryType::Head)
            | (Neck, InventoryType::Neck)
            | (Shoulders, InventoryType::Shoulders)
            | (Chest, InventoryType::Chest)
            | (Waist, InventoryType::Waist)
            | (Legs, InventoryType::Legs)
            | (Feet, InventoryType::Feet)
            | (Wrists, InventoryType::Wrists)
            | (Hands, InventoryType::Hands)
            | (Finger1, Finger)
            | (Finger2, Finger)
            | (Trinket1, Trinket)
            | (Trinket2, Trinket)
            | (Back, InventoryType::Back)
            | (MainHand, Weapon)
            | (MainHand, TwoHandWeapon)
            | (MainHand, WeaponMainHandOnly)
            | (OffHand, Weapon)
            | (OffHand, Shield)
            | (OffHand, HoldableOffHand)
            | (Ranged, InventoryType::Ranged)
            | (Ranged, Thrown)
            | (Ranged, InventoryType::Ammo)
            | (Tabard, InventoryType::Tabard)
            | (Shirt, InventoryType::Shirt)
    )
}

/// One player's full inventory: equipment, equipped bags, main pack, buyback
/// ring, and key ring (§3).
#[derive(Debug)]
pub struct Inventory {
    equipment: [Option<u32>; crate::slot::EQUIP_SLOTS as usize],
    bag_bar: [Option<u32>; BAG_BAR_SLOTS as usize],
    pack: [Option<u32>; PACK_SLOTS as usize],
    key_ring: [Option<u32>; crate::slot::KEY_RING_SLOTS as usize],
    bags: FxHashMap<u32, BagMeta>,
    pub buyback: crate::buyback::BuybackRing,
    items: FxHashMap<u32, ItemRecord>,
    id_gen: ItemIdGenerator,
    entry_counts: FxHashMap<u32, u32>,
    free_slots: u32,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

impl Inventory {
    pub fn new() -> Self {
        Self {
            equipment: [None; crate::slot::EQUIP_SLOTS as usize],
            bag_bar: [None; BAG_BAR_SLOTS as usize],
            pack: [None; PACK_SLOTS as usize],
            key_ring: [None; crate::slot::KEY_RING_SLOTS as usize],
            bags: FxHashMap::default(),
            buyback: crate::buyback::BuybackRing::new(),
            items: FxHashMap::default(),
            id_gen: ItemIdGenerator::new(),
            entry_counts: FxHashMap::default(),
            free_slots: PACK_SLOTS as u32,
        }
    }

    pub fn item(&self, low_id: u32) -> Option<&ItemRecord> {
        self.items.get(&low_id)
    }

    pub fn free_slot_count(&self) -> u32 {
        self.free_slots
    }

    pub fn entry_count(&self, entry: u32) -> u32 {
        *self.entry_counts.get(&entry).unwrap_or(&0)
    }

    /// Invariant check (§8): the cached per-entry count equals the sum of
    /// stack counts over every slot actually holding that entry.
    pub fn recomputed_entry_count(&self, entry: u32) -> u32 {
        self.items.values().filter(|r| r.entry == entry).map(|r| r.stack_count).sum()
    }

    /// Invariant check (§8): the free-slot counter equals the number of
    /// empty addressable slots in the pack and every equipped bag
    /// (equipment and the bag-bar itself are excluded, §4.6).
    pub fn recomputed_free_slots(&self) -> u32 {
        let pack_empty = self.pack.iter().filter(|s| s.is_none()).count() as u32;
        let bag_empty: u32 = self.bags.values().map(BagMeta::empty_count).sum();
        pack_empty + bag_empty
    }

    pub fn quiver_equipped(&self) -> bool {
        self.bags.values().any(|b| b.is_quiver)
    }

    fn slot_contributes_to_free_count(addr: SlotAddress) -> bool {
        addr.is_pack() || addr.is_bag_slot()
    }

    fn get_item_at(&self, addr: SlotAddress) -> Option<u32> {
        if addr.is_equipment() {
            self.equipment[addr.slot as usize]
        } else if addr.is_bag_bar() {
            self.bag_bar[(addr.slot - BAG_BAR_RANGE.start) as usize]
        } else if addr.is_pack() {
            self.pack[(addr.slot - PACK_RANGE.start) as usize]
        } else if addr.is_key_ring() {
            self.key_ring[(addr.slot - KEY_RING_RANGE.start) as usize]
        } else if addr.is_bag_slot() {
            let bag_low = self.bag_bar[addr.bag as usize]?;
            self.bags.get(&bag_low)?.slots.get(addr.slot as usize).copied().flatten()
        } else {
            None
        }
    }

    fn set_item_at(&mut self, addr: SlotAddress, value: Option<u32>) {
        let was_occupied = self.get_item_at(addr).is_some();
        if addr.is_equipment() {
            self.equipment[addr.slot as usize] = value;
        } else if addr.is_bag_bar() {
            self.bag_bar[(addr.slot - BAG_BAR_RANGE.start) as usize] = value;
        } else if addr.is_pack() {
            self.pack[(addr.slot - PACK_RANGE.start) as usize] = value;
        } else if addr.is_key_ring() {
            self.key_ring[(addr.slot - KEY_RING_RANGE.start) as usize] = value;
        } else if addr.is_bag_slot() {
            if let Some(bag_low) = self.bag_bar[addr.bag as usize] {
                if let Some(bag) = self.bags.get_mut(&bag_low) {
                    if let Some(slot) = bag.slots.get_mut(addr.slot as usize) {
                        *slot = value;
                    }
                }
            }
        }
        if Self::slot_contributes_to_free_count(addr) {
            match (was_occupied, value.is_some()) {
                (true, false) => self.free_slots += 1,
                (false, true) => self.free_slots -= 1,
                _ => {}
            }
        }
    }

    /// Equips `bag_item` (already validated) into bag-bar slot `bar_index`,
    /// creating its slot storage. Capacity contributed by the new bag's
    /// empty slots is added to the free-slot counter.
    pub fn attach_bag(&mut self, bar_index: u8, bag_low_id: u32, num_slots: u8, is_quiver: bool) {
        self.bag_bar[bar_index as usize] = Some(bag_low_id);
        let meta = BagMeta::new(num_slots, is_quiver);
        self.free_slots += meta.empty_count();
        self.bags.insert(bag_low_id, meta);
    }

    /// Detaches a bag-bar slot; only legal when the bag is empty (§4.6
    /// invariant: "a bag may be moved only if empty").
    pub fn detach_bag(&mut self, bar_index: u8) -> Result<Option<u32>, InventoryError> {
        if let Some(bag_low) = self.bag_bar[bar_index as usize] {
            let meta = self.bags.get(&bag_low).expect("bag-bar entry without metadata");
            if meta.slots.iter().any(Option::is_some) {
                return Err(InventoryError::BagNotEmpty);
            }
            self.free_slots -= meta.empty_count();
            self.bags.remove(&bag_low);
        }
        let bag = self.bag_bar[bar_index as usize].take();
        Ok(bag)
    }

    /// Every occupied slot address together with the item low-id it holds,
    /// across equipment, the bag-bar, the pack, the key ring, and every
    /// attached bag's contents. Used by realm-side character persistence
    /// (C9) to walk the whole inventory without reaching into private
    /// layout details.
    pub fn occupied_slots(&self) -> Vec<(SlotAddress, u32)> {
        let mut out = Vec::new();
        for (i, slot) in self.equipment.iter().enumerate() {
            if let Some(low_id) = slot {
                out.push((SlotAddress::body(i as u8), *low_id));
            }
        }
        for (i, slot) in self.pack.iter().enumerate() {
            if let Some(low_id) = slot {
                out.push((SlotAddress::body(PACK_RANGE.start + i as u8), *low_id));
            }
        }
        for (i, slot) in self.key_ring.iter().enumerate() {
            if let Some(low_id) = slot {
                out.push((SlotAddress::body(KEY_RING_RANGE.start + i as u8), *low_id));
            }
        }
        for (bar, bag_low) in self.bag_bar.iter().enumerate() {
            if let Some(bag_low) = bag_low {
                out.push((SlotAddress::body(BAG_BAR_RANGE.start + bar as u8), *bag_low));
                let meta = &self.bags[bag_low];
                for (s, item) in meta.slots.iter().enumerate() {
                    if let Some(low_id) = item {
                        out.push((SlotAddress::new(bar as u8, s as u8), *low_id));
                    }
                }
            }
        }
        out
    }

    /// Places `record` at `addr` unconditionally, bypassing the validation
    /// and stacking rules [`Self::create_items`]/[`Self::swap`] apply — for
    /// realm-side character load (C9), where the persisted snapshot is
    /// already a valid inventory state and re-validating it would only
    /// reject legitimate data the moment any rule changes between patches.
    /// Bags must be attached with [`Self::attach_bag`] before loading items
    /// into their slots.
    /// Mints a fresh item low id scoped to this inventory's arena, for
    /// realm-side character load building [`ItemRecord`]s to hand to
    /// [`Self::load_item`].
    pub fn next_low_id(&mut self) -> u32 {
        self.id_gen.generate()
    }

    pub fn load_item(&mut self, addr: SlotAddress, record: ItemRecord) {
        self.id_gen.advance_past(record.low_id);
        *self.entry_counts.entry(record.entry).or_insert(0) += record.stack_count;
        let low_id = record.low_id;
        self.items.insert(low_id, record);
        self.set_item_at(addr, Some(low_id));
    }

    fn canonical_locations(&self) -> Vec<SlotAddress> {
        let mut locations = Vec::new();
        for i in 0..PACK_SLOTS {
            locations.push(SlotAddress::body(PACK_RANGE.start + i));
        }
        for bar in 0..BAG_BAR_SLOTS {
            if let Some(bag_low) = self.bag_bar[bar as usize] {
                let num_slots = self.bags[&bag_low].num_slots;
                for s in 0..num_slots {
                    locations.push(SlotAddress::new(bar, s));
                }
            }
        }
        locations
    }

    /// The create-items protocol (§4.6): reject on max-count, walk canonical
    /// order computing capacity, two-pass fill (top-up then empty-fill).
    pub fn create_items(
        &mut self,
        catalog: &impl ItemCatalog,
        entry: u32,
        amount: u32,
    ) -> Result<CreateItemsReport, InventoryError> {
        if amount == 0 {
            return Ok(CreateItemsReport::default());
        }

        let template = catalog
            .template(entry)
            .unwrap_or_else(|| panic!("create_items called with unknown entry {entry}"));
        let max_stack = template.effective_max_stack();
        let current = self.entry_count(entry);

        if template.max_count > 0 && current + amount > template.max_count {
            return Err(InventoryError::CantCarryMore);
        }

        // "Quick check" (supplemented from original_source/inventory.cpp):
        // necessary but not sufficient, only applicable when the player
        // holds none of the entry yet or the entry doesn't stack.
        if current == 0 || max_stack == 1 {
            let required_slots = (amount - 1) / max_stack + 1;
            if required_slots > self.free_slot_count() {
                return Err(InventoryError::InventoryFull);
            }
        }

        let locations = self.canonical_locations();
        let mut existing_capacity = Vec::new();
        let mut empty_locations = Vec::new();
        for loc in locations {
            match self.get_item_at(loc) {
                Some(low_id) => {
                    let rec = self.items[&low_id];
                    if rec.entry == entry && rec.stack_count < max_stack {
                        existing_capacity.push((loc, max_stack - rec.stack_count));
                    }
                }
                None => empty_locations.push(loc),
            }
        }

        let total_capacity: u32 = existing_capacity.iter().map(|(_, c)| c).sum::<u32>()
            + empty_locations.len() as u32 * max_stack;
        if total_capacity < amount {
            return Err(InventoryError::InventoryFull);
        }

        let mut report = CreateItemsReport::default();
        let mut remaining = amount;

        for (loc, capacity) in existing_capacity {
            if remaining == 0 {
                break;
            }
            let add = capacity.min(remaining);
            let low_id = self.get_item_at(loc).expect("capacity computed from an occupied slot");
            self.items.get_mut(&low_id).unwrap().stack_count += add;
            remaining -= add;
            report.filled_existing_stacks += 1;
        }

        for loc in empty_locations {
            if remaining == 0 {
                break;
            }
            let give = max_stack.min(remaining);
            let low_id = self.id_gen.generate();
            let mut record = ItemRecord::new(low_id, entry, give);
            record.bound = template.bind_on_pickup;
            self.items.insert(low_id, record);
            self.set_item_at(loc, Some(low_id));
            remaining -= give;
            report.created_low_ids.push(low_id);
        }

        debug_assert_eq!(remaining, 0, "create_items capacity check should guarantee a full fill");
        *self.entry_counts.entry(entry).or_insert(0) += amount;

        Ok(report)
    }

    /// Pure predicate: would `template` be accepted at `dest` (§4.6)? Does
    /// not check whether `dest` is already occupied — that's `swap`'s job.
    pub fn is_valid_slot(&self, dest: SlotAddress, template: &ItemTemplate) -> Result<(), InventoryError> {
        if dest.is_equipment() {
            let slot = dest.equip_slot().ok_or(InventoryError::SlotOutOfRange)?;
            if !equip_slot_accepts(slot, template.inventory_type) {
                return Err(InventoryError::WrongInventoryType);
            }
            if slot == EquipSlot::MainHand && template.inventory_type == InventoryType::TwoHandWeapon {
                let offhand_occupied = self.equipment[EquipSlot::OffHand.index() as usize].is_some();
                if offhand_occupied && self.free_slot_count() == 0 {
                    return Err(InventoryError::OffhandMustBeCleared);
                }
            }
            if slot == EquipSlot::OffHand
                && !matches!(template.inventory_type, InventoryType::Shield | InventoryType::HoldableOffHand)
                && !template.can_dual_wield
            {
                return Err(InventoryError::RequiresDualWield);
            }
            Ok(())
        } else if dest.is_bag_bar() {
            match template.item_class {
                ItemClass::Container => Ok(()),
                ItemClass::Quiver => {
                    if self.quiver_equipped() {
                        Err(InventoryError::CanEquipOnlyOneQuiver)
                    } else {
                        Ok(())
                    }
                }
                _ => Err(InventoryError::NotAContainer),
            }
        } else if dest.is_bag_slot() {
            let bag_low = self.bag_bar[dest.bag as usize].ok_or(InventoryError::BagSlotDoesNotExist)?;
            let bag = self.bags.get(&bag_low).expect("bag-bar entry without metadata");
            if dest.slot as usize >= bag.num_slots as usize {
                return Err(InventoryError::SlotOutOfRange);
            }
            if bag.is_quiver && template.item_class != ItemClass::Projectile {
                return Err(InventoryError::QuiverAcceptsAmmoOnly);
            }
            Ok(())
        } else {
            // Pack, buyback, and key-ring slots accept any item (§4.6).
            Ok(())
        }
    }

    /// Swaps the contents of `a` and `b` per §4.6's swap algorithm:
    /// combat gating, destination validation, stack-merge-or-reference-swap,
    /// and bind-on-equip transitions.
    #[allow(clippy::too_many_arguments)]
    pub fn swap(
        &mut self,
        catalog: &impl ItemCatalog,
        a: SlotAddress,
        b: SlotAddress,
        is_alive: bool,
        in_combat: bool,
        hook: &mut impl EquipmentHook,
    ) -> Result<(), InventoryError> {
        if !is_alive {
            return Err(InventoryError::NotAlive);
        }

        if in_combat {
            for addr in [a, b] {
                if addr.is_equipment() {
                    let slot = addr.equip_slot().ok_or(InventoryError::SlotOutOfRange)?;
                    if !matches!(slot, EquipSlot::MainHand | EquipSlot::OffHand | EquipSlot::Ranged) {
                        return Err(InventoryError::CannotChangeInCombat);
                    }
                }
            }
        }

        let item_a = self.get_item_at(a);
        let item_b = self.get_item_at(b);

        if let Some(low_id) = item_a {
            let template = catalog.template(self.items[&low_id].entry).expect("item with unknown template");
            self.is_valid_slot(b, template)?;
        }
        if let Some(low_id) = item_b {
            let template = catalog.template(self.items[&low_id].entry).expect("item with unknown template");
            self.is_valid_slot(a, template)?;
        }

        // A bag may be moved only if empty, checked independently per side
        // so swapping two empty equipped bags is allowed (§4.6 invariant).
        self.bag_bar_move_allowed(a)?;
        self.bag_bar_move_allowed(b)?;

        if let (Some(low_a), Some(low_b)) = (item_a, item_b) {
            let (entry_a, entry_b) = (self.items[&low_a].entry, self.items[&low_b].entry);
            if entry_a == entry_b {
                let template = catalog.template(entry_a).expect("item with unknown template");
                let max_stack = template.effective_max_stack();
                let spare = max_stack.saturating_sub(self.items[&low_b].stack_count);
                if spare > 0 {
                    let transfer = spare.min(self.items[&low_a].stack_count);
                    self.items.get_mut(&low_b).unwrap().stack_count += transfer;
                    let remaining_a = {
                        let rec = self.items.get_mut(&low_a).unwrap();
                        rec.stack_count -= transfer;
                        rec.stack_count
                    };
                    if remaining_a == 0 {
                        self.items.remove(&low_a);
                        self.set_item_at(a, None);
                    }
                    return Ok(());
                }
            }
        }

        self.apply_equip_transition(a, item_a, item_b, catalog, hook);
        self.apply_equip_transition(b, item_b, item_a, catalog, hook);
        self.apply_bag_bar_transition(catalog, a, item_a, item_b);
        self.apply_bag_bar_transition(catalog, b, item_b, item_a);
        self.set_item_at(a, item_b);
        self.set_item_at(b, item_a);

        Ok(())
    }

    /// Rejects moving the bag currently at `addr` unless it is empty (§4.6
    /// invariant: "a bag may be moved only if empty"). A no-op for every
    /// address that is not a bag-bar slot, or a bag-bar slot with nothing
    /// equipped in it.
    fn bag_bar_move_allowed(&self, addr: SlotAddress) -> Result<(), InventoryError> {
        if !addr.is_bag_bar() {
            return Ok(());
        }
        if let Some(bag_low) = self.bag_bar[(addr.slot - BAG_BAR_RANGE.start) as usize] {
            let meta = self.bags.get(&bag_low).expect("bag-bar entry without metadata");
            if meta.slots.iter().any(Option::is_some) {
                return Err(InventoryError::BagNotEmpty);
            }
        }
        Ok(())
    }

    /// Keeps `bags`/`free_slots` in sync with a bag-bar slot's contents
    /// across a swap: detaches the bag leaving `addr` (already validated
    /// empty by [`Self::bag_bar_move_allowed`]) and attaches the bag
    /// arriving at `addr`, if any (§4.6: equipping a bag is the only live
    /// route into the bag-bar, and it must go through
    /// [`Self::attach_bag`]/[`Self::detach_bag`] like every other path does).
    fn apply_bag_bar_transition(&mut self, catalog: &impl ItemCatalog, addr: SlotAddress, leaving: Option<u32>, arriving: Option<u32>) {
        if !addr.is_bag_bar() {
            return;
        }
        let bar_index = addr.slot - BAG_BAR_RANGE.start;
        if leaving.is_some() {
            let _ = self.detach_bag(bar_index);
        }
        if let Some(low_id) = arriving {
            let template = catalog.template(self.items[&low_id].entry).expect("item with unknown template");
            let is_quiver = template.item_class == ItemClass::Quiver;
            let num_slots = template.bag_slots.min(u8::MAX as u32) as u8;
            self.attach_bag(bar_index, low_id, num_slots, is_quiver);
        }
    }

    fn apply_equip_transition(
        &mut self,
        addr: SlotAddress,
        leaving: Option<u32>,
        arriving: Option<u32>,
        catalog: &impl ItemCatalog,
        hook: &mut impl EquipmentHook,
    ) {
        if !addr.is_equipment() {
            return;
        }
        if let Some(low_id) = leaving {
            let template = catalog.template(self.items[&low_id].entry).expect("item with unknown template");
            hook.on_unequip(template);
        }
        if let Some(low_id) = arriving {
            let entry = self.items[&low_id].entry;
            let template = catalog.template(entry).expect("item with unknown template");
            if template.bind_on_equip {
                self.items.get_mut(&low_id).unwrap().bound = true;
            }
            hook.on_equip(template);
        }
    }

    /// Removes up to `stacks` from the item at `addr` (`0` means "all").
    /// If `sold` is set, the removed portion enters the buyback ring priced
    /// by `prices` (§4.6).
    pub fn remove(
        &mut self,
        catalog: &impl ItemCatalog,
        prices: &impl crate::buyback::PriceCatalog,
        addr: SlotAddress,
        stacks: u32,
        sold: bool,
        hook: &mut impl EquipmentHook,
        now: ironspire_core::GameTime,
    ) -> Result<(), InventoryError> {
        let low_id = self.get_item_at(addr).ok_or(InventoryError::SourceSlotEmpty)?;
        let record = self.items[&low_id];
        let to_remove = if stacks == 0 { record.stack_count } else { stacks.min(record.stack_count) };

        *self.entry_counts.entry(record.entry).or_insert(0) =
            self.entry_counts.get(&record.entry).copied().unwrap_or(0).saturating_sub(to_remove);

        let remaining = record.stack_count - to_remove;
        if remaining == 0 {
            if addr.is_equipment() {
                let template = catalog.template(record.entry).expect("item with unknown template");
                hook.on_unequip(template);
            }
            self.items.remove(&low_id);
            self.set_item_at(addr, None);
        } else {
            self.items.get_mut(&low_id).unwrap().stack_count = remaining;
        }

        if sold {
            let mut removed_record = record;
            removed_record.stack_count = to_remove;
            self.buyback.push_sale(removed_record, prices, now);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buyback::PriceCatalog;
    use crate::catalog::StaticCatalog;

    fn normal_template(entry: u32, max_stack: u32, max_count: u32) -> ItemTemplate {
        ItemTemplate {
            entry,
            item_class: ItemClass::Misc,
            inventory_type: InventoryType::NonEquippable,
            max_stack,
            max_count,
            bag_slots: 0,
            bind_on_pickup: false,
            bind_on_equip: false,
            can_dual_wield: false,
            sell_price: 1,
        }
    }

    struct FlatPrices;
    impl PriceCatalog for FlatPrices {
        fn sell_price(&self, _entry: u32) -> u32 {
            1
        }
    }

    #[test]
    fn creating_fifty_with_max_stack_twenty_fills_three_slots() {
        let mut catalog = StaticCatalog::new();
        catalog.insert(normal_template(1, 20, 0));
        let mut inv = Inventory::new();

        let report = inv.create_items(&catalog, 1, 50).unwrap();
        assert_eq!(report.created_low_ids.len(), 3);
        assert_eq!(inv.entry_count(1), 50);
        assert_eq!(inv.free_slot_count(), PACK_SLOTS as u32 - 3);
        assert_eq!(inv.recomputed_entry_count(1), 50);
        assert_eq!(inv.recomputed_free_slots(), inv.free_slot_count());
    }

    #[test]
    fn exact_fit_across_existing_stacks_and_empties() {
        let mut catalog = StaticCatalog::new();
        catalog.insert(normal_template(1, 20, 0));
        let mut inv = Inventory::new();
        inv.create_items(&catalog, 1, 15).unwrap(); // one slot, 5 spare capacity
        let before_free = inv.free_slot_count();

        // Σ(maxStack - stack_i) + k·maxStack, with k = 2 empties.
        inv.create_items(&catalog, 1, 5 + 2 * 20).unwrap();
        assert_eq!(inv.free_slot_count(), before_free - 2);
    }

    #[test]
    fn creating_zero_of_an_entry_is_a_harmless_no_op() {
        let mut catalog = StaticCatalog::new();
        catalog.insert(normal_template(1, 20, 0));
        let mut inv = Inventory::new();
        let report = inv.create_items(&catalog, 1, 0).unwrap();
        assert!(report.created_low_ids.is_empty());
        assert_eq!(inv.entry_count(1), 0);
        assert_eq!(inv.free_slot_count(), PACK_SLOTS as u32);
    }

    #[test]
    fn max_count_cap_rejects_overflow() {
        let mut catalog = StaticCatalog::new();
        catalog.insert(normal_template(1, 20, 30));
        let mut inv = Inventory::new();
        let err = inv.create_items(&catalog, 1, 40).unwrap_err();
        assert_eq!(err, InventoryError::CantCarryMore);
    }

    #[test]
    fn inventory_full_when_capacity_insufficient() {
        let mut catalog = StaticCatalog::new();
        catalog.insert(normal_template(1, 20, 0));
        let mut inv = Inventory::new();
        let err = inv.create_items(&catalog, 1, 20 * (PACK_SLOTS as u32) + 1).unwrap_err();
        assert_eq!(err, InventoryError::InventoryFull);
    }

    #[test]
    fn two_handed_equip_with_full_pack_and_occupied_offhand_fails() {
        let mut catalog = StaticCatalog::new();
        catalog.insert(ItemTemplate {
            item_class: ItemClass::Weapon,
            inventory_type: InventoryType::Shield,
            ..normal_template(10, 1, 0)
        });
        catalog.insert(ItemTemplate {
            item_class: ItemClass::Weapon,
            inventory_type: InventoryType::TwoHandWeapon,
            ..normal_template(20, 1, 0)
        });

        let mut inv = Inventory::new();
        // Fill the pack completely and occupy the off-hand.
        for i in 0..PACK_SLOTS {
            inv.create_items(&catalog, 30 + i as u32, 1).unwrap();
        }
        inv.create_items(&catalog, 10, 1).unwrap();
        // Move the shield from the pack into the off-hand directly.
        let shield_low = *inv.items.keys().find(|k| inv.items[k].entry == 10).unwrap();
        inv.equipment[EquipSlot::OffHand.index() as usize] = Some(shield_low);

        let two_hander = catalog.template(20).unwrap();
        let err = inv.is_valid_slot(SlotAddress::body(EquipSlot::MainHand.index()), two_hander);
        // Offhand occupied and pack full -> equip rejected.
        assert_eq!(err, Err(InventoryError::OffhandMustBeCleared));
    }

    #[test]
    fn second_quiver_is_rejected() {
        let mut catalog = StaticCatalog::new();
        catalog.insert(ItemTemplate {
            item_class: ItemClass::Quiver,
            inventory_type: InventoryType::Quiver,
            bag_slots: 8,
            ..normal_template(50, 1, 0)
        });
        let mut inv = Inventory::new();
        inv.attach_bag(0, 9001, 8, true);

        let quiver = catalog.template(50).unwrap();
        let err = inv.is_valid_slot(SlotAddress::new(crate::slot::PLAYER_BODY, BAG_BAR_RANGE.start + 1), quiver);
        assert_eq!(err, Err(InventoryError::CanEquipOnlyOneQuiver));
    }

    fn bag_template(entry: u32, bag_slots: u32, is_quiver: bool) -> ItemTemplate {
        ItemTemplate {
            item_class: if is_quiver { ItemClass::Quiver } else { ItemClass::Container },
            inventory_type: if is_quiver { InventoryType::Quiver } else { InventoryType::NonEquippable },
            bag_slots,
            ..normal_template(entry, 1, 0)
        }
    }

    #[test]
    fn equipping_a_bag_via_swap_attaches_metadata_instead_of_panicking() {
        let mut catalog = StaticCatalog::new();
        catalog.insert(bag_template(60, 4, false));
        catalog.insert(normal_template(1, 20, 0));
        let mut inv = Inventory::new();

        let report = inv.create_items(&catalog, 60, 1).unwrap();
        let bag_low = report.created_low_ids[0];
        let pack_addr = inv.occupied_slots().into_iter().find(|(_, low)| *low == bag_low).unwrap().0;
        let bar_addr = SlotAddress::body(BAG_BAR_RANGE.start);

        let mut hook = NoopHook;
        inv.swap(&catalog, pack_addr, bar_addr, true, false, &mut hook).unwrap();

        assert_eq!(inv.bags[&bag_low].num_slots, 4);
        // Before the fix this indexed `self.bags[&bag_low]` on a missing key.
        inv.create_items(&catalog, 1, 1).unwrap();
        assert!(inv.occupied_slots().iter().any(|(addr, low)| *addr == bar_addr && *low == bag_low));
    }

    #[test]
    fn swapping_a_non_empty_bag_out_of_the_bar_is_rejected() {
        let mut catalog = StaticCatalog::new();
        catalog.insert(bag_template(60, 4, false));
        catalog.insert(normal_template(1, 20, 0));
        let mut inv = Inventory::new();
        inv.attach_bag(0, 900, 4, false);
        inv.items.insert(900, ItemRecord::new(900, 60, 1));
        inv.items.insert(901, ItemRecord::new(901, 1, 5));
        inv.set_item_at(SlotAddress::new(0, 0), Some(901));

        let mut hook = NoopHook;
        let bar_addr = SlotAddress::body(BAG_BAR_RANGE.start);
        let dest = SlotAddress::body(PACK_RANGE.start);
        let err = inv.swap(&catalog, bar_addr, dest, true, false, &mut hook).unwrap_err();
        assert_eq!(err, InventoryError::BagNotEmpty);
        assert_eq!(inv.bag_bar[0], Some(900));
        assert!(inv.bags.contains_key(&900));
    }

    #[test]
    fn swapping_two_empty_equipped_bags_is_allowed() {
        let mut catalog = StaticCatalog::new();
        catalog.insert(bag_template(60, 4, false));
        catalog.insert(bag_template(61, 2, false));
        let mut inv = Inventory::new();
        inv.attach_bag(0, 900, 4, false);
        inv.items.insert(900, ItemRecord::new(900, 60, 1));
        inv.attach_bag(1, 901, 2, false);
        inv.items.insert(901, ItemRecord::new(901, 61, 1));

        let mut hook = NoopHook;
        let addr0 = SlotAddress::body(BAG_BAR_RANGE.start);
        let addr1 = SlotAddress::body(BAG_BAR_RANGE.start + 1);
        inv.swap(&catalog, addr0, addr1, true, false, &mut hook).unwrap();

        assert_eq!(inv.bag_bar[0], Some(901));
        assert_eq!(inv.bag_bar[1], Some(900));
        assert_eq!(inv.bags[&901].num_slots, 2);
        assert_eq!(inv.bags[&900].num_slots, 4);
        assert_eq!(inv.recomputed_free_slots(), inv.free_slot_count());
    }

    #[test]
    fn swap_then_swap_back_is_identity_without_stack_merge() {
        let mut catalog = StaticCatalog::new();
        catalog.insert(normal_template(1, 1, 0));
        catalog.insert(normal_template(2, 1, 0));
        let mut inv = Inventory::new();
        inv.create_items(&catalog, 1, 1).unwrap();
        inv.create_items(&catalog, 2, 1).unwrap();

        let a = SlotAddress::body(PACK_RANGE.start);
        let b = SlotAddress::body(PACK_RANGE.start + 1);
        let before_a = inv.get_item_at(a);
        let before_b = inv.get_item_at(b);

        let mut hook = NoopHook;
        inv.swap(&catalog, a, b, true, false, &mut hook).unwrap();
        inv.swap(&catalog, a, b, true, false, &mut hook).unwrap();

        assert_eq!(inv.get_item_at(a), before_a);
        assert_eq!(inv.get_item_at(b), before_b);
    }

    #[test]
    fn sold_item_enters_buyback_ring() {
        let mut catalog = StaticCatalog::new();
        catalog.insert(normal_template(1, 20, 0));
        let mut inv = Inventory::new();
        inv.create_items(&catalog, 1, 5).unwrap();
        let addr = SlotAddress::body(PACK_RANGE.start);
        let mut hook = NoopHook;

        inv.remove(&catalog, &FlatPrices, addr, 0, true, &mut hook, 1000).unwrap();
        assert_eq!(inv.buyback.len(), 1);
        assert_eq!(inv.entry_count(1), 0);
        assert_eq!(inv.get_item_at(addr), None);
    }

    #[test]
    fn no_item_ever_appears_in_two_slots() {
        let mut catalog = StaticCatalog::new();
        catalog.insert(normal_template(1, 1, 0));
        let mut inv = Inventory::new();
        let report = inv.create_items(&catalog, 1, 1).unwrap();
        let low_id = report.created_low_ids[0];

        let mut seen = 0;
        for i in 0..PACK_SLOTS {
            if inv.get_item_at(SlotAddress::body(PACK_RANGE.start + i)) == Some(low_id) {
                seen += 1;
            }
        }
        assert_eq!(seen, 1);
    }

    #[test]
    fn occupied_slots_finds_every_item_created_in_the_pack() {
        let mut catalog = StaticCatalog::new();
        catalog.insert(normal_template(1, 20, 0));
        let mut inv = Inventory::new();
        let report = inv.create_items(&catalog, 1, 5).unwrap();
        let low_id = report.created_low_ids[0];

        let occupied = inv.occupied_slots();
        assert_eq!(occupied.len(), 1);
        assert_eq!(occupied[0], (SlotAddress::body(PACK_RANGE.start), low_id));
    }

    #[test]
    fn load_item_restores_state_without_catalog_validation() {
        let mut inv = Inventory::new();
        let addr = SlotAddress::body(PACK_RANGE.start + 2);
        let record = ItemRecord::new(7, 100, 3);
        inv.load_item(addr, record);

        assert_eq!(inv.get_item_at(addr), Some(7));
        assert_eq!(inv.entry_count(100), 3);
        assert_eq!(inv.item(7).unwrap().stack_count, 3);
    }
}
