//! The persisted character/item snapshot (§6): `{fieldCount:u16, [{id:u16,
//! value:u32}]}` followed by `{itemCount:u16, [{entry:u32, slot:u16,
//! stack:u16, creator:u64, contained:u64, durability:u32, randomProps:u16,
//! randomSuffix:u16}]}`.
//!
//! [`ironspire_inventory::ItemRecord`] does not model `creator`/`contained`/
//! `randomProps`/`randomSuffix` (no code in this workspace ever sets them),
//! so they round-trip as zero. This is recorded as a known gap in
//! `DESIGN.md` rather than left silently lossy.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use ironspire_entity::{GameObject, UnitLike};
use ironspire_inventory::{Inventory, ItemRecord, SlotAddress};

/// Serializes a player unit's field map and its inventory's occupied slots
/// into the persisted snapshot form.
pub fn serialize_character_data(player: &GameObject, inventory: &Inventory) -> Bytes {
    let mut buf = BytesMut::new();

    let unit = player.as_unit().expect("CharacterData is only built for unit-family objects");
    let fields = unit.unit_core().base.fields();
    let cells: Vec<(u16, u32)> = fields.iter_nonzero().collect();
    buf.put_u16_le(cells.len() as u16);
    for (id, value) in cells {
        buf.put_u16_le(id);
        buf.put_u32_le(value);
    }

    let occupied = inventory.occupied_slots();
    let items: Vec<_> = occupied
        .into_iter()
        .filter_map(|(addr, low_id)| inventory.item(low_id).map(|record| (addr, *record)))
        .collect();
    buf.put_u16_le(items.len() as u16);
    for (addr, record) in items {
        buf.put_u32_le(record.entry);
        buf.put_u16_le(addr.pack());
        buf.put_u16_le(record.stack_count.min(u16::MAX as u32) as u16);
        buf.put_u64_le(0); // creator: not modeled by ItemRecord
        buf.put_u64_le(0); // contained: not modeled by ItemRecord
        buf.put_u32_le(record.durability);
        buf.put_u16_le(0); // randomProps: not modeled by ItemRecord
        buf.put_u16_le(0); // randomSuffix: not modeled by ItemRecord
    }

    buf.freeze()
}

/// Restores a player unit's field map and the caller's inventory from a
/// snapshot produced by [`serialize_character_data`]. Callers must
/// `attach_bag` any equipped bags before this is called if the snapshot's
/// items live inside one, since item slot addresses referencing an
/// unattached bag are silently dropped by
/// [`Inventory::load_item`](ironspire_inventory::Inventory::load_item).
pub fn deserialize_character_data(buf: &mut impl Buf, player: &mut GameObject, inventory: &mut Inventory) {
    let field_count = buf.get_u16_le();
    let fields = player
        .as_unit_mut()
        .expect("CharacterData is only applied to unit-family objects")
        .unit_core_mut()
        .base
        .fields_mut();
    for _ in 0..field_count {
        let id = buf.get_u16_le();
        let value = buf.get_u32_le();
        fields.set_ex::<u32>(id, value, false);
    }

    let item_count = buf.get_u16_le();
    for _ in 0..item_count {
        let entry = buf.get_u32_le();
        let slot = SlotAddress::unpack(buf.get_u16_le());
        let stack = buf.get_u16_le() as u32;
        let _creator = buf.get_u64_le();
        let _contained = buf.get_u64_le();
        let durability = buf.get_u32_le();
        let _random_props = buf.get_u16_le();
        let _random_suffix = buf.get_u16_le();

        let mut record = ItemRecord::new(0, entry, stack);
        record.durability = durability;
        // Low ids are arena-local and never carried on the wire; mint a
        // fresh one scoped to the inventory being restored into.
        let low_id = inventory.next_low_id();
        record.low_id = low_id;
        inventory.load_item(slot, record);
    }
}
