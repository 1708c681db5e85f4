//! Slot algebra (§3, §4.6): absolute slot addressing and the sub-ranges of
//! the player body.

use std::ops::Range;

/// The bag id that addresses the player's own body (equipment, bag-bar,
/// pack, buyback ring, key ring) rather than an equipped container.
pub const PLAYER_BODY: u8 = 0xFF;

pub const EQUIP_SLOTS: u8 = 19;
pub const BAG_BAR_SLOTS: u8 = 4;
pub const PACK_SLOTS: u8 = 16;
pub const BUYBACK_SLOTS: u8 = 12;
pub const KEY_RING_SLOTS: u8 = 8;

pub const EQUIP_RANGE: Range<u8> = 0..EQUIP_SLOTS;
pub const BAG_BAR_RANGE: Range<u8> = EQUIP_SLOTS..(EQUIP_SLOTS + BAG_BAR_SLOTS);
pub const PACK_RANGE: Range<u8> = BAG_BAR_RANGE.end..(BAG_BAR_RANGE.end + PACK_SLOTS);
pub const BUYBACK_RANGE: Range<u8> = PACK_RANGE.end..(PACK_RANGE.end + BUYBACK_SLOTS);
pub const KEY_RING_RANGE: Range<u8> = BUYBACK_RANGE.end..(BUYBACK_RANGE.end + KEY_RING_SLOTS);
pub const BODY_SLOT_COUNT: u8 = KEY_RING_RANGE.end;

/// The nineteen equipment sub-slots, in the table order §4.6 validates
/// against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EquipSlot {
    Head = 0,
    Neck = 1,
    Shoulders = 2,
    Chest = 3,
    Waist = 4,
    Legs = 5,
    Feet = 6,
    Wrists = 7,
    Hands = 8,
    Finger1 = 9,
    Finger2 = 10,
    Trinket1 = 11,
    Trinket2 = 12,
    Back = 13,
    MainHand = 14,
    OffHand = 15,
    Ranged = 16,
    Tabard = 17,
    Shirt = 18,
}

impl EquipSlot {
    pub fn from_index(index: u8) -> Option<Self> {
        use EquipSlot::*;
        Some(match index {
            0 => Head,
            1 => Neck,
            2 => Shoulders,
            3 => Chest,
            4 => Waist,
            5 => Legs,
            6 => Feet,
            7 => Wrists,
            8 => Hands,
            9 => Finger1,
            10 => Finger2,
            11 => Trinket1,
            12 => Trinket2,
            13 => Back,
            14 => MainHand,
            15 => OffHand,
            16 => Ranged,
            17 => Tabard,
            18 => Shirt,
            _ => return None,
        })
    }

    pub fn index(self) -> u8 {
        self as u8
    }
}

/// An absolute slot address: `(bag, slot)` packed as `(bag << 8) | slot`
/// (§3, §4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotAddress {
    pub bag: u8,
    pub slot: u8,
}

impl SlotAddress {
    pub const fn new(bag: u8, slot: u8) -> Self {
        Self { bag, slot }
    }

    pub const fn body(slot: u8) -> Self {
        Self { bag: PLAYER_BODY, slot }
    }

    pub fn pack(self) -> u16 {
        ((self.bag as u16) << 8) | self.slot as u16
    }

    pub fn unpack(raw: u16) -> Self {
        Self {
            bag: (raw >> 8) as u8,
            slot: (raw & 0xFF) as u8,
        }
    }

    pub fn is_body(self) -> bool {
        self.bag == PLAYER_BODY
    }

    pub fn is_equipment(self) -> bool {
        self.is_body() && EQUIP_RANGE.contains(&self.slot)
    }

    pub fn is_bag_bar(self) -> bool {
        self.is_body() && BAG_BAR_RANGE.contains(&self.slot)
    }

    pub fn is_pack(self) -> bool {
        self.is_body() && PACK_RANGE.contains(&self.slot)
    }

    pub fn is_buyback(self) -> bool {
        self.is_body() && BUYBACK_RANGE.contains(&self.slot)
    }

    pub fn is_key_ring(self) -> bool {
        self.is_body() && KEY_RING_RANGE.contains(&self.slot)
    }

    pub fn is_bag_slot(self) -> bool {
        !self.is_body() && (self.bag as u32) < BAG_BAR_SLOTS as u32
    }

    pub fn equip_slot(self) -> Option<EquipSlot> {
        self.is_equipment().then(|| EquipSlot::from_index(self.slot)).flatten()
    }

    /// The bag-bar index this slot addresses, for `is_bag_bar`/`is_bag_slot`
    /// addresses alike.
    pub fn bag_bar_index(self) -> Option<u8> {
        if self.is_bag_bar() {
            Some(self.slot - BAG_BAR_RANGE.start)
        } else if self.is_bag_slot() {
            Some(self.bag)
        } else {
            None
        }
    }
}
