#![warn(
    trivial_casts,
    trivial_numeric_casts,
    unused_lifetimes,
    unused_import_braces,
    unreachable_pub
)]

//! Slot algebra, stacking, equip validation, the buyback ring, and the bag
//! system for a single character's inventory (C6).

pub mod buyback;
pub mod catalog;
pub mod error;
pub mod inventory;
pub mod item;
pub mod slot;

pub use buyback::{BuybackEntry, BuybackRing, CatalogPrices, PriceCatalog};
pub use catalog::{InventoryType, ItemCatalog, ItemClass, ItemTemplate, StaticCatalog};
pub use error::InventoryError;
pub use inventory::{BagMeta, CreateItemsReport, EquipmentHook, Inventory, NoopHook};
pub use item::{ItemIdGenerator, ItemRecord};
pub use slot::{EquipSlot, SlotAddress};
