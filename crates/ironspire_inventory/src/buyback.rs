//! The buyback ring (§3, §4.6): a fixed-size FIFO of recently sold items.
//!
//! Supplemented from `original_source/src/shared/game/vendor.h`-style price
//! lookup (SPEC_FULL §1): pricing is a pluggable [`PriceCatalog`] so this
//! crate never hard-codes an economy, keeping persistence/economy design out
//! of scope while still giving the ring a real price input (§9 Open
//! Questions: whether resale carries a markup over `sellprice × stacks` is
//! unstated upstream; this implementation applies no markup).

use std::collections::VecDeque;

use ironspire_core::GameTime;

use crate::item::ItemRecord;
use crate::slot::BUYBACK_SLOTS;

pub trait PriceCatalog {
    /// The vendor sell price for one unit of `entry`.
    fn sell_price(&self, entry: u32) -> u32;
}

/// Adapts any [`crate::catalog::ItemCatalog`] into a [`PriceCatalog`] by
/// reading `ItemTemplate::sell_price`, so a caller that already holds an
/// item catalog doesn't need a second content source just to call
/// [`crate::inventory::Inventory::remove`] with `sold=true`.
pub struct CatalogPrices<'a, C: crate::catalog::ItemCatalog>(pub &'a C);

impl<'a, C: crate::catalog::ItemCatalog> PriceCatalog for CatalogPrices<'a, C> {
    fn sell_price(&self, entry: u32) -> u32 {
        self.0.template(entry).map(|t| t.sell_price).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuybackEntry {
    pub record: ItemRecord,
    pub price: u32,
    pub sold_at: GameTime,
}

/// A fixed-size ring ordered by server clock, newest at the front. When full,
/// inserting evicts the oldest entry (§3, §4.6 "remove").
#[derive(Debug, Default)]
pub struct BuybackRing {
    entries: VecDeque<BuybackEntry>,
}

impl BuybackRing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BuybackEntry> {
        self.entries.iter()
    }

    /// Sells `record`, pricing it with `catalog` as `sellprice × stacks`
    /// with no markup, and pushes it to the head of the ring, evicting the
    /// oldest slot if the ring is already at `BUYBACK_SLOTS` capacity.
    pub fn push_sale(&mut self, record: ItemRecord, catalog: &impl PriceCatalog, now: GameTime) {
        let price = catalog.sell_price(record.entry) * record.stack_count;
        if self.entries.len() >= BUYBACK_SLOTS as usize {
            self.entries.pop_back();
        }
        self.entries.push_front(BuybackEntry {
            record,
            price,
            sold_at: now,
        });
    }

    /// Repurchases the entry at ring index `index` (0 = most recently
    /// sold), removing it from the ring.
    pub fn take(&mut self, index: usize) -> Option<BuybackEntry> {
        self.entries.remove(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::BUYBACK_SLOTS;

    struct FlatCatalog(u32);
    impl PriceCatalog for FlatCatalog {
        fn sell_price(&self, _entry: u32) -> u32 {
            self.0
        }
    }

    #[test]
    fn sale_price_is_sellprice_times_stacks_with_no_markup() {
        let mut ring = BuybackRing::new();
        let catalog = FlatCatalog(10);
        ring.push_sale(ItemRecord::new(1, 100, 5), &catalog, 1000);
        assert_eq!(ring.entries.front().unwrap().price, 50);
    }

    #[test]
    fn full_ring_evicts_oldest_entry() {
        let mut ring = BuybackRing::new();
        let catalog = FlatCatalog(1);
        for i in 0..BUYBACK_SLOTS as u32 + 2 {
            ring.push_sale(ItemRecord::new(i + 1, 1, 1), &catalog, i as u64);
        }
        assert_eq!(ring.len(), BUYBACK_SLOTS as usize);
        // The two oldest (low_id 1 and 2) must have been evicted.
        assert!(ring.entries.iter().all(|e| e.record.low_id > 2));
    }

    #[test]
    fn most_recent_sale_is_ring_head() {
        let mut ring = BuybackRing::new();
        let catalog = FlatCatalog(1);
        ring.push_sale(ItemRecord::new(1, 1, 1), &catalog, 1000);
        ring.push_sale(ItemRecord::new(2, 2, 1), &catalog, 2000);
        assert_eq!(ring.entries.front().unwrap().record.low_id, 2);
    }

    #[test]
    fn catalog_prices_reads_sell_price_from_the_item_template() {
        use crate::catalog::{InventoryType, ItemClass, ItemTemplate, StaticCatalog};

        let mut catalog = StaticCatalog::new();
        catalog.insert(ItemTemplate {
            entry: 5,
            item_class: ItemClass::Misc,
            inventory_type: InventoryType::NonEquippable,
            max_stack: 20,
            max_count: 0,
            bag_slots: 0,
            bind_on_pickup: false,
            bind_on_equip: false,
            can_dual_wield: false,
            sell_price: 7,
        });
        let prices = CatalogPrices(&catalog);
        assert_eq!(prices.sell_price(5), 7);
        assert_eq!(prices.sell_price(999), 0);
    }
}
