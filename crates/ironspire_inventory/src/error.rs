//! Typed, client-facing result codes for inventory operations (§7: domain
//! failures surface as typed result codes; the session continues).

use ironspire_core::ResultCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    #[error("item has reached its maximum carried count")]
    CantCarryMore,
    #[error("inventory does not have enough free space")]
    InventoryFull,
    #[error("item does not belong in that slot")]
    WrongInventoryType,
    #[error("a two-handed weapon requires an empty or storable off-hand")]
    OffhandMustBeCleared,
    #[error("equipping this off-hand item requires dual-wield capability")]
    RequiresDualWield,
    #[error("a bag-bar slot only accepts a container or quiver")]
    NotAContainer,
    #[error("only one quiver may be equipped at a time")]
    CanEquipOnlyOneQuiver,
    #[error("that bag slot does not exist")]
    BagSlotDoesNotExist,
    #[error("a quiver's slots only accept ammunition")]
    QuiverAcceptsAmmoOnly,
    #[error("the source slot is empty")]
    SourceSlotEmpty,
    #[error("a bag may only be moved while empty")]
    BagNotEmpty,
    #[error("the player is not alive")]
    NotAlive,
    #[error("this slot may not be changed while in combat")]
    CannotChangeInCombat,
    #[error("slot address is out of range")]
    SlotOutOfRange,
}

impl ResultCode for InventoryError {
    fn code(&self) -> u16 {
        *self as u16
    }
}
