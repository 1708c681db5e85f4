#![warn(trivial_casts, trivial_numeric_casts, unused_lifetimes, unreachable_pub)]

//! The game object hierarchy (C2): tagged variants over the field map, plus
//! the authoritative movement snapshot (C4 data) every unit carries.

pub mod core;
pub mod fields;
pub mod movement_info;
pub mod object;
pub mod variants;

pub use core::{BaseObject, ItemCore, UnitCore};
pub use movement_info::{MovementFlags, MovementInfo, TransportInfo, Vec3};
pub use object::GameObject;
pub use variants::{BagObject, CreatureObject, ItemLike, ItemObject, PlayerObject, UnitLike, UnitObject};
