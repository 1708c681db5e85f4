#![warn(trivial_casts, trivial_numeric_casts, unused_lifetimes, unused_import_braces, unreachable_pub)]

//! Authoritative world-simulation and realm-proxy core for an MMO server:
//! the field-delta object model, game object hierarchy, visibility grid,
//! movement state machine, world instance and manager, inventory/equipment
//! engine, spell and combat resolution, tile replication, and the
//! realm↔world proxy, assembled from the `ironspire_*` crates.

pub use ironspire_combat as combat;
pub use ironspire_core as core;
pub use ironspire_entity as entity;
pub use ironspire_field as field;
pub use ironspire_instance as instance;
pub use ironspire_inventory as inventory;
pub use ironspire_movement as movement;
pub use ironspire_proxy as proxy;
pub use ironspire_replication as replication;
pub use ironspire_spatial as spatial;

/// The most frequently used items across a world node, glob-imported the
/// way a server binary typically wants them.
pub mod prelude {
    pub use crate::combat::{AttackSwingState, CooldownTracker};
    pub use crate::core::config::ServerConfig;
    pub use crate::core::guid::{Guid, GuidGenerator, GuidKind};
    pub use crate::core::{FatalError, GameTime, ResultCode, SessionFault, SessionFaultKind};
    pub use crate::entity::{BaseObject, GameObject, ItemLike, UnitLike};
    pub use crate::field::FieldMap;
    pub use crate::instance::{InstanceId, MapId, NoopTickHooks, TickHooks, WorldInstance, WorldInstanceManager};
    pub use crate::inventory::Inventory;
    pub use crate::movement::{MovementUpdate, PendingChangeQueue};
    pub use crate::proxy::{join_character, leave_character, PlayerSession, SessionTable};
    pub use crate::replication::Subscriber;
    pub use crate::spatial::{Grid, Tile, TileChangeEvent, TilePos};
}
