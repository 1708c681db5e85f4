#![warn(trivial_casts, trivial_numeric_casts, unused_lifetimes, unreachable_pub)]

//! Authoritative movement acceptance and ack-gated speed changes (C4).
//!
//! This crate never touches the network: callers decode a client movement
//! packet into a [`MovementUpdate`] and pass it to [`apply_client_update`],
//! which mutates the unit's [`MovementInfo`](ironspire_entity::MovementInfo)
//! in place or returns a [`MovementError`] the caller maps to a
//! [`SessionFault`](ironspire_core::SessionFault) (§7: anti-cheat violations
//! kick, they are never silently dropped).

pub mod intent;
pub mod pending;

pub use intent::{apply_client_update, check_heartbeat_timeout, MovementError, MovementUpdate};
pub use pending::{PendingChangeQueue, PendingMovementChange, SpeedKind};
