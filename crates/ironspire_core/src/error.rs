//! Shared error taxonomy.
//!
//! Per §7, the four non-domain error kinds are never
//! auto-converted into one another: a [`SessionFault`] always ends a
//! session, a [`FatalError`] always aborts the offending instance's current
//! operation, and domain failures stay typed result codes defined in their
//! owning crate (`ironspire_inventory::InventoryError`,
//! `ironspire_combat::CastError`, ...).

use std::fmt;

/// Why a client session was torn down.
///
/// Protocol violations and anti-cheat violations share this type because
/// both terminate the session the same way (§7); callers that need to tell
/// them apart for logging purposes use the `kind` field.
#[derive(Debug, Clone, thiserror::Error)]
#[error("session kicked ({kind:?}): {reason}")]
pub struct SessionFault {
    pub kind: SessionFaultKind,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionFaultKind {
    /// Malformed packet, opcode out of range, impossible state transition.
    ProtocolViolation,
    /// Movement without flag, mismatched/late speed ack, unpermitted teleport.
    AntiCheatViolation,
    /// Outgoing buffer exceeded its per-session cap.
    BackpressureExceeded,
}

impl SessionFault {
    pub fn protocol(reason: impl Into<String>) -> Self {
        Self {
            kind: SessionFaultKind::ProtocolViolation,
            reason: reason.into(),
        }
    }

    pub fn anti_cheat(reason: impl Into<String>) -> Self {
        Self {
            kind: SessionFaultKind::AntiCheatViolation,
            reason: reason.into(),
        }
    }

    pub fn backpressure(reason: impl Into<String>) -> Self {
        Self {
            kind: SessionFaultKind::BackpressureExceeded,
            reason: reason.into(),
        }
    }
}

/// A programming-invariant violation: bad GUID lookup, field id out of
/// range, a field map revision mismatch. Fatal to the instance that raised
/// it; other instances are unaffected.
#[derive(Debug, Clone, thiserror::Error)]
#[error("fatal instance invariant violated: {0}")]
pub struct FatalError(pub String);

impl FatalError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Marker for a value that underlies a wire-visible, typed result code.
/// Implemented by each domain error enum so replication/proxy code can log
/// the numeric code uniformly without knowing the concrete error type.
pub trait ResultCode: fmt::Debug {
    fn code(&self) -> u16;
}
