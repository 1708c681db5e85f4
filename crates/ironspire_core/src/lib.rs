#![warn(
    trivial_casts,
    trivial_numeric_casts,
    unused_lifetimes,
    unused_import_braces,
    unreachable_pub
)]

//! Shared identifiers, clock, error taxonomy, and config for the Ironspire
//! world core. Every other crate in this workspace depends on this one and
//! nothing here depends back on them, mirroring how `valence_core` anchors
//! the `valence` workspace.

pub mod clock;
pub mod config;
pub mod error;
pub mod guid;

pub use clock::{Clock, GameTime, ManualClock, SteadyClock};
pub use config::ServerConfig;
pub use error::{FatalError, ResultCode, SessionFault, SessionFaultKind};
pub use guid::{Guid, GuidGenerator, GuidKind};
