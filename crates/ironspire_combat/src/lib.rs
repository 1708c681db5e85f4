#![warn(
    trivial_casts,
    trivial_numeric_casts,
    unused_lifetimes,
    unused_import_braces,
    unreachable_pub
)]

//! Cast pipeline, damage application, and the attack swing loop (C7).

pub mod attack;
pub mod cast;
pub mod catalog;
pub mod damage;
pub mod effect;
pub mod error;
pub mod geometry;

pub use attack::{AttackOutcome, AttackSwingEvent, AttackSwingState};
pub use cast::{cast_spell, validate_cast, CastContext, CastTarget, CooldownTracker, PendingCast, SpellRequirements};
pub use catalog::{SpellCatalog, StaticSpellCatalog};
pub use damage::{apply_damage, apply_heal, DamageKind, DamageLogEntry};
pub use effect::{kill_credit_xp, CombatSubscriber, SpellEffect};
pub use error::CastError;
