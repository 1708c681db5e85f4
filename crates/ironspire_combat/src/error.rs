//! Typed, client-facing result codes for the cast pipeline (§7: domain
//! failures surface as typed result codes; the session continues).

use ironspire_core::ResultCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CastError {
    #[error("target is out of spell range")]
    OutOfRange,
    #[error("caster is not facing the target")]
    WrongFacing,
    #[error("no line of sight to target")]
    NoLineOfSight,
    #[error("spell requires a target and none is selected")]
    NoTarget,
    #[error("caster is already casting or performing a blocking action")]
    Busy,
    #[error("spell is on cooldown")]
    OnCooldown,
    #[error("not enough of the required resource")]
    InsufficientResource,
    #[error("target is immune to this spell")]
    Immune,
    #[error("caster is dead")]
    CasterDead,
}

impl ResultCode for CastError {
    fn code(&self) -> u16 {
        *self as u16
    }
}
