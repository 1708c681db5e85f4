//! Cast pipeline: precondition checks, scheduling, and per-spell cooldowns
//! (§4.7).

use ironspire_core::{GameTime, Guid};
use ironspire_entity::Vec3;
use rustc_hash::FxHashMap;

use crate::error::CastError;
use crate::geometry::{within_facing_arc, within_range};

/// Static per-spell requirements a catalog hands the cast pipeline. Kept
/// separate from a concrete spell database, mirroring
/// [`ironspire_inventory::ItemCatalog`]'s pluggable-content shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpellRequirements {
    pub range: f32,
    pub requires_facing: bool,
    pub facing_arc_radians: f32,
    pub requires_line_of_sight: bool,
    pub cast_time_ms: u32,
    pub resource_cost: u32,
    pub cooldown_ms: u64,
    pub requires_target: bool,
}

/// Everything `CastSpell` needs to know about the moment of casting, decided
/// by the caller (the instance tick) before the pipeline runs (§9 Design
/// Notes: explicit context, not ambient lookups).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CastContext {
    pub caster_alive: bool,
    pub caster_busy: bool,
    pub caster_position: Vec3,
    pub caster_facing: f32,
    pub resource_available: u32,
    pub target: Option<CastTarget>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CastTarget {
    pub guid: Guid,
    pub position: Vec3,
    pub alive: bool,
    pub has_line_of_sight: bool,
    pub immune: bool,
}

/// A cast accepted by the precondition check, scheduled to fire later.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingCast {
    pub entry: u32,
    pub target: Option<Guid>,
    pub fires_at: GameTime,
}

/// Validates `CastSpell(target, entry, castTime)` against every precondition
/// in §4.7, in the order a client would most usefully see them fail.
pub fn validate_cast(
    requirements: &SpellRequirements,
    ctx: &CastContext,
    cooldowns: &CooldownTracker,
    entry: u32,
    now: GameTime,
) -> Result<(), CastError> {
    if !ctx.caster_alive {
        return Err(CastError::CasterDead);
    }
    if ctx.caster_busy {
        return Err(CastError::Busy);
    }
    if !cooldowns.is_ready(entry, now) {
        return Err(CastError::OnCooldown);
    }
    if ctx.resource_available < requirements.resource_cost {
        return Err(CastError::InsufficientResource);
    }

    if requirements.requires_target {
        let target = ctx.target.ok_or(CastError::NoTarget)?;
        if !target.alive {
            return Err(CastError::NoTarget);
        }
        if target.immune {
            return Err(CastError::Immune);
        }
        if requirements.requires_line_of_sight && !target.has_line_of_sight {
            return Err(CastError::NoLineOfSight);
        }
        if !within_range(ctx.caster_position, target.position, requirements.range) {
            return Err(CastError::OutOfRange);
        }
        if requirements.requires_facing
            && !within_facing_arc(ctx.caster_position, ctx.caster_facing, target.position, requirements.facing_arc_radians)
        {
            return Err(CastError::WrongFacing);
        }
    }

    Ok(())
}

/// Runs the full precondition check and, on success, schedules the cast
/// timer and starts the spell's cooldown (§4.7: "a successful cast schedules
/// a timer").
pub fn cast_spell(
    requirements: &SpellRequirements,
    ctx: &CastContext,
    cooldowns: &mut CooldownTracker,
    entry: u32,
    now: GameTime,
) -> Result<PendingCast, CastError> {
    validate_cast(requirements, ctx, cooldowns, entry, now)?;
    cooldowns.start(entry, now, requirements.cooldown_ms);
    Ok(PendingCast {
        entry,
        target: ctx.target.map(|t| t.guid),
        fires_at: now + requirements.cast_time_ms as GameTime,
    })
}

/// Per-caster cooldown state, keyed by spell entry.
#[derive(Debug, Default)]
pub struct CooldownTracker {
    ready_at: FxHashMap<u32, GameTime>,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self, entry: u32, now: GameTime) -> bool {
        match self.ready_at.get(&entry) {
            Some(&ready) => now >= ready,
            None => true,
        }
    }

    pub fn start(&mut self, entry: u32, now: GameTime, cooldown_ms: u64) {
        if cooldown_ms > 0 {
            self.ready_at.insert(entry, now + cooldown_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requirements() -> SpellRequirements {
        SpellRequirements {
            range: 30.0,
            requires_facing: true,
            facing_arc_radians: std::f32::consts::FRAC_PI_2,
            requires_line_of_sight: true,
            cast_time_ms: 1500,
            resource_cost: 20,
            cooldown_ms: 8000,
            requires_target: true,
        }
    }

    fn ready_context() -> CastContext {
        CastContext {
            caster_alive: true,
            caster_busy: false,
            caster_position: Vec3::ZERO,
            caster_facing: 0.0,
            resource_available: 100,
            target: Some(CastTarget {
                guid: Guid::new(ironspire_core::GuidKind::Creature, 1, 1),
                position: Vec3 { x: 5.0, y: 0.0, z: 0.0 },
                alive: true,
                has_line_of_sight: true,
                immune: false,
            }),
        }
    }

    #[test]
    fn dead_caster_is_rejected_before_anything_else() {
        let mut ctx = ready_context();
        ctx.caster_alive = false;
        let cooldowns = CooldownTracker::new();
        let err = validate_cast(&requirements(), &ctx, &cooldowns, 1, 0).unwrap_err();
        assert_eq!(err, CastError::CasterDead);
    }

    #[test]
    fn no_target_is_rejected_when_a_target_is_required() {
        let mut ctx = ready_context();
        ctx.target = None;
        let cooldowns = CooldownTracker::new();
        let err = validate_cast(&requirements(), &ctx, &cooldowns, 1, 0).unwrap_err();
        assert_eq!(err, CastError::NoTarget);
    }

    #[test]
    fn out_of_range_target_is_rejected() {
        let mut ctx = ready_context();
        ctx.target.as_mut().unwrap().position = Vec3 { x: 500.0, y: 0.0, z: 0.0 };
        let cooldowns = CooldownTracker::new();
        let err = validate_cast(&requirements(), &ctx, &cooldowns, 1, 0).unwrap_err();
        assert_eq!(err, CastError::OutOfRange);
    }

    #[test]
    fn immune_target_is_rejected() {
        let mut ctx = ready_context();
        ctx.target.as_mut().unwrap().immune = true;
        let cooldowns = CooldownTracker::new();
        let err = validate_cast(&requirements(), &ctx, &cooldowns, 1, 0).unwrap_err();
        assert_eq!(err, CastError::Immune);
    }

    #[test]
    fn successful_cast_starts_cooldown_and_schedules_fire_time() {
        let ctx = ready_context();
        let mut cooldowns = CooldownTracker::new();
        let pending = cast_spell(&requirements(), &ctx, &mut cooldowns, 1, 1000).unwrap();
        assert_eq!(pending.fires_at, 2500);
        assert!(!cooldowns.is_ready(1, 1000));
        assert!(!cooldowns.is_ready(1, 8999));
        assert!(cooldowns.is_ready(1, 9000));
    }

    #[test]
    fn on_cooldown_rejects_recast() {
        let ctx = ready_context();
        let mut cooldowns = CooldownTracker::new();
        cooldowns.start(1, 0, 8000);
        let err = validate_cast(&requirements(), &ctx, &cooldowns, 1, 500).unwrap_err();
        assert_eq!(err, CastError::OnCooldown);
    }
}
