//! Client movement intents and the rules for accepting them (§4.4).

use ironspire_core::GameTime;
use ironspire_entity::{MovementFlags, MovementInfo, Vec3};

/// A decoded client movement packet, opcode-agnostic. The opcode determines
/// `start_flag`/`stop_flag` (exactly one of which is `Some`) before this
/// struct is built; `apply_client_update` only sees the already-classified
/// intent.
///
/// `position` is `None` for packets that never carry a pose (`SetFacing`,
/// heartbeats) — this is the signal `apply_client_update` uses to decide
/// whether to touch `movement.position`/`fall_time`/`jump_*` at all, rather
/// than inferring it from the value being `(0,0,0)` (§4.4: a client standing
/// exactly at the origin must not be treated as "not moving its position").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementUpdate {
    pub start_flag: Option<MovementFlags>,
    pub stop_flag: Option<MovementFlags>,
    pub is_heartbeat: bool,
    pub timestamp: u32,
    pub position: Option<Vec3>,
    pub facing: f32,
    pub pitch: f32,
    pub fall_time: u32,
    pub jump_velocity: f32,
    pub jump_xz_speed: f32,
}

impl MovementUpdate {
    /// A pure heartbeat: refreshes `last_update` without touching flags or
    /// position beyond what the server already has recorded.
    pub fn heartbeat(timestamp: u32, position: Vec3, facing: f32) -> Self {
        Self {
            start_flag: None,
            stop_flag: None,
            is_heartbeat: true,
            timestamp,
            position: Some(position),
            facing,
            pitch: 0.0,
            fall_time: 0,
            jump_velocity: 0.0,
            jump_xz_speed: 0.0,
        }
    }

    /// A facing-only update (`SetFacing`): never touches movement flags or
    /// position.
    pub fn set_facing(timestamp: u32, facing: f32, pitch: f32) -> Self {
        Self {
            start_flag: None,
            stop_flag: None,
            is_heartbeat: false,
            timestamp,
            position: None,
            facing,
            pitch,
            fall_time: 0,
            jump_velocity: 0.0,
            jump_xz_speed: 0.0,
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum MovementError {
    /// A `Move*Start` packet whose flag was already set, or a `Move*Stop`
    /// packet whose flag was already clear (§4.4).
    #[error("movement flag {flag:?} state mismatch: start={is_start}")]
    FlagStateMismatch { flag: MovementFlags, is_start: bool },
    /// A position mutation arrived while the server-side flags show the unit
    /// standing still, and the position does not match the last authoritative
    /// position (§4.4).
    #[error("position changed while not moving: server={server:?} client={client:?}")]
    PositionChangedWhileStill { server: Vec3, client: Vec3 },
    /// A `SetFacing` or any other packet arrived while the unit is dead.
    #[error("movement packet rejected: unit is dead")]
    DeadUnit,
}

/// Applies a decoded client update to the authoritative `movement` state,
/// per §4.4's acceptance rules. `is_alive` gates everything except pure
/// heartbeats, which stay unconditional on aliveness.
pub fn apply_client_update(
    movement: &mut MovementInfo,
    update: MovementUpdate,
    now: GameTime,
    is_alive: bool,
) -> Result<(), MovementError> {
    if update.is_heartbeat {
        movement.last_update = now;
        movement.timestamp = update.timestamp;
        return Ok(());
    }

    if !is_alive {
        return Err(MovementError::DeadUnit);
    }

    if let Some(flag) = update.start_flag {
        if movement.flags.contains(flag) {
            return Err(MovementError::FlagStateMismatch { flag, is_start: true });
        }
        movement.flags.insert(flag);
        movement.recompute_derived();
    }

    if let Some(flag) = update.stop_flag {
        if !movement.flags.contains(flag) {
            return Err(MovementError::FlagStateMismatch { flag, is_start: false });
        }
        movement.flags.remove(flag);
        movement.recompute_derived();
    }

    // A position mutation is only legitimate while the unit is actually
    // moving; otherwise the client must report exactly the position the
    // server already holds (§4.4). Packets that carry no position at all
    // (facing-only) skip this check entirely rather than being compared
    // against a sentinel value.
    if let Some(position) = update.position {
        if !movement.is_moving() && position != movement.position {
            return Err(MovementError::PositionChangedWhileStill {
                server: movement.position,
                client: position,
            });
        }
        movement.position = position;
        movement.fall_time = update.fall_time;
        movement.jump_velocity = update.jump_velocity;
        movement.jump_xz_speed = update.jump_xz_speed;
    }

    movement.facing = update.facing;
    movement.pitch = update.pitch;
    movement.timestamp = update.timestamp;
    movement.last_update = now;

    Ok(())
}

/// Checked once per tick per moving unit (§4.4, §5): if no heartbeat or
/// movement-affecting packet has arrived within `heartbeat_interval`, motion
/// is dropped to stop. This is not fatal and never kicks — absence of a
/// heartbeat is treated as "the client stopped sending input", not cheating.
pub fn check_heartbeat_timeout(
    movement: &mut MovementInfo,
    now: GameTime,
    heartbeat_interval_ms: u64,
) -> bool {
    if !movement.is_moving() {
        return false;
    }
    if now.saturating_sub(movement.last_update) >= heartbeat_interval_ms {
        movement.flags.remove(MovementFlags::FORWARD | MovementFlags::BACKWARD | MovementFlags::STRAFE_LEFT | MovementFlags::STRAFE_RIGHT);
        movement.recompute_derived();
        tracing::debug!("movement dropped to stop after heartbeat absence");
        return true;
    }
    false
}
