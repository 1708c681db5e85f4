//! Authoritative movement state carried by every `Unit` (§3, §4.4).

use ironspire_core::GameTime;

bitflags::bitflags! {
    /// Movement flags mirrored between client and server. `PositionsChanging`
    /// is a derived bit: it is never set directly by a packet handler, only
    /// computed from the other flags (§3).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MovementFlags: u32 {
        const FORWARD        = 1 << 0;
        const BACKWARD       = 1 << 1;
        const STRAFE_LEFT    = 1 << 2;
        const STRAFE_RIGHT   = 1 << 3;
        const TURN_LEFT      = 1 << 4;
        const TURN_RIGHT     = 1 << 5;
        const FALLING        = 1 << 6;
        const FALLING_FAR    = 1 << 7;
        const SWIMMING       = 1 << 8;
        /// Derived: set iff any of FORWARD/BACKWARD/STRAFE_LEFT/STRAFE_RIGHT
        /// is set. Recomputed by [`MovementInfo::recompute_derived`].
        const POSITIONS_CHANGING = 1 << 9;
    }
}

impl MovementFlags {
    const DRIVES_POSITION: MovementFlags = MovementFlags::FORWARD
        .union(MovementFlags::BACKWARD)
        .union(MovementFlags::STRAFE_LEFT)
        .union(MovementFlags::STRAFE_RIGHT);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
}

/// Transport attachment: the unit's position is relative to a transport
/// object's own frame rather than the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransportInfo {
    pub transport_guid: ironspire_core::Guid,
    pub offset: Vec3,
}

/// The full authoritative movement snapshot the server holds for a unit,
/// and the wire form of the same (§6 "Movement wire form").
#[derive(Debug, Clone, PartialEq)]
pub struct MovementInfo {
    pub timestamp: u32,
    pub flags: MovementFlags,
    pub position: Vec3,
    pub facing: f32,
    pub pitch: f32,
    pub fall_time: u32,
    pub jump_velocity: f32,
    pub jump_xz_speed: f32,
    pub transport: Option<TransportInfo>,
    /// Last time a heartbeat or movement-affecting packet was accepted, used
    /// to detect heartbeat absence (§4.4).
    pub last_update: GameTime,
}

impl Default for MovementInfo {
    fn default() -> Self {
        Self {
            timestamp: 0,
            flags: MovementFlags::empty(),
            position: Vec3::ZERO,
            facing: 0.0,
            pitch: 0.0,
            fall_time: 0,
            jump_velocity: 0.0,
            jump_xz_speed: 0.0,
            transport: None,
            last_update: 0,
        }
    }
}

impl MovementInfo {
    pub fn is_moving(&self) -> bool {
        self.flags.intersects(MovementFlags::DRIVES_POSITION)
    }

    /// Recomputes the `POSITIONS_CHANGING` derived bit from the primitive
    /// direction flags. Must be called after any direct flag mutation.
    pub fn recompute_derived(&mut self) {
        self.flags.set(
            MovementFlags::POSITIONS_CHANGING,
            self.flags.intersects(MovementFlags::DRIVES_POSITION),
        );
    }
}
