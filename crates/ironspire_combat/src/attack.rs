//! The melee attack swing loop (§4.7): a per-unit base-attack-timer that,
//! while a victim is set, evaluates range and facing each time it fires.

use ironspire_core::GameTime;
use ironspire_entity::Vec3;

use crate::geometry::{within_facing_arc, within_range};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackSwingEvent {
    OutOfRange,
    WrongFacing,
    NotAlive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackOutcome {
    Hit,
    Event(AttackSwingEvent),
}

/// Per-unit state the attack loop carries between ticks: when the base
/// attack timer next fires, and the last event sent, so that identical
/// consecutive events can be suppressed (§4.7).
#[derive(Debug, Clone, Copy)]
pub struct AttackSwingState {
    base_timer_ms: u64,
    next_swing_at: GameTime,
    last_event: Option<AttackSwingEvent>,
}

impl AttackSwingState {
    pub fn new(base_timer_ms: u64, now: GameTime) -> Self {
        Self {
            base_timer_ms,
            next_swing_at: now + base_timer_ms,
            last_event: None,
        }
    }

    /// Evaluates one base-attack-timer firing, if `now` has reached it.
    /// Returns `None` when the timer hasn't elapsed yet. A `Hit` clears the
    /// suppression memory, since the next failure is never "the same as the
    /// last one sent" after a successful swing.
    pub fn tick(
        &mut self,
        now: GameTime,
        attacker_alive: bool,
        attacker_position: Vec3,
        attacker_facing: f32,
        victim_alive: bool,
        victim_position: Vec3,
        melee_range: f32,
        facing_arc_radians: f32,
    ) -> Option<AttackOutcome> {
        if now < self.next_swing_at {
            return None;
        }
        self.next_swing_at = now + self.base_timer_ms;

        let event = if !attacker_alive || !victim_alive {
            Some(AttackSwingEvent::NotAlive)
        } else if !within_range(attacker_position, victim_position, melee_range) {
            Some(AttackSwingEvent::OutOfRange)
        } else if !within_facing_arc(attacker_position, attacker_facing, victim_position, facing_arc_radians) {
            Some(AttackSwingEvent::WrongFacing)
        } else {
            None
        };

        match event {
            None => {
                self.last_event = None;
                Some(AttackOutcome::Hit)
            }
            Some(event) => {
                if self.last_event == Some(event) {
                    // Same failure as last time: the client was already told.
                    None
                } else {
                    self.last_event = Some(event);
                    Some(AttackOutcome::Event(event))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_does_not_fire_before_its_interval() {
        let mut state = AttackSwingState::new(2000, 0);
        let outcome = state.tick(1000, true, Vec3::ZERO, 0.0, true, Vec3::ZERO, 5.0, std::f32::consts::TAU);
        assert_eq!(outcome, None);
    }

    #[test]
    fn in_range_and_facing_is_a_hit() {
        let mut state = AttackSwingState::new(2000, 0);
        let outcome = state.tick(2000, true, Vec3::ZERO, 0.0, true, Vec3 { x: 1.0, y: 0.0, z: 0.0 }, 5.0, std::f32::consts::TAU);
        assert_eq!(outcome, Some(AttackOutcome::Hit));
    }

    #[test]
    fn out_of_range_emits_event_once_then_suppresses_repeats() {
        let mut state = AttackSwingState::new(1000, 0);
        let far = Vec3 { x: 100.0, y: 0.0, z: 0.0 };
        let first = state.tick(1000, true, Vec3::ZERO, 0.0, true, far, 5.0, std::f32::consts::TAU);
        assert_eq!(first, Some(AttackOutcome::Event(AttackSwingEvent::OutOfRange)));

        let second = state.tick(2000, true, Vec3::ZERO, 0.0, true, far, 5.0, std::f32::consts::TAU);
        assert_eq!(second, None);
    }

    #[test]
    fn hit_after_failure_clears_suppression_for_the_next_failure() {
        let mut state = AttackSwingState::new(1000, 0);
        let far = Vec3 { x: 100.0, y: 0.0, z: 0.0 };
        let near = Vec3 { x: 1.0, y: 0.0, z: 0.0 };

        state.tick(1000, true, Vec3::ZERO, 0.0, true, far, 5.0, std::f32::consts::TAU);
        let hit = state.tick(2000, true, Vec3::ZERO, 0.0, true, near, 5.0, std::f32::consts::TAU);
        assert_eq!(hit, Some(AttackOutcome::Hit));

        let third = state.tick(3000, true, Vec3::ZERO, 0.0, true, far, 5.0, std::f32::consts::TAU);
        assert_eq!(third, Some(AttackOutcome::Event(AttackSwingEvent::OutOfRange)));
    }

    #[test]
    fn dead_victim_reports_not_alive() {
        let mut state = AttackSwingState::new(1000, 0);
        let outcome = state.tick(1000, true, Vec3::ZERO, 0.0, false, Vec3::ZERO, 5.0, std::f32::consts::TAU);
        assert_eq!(outcome, Some(AttackOutcome::Event(AttackSwingEvent::NotAlive)));
    }
}
