//! Server-initiated speed changes and the ack queue that gates them (§4.4).

use std::collections::VecDeque;

use ironspire_core::GameTime;

/// Which rate a [`PendingMovementChange`] adjusts. `TurnRate` shares wire
/// structure with the linear speeds (§9 Open Questions: whether it is
/// radians/sec or a multiplier is unresolved upstream — this crate treats
/// the value as an opaque `f32` and never interprets its units).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpeedKind {
    Walk,
    Run,
    RunBack,
    Swim,
    SwimBack,
    TurnRate,
    Flight,
    FlightBack,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingMovementChange {
    pub counter: u32,
    pub kind: SpeedKind,
    pub value: f32,
    pub issued_at: GameTime,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum AckError {
    #[error("ack for counter {given} does not match queue front {expected}")]
    NotFront { expected: u32, given: u32 },
    #[error("ack value {given} does not match requested value {expected} for counter {counter}")]
    ValueMismatch { counter: u32, expected: f32, given: f32 },
    #[error("ack for counter {counter} arrived after the {timeout_ms}ms deadline")]
    TimedOut { counter: u32, timeout_ms: u64 },
}

/// A strictly-FIFO, strictly-monotonic-counter queue of server-initiated
/// speed changes awaiting client acknowledgement (§3, §4.4).
#[derive(Debug, Default)]
pub struct PendingChangeQueue {
    queue: VecDeque<PendingMovementChange>,
    next_counter: u32,
}

impl PendingChangeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn front(&self) -> Option<&PendingMovementChange> {
        self.queue.front()
    }

    /// Enqueues a new pending change and returns it so the caller can send
    /// the force-speed packet carrying its counter.
    pub fn push(&mut self, kind: SpeedKind, value: f32, now: GameTime) -> PendingMovementChange {
        self.next_counter = self.next_counter.wrapping_add(1);
        let change = PendingMovementChange {
            counter: self.next_counter,
            kind,
            value,
            issued_at: now,
        };
        self.queue.push_back(change);
        change
    }

    /// Processes a client ack per §4.4's four-step validation. On success,
    /// pops and returns the matched entry so the caller can apply the new
    /// rate; any error is an anti-cheat violation the caller must map to a
    /// kick (§7) — this function never pops on failure.
    pub fn ack(
        &mut self,
        counter: u32,
        value: f32,
        now: GameTime,
        timeout_ms: u64,
    ) -> Result<PendingMovementChange, AckError> {
        let Some(front) = self.queue.front().copied() else {
            return Err(AckError::NotFront { expected: 0, given: counter });
        };

        if front.counter != counter {
            return Err(AckError::NotFront { expected: front.counter, given: counter });
        }

        if front.value != value {
            return Err(AckError::ValueMismatch {
                counter,
                expected: front.value,
                given: value,
            });
        }

        let elapsed = now.saturating_sub(front.issued_at);
        if elapsed >= timeout_ms {
            return Err(AckError::TimedOut { counter, timeout_ms });
        }

        self.queue.pop_front();
        Ok(front)
    }

    /// Clears every queued change. Called on unit death (§4.4); a
    /// tile-change never touches this queue.
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
