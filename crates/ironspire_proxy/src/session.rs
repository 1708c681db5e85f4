//! `Player`: the per-character-GUID session the world owns while a
//! character is joined (§4.9). Implements [`Subscriber`] so the tile
//! replication layer (C8) can drive it directly; owns the per-session
//! ancillary state that has no field-map home (cooldowns, the attack-swing
//! timer, the pending speed-change queue).

use bytes::Bytes;
use rustc_hash::FxHashSet;

use ironspire_combat::{AttackSwingState, CooldownTracker};
use ironspire_core::{GameTime, Guid, SessionFault};
use ironspire_inventory::Inventory;
use ironspire_movement::PendingChangeQueue;
use ironspire_replication::Subscriber;

use crate::byte_channel::{byte_channel, ByteReceiver, ByteSender, TrySendError};

/// One connected character's session state, owned by the world node for as
/// long as the character is joined (§4.9).
pub struct PlayerSession {
    char_guid: Guid,
    outgoing: ByteSender,
    /// Guids this session currently has spawned in its own client view,
    /// tracked so the dispatcher knows whether the next block it sends for
    /// a guid should be an initial block or a delta (§4.8).
    known_objects: FxHashSet<Guid>,
    pub cooldowns: CooldownTracker,
    pub attack: AttackSwingState,
    pub pending_changes: PendingChangeQueue,
    /// The character's inventory engine (C6), scoped to the session the
    /// same way cooldowns and the attack timer are: it only exists while
    /// the character is joined, and is restored from/flushed to
    /// [`crate::persist`] at join/leave time.
    pub inventory: Inventory,
    /// Set by [`Subscriber::send_packet`] when the outgoing buffer is full;
    /// the dispatcher checks this after driving a batch of notifications and
    /// tears the session down if it is set (§7).
    fault: Option<SessionFault>,
}

impl PlayerSession {
    pub fn new(char_guid: Guid, outgoing_byte_limit: usize, base_attack_timer_ms: u64, now: GameTime) -> (Self, ByteReceiver) {
        let (tx, rx) = byte_channel(outgoing_byte_limit);
        let session = Self {
            char_guid,
            outgoing: tx,
            known_objects: FxHashSet::default(),
            cooldowns: CooldownTracker::default(),
            attack: AttackSwingState::new(base_attack_timer_ms, now),
            pending_changes: PendingChangeQueue::new(),
            inventory: Inventory::new(),
            fault: None,
        };
        (session, rx)
    }

    pub fn char_guid(&self) -> Guid {
        self.char_guid
    }

    pub fn has_in_view(&self, guid: Guid) -> bool {
        self.known_objects.contains(&guid)
    }

    /// Takes the backpressure fault raised since the last call, if any
    /// (§7: the dispatcher is responsible for actually kicking the session).
    pub fn take_fault(&mut self) -> Option<SessionFault> {
        self.fault.take()
    }
}

impl Subscriber for PlayerSession {
    fn notify_objects_spawned(&mut self, guids: &[Guid]) {
        self.known_objects.extend(guids.iter().copied());
    }

    fn notify_objects_updated(&mut self, _guids: &[Guid]) {
        // Already-known objects need no bookkeeping change; the dispatcher
        // sends the delta block itself.
    }

    fn notify_objects_despawned(&mut self, guids: &[Guid]) {
        for guid in guids {
            self.known_objects.remove(guid);
        }
    }

    fn send_packet(&mut self, bytes: Bytes) {
        match self.outgoing.try_send(bytes) {
            Ok(()) => {}
            Err(TrySendError::Full) => {
                tracing::warn!(guid = ?self.char_guid, "outgoing buffer full, session will be kicked");
                self.fault.get_or_insert_with(|| {
                    SessionFault::backpressure(format!("exceeded outgoing cap of {} bytes", self.outgoing.limit()))
                });
            }
            Err(TrySendError::Disconnected) => {
                tracing::debug!(guid = ?self.char_guid, "send_packet on a session whose receiver is gone");
            }
        }
    }
}
