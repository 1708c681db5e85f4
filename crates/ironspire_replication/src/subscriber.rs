//! The subscriber seam between a world instance and whatever delivers bytes
//! to a client (§4.8). A session object (C9) is the usual implementor; tests
//! use an in-memory recorder.

use bytes::Bytes;
use ironspire_core::Guid;

pub trait Subscriber {
    fn notify_objects_spawned(&mut self, guids: &[Guid]);
    fn notify_objects_updated(&mut self, guids: &[Guid]);
    fn notify_objects_despawned(&mut self, guids: &[Guid]);
    fn send_packet(&mut self, bytes: Bytes);
}

/// An in-memory subscriber for tests: records every call instead of
/// producing bytes for a socket.
#[derive(Debug, Default)]
pub struct RecordingSubscriber {
    pub spawned: Vec<Guid>,
    pub updated: Vec<Guid>,
    pub despawned: Vec<Guid>,
    pub packets: Vec<Bytes>,
}

impl Subscriber for RecordingSubscriber {
    fn notify_objects_spawned(&mut self, guids: &[Guid]) {
        self.spawned.extend_from_slice(guids);
    }

    fn notify_objects_updated(&mut self, guids: &[Guid]) {
        self.updated.extend_from_slice(guids);
    }

    fn notify_objects_despawned(&mut self, guids: &[Guid]) {
        self.despawned.extend_from_slice(guids);
    }

    fn send_packet(&mut self, bytes: Bytes) {
        self.packets.push(bytes);
    }
}
