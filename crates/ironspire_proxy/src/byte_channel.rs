//! A bounded byte-counted channel for outgoing session traffic (§7
//! "Transient I/O ⇒ buffer up to a per-session cap, then kick if
//! exceeded"). `valence_network::packet_io::PacketIo` backpressures its
//! writer task the same way (a byte-limited channel between the instance's
//! tick thread and the socket writer); this is that same shape, rebuilt here
//! since the channel itself is private to that crate.

use std::collections::VecDeque;
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;
use tokio::sync::Notify;

struct Shared {
    queue: Mutex<VecDeque<Bytes>>,
    queued_bytes: std::sync::atomic::AtomicUsize,
    limit: usize,
    closed: std::sync::atomic::AtomicBool,
    notify: Notify,
}

pub struct ByteSender {
    shared: Arc<Shared>,
}

pub struct ByteReceiver {
    shared: Arc<Shared>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrySendError {
    /// Sending `bytes` would exceed the configured cap.
    Full,
    /// The receiver has been dropped.
    Disconnected,
}

pub fn byte_channel(limit: usize) -> (ByteSender, ByteReceiver) {
    let shared = Arc::new(Shared {
        queue: Mutex::new(VecDeque::new()),
        queued_bytes: std::sync::atomic::AtomicUsize::new(0),
        limit,
        closed: std::sync::atomic::AtomicBool::new(false),
        notify: Notify::new(),
    });
    (ByteSender { shared: shared.clone() }, ByteReceiver { shared })
}

impl ByteSender {
    pub fn limit(&self) -> usize {
        self.shared.limit
    }

    /// Enqueues `bytes` for the writer task, rejecting it outright rather
    /// than growing past the cap (§7: the caller kicks the session on
    /// `Full`, it never blocks waiting for room).
    pub fn try_send(&self, bytes: Bytes) -> Result<(), TrySendError> {
        use std::sync::atomic::Ordering;
        if self.shared.closed.load(Ordering::Acquire) {
            return Err(TrySendError::Disconnected);
        }
        let cost = bytes.len();
        let current = self.shared.queued_bytes.load(Ordering::Acquire);
        if current + cost > self.shared.limit {
            return Err(TrySendError::Full);
        }
        self.shared.queue.lock().push_back(bytes);
        self.shared.queued_bytes.fetch_add(cost, Ordering::AcqRel);
        self.shared.notify.notify_one();
        Ok(())
    }
}

impl Drop for ByteSender {
    fn drop(&mut self) {
        self.shared.closed.store(true, std::sync::atomic::Ordering::Release);
        self.shared.notify.notify_one();
    }
}

impl ByteReceiver {
    /// Waits for the next queued chunk, or returns `None` once the sender
    /// has been dropped and the queue has drained.
    pub async fn recv(&mut self) -> Option<Bytes> {
        use std::sync::atomic::Ordering;
        loop {
            if let Some(bytes) = self.shared.queue.lock().pop_front() {
                self.shared.queued_bytes.fetch_sub(bytes.len(), Ordering::AcqRel);
                return Some(bytes);
            }
            if self.shared.closed.load(Ordering::Acquire) {
                return None;
            }
            self.shared.notify.notified().await;
        }
    }
}
