//! Session outbox contract (spec.md §4.6): a per-player sink for outbound
//! opcode frames. The core writes to it; the transport layer (out of
//! scope) drains it in enqueue order.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Per-player outbound frame queue. `online` gates whether broadcasts reach
/// this session at all (spec.md §4.1: "Only players with an online-flag
/// receive packets").
#[derive(Debug, Default)]
pub struct SessionOutbox {
    queue: VecDeque<Vec<u8>>,
    online: bool,
}

impl SessionOutbox {
    pub fn new() -> Self {
        SessionOutbox { queue: VecDeque::new(), online: true }
    }

    pub fn enqueue(&mut self, framed_packet: Vec<u8>) {
        self.queue.push_back(framed_packet);
    }

    pub fn online(&self) -> bool {
        self.online
    }

    pub fn set_online(&mut self, online: bool) {
        self.online = online;
    }

    /// Drain queued frames in enqueue order, for the transport layer.
    pub fn drain(&mut self) -> Vec<Vec<u8>> {
        self.queue.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Shared handle to a session, held by both the player entity and whatever
/// owns the transport connection (spec.md §9: "cyclic references ... model
/// as handle indices/shared handles cleared on disconnect").
pub type SessionHandle = Rc<RefCell<SessionOutbox>>;

pub fn new_session_handle() -> SessionHandle {
    Rc::new(RefCell::new(SessionOutbox::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_preserves_enqueue_order() {
        let mut outbox = SessionOutbox::new();
        outbox.enqueue(vec![1]);
        outbox.enqueue(vec![2]);
        outbox.enqueue(vec![3]);
        assert_eq!(outbox.drain(), vec![vec![1], vec![2], vec![3]]);
        assert!(outbox.is_empty());
    }

    #[test]
    fn offline_session_still_queues_but_broadcast_gate_is_external() {
        let mut outbox = SessionOutbox::new();
        outbox.set_online(false);
        assert!(!outbox.online());
        outbox.enqueue(vec![9]);
        assert_eq!(outbox.len(), 1);
    }
}
