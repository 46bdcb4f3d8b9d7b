// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use std::collections::VecDeque;

use kadmesh_primitives::NodeId;
use kadmesh_protocol::identity::sha256_digest;

/// Bounded FIFO of seen message hashes, used to detect relay loops and
/// duplicate deliveries. Eviction is strict FIFO, oldest first.
pub struct MessageHistory {
    limit: usize,
    seen: VecDeque<[u8; 32]>,
}

impl MessageHistory {
    pub fn new(limit: usize) -> Self {
        MessageHistory {
            limit,
            seen: VecDeque::with_capacity(limit),
        }
    }

    pub fn hash(dest_id: &NodeId, payload: &[u8]) -> [u8; 32] {
        let mut buf = Vec::with_capacity(20 + payload.len());
        buf.extend_from_slice(dest_id.as_bytes());
        buf.extend_from_slice(payload);
        sha256_digest(&buf)
    }

    pub fn contains(&self, hash: &[u8; 32]) -> bool {
        self.seen.contains(hash)
    }

    /// Record a hash, culling the oldest entries past `limit`.
    pub fn record(&mut self, hash: [u8; 32]) {
        self.seen.push_back(hash);
        while self.seen.len() > self.limit {
            self.seen.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kadmesh_primitives::ID_BYTES;

    #[test]
    fn duplicate_is_detected_within_the_window() {
        let mut history = MessageHistory::new(4);
        let dest = NodeId::from_bytes([1u8; ID_BYTES]);
        let hash = MessageHistory::hash(&dest, b"payload");
        assert!(!history.contains(&hash));
        history.record(hash);
        assert!(history.contains(&hash));
    }

    #[test]
    fn eviction_is_strict_fifo() {
        let mut history = MessageHistory::new(2);
        let dest = NodeId::from_bytes([1u8; ID_BYTES]);
        let h1 = MessageHistory::hash(&dest, b"one");
        let h2 = MessageHistory::hash(&dest, b"two");
        let h3 = MessageHistory::hash(&dest, b"three");
        history.record(h1);
        history.record(h2);
        history.record(h3);
        assert!(!history.contains(&h1));
        assert!(history.contains(&h2));
        assert!(history.contains(&h3));
        assert_eq!(history.len(), 2);
    }
}
