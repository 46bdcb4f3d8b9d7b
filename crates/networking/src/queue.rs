// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use kadmesh_primitives::{NodeId, Peer};
use tokio::sync::mpsc;
use tracing::warn;

/// A message that has arrived addressed to this node, either directly or as
/// the terminal hop of a relay.
#[derive(Clone, Debug)]
pub struct InboundMessage {
    /// `Some` for `DIRECT` delivery (the sender was directly reachable);
    /// `None` for a `RELAY` that terminated here (source is unknown).
    pub source: Option<Peer>,
    pub payload: Vec<u8>,
}

/// An entry waiting to be re-emitted by the relay dispatcher.
#[derive(Clone, Debug)]
pub struct RelayEntry {
    pub dest_id: NodeId,
    pub payload: Vec<u8>,
    pub hop_limit: u8,
}

/// `inbound` and `relay` are both bounded, non-blocking FIFOs: a full queue
/// drops the newest entry and logs a warning rather than ever blocking the
/// RPC reactor.
pub fn bounded_queue<T>(capacity: usize) -> (mpsc::Sender<T>, mpsc::Receiver<T>) {
    mpsc::channel(capacity.max(1))
}

/// Enqueue `item`, dropping it and logging on overflow. Returns whether it
/// was accepted.
pub fn try_enqueue<T>(sender: &mpsc::Sender<T>, item: T, queue_name: &str) -> bool {
    match sender.try_send(item) {
        Ok(()) => true,
        Err(mpsc::error::TrySendError::Full(_)) => {
            warn!(queue = queue_name, "queue full, dropping newest message");
            false
        }
        Err(mpsc::error::TrySendError::Closed(_)) => {
            warn!(queue = queue_name, "queue closed, dropping message");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn overflow_drops_the_newest_entry() {
        let (tx, mut rx) = bounded_queue::<u32>(2);
        assert!(try_enqueue(&tx, 1, "test"));
        assert!(try_enqueue(&tx, 2, "test"));
        assert!(!try_enqueue(&tx, 3, "test"));

        assert_eq!(rx.recv().await, Some(1));
        assert_eq!(rx.recv().await, Some(2));
    }
}
