// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use std::sync::{Arc, Mutex};

use kadmesh_networking::handlers::MessageHandler;
use kadmesh_primitives::{NodeId, Peer};

/// One application-layer delivery observed by a [`RecordingHandler`].
#[derive(Clone, Debug)]
pub struct Delivery {
    pub source: Option<Peer>,
    pub sender_node_id: NodeId,
    pub payload: Vec<u8>,
}

/// A [`MessageHandler`] that just remembers every delivery it sees, for
/// assertions like "exactly one delivery, with this source" (S1/S2/S3 in
/// `SPEC_FULL.md` §8).
#[derive(Default)]
pub struct RecordingHandler {
    deliveries: Mutex<Vec<Delivery>>,
}

impl RecordingHandler {
    pub fn new() -> Arc<Self> {
        Arc::new(RecordingHandler::default())
    }

    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.lock().expect("recorder mutex poisoned").clone()
    }

    pub fn count(&self) -> usize {
        self.deliveries.lock().expect("recorder mutex poisoned").len()
    }
}

impl MessageHandler for RecordingHandler {
    fn handle(&self, source: Option<Peer>, sender_node_id: NodeId, payload: &[u8]) {
        self.deliveries.lock().expect("recorder mutex poisoned").push(Delivery {
            source,
            sender_node_id,
            payload: payload.to_vec(),
        });
    }
}
