// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use std::sync::Arc;

use kadmesh_primitives::{NodeId, Peer};
use tokio::sync::Mutex;

/// A registered application callback. Invoked once per verified inbound
/// message, with the envelope's declared sender and raw application
/// payload bytes.
pub trait MessageHandler: Send + Sync {
    fn handle(&self, source: Option<Peer>, sender_node_id: NodeId, payload: &[u8]);
}

/// The dynamic handler list, guarded by a single mutex. Invocation always
/// iterates a snapshot, so a handler is free to register or remove another
/// handler without deadlocking.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: Mutex<Vec<Arc<dyn MessageHandler>>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        HandlerRegistry::default()
    }

    pub async fn add(&self, handler: Arc<dyn MessageHandler>) {
        self.handlers.lock().await.push(handler);
    }

    pub async fn remove(&self, handler: &Arc<dyn MessageHandler>) {
        self.handlers
            .lock()
            .await
            .retain(|h| !Arc::ptr_eq(h, handler));
    }

    pub async fn snapshot(&self) -> Vec<Arc<dyn MessageHandler>> {
        self.handlers.lock().await.clone()
    }

    pub async fn dispatch(&self, source: Option<Peer>, sender_node_id: NodeId, payload: &[u8]) {
        for handler in self.snapshot().await {
            handler.handle(source.clone(), sender_node_id, payload);
        }
    }
}
