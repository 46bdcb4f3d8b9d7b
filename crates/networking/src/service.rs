// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use kadmesh_primitives::{NodeId, Peer};
use kadmesh_protocol::Keypair;
use kadmesh_routing::RoutingTable;
use tokio::net::UdpSocket;
use tokio::sync::{mpsc, oneshot, Mutex};

use crate::config::NetworkConfig;
use crate::handlers::HandlerRegistry;
use crate::history::MessageHistory;
use crate::queue::{bounded_queue, InboundMessage, RelayEntry};
use crate::wire::RpcResponse;

/// The overlay's single ownership root. The RPC reactor, the relay
/// dispatcher and the crawler all hold an `Arc<Service>` back-reference
/// rather than each other, avoiding the cyclic node/protocol/routing
/// references of the original design (see `DESIGN.md`).
pub struct Service {
    pub(crate) local: Peer,
    pub(crate) keypair: Keypair,
    pub(crate) config: NetworkConfig,
    pub(crate) socket: Arc<UdpSocket>,
    pub(crate) routing: Mutex<RoutingTable>,
    pub(crate) pending: Mutex<HashMap<u64, oneshot::Sender<(NodeId, RpcResponse)>>>,
    pub(crate) next_request_id: AtomicU64,
    pub(crate) inbound_tx: mpsc::Sender<InboundMessage>,
    pub(crate) relay_tx: mpsc::Sender<RelayEntry>,
    pub(crate) history: Mutex<MessageHistory>,
    pub(crate) handlers: HandlerRegistry,
    pub(crate) store: Mutex<HashMap<Vec<u8>, Vec<u8>>>,
}

/// Receivers handed off once at construction time to whoever spawns the
/// inbound-dispatch and relay-dispatch background tasks.
pub struct ServiceChannels {
    pub inbound_rx: mpsc::Receiver<InboundMessage>,
    pub relay_rx: mpsc::Receiver<RelayEntry>,
}

impl Service {
    pub fn new(
        local: Peer,
        keypair: Keypair,
        config: NetworkConfig,
        socket: UdpSocket,
    ) -> (Arc<Service>, ServiceChannels) {
        let (inbound_tx, inbound_rx) = bounded_queue(config.max_messages);
        let (relay_tx, relay_rx) = bounded_queue(config.max_messages);
        let history = MessageHistory::new(config.messages_history_limit);
        let routing = RoutingTable::new(local.id, config.ksize);

        let service = Arc::new(Service {
            local,
            keypair,
            config,
            socket: Arc::new(socket),
            routing: Mutex::new(routing),
            pending: Mutex::new(HashMap::new()),
            next_request_id: AtomicU64::new(1),
            inbound_tx,
            relay_tx,
            history: Mutex::new(history),
            handlers: HandlerRegistry::new(),
            store: Mutex::new(HashMap::new()),
        });

        (service, ServiceChannels { inbound_rx, relay_rx })
    }

    pub fn local_peer(&self) -> Peer {
        self.local
    }

    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub(crate) fn next_request_id(&self) -> u64 {
        self.next_request_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Snapshot of every peer currently known, safe to iterate without
    /// holding the routing table lock (per the concurrency model, the
    /// dispatcher and crawler always work off a copy).
    pub async fn known_peers(&self) -> Vec<Peer> {
        self.routing.lock().await.all_peers()
    }

    pub async fn add_handler(&self, handler: Arc<dyn crate::handlers::MessageHandler>) {
        self.handlers.add(handler).await;
    }

    pub async fn remove_handler(&self, handler: &Arc<dyn crate::handlers::MessageHandler>) {
        self.handlers.remove(handler).await;
    }
}
