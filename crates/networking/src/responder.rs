// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use std::sync::Arc;

use kadmesh_primitives::{NodeId, Peer};
use kadmesh_protocol::codec::{from_msgpack, to_msgpack};
use kadmesh_protocol::messages::{ApplicationMessage, InfoResponse, PeersResponse};
use kadmesh_protocol::Envelope;
use tracing::{trace, warn};

use crate::handlers::MessageHandler;
use crate::queue::{try_enqueue, RelayEntry};
use crate::service::Service;

/// Supplies the locally-observed facts an `info` reply carries. Storage
/// accounting and platform detection are both out of core scope; a real
/// node wires in its own storage manager and `sysinfo`-style probe.
pub trait NodeInfoProvider: Send + Sync {
    fn storage(&self) -> kadmesh_protocol::messages::StorageInfo;
    fn platform(&self) -> kadmesh_protocol::messages::PlatformInfo;
    fn network(&self) -> kadmesh_protocol::messages::NetworkInfo;
}

/// Answers `info_req`/`peers_req` application messages when the node is
/// configured to do so. Every other handler simply ignores its invocation:
/// the registry dispatches to all of them unconditionally.
pub struct AppResponder {
    service: Arc<Service>,
    info: Arc<dyn NodeInfoProvider>,
}

impl AppResponder {
    pub fn new(service: Arc<Service>, info: Arc<dyn NodeInfoProvider>) -> Arc<Self> {
        Arc::new(AppResponder { service, info })
    }

    fn reply(&self, source: Option<Peer>, dest_id: NodeId, message: ApplicationMessage) {
        let Ok(payload) = to_msgpack(&message) else {
            warn!("failed to encode application reply");
            return;
        };
        let envelope = Envelope::sign(payload, self.service.keypair());
        let Ok(bytes) = to_msgpack(&envelope) else {
            warn!("failed to encode reply envelope");
            return;
        };
        Self::send(Arc::clone(&self.service), source, dest_id, bytes);
    }

    fn send(service: Arc<Service>, source: Option<Peer>, dest_id: NodeId, bytes: Vec<u8>) {
        tokio::spawn(async move {
            match source {
                Some(peer) => {
                    if service.direct_rpc(&peer, bytes).await.is_err() {
                        trace!(%dest_id, "direct reply failed, peer unreachable");
                    }
                }
                None => {
                    let accepted = try_enqueue(
                        &service.relay_tx,
                        RelayEntry {
                            dest_id,
                            payload: bytes,
                            hop_limit: service.config().max_hop_limit,
                        },
                        "relay",
                    );
                    if !accepted {
                        warn!(%dest_id, "relay queue full, reply dropped");
                    }
                }
            }
        });
    }
}

impl MessageHandler for AppResponder {
    fn handle(&self, source: Option<Peer>, sender_node_id: NodeId, payload: &[u8]) {
        if !self.service.config().enable_responses {
            return;
        }

        let message: ApplicationMessage = match from_msgpack(payload) {
            Ok(message) => message,
            Err(_) => return,
        };

        match message {
            ApplicationMessage::InfoRequest(request) => {
                let response = InfoResponse {
                    protocol_version: kadmesh_protocol::PROTOCOL_VERSION,
                    software_version: kadmesh_protocol::version::software_version().to_string(),
                    storage: self.info.storage(),
                    network: self.info.network(),
                    platform: self.info.platform(),
                    btcaddress: self.service.keypair().address(),
                    nonce: request.nonce,
                };
                self.reply(source, sender_node_id, ApplicationMessage::InfoResponse(response));
            }
            ApplicationMessage::PeersRequest(request) => {
                let service = Arc::clone(&self.service);
                tokio::spawn(async move {
                    let ids: Vec<NodeId> =
                        service.known_peers().await.into_iter().map(|p| p.id).collect();
                    let response = PeersResponse::from_ids(&ids, request.nonce);
                    let Ok(payload) = to_msgpack(&ApplicationMessage::PeersResponse(response)) else {
                        warn!("failed to encode peers reply");
                        return;
                    };
                    let envelope = Envelope::sign(payload, service.keypair());
                    let Ok(bytes) = to_msgpack(&envelope) else {
                        warn!("failed to encode peers reply envelope");
                        return;
                    };
                    AppResponder::send(service, source, sender_node_id, bytes);
                });
            }
            ApplicationMessage::InfoResponse(_) | ApplicationMessage::PeersResponse(_) => {}
        }
    }
}
