// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use std::net::SocketAddr;

use kadmesh_primitives::{NodeId, Peer};
use kadmesh_protocol::identity::hash_to_node_id;
use kadmesh_routing::InsertOutcome;
use tracing::{debug, warn};

use crate::queue::{try_enqueue, InboundMessage, RelayEntry};
use crate::wire::{FoundValue, RpcRequest, RpcResponse};
use crate::Service;

impl Service {
    /// Admit a freshly-heard-from peer into the routing table, pinging the
    /// least-recently-seen entry of a full bucket and evicting it only if
    /// it fails to respond. Run on every RPC this node answers, and
    /// available directly for bootstrap and test seeding.
    pub async fn welcome(&self, peer: Peer) {
        if peer.id == self.local.id {
            return;
        }
        let outcome = self.routing.lock().await.insert(peer);
        if let Some((idx, InsertOutcome::PingLeastRecentlySeen { least_recently_seen })) = outcome
        {
            let responded = self.ping(&least_recently_seen).await.is_ok();
            self.routing.lock().await.resolve_ping(idx, responded, peer);
        }
    }

    pub(crate) async fn handle_request(
        &self,
        sender_id: NodeId,
        from: SocketAddr,
        request: RpcRequest,
    ) -> RpcResponse {
        let sender_peer = Peer::new(sender_id, from.ip(), from.port());
        self.welcome(sender_peer).await;

        match request {
            RpcRequest::Ping => RpcResponse::Pong {
                observed_ip: from.ip(),
                observed_port: from.port(),
            },
            RpcRequest::Store { key, value } => {
                self.store.lock().await.insert(key.into_vec(), value.into_vec());
                RpcResponse::StoreAck
            }
            RpcRequest::FindNode { target } => {
                let neighbors = self
                    .routing
                    .lock()
                    .await
                    .find_neighbors(&target, self.config.ksize, None);
                RpcResponse::Nodes(neighbors)
            }
            RpcRequest::FindValue { key } => {
                let found = self.store.lock().await.get(key.as_slice()).cloned();
                match found {
                    Some(value) => RpcResponse::FindValue(FoundValue::Value(value.into())),
                    None => {
                        let target = hash_to_node_id(&key);
                        let neighbors = self
                            .routing
                            .lock()
                            .await
                            .find_neighbors(&target, self.config.ksize, None);
                        RpcResponse::FindValue(FoundValue::Nodes(neighbors))
                    }
                }
            }
            RpcRequest::Direct { payload } => {
                let accepted = try_enqueue(
                    &self.inbound_tx,
                    InboundMessage {
                        source: Some(sender_peer),
                        payload: payload.into_vec(),
                    },
                    "inbound",
                );
                RpcResponse::Ack(accepted.then_some((from.ip(), from.port())))
            }
            RpcRequest::Relay {
                sender_id,
                dest_id,
                hop_limit,
                payload,
            } => {
                let ack = self
                    .handle_relay(sender_id, dest_id, hop_limit, payload.into_vec())
                    .await;
                RpcResponse::Ack(ack.map(|_| (from.ip(), from.port())))
            }
        }
    }

    /// `RELAY` semantics: deliver to `dest_id`, decreasing `hop_limit` each
    /// hop, never relaying away from the destination, dropping duplicates.
    /// Returns `Some(())` when the message was accepted for local delivery
    /// or queued for further relay; `None` on any drop.
    async fn handle_relay(
        &self,
        sender_id: NodeId,
        dest_id: NodeId,
        hop_limit: u8,
        payload: Vec<u8>,
    ) -> Option<()> {
        let hash = crate::history::MessageHistory::hash(&dest_id, &payload);
        {
            let mut history = self.history.lock().await;
            if history.contains(&hash) {
                debug!("dropping relay message, already received");
                return None;
            }
            history.record(hash);
        }

        if dest_id == self.local.id {
            let accepted = try_enqueue(
                &self.inbound_tx,
                InboundMessage {
                    source: None,
                    payload,
                },
                "inbound",
            );
            return accepted.then_some(());
        }

        if hop_limit == 0 || hop_limit > self.config.max_hop_limit {
            debug!(hop_limit, "dropping relay message, bad hop limit");
            return None;
        }

        let d_sender = sender_id.distance(&dest_id);
        let d_self = self.local.id.distance(&dest_id);
        if d_self >= d_sender {
            debug!("dropping relay message, not closer than the forwarder");
            return None;
        }

        let accepted = try_enqueue(
            &self.relay_tx,
            RelayEntry {
                dest_id,
                payload,
                hop_limit: hop_limit - 1,
            },
            "relay",
        );
        if !accepted {
            warn!(%dest_id, "relay queue full, dropping message");
        }
        accepted.then_some(())
    }
}
