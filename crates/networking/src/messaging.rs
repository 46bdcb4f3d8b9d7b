// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use std::sync::Arc;

use kadmesh_primitives::{NodeId, Peer};
use kadmesh_protocol::codec::to_msgpack;
use kadmesh_protocol::Envelope;
use tokio::sync::mpsc;
use tracing::warn;

use crate::error::Result;
use crate::queue::{try_enqueue, InboundMessage, RelayEntry};
use crate::service::Service;

impl Service {
    /// Sign `payload` and hand it to `peer` directly, for callers that
    /// already know a reachable address.
    pub async fn send_direct(&self, peer: &Peer, payload: Vec<u8>) -> Result<Option<(std::net::IpAddr, u16)>> {
        let envelope = Envelope::sign(payload, &self.keypair);
        let bytes = to_msgpack(&envelope)?;
        self.direct_rpc(peer, bytes).await
    }

    /// Sign `payload` and queue it for relay towards `dest_id`, to be
    /// forwarded by the relay dispatcher. Returns whether the local queue
    /// accepted it; actual delivery is best-effort past that point. Relaying
    /// to oneself is a no-op, returning `Ok(false)`.
    pub fn send_relay(&self, dest_id: NodeId, payload: Vec<u8>) -> Result<bool> {
        if dest_id == self.local.id {
            return Ok(false);
        }
        let envelope = Envelope::sign(payload, &self.keypair);
        let bytes = to_msgpack(&envelope)?;
        Ok(try_enqueue(
            &self.relay_tx,
            RelayEntry {
                dest_id,
                payload: bytes,
                hop_limit: self.config.max_hop_limit,
            },
            "relay",
        ))
    }
}

/// Drains the inbound queue, verifying each envelope's signature before
/// dispatching its payload to registered application handlers. An envelope
/// that fails to decode or to verify is dropped silently: neither case
/// crosses back to the network as an error.
pub async fn run_inbound_dispatch(service: Arc<Service>, mut inbound_rx: mpsc::Receiver<InboundMessage>) {
    while let Some(message) = inbound_rx.recv().await {
        let envelope: Envelope = match kadmesh_protocol::codec::from_msgpack(&message.payload) {
            Ok(envelope) => envelope,
            Err(err) => {
                warn!(%err, "dropping undecodable inbound envelope");
                continue;
            }
        };

        if !envelope.verify() {
            warn!(sender = %envelope.sender_node_id, "dropping inbound envelope with bad signature");
            continue;
        }

        service
            .handlers
            .dispatch(message.source, envelope.sender_node_id, &envelope.payload)
            .await;
    }
}
