// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use std::sync::Arc;

use kadmesh_protocol::codec::{from_msgpack, to_msgpack, MAX_DATAGRAM_PAYLOAD};
use tracing::{trace, warn};

use crate::service::Service;
use crate::wire::{WireBody, WireEnvelope};

/// Drives the UDP socket: every inbound datagram is either a reply to one of
/// our own outstanding requests (routed to its `pending` oneshot) or a fresh
/// request (handled inline, spawned off so one slow handler never stalls the
/// socket read loop).
pub async fn run_reactor(service: Arc<Service>) {
    let mut buf = vec![0u8; MAX_DATAGRAM_PAYLOAD.max(2048)];
    loop {
        let (len, from) = match service.socket.recv_from(&mut buf).await {
            Ok(pair) => pair,
            Err(err) => {
                warn!(%err, "udp recv failed");
                continue;
            }
        };

        let envelope: WireEnvelope = match from_msgpack(&buf[..len]) {
            Ok(envelope) => envelope,
            Err(err) => {
                trace!(%err, %from, "dropping undecodable datagram");
                continue;
            }
        };

        match envelope.body {
            WireBody::Response(response) => {
                let waiter = service.pending.lock().await.remove(&envelope.request_id);
                if let Some(tx) = waiter {
                    let _ = tx.send((envelope.sender_id, response));
                } else {
                    trace!(request_id = envelope.request_id, "response to unknown request");
                }
            }
            WireBody::Request(request) => {
                let service = Arc::clone(&service);
                let request_id = envelope.request_id;
                let sender_id = envelope.sender_id;
                tokio::spawn(async move {
                    let response = service.handle_request(sender_id, from, request).await;
                    let reply = WireEnvelope {
                        request_id,
                        sender_id: service.local.id,
                        body: WireBody::Response(response),
                    };
                    match to_msgpack(&reply) {
                        Ok(bytes) => {
                            if let Err(err) = service.socket.send_to(&bytes, from).await {
                                warn!(%err, %from, "failed to send reply");
                            }
                        }
                        Err(err) => warn!(%err, "failed to encode reply"),
                    }
                });
            }
        }
    }
}
