// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use std::net::IpAddr;

use kadmesh_primitives::{NodeId, Peer};
use kadmesh_protocol::codec::to_msgpack;
use serde_bytes::ByteBuf;
use tokio::sync::oneshot;

use crate::error::{NetworkError, Result};
use crate::service::Service;
use crate::wire::{FoundValue, RpcRequest, RpcResponse, WireBody, WireEnvelope};

impl Service {
    /// Send `request` to `peer` and await the correlated reply, bounded by
    /// `QUERY_TIMEOUT`. A timeout or transport failure resolves as
    /// "not found" to the caller, per the error-handling design.
    ///
    /// The reply envelope carries the responder's real node id regardless of
    /// what id `peer` claimed to have, so every successful round-trip
    /// welcomes that id into the routing table. This is how a bootstrap
    /// contact (dialed at a known address with an unknown or placeholder id)
    /// becomes a properly admitted peer.
    pub(crate) async fn send_request(&self, peer: &Peer, request: RpcRequest) -> Result<RpcResponse> {
        let request_id = self.next_request_id();
        let envelope = WireEnvelope {
            request_id,
            sender_id: self.local.id,
            body: WireBody::Request(request),
        };
        let bytes = to_msgpack(&envelope)?;

        let (tx, rx) = oneshot::channel();
        self.pending.lock().await.insert(request_id, tx);

        self.socket.send_to(&bytes, peer.addr()).await?;

        let outcome = tokio::time::timeout(self.config.query_timeout, rx).await;
        self.pending.lock().await.remove(&request_id);

        match outcome {
            Ok(Ok((responder_id, response))) => {
                Box::pin(self.welcome(Peer::new(responder_id, peer.addr().ip(), peer.addr().port())))
                    .await;
                Ok(response)
            }
            Ok(Err(_)) => Err(NetworkError::ResponseChannelDropped),
            Err(_) => Err(NetworkError::QueryTimeout(peer.addr())),
        }
    }

    pub async fn ping(&self, peer: &Peer) -> Result<(IpAddr, u16)> {
        match self.send_request(peer, RpcRequest::Ping).await? {
            RpcResponse::Pong {
                observed_ip,
                observed_port,
            } => Ok((observed_ip, observed_port)),
            _ => Err(NetworkError::ResponseChannelDropped),
        }
    }

    pub async fn store(&self, peer: &Peer, key: Vec<u8>, value: Vec<u8>) -> Result<()> {
        let request = RpcRequest::Store {
            key: ByteBuf::from(key),
            value: ByteBuf::from(value),
        };
        match self.send_request(peer, request).await? {
            RpcResponse::StoreAck => Ok(()),
            _ => Err(NetworkError::ResponseChannelDropped),
        }
    }

    pub async fn find_node(&self, peer: &Peer, target: NodeId) -> Result<Vec<Peer>> {
        match self
            .send_request(peer, RpcRequest::FindNode { target })
            .await?
        {
            RpcResponse::Nodes(nodes) => Ok(nodes),
            _ => Err(NetworkError::ResponseChannelDropped),
        }
    }

    pub async fn find_value(&self, peer: &Peer, key: Vec<u8>) -> Result<FoundValue> {
        let request = RpcRequest::FindValue {
            key: ByteBuf::from(key),
        };
        match self.send_request(peer, request).await? {
            RpcResponse::FindValue(found) => Ok(found),
            _ => Err(NetworkError::ResponseChannelDropped),
        }
    }

    /// `DIRECT` to a peer already known to be reachable. `Some` confirms the
    /// destination queued the message; `None` means refused/overflow.
    pub async fn direct_rpc(
        &self,
        peer: &Peer,
        payload: Vec<u8>,
    ) -> Result<Option<(IpAddr, u16)>> {
        let request = RpcRequest::Direct {
            payload: ByteBuf::from(payload),
        };
        match self.send_request(peer, request).await? {
            RpcResponse::Ack(ack) => Ok(ack),
            _ => Err(NetworkError::ResponseChannelDropped),
        }
    }

    pub async fn relay_rpc(
        &self,
        peer: &Peer,
        dest_id: NodeId,
        hop_limit: u8,
        payload: Vec<u8>,
    ) -> Result<Option<(IpAddr, u16)>> {
        let request = RpcRequest::Relay {
            sender_id: self.local.id,
            dest_id,
            hop_limit,
            payload: ByteBuf::from(payload),
        };
        match self.send_request(peer, request).await? {
            RpcResponse::Ack(ack) => Ok(ack),
            _ => Err(NetworkError::ResponseChannelDropped),
        }
    }
}
