// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use std::net::IpAddr;

use serde::{Deserialize, Serialize};
use serde_bytes::ByteBuf;

use kadmesh_primitives::{NodeId, Peer};

/// One UDP datagram, either a request awaiting a reply or the reply itself,
/// correlated by `request_id`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WireEnvelope {
    pub request_id: u64,
    pub sender_id: NodeId,
    pub body: WireBody,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum WireBody {
    Request(RpcRequest),
    Response(RpcResponse),
}

/// The six remote operations a node answers: the four canonical Kademlia
/// RPCs plus the `DIRECT`/`RELAY` message-layer extensions.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum RpcRequest {
    Ping,
    Store { key: ByteBuf, value: ByteBuf },
    FindNode { target: NodeId },
    FindValue { key: ByteBuf },
    Direct { payload: ByteBuf },
    Relay {
        sender_id: NodeId,
        dest_id: NodeId,
        hop_limit: u8,
        payload: ByteBuf,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum FoundValue {
    Value(ByteBuf),
    Nodes(Vec<Peer>),
}

/// `None` always means "refused/unknown"; every RPC resolves to an answer
/// or a null, never an error, per the overlay's error-handling design.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum RpcResponse {
    Pong { observed_ip: IpAddr, observed_port: u16 },
    StoreAck,
    Nodes(Vec<Peer>),
    FindValue(FoundValue),
    /// `DIRECT`/`RELAY` acknowledgement: `Some` is the sender's observed
    /// address, confirming the destination queued the message.
    Ack(Option<(IpAddr, u16)>),
}
