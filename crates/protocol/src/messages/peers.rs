// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use serde::{Deserialize, Serialize};
use serde_bytes::ByteBuf;

use kadmesh_primitives::{NodeId, ID_BYTES};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PeersRequest {
    pub nonce: u64,
}

/// A `peers` response body: the sender's routing-table neighborhood,
/// packed as concatenated 20-byte node-id chunks.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PeersResponse {
    pub body: ByteBuf,
    pub nonce: u64,
}

impl PeersResponse {
    pub fn from_ids(ids: &[NodeId], nonce: u64) -> Self {
        let mut body = Vec::with_capacity(ids.len() * ID_BYTES);
        for id in ids {
            body.extend_from_slice(id.as_bytes());
        }
        PeersResponse {
            body: ByteBuf::from(body),
            nonce,
        }
    }

    /// Re-chunk the concatenated body back into individual node ids,
    /// discarding a trailing partial chunk rather than erroring.
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.body
            .chunks_exact(ID_BYTES)
            .filter_map(|chunk| NodeId::from_slice(chunk).ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunks_round_trip() {
        let ids = vec![
            NodeId::from_bytes([1u8; ID_BYTES]),
            NodeId::from_bytes([2u8; ID_BYTES]),
        ];
        let response = PeersResponse::from_ids(&ids, 42);
        assert_eq!(response.node_ids(), ids);
    }
}
