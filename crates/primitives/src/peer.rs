// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use std::net::{IpAddr, SocketAddr};

use serde::{Deserialize, Serialize};

use crate::node_id::NodeId;

/// A `(node_id, ip, udp_port)` triple, as carried inside `FIND_NODE` replies
/// and routing table entries.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Peer {
    pub id: NodeId,
    pub ip: IpAddr,
    pub port: u16,
}

impl Peer {
    pub fn new(id: NodeId, ip: IpAddr, port: u16) -> Self {
        Peer { id, ip, port }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.ip, self.port)
    }

    /// Two peers are home-collocated when they share an IP, regardless of port.
    pub fn home_collocated_with(&self, other: &Peer) -> bool {
        self.ip == other.ip
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node_id::ID_BYTES;

    fn peer(id_byte: u8, ip: [u8; 4], port: u16) -> Peer {
        Peer::new(
            NodeId::from_bytes([id_byte; ID_BYTES]),
            IpAddr::from(ip),
            port,
        )
    }

    #[test]
    fn collocation_ignores_port() {
        let a = peer(1, [10, 0, 0, 1], 4000);
        let b = peer(2, [10, 0, 0, 1], 4001);
        assert!(a.home_collocated_with(&b));
    }

    #[test]
    fn different_ip_is_not_collocated() {
        let a = peer(1, [10, 0, 0, 1], 4000);
        let b = peer(2, [10, 0, 0, 2], 4000);
        assert!(!a.home_collocated_with(&b));
    }
}
