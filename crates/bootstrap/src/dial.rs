// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use std::net::SocketAddr;

use kadmesh_networking::Service;
use kadmesh_primitives::{NodeId, Peer};
use tracing::{debug, warn};

/// First contact with a seed: a `PING` dialed at a known address but an
/// unknown id. `Service::send_request` welcomes whatever id the reply
/// actually carries, so the placeholder id here never ends up in the
/// routing table — only the seed's real, self-reported id does.
async fn dial_one(service: &Service, addr: SocketAddr) -> bool {
    let placeholder = Peer::new(NodeId::ZERO, addr.ip(), addr.port());
    match service.ping(&placeholder).await {
        Ok(_) => {
            debug!(%addr, "bootstrap seed answered");
            true
        }
        Err(err) => {
            warn!(%addr, %err, "bootstrap seed did not answer");
            false
        }
    }
}

/// Dial every seed in `addrs`, then run a self-directed iterative lookup
/// so the routing table fills in beyond the seeds themselves. Returns the
/// number of seeds that answered.
pub async fn bootstrap(service: &Service, addrs: &[SocketAddr]) -> usize {
    let mut admitted = 0;
    for addr in addrs {
        if dial_one(service, *addr).await {
            admitted += 1;
        }
    }

    if admitted > 0 {
        let local_id = service.local_peer().id;
        if let Err(err) = service.iterative_find_node(local_id).await {
            warn!(%err, "self-lookup after bootstrap failed");
        }
    }

    admitted
}

#[cfg(test)]
mod tests {
    use super::*;
    use kadmesh_networking::{spawn_node, transport::LocalBind, NetworkConfig};
    use kadmesh_protocol::Keypair;
    use std::time::Duration;

    async fn node() -> kadmesh_networking::NodeHandle {
        let keypair = Keypair::generate();
        let local_id = keypair.node_id();
        let config = NetworkConfig {
            query_timeout: Duration::from_millis(500),
            walk_timeout: Duration::from_millis(800),
            ..NetworkConfig::default()
        };
        spawn_node(local_id, [127, 0, 0, 1].into(), 0, keypair, config, &LocalBind)
            .await
            .expect("bind loopback socket")
    }

    #[tokio::test]
    async fn bootstrapping_against_a_live_seed_admits_its_real_id() {
        let seed = node().await;
        let joiner = node().await;

        let admitted = bootstrap(&joiner.service, &[seed.service.local_peer().addr()]).await;
        assert_eq!(admitted, 1);

        let known = joiner.service.known_peers().await;
        assert!(known.iter().any(|p| p.id == seed.service.local_peer().id));
        assert!(!known.iter().any(|p| p.id == NodeId::ZERO));

        seed.shutdown();
        joiner.shutdown();
    }

    #[tokio::test]
    async fn an_unreachable_seed_is_skipped_without_panicking() {
        let joiner = node().await;
        let dead: SocketAddr = "127.0.0.1:1".parse().unwrap();

        let admitted = bootstrap(&joiner.service, &[dead]).await;
        assert_eq!(admitted, 0);

        joiner.shutdown();
    }
}
