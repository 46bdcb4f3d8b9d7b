// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use kadmesh_networking::responder::AppResponder;
use kadmesh_networking::transport::LocalBind;
use kadmesh_networking::{spawn_node, NetworkConfig, NodeHandle};
use kadmesh_protocol::Keypair;

use crate::doubles::StubNodeInfo;

/// Timeouts short enough for a loopback test swarm to converge quickly
/// without flaking under CI load.
pub fn fast_config() -> NetworkConfig {
    NetworkConfig {
        query_timeout: Duration::from_millis(300),
        walk_timeout: Duration::from_millis(600),
        ..NetworkConfig::default()
    }
}

/// Spawn a single node bound to loopback on an ephemeral port.
pub async fn spawn_test_node(config: NetworkConfig) -> NodeHandle {
    let keypair = Keypair::generate();
    let local_id = keypair.node_id();
    let ip: IpAddr = [127, 0, 0, 1].into();
    spawn_node(local_id, ip, 0, keypair, config, &LocalBind)
        .await
        .expect("bind loopback socket")
}

/// Spawn `n` nodes, each bootstrapped only against its immediate
/// predecessor — the "chained bootstrap" swarm shape used by the relay
/// and crawl scenarios: node 0 knows only node 1, node 1 only node 2,
/// and so on, so the overlay has to actually route rather than every
/// node already knowing every other.
pub async fn spawn_chained_swarm(n: usize, config: NetworkConfig) -> Vec<NodeHandle> {
    assert!(n >= 2, "a chained swarm needs at least two nodes");

    let mut nodes = Vec::with_capacity(n);
    for _ in 0..n {
        nodes.push(spawn_test_node(config.clone()).await);
    }

    for i in 0..n - 1 {
        let a = &nodes[i];
        let b = &nodes[i + 1];
        a.service.welcome(b.service.local_peer()).await;
        b.service.welcome(a.service.local_peer()).await;
    }

    nodes
}

/// Let a freshly chained swarm's routing tables spread past direct
/// neighbors: each node runs a self-lookup, discovering nodes further
/// down the chain through its immediate neighbors' `FIND_NODE` answers.
pub async fn settle_swarm(nodes: &[NodeHandle]) {
    for node in nodes {
        let local_id = node.service.local_peer().id;
        let _ = node.service.iterative_find_node(local_id).await;
    }
}

/// Like [`spawn_chained_swarm`], but every node also registers an
/// [`AppResponder`] over a [`StubNodeInfo`], so crawler scenarios exercised
/// against the swarm get real `info`/`peers` answers rather than timeouts.
pub async fn spawn_responding_chained_swarm(n: usize, config: NetworkConfig) -> Vec<NodeHandle> {
    let nodes = spawn_chained_swarm(n, config).await;
    for node in &nodes {
        let responder = AppResponder::new(Arc::clone(&node.service), Arc::new(StubNodeInfo));
        node.service.add_handler(responder).await;
    }
    nodes
}

pub fn shutdown_all(nodes: &[NodeHandle]) {
    for node in nodes {
        node.shutdown();
    }
}
