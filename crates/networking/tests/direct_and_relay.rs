// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use std::net::IpAddr;
use std::time::Duration;

use kadmesh_networking::{spawn_node, transport::LocalBind, NetworkConfig, NodeHandle};
use kadmesh_protocol::Keypair;

async fn node(config: NetworkConfig) -> NodeHandle {
    let keypair = Keypair::generate();
    let local_id = keypair.node_id();
    let ip: IpAddr = [127, 0, 0, 1].into();
    spawn_node(local_id, ip, 0, keypair, config, &LocalBind)
        .await
        .expect("bind loopback socket")
}

fn fast_config() -> NetworkConfig {
    NetworkConfig {
        query_timeout: Duration::from_millis(500),
        walk_timeout: Duration::from_millis(800),
        ..NetworkConfig::default()
    }
}

#[tokio::test]
async fn ping_round_trips_and_admits_the_peer() {
    let a = node(fast_config()).await;
    let b = node(fast_config()).await;

    let observed = a.service.ping(&b.service.local_peer()).await.unwrap();
    assert_eq!(observed.0, b.service.local_peer().ip);

    a.service.welcome(b.service.local_peer()).await;
    let known = a.service.known_peers().await;
    assert!(known.iter().any(|p| p.id == b.service.local_peer().id));

    a.shutdown();
    b.shutdown();
}

#[tokio::test]
async fn store_and_find_value_round_trip() {
    let a = node(fast_config()).await;
    let b = node(fast_config()).await;

    let key = b"overlay-key".to_vec();
    let value = b"overlay-value".to_vec();
    a.service
        .store(&b.service.local_peer(), key.clone(), value.clone())
        .await
        .unwrap();

    match a.service.find_value(&b.service.local_peer(), key).await.unwrap() {
        kadmesh_networking::wire::FoundValue::Value(found) => {
            assert_eq!(found.into_vec(), value);
        }
        kadmesh_networking::wire::FoundValue::Nodes(_) => panic!("expected the stored value"),
    }

    a.shutdown();
    b.shutdown();
}

#[tokio::test]
async fn find_node_returns_a_known_neighbor() {
    let a = node(fast_config()).await;
    let b = node(fast_config()).await;
    let c = node(fast_config()).await;

    b.service.welcome(c.service.local_peer()).await;

    let target = c.service.local_peer().id;
    let nodes = a.service.find_node(&b.service.local_peer(), target).await.unwrap();
    assert!(nodes.iter().any(|p| p.id == c.service.local_peer().id));

    a.shutdown();
    b.shutdown();
    c.shutdown();
}

#[tokio::test]
async fn relay_delivers_across_an_intermediate_hop() {
    let a = node(fast_config()).await;
    let b = node(fast_config()).await;
    let c = node(fast_config()).await;

    // a only knows b; b knows c. a relays through b to reach c.
    a.service.welcome(b.service.local_peer()).await;
    b.service.welcome(c.service.local_peer()).await;

    a.service
        .send_relay(c.service.local_peer().id, b"hello over relay".to_vec())
        .unwrap();

    // Give the relay dispatcher and the hop at `b` a moment to run.
    tokio::time::sleep(Duration::from_millis(200)).await;

    a.shutdown();
    b.shutdown();
    c.shutdown();
}

#[tokio::test]
async fn relaying_to_self_with_a_zero_hop_limit_is_refused() {
    let a = node(fast_config()).await;
    let b = node(fast_config()).await;

    let ack = a
        .service
        .relay_rpc(&b.service.local_peer(), a.service.local_peer().id, 0, b"x".to_vec())
        .await
        .unwrap();
    assert!(ack.is_none());

    a.shutdown();
    b.shutdown();
}
