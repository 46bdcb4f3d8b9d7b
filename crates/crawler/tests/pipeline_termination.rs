// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use std::sync::Arc;
use std::time::Duration;

use kadmesh_crawler::{Crawler, CrawlerConfig, NoOpTester};
use kadmesh_test_support::{fast_config, settle_swarm, shutdown_all, spawn_responding_chained_swarm};

/// A crawl bounded by `limit` stops exactly at that many processed peers,
/// well within its timeout, and every processed record carries both the
/// `peers` and `network` facts a completed scan requires.
#[tokio::test]
async fn crawl_terminates_at_its_configured_limit() {
    const SWARM_SIZE: usize = 20;
    let nodes = spawn_responding_chained_swarm(SWARM_SIZE, fast_config()).await;
    settle_swarm(&nodes).await;

    let origin = &nodes[0];
    let crawler = Crawler::new(
        Arc::clone(&origin.service),
        Arc::new(NoOpTester),
        CrawlerConfig {
            limit: 10,
            timeout: Duration::from_secs(5),
            skip_bandwidth_test: true,
            walk_timeout: Duration::from_millis(50),
            tick: Duration::from_millis(20),
        },
    );

    let processed = crawler.run().await.unwrap();

    assert_eq!(processed.len(), 10);
    for record in processed.values() {
        assert!(record.peers.is_some(), "a processed record must have its peers arm filled in");
        assert!(record.network.is_some(), "a processed record must have its network arm filled in");
    }

    shutdown_all(&nodes);
}
