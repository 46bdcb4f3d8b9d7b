// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use kadmesh_crawler::NoOpTester;
use kadmesh_monitor::monitor::CrawlCompleteCallback;
use kadmesh_monitor::{DiscardingStorage, Monitor, MonitorConfig};
use kadmesh_test_support::{fast_config, settle_swarm, shutdown_all, spawn_responding_chained_swarm, RejectingStorage};

/// Two successive ticks publish strictly increasing dataset numbers under
/// the node's own predictable key, each shard decoding to the documented
/// fields.
#[tokio::test]
async fn successive_ticks_publish_increasing_dataset_numbers() {
    let nodes = spawn_responding_chained_swarm(5, fast_config()).await;
    settle_swarm(&nodes).await;

    let published: Arc<Mutex<Vec<(Vec<u8>, Vec<u8>)>>> = Arc::new(Mutex::new(Vec::new()));
    let callback_sink = Arc::clone(&published);
    let callback: CrawlCompleteCallback = Box::new(move |key, bytes| {
        callback_sink.lock().unwrap().push((key.to_vec(), bytes.to_vec()));
    });

    let monitor = Monitor::new(
        Arc::clone(&nodes[0].service),
        Arc::new(NoOpTester),
        Arc::new(DiscardingStorage),
        MonitorConfig {
            interval: Duration::from_millis(250),
            configured_limit: 3,
            skip_bandwidth_test: true,
        },
        Some(callback),
    );

    let run_handle = tokio::spawn(Arc::clone(&monitor).run());
    tokio::time::sleep(Duration::from_millis(700)).await;
    monitor.request_stop();
    let _ = tokio::time::timeout(Duration::from_secs(2), run_handle).await;

    let completions = published.lock().unwrap().clone();
    assert!(completions.len() >= 2, "expected at least two crawl ticks to publish a dataset");

    let mut nums: Vec<u64> = Vec::new();
    for (key, bytes) in &completions {
        let key_text = String::from_utf8(key.clone()).unwrap();
        let address = nodes[0].service.keypair().address();
        assert!(key_text.starts_with(&format!("monitor_dataset_{address}_")));

        let shard: serde_json::Value = serde_json::from_slice(bytes).unwrap();
        assert_eq!(shard["node"], serde_json::json!(address));
        assert!(shard["processed"].is_object());
        nums.push(shard["num"].as_u64().unwrap());
    }
    let mut sorted = nums.clone();
    sorted.sort_unstable();
    assert_eq!(nums, sorted, "dataset numbers must increase monotonically");
    assert!(nums.windows(2).all(|w| w[1] > w[0]));

    shutdown_all(&nodes);
}

/// A storage rejection surfaces as a tick failure the monitor logs and
/// moves past, rather than one that stalls or panics the run loop.
#[tokio::test]
async fn a_rejected_storage_write_does_not_stall_the_monitor() {
    let nodes = spawn_responding_chained_swarm(3, fast_config()).await;
    settle_swarm(&nodes).await;

    let monitor = Monitor::new(
        Arc::clone(&nodes[0].service),
        Arc::new(NoOpTester),
        Arc::new(RejectingStorage),
        MonitorConfig {
            interval: Duration::from_millis(150),
            configured_limit: 2,
            skip_bandwidth_test: true,
        },
        None,
    );

    let run_handle = tokio::spawn(Arc::clone(&monitor).run());
    tokio::time::sleep(Duration::from_millis(400)).await;
    monitor.request_stop();
    let joined = tokio::time::timeout(Duration::from_secs(2), run_handle).await;
    assert!(joined.is_ok(), "the monitor loop must still observe the stop flag after a failed tick");

    shutdown_all(&nodes);
}
