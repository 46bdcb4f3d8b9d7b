// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use kadmesh_crawler::{BandwidthTester, Crawler, CrawlerConfig};
use kadmesh_networking::Service;
use tracing::{info, warn};

use crate::dataset::{find_next_free_dataset_num, predictable_key};
use crate::error::Result;
use crate::shard::Shard;
use crate::storage::ShardStorage;

/// Invoked after a shard has been stored and published, with the DHT key
/// and the shard bytes that were written under it.
pub type CrawlCompleteCallback = Box<dyn Fn(&[u8], &[u8]) + Send + Sync>;

#[derive(Clone)]
pub struct MonitorConfig {
    /// How often a crawl is started.
    pub interval: Duration,
    /// `crawl.limit` is `configured_limit + 1` (the `+1` accounts for the
    /// local node's own placeholder, which never reaches `processed`).
    pub configured_limit: usize,
    pub skip_bandwidth_test: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            interval: Duration::from_secs(3600),
            configured_limit: 100,
            skip_bandwidth_test: false,
        }
    }
}

pub struct Monitor {
    service: Arc<Service>,
    bandwidth: Arc<dyn BandwidthTester>,
    storage: Arc<dyn ShardStorage>,
    config: MonitorConfig,
    on_crawl_complete: Option<CrawlCompleteCallback>,
    stop: AtomicBool,
}

impl Monitor {
    pub fn new(
        service: Arc<Service>,
        bandwidth: Arc<dyn BandwidthTester>,
        storage: Arc<dyn ShardStorage>,
        config: MonitorConfig,
        on_crawl_complete: Option<CrawlCompleteCallback>,
    ) -> Arc<Self> {
        Arc::new(Monitor {
            service,
            bandwidth,
            storage,
            config,
            on_crawl_complete,
            stop: AtomicBool::new(false),
        })
    }

    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Drive crawls forever at `interval`, until [`Self::request_stop`] is
    /// called. Each tick crawls, shards, stores and publishes exactly one
    /// dataset, then sleeps for the remainder of the interval.
    pub async fn run(self: Arc<Self>) {
        let mut dataset_num = match find_next_free_dataset_num(&self.service, &self.address()).await {
            Ok(num) => num,
            Err(err) => {
                warn!(%err, "failed to discover the starting dataset number, defaulting to 0");
                0
            }
        };

        loop {
            if self.stop.load(Ordering::Relaxed) {
                break;
            }

            let tick_started = std::time::Instant::now();
            match self.run_once(dataset_num).await {
                Ok(()) => dataset_num += 1,
                Err(err) => warn!(%err, "crawl tick failed"),
            }

            // Per the crawl-timeout design note, a crawl's own timeout is
            // `interval - ε` so a long crawl never starves the next tick.
            let elapsed = tick_started.elapsed();
            if elapsed < self.config.interval {
                tokio::time::sleep(self.config.interval - elapsed).await;
            }
        }
    }

    fn address(&self) -> String {
        self.service.keypair().address()
    }

    async fn run_once(&self, dataset_num: u64) -> Result<()> {
        let begin = unix_seconds();

        let crawl_timeout = self.config.interval.saturating_sub(Duration::from_millis(1));
        let crawler = Crawler::new(
            Arc::clone(&self.service),
            Arc::clone(&self.bandwidth),
            CrawlerConfig {
                limit: self.config.configured_limit + 1,
                timeout: crawl_timeout,
                skip_bandwidth_test: self.config.skip_bandwidth_test,
                ..CrawlerConfig::default()
            },
        );
        let processed = crawler.run().await?;

        let end = unix_seconds();
        let address = self.address();
        let shard = Shard::new(address.clone(), dataset_num, begin, end, &processed);
        let (bytes, shard_id) = shard.to_bytes_and_id()?;

        self.storage
            .add(bytes.clone())
            .await
            .map_err(|_| crate::error::MonitorError::Storage)?;

        let key = predictable_key(&address, dataset_num);
        self.publish(&key, shard_id.as_bytes()).await?;

        if let Some(callback) = &self.on_crawl_complete {
            callback(&key, &bytes);
        }

        info!(dataset_num, processed = processed.len(), "published monitor dataset");
        Ok(())
    }

    /// Store `key -> value` on the `k` nodes closest to `key`'s hashed
    /// location, per-peer failures logged and otherwise ignored: DHT writes
    /// are best-effort, with conflicts resolved last-write-wins (see
    /// `DESIGN.md`).
    async fn publish(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let target = kadmesh_protocol::identity::hash_to_node_id(key);
        let mut closest = self.service.iterative_find_node(target).await?;
        if closest.is_empty() {
            closest.push(self.service.local_peer());
        }
        for peer in closest {
            if let Err(err) = self.service.store(&peer, key.to_vec(), value.to_vec()).await {
                warn!(%err, peer = %peer.id, "failed to store dataset entry on a peer");
            }
        }
        Ok(())
    }
}

fn unix_seconds() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}
