// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use kadmesh_networking::handlers::MessageHandler;
use kadmesh_networking::Service;
use kadmesh_primitives::{NodeId, Peer};
use kadmesh_protocol::codec::{from_msgpack, to_msgpack};
use kadmesh_protocol::messages::{ApplicationMessage, InfoRequest, PeersRequest};
use tracing::{debug, warn};

use crate::bandwidth::BandwidthTester;
use crate::error::Result;
use crate::pipeline::{
    BandwidthInfo, Latency, NetworkInfo, PipelineRecord, Pipelines, PlatformInfo, StorageInfo,
    VersionInfo,
};

/// Which of the two independent request arms a pending nonce belongs to.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Arm {
    Info,
    Peers,
}

#[derive(Clone, Debug)]
pub struct CrawlerConfig {
    /// Stop once `processed` reaches this many entries.
    pub limit: usize,
    /// Stop once the crawl has run this long.
    pub timeout: Duration,
    /// `SKIP_BANDWIDTH_TEST`: short-circuit straight to `processed`.
    pub skip_bandwidth_test: bool,
    /// Base for the exponential backoff `WALK_TIMEOUT ^ tries`.
    pub walk_timeout: Duration,
    /// How often the crawl loop wakes to check for due work.
    pub tick: Duration,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        CrawlerConfig {
            limit: 100,
            timeout: Duration::from_secs(60),
            skip_bandwidth_test: false,
            walk_timeout: Duration::from_secs(10),
            tick: Duration::from_millis(100),
        }
    }
}

/// A single crawl. Holds its own `Pipelines`; registers itself as a message
/// handler for the duration of `run` to observe `info`/`peers` responses.
pub struct Crawler {
    service: Arc<Service>,
    pipelines: Mutex<Pipelines>,
    bandwidth: Arc<dyn BandwidthTester>,
    config: CrawlerConfig,
    stop: AtomicBool,
    next_nonce: AtomicU64,
    pending: Mutex<HashMap<u64, (NodeId, Arm)>>,
}

impl Crawler {
    pub fn new(service: Arc<Service>, bandwidth: Arc<dyn BandwidthTester>, config: CrawlerConfig) -> Arc<Self> {
        Arc::new(Crawler {
            service,
            pipelines: Mutex::new(Pipelines::new()),
            bandwidth,
            config,
            stop: AtomicBool::new(false),
            next_nonce: AtomicU64::new(1),
            pending: Mutex::new(HashMap::new()),
        })
    }

    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    fn next_nonce(&self) -> u64 {
        self.next_nonce.fetch_add(1, Ordering::Relaxed)
    }

    /// Seed the crawl: the local node becomes an immutable `processed`
    /// placeholder (preventing self-probing), and every currently-known
    /// routing-table peer starts out in `scanning`.
    async fn seed(self: &Arc<Self>) {
        let local_id = self.service.local_peer().id;
        let neighbours = self.service.known_peers().await;
        let mut pipelines = self.pipelines.lock().expect("pipelines mutex poisoned");
        pipelines.insert_local_placeholder(local_id);
        for peer in neighbours {
            pipelines.insert_scanning(peer.id, PipelineRecord::fresh(peer));
        }
    }

    /// Run the crawl to completion (or timeout/stop/drain), returning the
    /// terminal `processed` set with the local placeholder removed.
    pub async fn run(self: &Arc<Self>) -> Result<HashMap<NodeId, PipelineRecord>> {
        let handler: Arc<dyn MessageHandler> = self.clone();
        self.service.add_handler(handler.clone()).await;

        self.seed().await;
        let deadline = Instant::now() + self.config.timeout;

        loop {
            if self.stop.load(Ordering::Relaxed) {
                debug!("crawl stopped by request");
                break;
            }
            if Instant::now() >= deadline {
                debug!("crawl hit its timeout");
                break;
            }
            let (processed_len, drained) = {
                let pipelines = self.pipelines.lock().expect("pipelines mutex poisoned");
                (pipelines.processed_len(), pipelines.is_drained())
            };
            if processed_len >= self.config.limit {
                debug!(processed_len, "crawl reached its limit");
                break;
            }
            if drained {
                debug!("crawl drained every pipeline");
                break;
            }

            self.process_scanning().await;
            self.process_bandwidth_slot().await;

            tokio::time::sleep(self.config.tick).await;
        }

        self.service.remove_handler(&handler).await;

        let mut pipelines = self.pipelines.lock().expect("pipelines mutex poisoned");
        pipelines.remove_local_placeholder(&self.service.local_peer().id);
        Ok(pipelines
            .processed()
            .iter()
            .filter_map(|(id, record)| record.clone().map(|r| (*id, r)))
            .collect())
    }

    /// Send due `info_req`/`peers_req` requests for every record in
    /// `scanning`, respecting each arm's exponential backoff, then promote
    /// any record whose both arms have responded.
    async fn process_scanning(self: &Arc<Self>) {
        let due: Vec<(NodeId, Peer)> = {
            let mut pipelines = self.pipelines.lock().expect("pipelines mutex poisoned");
            pipelines
                .scanning_mut()
                .iter_mut()
                .filter(|(_, record)| Self::backoff_elapsed(record, self.config.walk_timeout))
                .map(|(id, record)| {
                    record.request.tries += 1;
                    record.request.last = Some(Instant::now());
                    (*id, record.peer)
                })
                .collect()
        };

        for (id, peer) in due {
            self.send_arm(id, peer, Arm::Info).await;
            self.send_arm(id, peer, Arm::Peers).await;
        }
    }

    fn backoff_elapsed(record: &PipelineRecord, walk_timeout: Duration) -> bool {
        if !record.is_still_scanning() {
            return false;
        }
        match record.request.last {
            None => true,
            Some(last) => {
                let exponent = record.request.tries.min(16);
                let backoff_secs = walk_timeout.as_secs_f64().powi(exponent as i32);
                let backoff = Duration::try_from_secs_f64(backoff_secs).unwrap_or(Duration::MAX);
                Instant::now() >= last + backoff
            }
        }
    }

    async fn send_arm(self: &Arc<Self>, id: NodeId, peer: Peer, arm: Arm) {
        let nonce = self.next_nonce();
        let message = match arm {
            Arm::Info => ApplicationMessage::InfoRequest(InfoRequest { nonce }),
            Arm::Peers => ApplicationMessage::PeersRequest(PeersRequest { nonce }),
        };
        let Ok(payload) = to_msgpack(&message) else {
            return;
        };
        self.pending.lock().expect("pending mutex poisoned").insert(nonce, (id, arm));
        {
            let mut pipelines = self.pipelines.lock().expect("pipelines mutex poisoned");
            if let Some(record) = pipelines.scanning_mut().get_mut(&id) {
                let pending = Some(Latency::Pending(Instant::now()));
                match arm {
                    Arm::Info => record.latency_info = pending,
                    Arm::Peers => record.latency_peers = pending,
                }
            }
        }
        if self.service.send_direct(&peer, payload).await.is_err() {
            warn!(%id, ?arm, "failed to send crawl request");
        }
    }

    /// Advance the single bandwidth slot: pull the FIFO head of `scanned`
    /// in if free, then poll whichever peer occupies it.
    async fn process_bandwidth_slot(self: &Arc<Self>) {
        if self.config.skip_bandwidth_test {
            let head_id = {
                let pipelines = self.pipelines.lock().expect("pipelines mutex poisoned");
                pipelines.scanned_front().map(|(id, _)| *id)
            };
            if let Some(id) = head_id {
                let mut pipelines = self.pipelines.lock().expect("pipelines mutex poisoned");
                pipelines.skip_bandwidth_test(&id);
            }
            return;
        }

        let occupant = {
            let mut pipelines = self.pipelines.lock().expect("pipelines mutex poisoned");
            pipelines.pop_into_bandwidth_slot();
            pipelines.bandwidth_slot().map(|(id, record)| (*id, record.peer))
        };

        let Some((id, peer)) = occupant else {
            return;
        };

        match self.bandwidth.test_bandwidth(&peer).await {
            Ok(measurement) => {
                let mut pipelines = self.pipelines.lock().expect("pipelines mutex poisoned");
                if pipelines.bandwidth_slot().is_some_and(|(slot_id, _)| *slot_id == id) {
                    pipelines.finish_bandwidth_success(measurement);
                }
            }
            Err(_) => {
                let mut pipelines = self.pipelines.lock().expect("pipelines mutex poisoned");
                if pipelines.bandwidth_slot().is_some_and(|(slot_id, _)| *slot_id == id) {
                    pipelines.finish_bandwidth_failure();
                }
            }
        }
    }

    fn maybe_promote(&self, id: &NodeId) {
        let mut pipelines = self.pipelines.lock().expect("pipelines mutex poisoned");
        let still_scanning = pipelines
            .scanning_mut()
            .get(id)
            .is_some_and(|record| !record.is_still_scanning());
        if still_scanning {
            pipelines.promote_to_scanned(id);
        }
    }

    fn discover_peers(&self, discoverer: Peer, ids: Vec<NodeId>) {
        let mut pipelines = self.pipelines.lock().expect("pipelines mutex poisoned");
        for id in ids {
            if id != self.service.local_peer().id && !pipelines.contains(&id) {
                // Address unknown until this peer itself responds to a probe;
                // reuse the discoverer's address as a placeholder so a direct
                // probe has somewhere to go, matching the original's
                // address-optimistic peer seeding.
                pipelines.insert_scanning(id, PipelineRecord::fresh(discoverer));
            }
        }
    }
}

impl MessageHandler for Crawler {
    fn handle(&self, _source: Option<Peer>, sender_node_id: NodeId, payload: &[u8]) {
        let message: ApplicationMessage = match from_msgpack(payload) {
            Ok(message) => message,
            Err(_) => return,
        };

        match message {
            ApplicationMessage::InfoResponse(info) => {
                let matched = self
                    .pending
                    .lock()
                    .expect("pending mutex poisoned")
                    .remove(&info.nonce)
                    .filter(|(id, arm)| *id == sender_node_id && *arm == Arm::Info);
                let Some((id, _)) = matched else {
                    return;
                };
                let mut pipelines = self.pipelines.lock().expect("pipelines mutex poisoned");
                if let Some(record) = pipelines.scanning_mut().get_mut(&id) {
                    let rtt = match record.latency_info {
                        Some(Latency::Pending(sent)) => sent.elapsed(),
                        _ => Duration::ZERO,
                    };
                    record.latency_info = Some(Latency::Done(rtt));
                    record.version = Some(VersionInfo {
                        protocol: info.protocol_version,
                        software: info.software_version,
                    });
                    record.storage = Some(StorageInfo {
                        total: info.storage.total,
                        used: info.storage.used,
                        free: info.storage.free,
                    });
                    record.network = Some(NetworkInfo {
                        transport: (record.peer.ip, info.network.transport.1),
                        unl: info.network.unl,
                        is_public: info.network.is_public,
                    });
                    record.platform = Some(PlatformInfo {
                        system: info.platform.system,
                        release: info.platform.release,
                        version: info.platform.version,
                        machine: info.platform.machine,
                    });
                    record.btcaddress = Some(info.btcaddress);
                }
                drop(pipelines);
                self.maybe_promote(&id);
            }
            ApplicationMessage::PeersResponse(response) => {
                let matched = self
                    .pending
                    .lock()
                    .expect("pending mutex poisoned")
                    .remove(&response.nonce)
                    .filter(|(id, arm)| *id == sender_node_id && *arm == Arm::Peers);
                let Some((id, _)) = matched else {
                    return;
                };
                let ids = response.node_ids();
                let discoverer = {
                    let mut pipelines = self.pipelines.lock().expect("pipelines mutex poisoned");
                    let discoverer = pipelines.scanning_mut().get(&id).map(|r| r.peer);
                    if let Some(record) = pipelines.scanning_mut().get_mut(&id) {
                        let rtt = match record.latency_peers {
                            Some(Latency::Pending(sent)) => sent.elapsed(),
                            _ => Duration::ZERO,
                        };
                        record.latency_peers = Some(Latency::Done(rtt));
                        record.peers = Some(ids.clone());
                    }
                    discoverer
                };
                self.maybe_promote(&id);
                if let Some(discoverer) = discoverer {
                    self.discover_peers(discoverer, ids);
                }
            }
            ApplicationMessage::InfoRequest(_) | ApplicationMessage::PeersRequest(_) => {}
        }
    }
}
