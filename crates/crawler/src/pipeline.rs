// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use kadmesh_primitives::{NodeId, Peer};

/// The `latency.{info,peers}` slot doubles as a request timer until the
/// matching response arrives, at which point it is overwritten with the
/// measured round-trip time. Kept as an explicit tagged value rather than a
/// single timestamp field to make the two meanings impossible to confuse.
#[derive(Clone, Copy, Debug)]
pub enum Latency {
    Pending(Instant),
    Done(std::time::Duration),
}

#[derive(Clone, Debug, Default)]
pub struct StorageInfo {
    pub total: u64,
    pub used: u64,
    pub free: u64,
}

#[derive(Clone, Debug)]
pub struct NetworkInfo {
    pub transport: (std::net::IpAddr, u16),
    pub unl: String,
    pub is_public: bool,
}

impl Default for NetworkInfo {
    fn default() -> Self {
        NetworkInfo {
            transport: (std::net::IpAddr::from([0, 0, 0, 0]), 0),
            unl: String::new(),
            is_public: false,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct VersionInfo {
    pub protocol: u32,
    pub software: String,
}

#[derive(Clone, Debug, Default)]
pub struct PlatformInfo {
    pub system: String,
    pub release: String,
    pub version: String,
    pub machine: String,
}

#[derive(Clone, Debug, Default)]
pub struct BandwidthInfo {
    pub send: f64,
    pub receive: f64,
}

#[derive(Clone, Debug)]
pub struct RequestState {
    pub tries: u32,
    pub last: Option<Instant>,
}

impl Default for RequestState {
    fn default() -> Self {
        RequestState { tries: 0, last: None }
    }
}

/// Per-peer crawl state. `None` stands in for the record's optional fields;
/// `peer` is carried alongside so a record can be rendered as an address
/// without a routing-table lookup.
#[derive(Clone, Debug)]
pub struct PipelineRecord {
    pub peer: Peer,
    pub peers: Option<Vec<NodeId>>,
    pub storage: Option<StorageInfo>,
    pub network: Option<NetworkInfo>,
    pub version: Option<VersionInfo>,
    pub platform: Option<PlatformInfo>,
    pub btcaddress: Option<String>,
    pub bandwidth: Option<BandwidthInfo>,
    pub latency_info: Option<Latency>,
    pub latency_peers: Option<Latency>,
    pub latency_direct: Option<Latency>,
    pub request: RequestState,
}

impl PipelineRecord {
    pub fn fresh(peer: Peer) -> Self {
        PipelineRecord {
            peer,
            peers: None,
            storage: None,
            network: None,
            version: None,
            platform: None,
            btcaddress: None,
            bandwidth: None,
            latency_info: None,
            latency_peers: None,
            latency_direct: None,
            request: RequestState::default(),
        }
    }

    /// Per §4.5: every record in `scanning` still has at least one of
    /// `peers`/`network` unset.
    pub fn is_still_scanning(&self) -> bool {
        self.peers.is_none() || self.network.is_none()
    }
}

/// The four disjoint containers one crawler owns, keyed by node id. The
/// disjointness invariant (every id lives in exactly one container) is
/// enforced by routing every mutation through these methods rather than
/// letting callers reach into the maps directly.
#[derive(Default)]
pub struct Pipelines {
    scanning: HashMap<NodeId, PipelineRecord>,
    scanned: VecDeque<(NodeId, PipelineRecord)>,
    bandwidth_test: Option<(NodeId, PipelineRecord)>,
    processed: HashMap<NodeId, Option<PipelineRecord>>,
}

impl Pipelines {
    pub fn new() -> Self {
        Pipelines::default()
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.scanning.contains_key(id)
            || self.scanned.iter().any(|(i, _)| i == id)
            || self.bandwidth_test.as_ref().is_some_and(|(i, _)| i == id)
            || self.processed.contains_key(id)
    }

    pub fn insert_scanning(&mut self, id: NodeId, record: PipelineRecord) {
        if !self.contains(&id) {
            self.scanning.insert(id, record);
        }
    }

    /// Insert the local node's placeholder: a terminal, null record that
    /// prevents self-probing for the lifetime of the crawl.
    pub fn insert_local_placeholder(&mut self, id: NodeId) {
        self.processed.insert(id, None);
    }

    pub fn remove_local_placeholder(&mut self, id: &NodeId) {
        if matches!(self.processed.get(id), Some(None)) {
            self.processed.remove(id);
        }
    }

    pub fn scanning_mut(&mut self) -> &mut HashMap<NodeId, PipelineRecord> {
        &mut self.scanning
    }

    /// Move a record whose `peers` and `network` arms have both responded
    /// from `scanning` to the tail of `scanned`.
    pub fn promote_to_scanned(&mut self, id: &NodeId) {
        if let Some(record) = self.scanning.remove(id) {
            self.scanned.push_back((*id, record));
        }
    }

    /// Pop the FIFO head of `scanned` into the single `bandwidth_test` slot.
    /// No-op if the slot is already occupied or `scanned` is empty.
    pub fn pop_into_bandwidth_slot(&mut self) -> bool {
        if self.bandwidth_test.is_some() {
            return false;
        }
        match self.scanned.pop_front() {
            Some(entry) => {
                self.bandwidth_test = Some(entry);
                true
            }
            None => false,
        }
    }

    pub fn bandwidth_slot(&self) -> Option<&(NodeId, PipelineRecord)> {
        self.bandwidth_test.as_ref()
    }

    /// Complete the occupant of the bandwidth slot successfully, moving it
    /// to `processed`.
    pub fn finish_bandwidth_success(&mut self, bandwidth: BandwidthInfo) {
        if let Some((id, mut record)) = self.bandwidth_test.take() {
            record.bandwidth = Some(bandwidth);
            self.processed.insert(id, Some(record));
        }
    }

    /// Fail the occupant of the bandwidth slot, returning it to the tail of
    /// `scanned` for a later retry.
    pub fn finish_bandwidth_failure(&mut self) {
        if let Some(entry) = self.bandwidth_test.take() {
            self.scanned.push_back(entry);
        }
    }

    /// Short-circuit a scanned record directly to `processed`, used when
    /// bandwidth probing is disabled.
    pub fn skip_bandwidth_test(&mut self, id: &NodeId) {
        if let Some(pos) = self.scanned.iter().position(|(i, _)| i == id) {
            let (_, record) = self.scanned.remove(pos).expect("position just found");
            self.processed.insert(*id, Some(record));
        }
    }

    pub fn scanned_front(&self) -> Option<&(NodeId, PipelineRecord)> {
        self.scanned.front()
    }

    pub fn processed(&self) -> &HashMap<NodeId, Option<PipelineRecord>> {
        &self.processed
    }

    pub fn processed_len(&self) -> usize {
        self.processed.values().filter(|v| v.is_some()).count()
    }

    pub fn is_drained(&self) -> bool {
        self.scanning.is_empty() && self.scanned.is_empty() && self.bandwidth_test.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kadmesh_primitives::ID_BYTES;
    use std::net::IpAddr;

    fn peer(n: u8) -> Peer {
        Peer::new(NodeId::from_bytes([n; ID_BYTES]), IpAddr::from([10, 0, 0, n]), 4000)
    }

    #[test]
    fn a_peer_lives_in_exactly_one_pipeline_at_a_time() {
        let mut pipelines = Pipelines::new();
        let p = peer(1);
        pipelines.insert_scanning(p.id, PipelineRecord::fresh(p));
        assert!(pipelines.contains(&p.id));

        // Re-inserting while already scanning is a no-op, not a duplicate.
        pipelines.insert_scanning(p.id, PipelineRecord::fresh(p));
        assert_eq!(pipelines.scanning_mut().len(), 1);

        pipelines.promote_to_scanned(&p.id);
        assert!(pipelines.scanning_mut().get(&p.id).is_none());
        assert!(pipelines.contains(&p.id));

        pipelines.pop_into_bandwidth_slot();
        assert!(pipelines.scanned_front().is_none());
        assert!(pipelines.bandwidth_slot().is_some());

        pipelines.finish_bandwidth_success(BandwidthInfo::default());
        assert!(pipelines.bandwidth_slot().is_none());
        assert_eq!(pipelines.processed_len(), 1);
    }

    #[test]
    fn bandwidth_slot_never_holds_more_than_one_record() {
        let mut pipelines = Pipelines::new();
        let a = peer(1);
        let b = peer(2);
        pipelines.insert_scanning(a.id, PipelineRecord::fresh(a));
        pipelines.insert_scanning(b.id, PipelineRecord::fresh(b));
        pipelines.promote_to_scanned(&a.id);
        pipelines.promote_to_scanned(&b.id);

        assert!(pipelines.pop_into_bandwidth_slot());
        assert!(!pipelines.pop_into_bandwidth_slot());
        assert_eq!(pipelines.bandwidth_slot().map(|(id, _)| *id), Some(a.id));
    }

    #[test]
    fn failed_bandwidth_test_returns_to_the_tail_of_scanned() {
        let mut pipelines = Pipelines::new();
        let a = peer(1);
        let b = peer(2);
        pipelines.insert_scanning(a.id, PipelineRecord::fresh(a));
        pipelines.insert_scanning(b.id, PipelineRecord::fresh(b));
        pipelines.promote_to_scanned(&a.id);
        pipelines.promote_to_scanned(&b.id);

        pipelines.pop_into_bandwidth_slot();
        pipelines.finish_bandwidth_failure();
        assert_eq!(pipelines.scanned_front().map(|(id, _)| *id), Some(b.id));
    }
}
