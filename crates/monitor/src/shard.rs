// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use std::collections::HashMap;

use kadmesh_crawler::PipelineRecord;
use kadmesh_protocol::identity::{address_from_node_id, sha256_digest};
use serde::Serialize;

#[derive(Serialize)]
pub struct ProcessedStorage {
    pub total: u64,
    pub used: u64,
    pub free: u64,
}

#[derive(Serialize)]
pub struct ProcessedNetwork {
    pub transport: (String, u16),
    pub unl: String,
    pub is_public: bool,
}

#[derive(Serialize)]
pub struct ProcessedVersion {
    pub protocol: u32,
    pub software: String,
}

#[derive(Serialize)]
pub struct ProcessedPlatform {
    pub system: String,
    pub release: String,
    pub version: String,
    pub machine: String,
}

#[derive(Serialize)]
pub struct ProcessedBandwidth {
    pub send: f64,
    pub receive: f64,
}

/// A [`PipelineRecord`] rendered for the shard document: node ids become
/// textual addresses, and the `request` bookkeeping field is dropped.
#[derive(Serialize)]
pub struct ProcessedRecord {
    pub peers: Option<Vec<String>>,
    pub storage: Option<ProcessedStorage>,
    pub network: Option<ProcessedNetwork>,
    pub version: Option<ProcessedVersion>,
    pub platform: Option<ProcessedPlatform>,
    pub btcaddress: Option<String>,
    pub bandwidth: Option<ProcessedBandwidth>,
}

impl From<&PipelineRecord> for ProcessedRecord {
    fn from(record: &PipelineRecord) -> Self {
        ProcessedRecord {
            peers: record
                .peers
                .as_ref()
                .map(|ids| ids.iter().map(address_from_node_id).collect()),
            storage: record.storage.as_ref().map(|s| ProcessedStorage {
                total: s.total,
                used: s.used,
                free: s.free,
            }),
            network: record.network.as_ref().map(|n| ProcessedNetwork {
                transport: (n.transport.0.to_string(), n.transport.1),
                unl: n.unl.clone(),
                is_public: n.is_public,
            }),
            version: record.version.as_ref().map(|v| ProcessedVersion {
                protocol: v.protocol,
                software: v.software.clone(),
            }),
            platform: record.platform.as_ref().map(|p| ProcessedPlatform {
                system: p.system.clone(),
                release: p.release.clone(),
                version: p.version.clone(),
                machine: p.machine.clone(),
            }),
            btcaddress: record.btcaddress.clone(),
            bandwidth: record.bandwidth.as_ref().map(|b| ProcessedBandwidth {
                send: b.send,
                receive: b.receive,
            }),
        }
    }
}

#[derive(Serialize)]
pub struct Shard {
    pub node: String,
    pub num: u64,
    pub begin: f64,
    pub end: f64,
    pub processed: HashMap<String, ProcessedRecord>,
}

impl Shard {
    pub fn new(
        node_address: String,
        num: u64,
        begin: f64,
        end: f64,
        records: &HashMap<kadmesh_primitives::NodeId, PipelineRecord>,
    ) -> Self {
        let processed = records
            .iter()
            .map(|(id, record)| (address_from_node_id(id), ProcessedRecord::from(record)))
            .collect();
        Shard {
            node: node_address,
            num,
            begin,
            end,
            processed,
        }
    }

    /// Pretty-print with a two-space indent, matching the on-disk shard
    /// format, and return both the bytes and their content id.
    pub fn to_bytes_and_id(&self) -> Result<(Vec<u8>, String), serde_json::Error> {
        let mut buf = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(
            &mut buf,
            serde_json::ser::PrettyFormatter::with_indent(b"  "),
        );
        serde::Serialize::serialize(self, &mut serializer)?;
        let id = hex::encode(sha256_digest(&buf));
        Ok((buf, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kadmesh_crawler::PipelineRecord as RecordImpl;
    use kadmesh_primitives::{NodeId, Peer, ID_BYTES};
    use std::net::IpAddr;

    #[test]
    fn shard_content_id_is_stable_for_identical_content() {
        let records = HashMap::new();
        let shard_a = Shard::new("addr".into(), 0, 1.0, 2.0, &records);
        let shard_b = Shard::new("addr".into(), 0, 1.0, 2.0, &records);
        let (_, id_a) = shard_a.to_bytes_and_id().unwrap();
        let (_, id_b) = shard_b.to_bytes_and_id().unwrap();
        assert_eq!(id_a, id_b);
    }

    #[test]
    fn processed_record_drops_the_request_field_and_renders_addresses() {
        let peer = Peer::new(NodeId::from_bytes([1u8; ID_BYTES]), IpAddr::from([10, 0, 0, 1]), 4000);
        let mut record = RecordImpl::fresh(peer);
        record.peers = Some(vec![NodeId::from_bytes([2u8; ID_BYTES])]);
        let mut records = HashMap::new();
        records.insert(peer.id, record);

        let shard = Shard::new("addr".into(), 0, 1.0, 2.0, &records);
        let (bytes, _) = shard.to_bytes_and_id().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(!text.contains("\"request\""));
        assert!(text.contains("\"peers\""));
    }
}
