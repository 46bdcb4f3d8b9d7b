// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use kadmesh_crawler::bandwidth::BandwidthTestError;
use kadmesh_crawler::pipeline::BandwidthInfo;
use kadmesh_crawler::BandwidthTester;
use kadmesh_monitor::storage::ShardStorageError;
use kadmesh_monitor::ShardStorage;
use kadmesh_networking::responder::NodeInfoProvider;
use kadmesh_primitives::Peer;
use kadmesh_protocol::messages::{NetworkInfo, PlatformInfo, StorageInfo};

/// Fails the first `fail_times` bandwidth probes it sees, then succeeds
/// with a fixed measurement — exercises the scanned-tail retry path.
pub struct FlakyBandwidthTester {
    fail_times: usize,
    attempts: AtomicUsize,
}

impl FlakyBandwidthTester {
    pub fn new(fail_times: usize) -> Self {
        FlakyBandwidthTester {
            fail_times,
            attempts: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl BandwidthTester for FlakyBandwidthTester {
    async fn test_bandwidth(&self, _peer: &Peer) -> Result<BandwidthInfo, BandwidthTestError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if attempt < self.fail_times {
            Err(BandwidthTestError)
        } else {
            Ok(BandwidthInfo {
                send: 1_000_000.0,
                receive: 2_000_000.0,
            })
        }
    }
}

/// A [`ShardStorage`] that always rejects the write, for exercising the
/// monitor's error path.
pub struct RejectingStorage;

#[async_trait]
impl ShardStorage for RejectingStorage {
    async fn add(&self, _bytes: Vec<u8>) -> Result<String, ShardStorageError> {
        Err(ShardStorageError)
    }
}

/// A [`NodeInfoProvider`] with zeroed-out facts, for swarms whose crawler
/// scenarios only care that `info`/`peers` get answered, not with what.
#[derive(Default)]
pub struct StubNodeInfo;

impl NodeInfoProvider for StubNodeInfo {
    fn storage(&self) -> StorageInfo {
        StorageInfo {
            total: 0,
            used: 0,
            free: 0,
        }
    }

    fn platform(&self) -> PlatformInfo {
        PlatformInfo {
            system: String::new(),
            release: String::new(),
            version: String::new(),
            machine: String::new(),
        }
    }

    fn network(&self) -> NetworkInfo {
        NetworkInfo {
            transport: (String::new(), 0),
            unl: String::new(),
            is_public: false,
        }
    }
}
