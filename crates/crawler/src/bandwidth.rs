// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use async_trait::async_trait;
use kadmesh_primitives::Peer;

use crate::pipeline::BandwidthInfo;

/// The bulk-data transfer subsystem that actually measures throughput is
/// out of core scope; the crawler only ever sees this black box. A real
/// implementation drives an upload/download exchange and times it; `NoOp`
/// below is the `SKIP_BANDWIDTH_TEST` stand-in.
#[async_trait]
pub trait BandwidthTester: Send + Sync {
    async fn test_bandwidth(&self, peer: &Peer) -> Result<BandwidthInfo, BandwidthTestError>;
}

#[derive(Debug, thiserror::Error)]
#[error("bandwidth test failed")]
pub struct BandwidthTestError;

/// Used when `network.disable_data_transfer` is set: every probe "succeeds"
/// with a zeroed measurement instead of actually running.
pub struct NoOpTester;

#[async_trait]
impl BandwidthTester for NoOpTester {
    async fn test_bandwidth(&self, _peer: &Peer) -> Result<BandwidthInfo, BandwidthTestError> {
        Ok(BandwidthInfo::default())
    }
}
