// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use std::time::Duration;

use kadmesh_routing::DEFAULT_K;

/// Network-layer configuration, mirroring the `network.*` options a node is
/// started with.
#[derive(Clone, Debug)]
pub struct NetworkConfig {
    /// `network.ksize`.
    pub ksize: usize,
    /// `network.max_messages`: bound of both the inbound and relay queues.
    pub max_messages: usize,
    /// `network.max_hop_limit`: initial hop budget handed to an originated RELAY.
    pub max_hop_limit: u8,
    /// `network.messages_history_limit`: duplicate-suppression retention.
    pub messages_history_limit: usize,
    /// `network.refresh_neighbours_interval`.
    pub refresh_neighbours_interval: Duration,
    /// Bound on a single RPC round-trip.
    pub query_timeout: Duration,
    /// Bound on one full iterative lookup.
    pub walk_timeout: Duration,
    /// Alpha parallelism factor for iterative lookups.
    pub alpha: usize,
    /// `network.monitor.enable_responses`: whether to answer `info`/`peers` requests.
    pub enable_responses: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            ksize: DEFAULT_K,
            max_messages: 128,
            max_hop_limit: 8,
            messages_history_limit: 1024,
            refresh_neighbours_interval: Duration::from_secs(3600),
            query_timeout: Duration::from_secs(5),
            walk_timeout: Duration::from_secs(10),
            alpha: 3,
            enable_responses: true,
        }
    }
}
