// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

//! Fixtures shared by the overlay's integration tests: fast-timeout
//! loopback swarms, a chained-bootstrap shape for relay/crawl scenarios,
//! a recording message handler, and a couple of failing test doubles for
//! the bandwidth and storage collaborators.

pub mod doubles;
pub mod recorder;
pub mod swarm;

pub use doubles::{FlakyBandwidthTester, RejectingStorage, StubNodeInfo};
pub use recorder::{Delivery, RecordingHandler};
pub use swarm::{
    fast_config, settle_swarm, shutdown_all, spawn_chained_swarm, spawn_responding_chained_swarm,
    spawn_test_node,
};
