// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

//! Startup peer discovery: a hardcoded seed list to dial when no
//! `network.bootstrap_nodes` are configured, the first-contact dial that
//! admits a seed's real id into the routing table, and the periodic
//! neighbor refresh that keeps buckets from going stale.

mod dial;
mod refresh;
mod seeds;

pub use dial::bootstrap;
pub use refresh::{spawn_refresh_task, RefreshHandle};
pub use seeds::default_seeds;
