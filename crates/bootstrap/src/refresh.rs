// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use kadmesh_networking::Service;
use kadmesh_primitives::NodeId;
use rand::RngCore;
use tracing::debug;

/// `network.refresh_neighbours_interval`: periodically re-run a self
/// lookup and a handful of random-id lookups so buckets that would
/// otherwise go stale (no organic traffic touching them) still get
/// refreshed. Runs until [`RefreshHandle::stop`] is called.
pub struct RefreshHandle {
    stop: Arc<AtomicBool>,
}

impl RefreshHandle {
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

pub fn spawn_refresh_task(service: Arc<Service>) -> RefreshHandle {
    let stop = Arc::new(AtomicBool::new(false));
    let task_stop = Arc::clone(&stop);

    tokio::spawn(async move {
        loop {
            let interval = service.config().refresh_neighbours_interval;
            tokio::time::sleep(interval).await;
            if task_stop.load(Ordering::Relaxed) {
                break;
            }

            let local_id = service.local_peer().id;
            if let Err(err) = service.iterative_find_node(local_id).await {
                debug!(%err, "periodic self-refresh lookup failed");
            }

            let random_target = random_node_id();
            if let Err(err) = service.iterative_find_node(random_target).await {
                debug!(%err, "periodic random-id refresh lookup failed");
            }
        }
    });

    RefreshHandle { stop }
}

fn random_node_id() -> NodeId {
    let mut bytes = [0u8; kadmesh_primitives::ID_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    NodeId::from_bytes(bytes)
}
