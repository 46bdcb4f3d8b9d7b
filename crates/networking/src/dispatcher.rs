// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::queue::RelayEntry;
use crate::service::Service;

/// Drains the relay queue, forwarding each entry to the k nodes closest to
/// its destination, excluding the local node, trying them in closeness
/// order until one accepts or the list is exhausted.
pub async fn run_relay_dispatcher(service: Arc<Service>, mut relay_rx: mpsc::Receiver<RelayEntry>) {
    while let Some(entry) = relay_rx.recv().await {
        let candidates = service
            .routing
            .lock()
            .await
            .find_neighbors(&entry.dest_id, service.config.ksize, Some(&service.local_peer()));

        if candidates.is_empty() {
            debug!(dest = %entry.dest_id, "no known peers to relay towards");
            continue;
        }

        let mut delivered = false;
        for peer in candidates {
            match service
                .relay_rpc(&peer, entry.dest_id, entry.hop_limit, entry.payload.clone())
                .await
            {
                Ok(Some(_)) => {
                    delivered = true;
                    break;
                }
                Ok(None) => continue,
                Err(_) => continue,
            }
        }

        if !delivered {
            warn!(dest = %entry.dest_id, "exhausted candidates relaying message");
        }
    }
}
