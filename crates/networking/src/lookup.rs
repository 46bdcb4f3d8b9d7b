// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use std::collections::HashSet;

use kadmesh_primitives::{NodeId, Peer};
use tracing::debug;

use crate::error::{NetworkError, Result};
use crate::service::Service;
use crate::wire::FoundValue;

/// Outcome of an iterative lookup: either the value was found somewhere
/// along the way, or the walk converged on the k closest nodes known to the
/// swarm without finding it.
pub enum LookupOutcome {
    Value(Vec<u8>),
    ClosestNodes(Vec<Peer>),
}

impl Service {
    /// Iterative `FIND_NODE`: repeatedly query the `alpha` not-yet-queried
    /// peers closest to `target`, merging their answers in, until a round
    /// produces no peer closer than the best one already known or the walk
    /// timeout elapses.
    pub async fn iterative_find_node(&self, target: NodeId) -> Result<Vec<Peer>> {
        match self.iterative_walk(target, None).await? {
            LookupOutcome::ClosestNodes(nodes) => Ok(nodes),
            LookupOutcome::Value(_) => unreachable!("find_node walk never resolves a value"),
        }
    }

    /// Iterative `FIND_VALUE`: same walk as `find_node`, but a peer
    /// returning the value directly short-circuits the search.
    pub async fn iterative_find_value(&self, key: Vec<u8>) -> Result<LookupOutcome> {
        let target = kadmesh_protocol::identity::hash_to_node_id(&key);
        self.iterative_walk(target, Some(key)).await
    }

    async fn iterative_walk(&self, target: NodeId, value_key: Option<Vec<u8>>) -> Result<LookupOutcome> {
        let deadline = tokio::time::Instant::now() + self.config.walk_timeout;

        let mut queried: HashSet<NodeId> = HashSet::new();
        let mut shortlist = self
            .routing
            .lock()
            .await
            .find_neighbors(&target, self.config.ksize, None);
        shortlist.sort_by_key(|p| target.distance(&p.id));

        loop {
            if tokio::time::Instant::now() >= deadline {
                debug!(%target, "lookup hit its walk timeout");
                return Err(NetworkError::WalkTimeout);
            }

            let round: Vec<Peer> = shortlist
                .iter()
                .filter(|p| !queried.contains(&p.id))
                .take(self.config.alpha)
                .copied()
                .collect();
            if round.is_empty() {
                break;
            }

            let mut discovered: Vec<Peer> = Vec::new();
            for peer in round {
                queried.insert(peer.id);

                if let Some(key) = &value_key {
                    match self.find_value(&peer, key.clone()).await {
                        Ok(FoundValue::Value(value)) => return Ok(LookupOutcome::Value(value.into_vec())),
                        Ok(FoundValue::Nodes(nodes)) => discovered.extend(nodes),
                        Err(_) => continue,
                    }
                } else {
                    match self.find_node(&peer, target).await {
                        Ok(nodes) => discovered.extend(nodes),
                        Err(_) => continue,
                    }
                }
            }

            let closest_before = shortlist.first().map(|p| target.distance(&p.id));
            for peer in discovered {
                if peer.id != self.local.id && !shortlist.iter().any(|p| p.id == peer.id) {
                    shortlist.push(peer);
                }
            }
            shortlist.sort_by_key(|p| target.distance(&p.id));
            shortlist.truncate(self.config.ksize.max(1) * 4);

            let closest_after = shortlist.first().map(|p| target.distance(&p.id));
            if closest_after.is_some() && closest_after == closest_before {
                break;
            }
        }

        shortlist.truncate(self.config.ksize);
        Ok(LookupOutcome::ClosestNodes(shortlist))
    }
}
