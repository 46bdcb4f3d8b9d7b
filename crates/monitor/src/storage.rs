// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use async_trait::async_trait;

/// The shard-level blob store is out of core scope; the monitor only ever
/// hands it bytes and gets a content id back.
#[async_trait]
pub trait ShardStorage: Send + Sync {
    async fn add(&self, bytes: Vec<u8>) -> Result<String, ShardStorageError>;
}

#[derive(Debug, thiserror::Error)]
#[error("shard storage rejected the write")]
pub struct ShardStorageError;

/// Computes the content id the same way [`crate::shard::Shard`] does,
/// without retaining the bytes anywhere. Useful for a node that publishes
/// datasets but delegates durable storage to another layer entirely.
pub struct DiscardingStorage;

#[async_trait]
impl ShardStorage for DiscardingStorage {
    async fn add(&self, bytes: Vec<u8>) -> Result<String, ShardStorageError> {
        Ok(hex::encode(kadmesh_protocol::identity::sha256_digest(&bytes)))
    }
}
