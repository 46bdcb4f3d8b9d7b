// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

//! The periodic crawl driver: dataset-number discovery, shard
//! serialization and content addressing, and DHT publication.

pub mod dataset;
pub mod error;
pub mod monitor;
pub mod shard;
pub mod storage;

pub use dataset::{find_next_free_dataset_num, predictable_key};
pub use error::{MonitorError, Result};
pub use monitor::{Monitor, MonitorConfig};
pub use shard::Shard;
pub use storage::{DiscardingStorage, ShardStorage};
