// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

//! The pipelined peer crawler: discovery via `peers` responses, `info`
//! requests with exponential backoff, single-slot serialized bandwidth
//! probing, and a terminal `processed` set.

pub mod bandwidth;
pub mod crawler;
pub mod error;
pub mod pipeline;

pub use bandwidth::{BandwidthTester, NoOpTester};
pub use crawler::{Crawler, CrawlerConfig};
pub use error::{CrawlerError, Result};
pub use pipeline::{PipelineRecord, Pipelines};
