// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

//! 160 k-bucket routing table over the overlay's XOR id space, with a
//! neighbor-selection operation that avoids address-collocated peers.

mod bucket;
mod table;

pub use bucket::{Bucket, InsertOutcome};
pub use table::{RoutingTable, DEFAULT_K};
