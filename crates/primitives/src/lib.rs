// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

//! Node identifiers, peer records and the XOR distance metric shared by
//! every layer of the overlay.

mod distance;
mod error;
mod node_id;
mod peer;

pub use distance::Distance;
pub use error::PrimitivesError;
pub use node_id::{NodeId, ID_BITS, ID_BYTES};
pub use peer::Peer;
