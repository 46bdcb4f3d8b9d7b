// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrimitivesError {
    #[error("expected a 20-byte node id, got {0} bytes")]
    InvalidNodeIdLength(usize),
}
