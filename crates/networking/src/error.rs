// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use thiserror::Error;

pub type Result<T, E = NetworkError> = std::result::Result<T, E>;

/// No error ever crosses the RPC boundary: every remote call resolves to an
/// answer or a `null` meaning "refused/unknown" (see `SPEC_FULL.md` §7).
/// `NetworkError` covers failures local to this node only.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Protocol(#[from] kadmesh_protocol::ProtocolError),

    #[error("query to {0} timed out")]
    QueryTimeout(std::net::SocketAddr),

    #[error("iterative lookup exceeded its walk timeout")]
    WalkTimeout,

    #[error("response channel dropped before a reply arrived")]
    ResponseChannelDropped,
}
