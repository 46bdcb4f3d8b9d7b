// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use thiserror::Error;

pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("invalid secret key")]
    InvalidSecretKey(#[from] bitcoin::secp256k1::Error),

    #[error("malformed signature: {0}")]
    MalformedSignature(String),

    #[error("malformed wallet address: {0}")]
    MalformedAddress(String),

    #[error("msgpack encode failed: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("msgpack decode failed: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    #[error("payload of {0} bytes exceeds the {1} byte datagram budget")]
    PayloadTooLarge(usize, usize),
}
