// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

/// Wire-level protocol version advertised in every `info` response.
/// Bump only on a breaking change to the RPC or envelope wire format.
pub const PROTOCOL_VERSION: u32 = 1;

/// Software version string advertised alongside `PROTOCOL_VERSION`, taken
/// from the crate's own Cargo.toml at build time.
pub fn software_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
