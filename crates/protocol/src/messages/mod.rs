// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

//! Application-level message schemas carried inside `DIRECT`/`RELAY`
//! envelope payloads.

mod info;
mod peers;

pub use info::{InfoRequest, InfoResponse, NetworkInfo, PlatformInfo, StorageInfo};
pub use peers::{PeersRequest, PeersResponse};

use serde::{Deserialize, Serialize};

/// The union of request/response schemas an overlay node may exchange.
/// Tagged on the wire exactly as the spec's `type` discriminant.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ApplicationMessage {
    #[serde(rename = "info_req")]
    InfoRequest(InfoRequest),
    #[serde(rename = "info")]
    InfoResponse(InfoResponse),
    #[serde(rename = "peers_req")]
    PeersRequest(PeersRequest),
    #[serde(rename = "peers")]
    PeersResponse(PeersResponse),
}
