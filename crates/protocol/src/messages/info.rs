// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InfoRequest {
    pub nonce: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorageInfo {
    pub total: u64,
    pub used: u64,
    pub free: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NetworkInfo {
    pub transport: (String, u16),
    pub unl: String,
    pub is_public: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlatformInfo {
    pub system: String,
    pub release: String,
    pub version: String,
    pub machine: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InfoResponse {
    pub protocol_version: u32,
    pub software_version: String,
    pub storage: StorageInfo,
    pub network: NetworkInfo,
    pub platform: PlatformInfo,
    pub btcaddress: String,
    pub nonce: u64,
}
