// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use kadmesh_networking::responder::NodeInfoProvider;
use kadmesh_protocol::messages::{NetworkInfo, PlatformInfo, StorageInfo};

/// The simplest `NodeInfoProvider` that compiles: real storage accounting
/// and platform detection live in the shard-store and `sysinfo`-style
/// collaborators this core treats as black boxes (see `SPEC_FULL.md` §1).
/// A deployment wires its own provider in here once those exist.
#[derive(Default)]
pub struct StaticNodeInfo;

impl NodeInfoProvider for StaticNodeInfo {
    fn storage(&self) -> StorageInfo {
        StorageInfo {
            total: 0,
            used: 0,
            free: 0,
        }
    }

    fn platform(&self) -> PlatformInfo {
        PlatformInfo {
            system: std::env::consts::OS.to_string(),
            release: String::new(),
            version: String::new(),
            machine: std::env::consts::ARCH.to_string(),
        }
    }

    fn network(&self) -> NetworkInfo {
        NetworkInfo {
            transport: (String::new(), 0),
            unl: String::new(),
            is_public: false,
        }
    }
}
