// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;

/// CLI surface for `kadmesh-node`. Every option here mirrors a
/// `network.*`/`storage.*` configuration key from `SPEC_FULL.md` §6; an
/// on-disk config file is an external collaborator's concern, not this
/// binary's.
#[derive(Parser, Debug)]
#[command(name = "kadmesh-node", version, about = "Kadmesh overlay node")]
pub struct Opt {
    /// UDP port to bind. 0 picks any available port.
    #[arg(long, default_value_t = 0)]
    pub port: u16,

    /// IP address advertised to peers for this node.
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub ip: IpAddr,

    /// Bootstrap peers to dial at startup. Repeat the flag to list more
    /// than one; falls back to the built-in seed list when empty.
    #[arg(long = "peer")]
    pub peers: Vec<SocketAddr>,

    /// Hex-encoded secp256k1 secret key file. Generates an ephemeral
    /// identity for this run when omitted.
    #[arg(long)]
    pub key_file: Option<PathBuf>,

    /// Write logs under this directory instead of stdout.
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// `network.ksize`.
    #[arg(long, default_value_t = kadmesh_networking::NetworkConfig::default().ksize)]
    pub ksize: usize,

    /// `network.max_messages`.
    #[arg(long, default_value_t = kadmesh_networking::NetworkConfig::default().max_messages)]
    pub max_messages: usize,

    /// `network.max_hop_limit`.
    #[arg(long, default_value_t = kadmesh_networking::NetworkConfig::default().max_hop_limit)]
    pub max_hop_limit: u8,

    /// `network.monitor.enable_responses` negated: serve no `info`/`peers`
    /// requests from other crawlers.
    #[arg(long)]
    pub disable_responses: bool,

    /// `network.monitor.enable_crawler`.
    #[arg(long)]
    pub enable_monitor: bool,

    /// `network.disable_data_transfer`: short-circuits bandwidth probing.
    #[arg(long)]
    pub disable_data_transfer: bool,

    /// Monitor's `interval`, in seconds, between crawls.
    #[arg(long, default_value_t = 3600)]
    pub monitor_interval_secs: u64,

    /// Monitor's `configured_limit`.
    #[arg(long, default_value_t = 100)]
    pub monitor_limit: usize,
}
