// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

//! Reference entry point: wires identity, the overlay transport, bootstrap
//! dial, the monitor crawl, and logging into one runnable process. On-disk
//! configuration, wallet key custody and the bulk-data transfer subsystem
//! are out of core scope (see `SPEC_FULL.md` §1) — this binary stands in
//! for them with the simplest thing that works.

mod info;
mod opt;

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use eyre::{Context, Result};
use kadmesh_crawler::NoOpTester;
use kadmesh_logging::{init_logging, LogOutput, LoggingConfig};
use kadmesh_monitor::{DiscardingStorage, Monitor, MonitorConfig};
use kadmesh_networking::responder::AppResponder;
use kadmesh_networking::transport::LocalBind;
use kadmesh_networking::{spawn_node, NetworkConfig};
use kadmesh_protocol::Keypair;
use tracing::info;

use crate::info::StaticNodeInfo;
use crate::opt::Opt;

fn main() -> Result<()> {
    let opt = Opt::parse();

    let _log_guard = init_logging(LoggingConfig {
        output: match &opt.log_dir {
            Some(dir) => LogOutput::Directory(dir.clone()),
            None => LogOutput::Stdout,
        },
        default_filter: "kadmesh_networking=info,kadmesh_crawler=info,kadmesh_monitor=info,info"
            .to_string(),
    })
    .wrap_err("failed to initialize logging")?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run(opt))
}

async fn run(opt: Opt) -> Result<()> {
    let keypair = load_or_generate_keypair(opt.key_file.as_deref())?;
    let local_id = keypair.node_id();
    info!(address = %keypair.address(), node_id = %local_id, "starting kadmesh node");

    let config = NetworkConfig {
        ksize: opt.ksize,
        max_messages: opt.max_messages,
        max_hop_limit: opt.max_hop_limit,
        enable_responses: !opt.disable_responses,
        ..NetworkConfig::default()
    };

    let advertise_ip: IpAddr = opt.ip;
    let handle = spawn_node(local_id, advertise_ip, opt.port, keypair, config, &LocalBind)
        .await
        .wrap_err("failed to bind the overlay's UDP socket")?;
    info!(bound = %handle.service.local_peer().addr(), "bound overlay socket");

    let responder: Arc<dyn kadmesh_networking::handlers::MessageHandler> =
        AppResponder::new(Arc::clone(&handle.service), Arc::new(StaticNodeInfo::default()));
    handle.service.add_handler(responder).await;

    let seeds: Vec<std::net::SocketAddr> = if opt.peers.is_empty() {
        kadmesh_bootstrap::default_seeds()
    } else {
        opt.peers.clone()
    };
    let admitted = kadmesh_bootstrap::bootstrap(&handle.service, &seeds).await;
    info!(admitted, attempted = seeds.len(), "bootstrap dial complete");

    let refresh = kadmesh_bootstrap::spawn_refresh_task(Arc::clone(&handle.service));

    let monitor_handle = if opt.enable_monitor {
        let monitor = Monitor::new(
            Arc::clone(&handle.service),
            Arc::new(NoOpTester),
            Arc::new(DiscardingStorage),
            MonitorConfig {
                interval: Duration::from_secs(opt.monitor_interval_secs),
                configured_limit: opt.monitor_limit,
                skip_bandwidth_test: opt.disable_data_transfer,
            },
            None,
        );
        let task_monitor = Arc::clone(&monitor);
        tokio::spawn(async move { task_monitor.run().await });
        Some(monitor)
    } else {
        None
    };

    tokio::signal::ctrl_c().await.ok();
    info!("shutdown requested");

    if let Some(monitor) = monitor_handle {
        monitor.request_stop();
    }
    refresh.stop();
    handle.shutdown();
    Ok(())
}

fn load_or_generate_keypair(path: Option<&std::path::Path>) -> Result<Keypair> {
    match path {
        Some(path) => {
            let hex_secret = std::fs::read_to_string(path)
                .wrap_err_with(|| format!("failed to read key file {}", path.display()))?;
            let bytes = hex::decode(hex_secret.trim()).wrap_err("key file is not valid hex")?;
            Keypair::from_secret_bytes(&bytes).wrap_err("key file does not contain a valid secret key")
        }
        None => {
            tracing::warn!("no --key-file given, generating an ephemeral identity for this run");
            Ok(Keypair::generate())
        }
    }
}
