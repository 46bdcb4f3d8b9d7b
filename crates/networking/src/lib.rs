// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

//! The overlay's UDP transport: routing-table admission, the Kademlia RPC
//! core, and the `DIRECT`/`RELAY` message layer built on top of it.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod handlers;
pub mod history;
pub mod lookup;
pub mod messaging;
pub mod queue;
pub mod reactor;
pub mod responder;
mod rpc_client;
mod rpc_server;
pub mod service;
pub mod transport;
pub mod wire;

pub use config::NetworkConfig;
pub use error::{NetworkError, Result};
pub use lookup::LookupOutcome;
pub use service::{Service, ServiceChannels};

use std::sync::Arc;

use kadmesh_primitives::Peer;
use kadmesh_protocol::Keypair;
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;

/// A running node: the shared [`Service`] plus the background tasks that
/// keep it alive. Dropping every `JoinHandle` (e.g. letting `NodeHandle`
/// itself drop) does not stop the tasks; call [`NodeHandle::shutdown`] to
/// abort them explicitly.
pub struct NodeHandle {
    pub service: Arc<Service>,
    reactor: JoinHandle<()>,
    inbound_dispatch: JoinHandle<()>,
    relay_dispatch: JoinHandle<()>,
}

impl NodeHandle {
    pub fn shutdown(&self) {
        self.reactor.abort();
        self.inbound_dispatch.abort();
        self.relay_dispatch.abort();
    }
}

/// Bind a socket via `provider`, construct the [`Service`], and spawn the
/// three tasks that drive it: the RPC reactor, the inbound application
/// dispatcher, and the relay forwarder.
pub async fn spawn_node(
    local_id: kadmesh_primitives::NodeId,
    advertise_ip: std::net::IpAddr,
    port: u16,
    keypair: Keypair,
    config: NetworkConfig,
    provider: &dyn transport::SocketProvider,
) -> std::io::Result<NodeHandle> {
    let socket: UdpSocket = provider.bind(port).await?;
    let bound_port = socket.local_addr()?.port();
    let local = Peer::new(local_id, advertise_ip, bound_port);
    let (service, channels) = Service::new(local, keypair, config, socket);

    let reactor = tokio::spawn(reactor::run_reactor(Arc::clone(&service)));
    let inbound_dispatch = tokio::spawn(messaging::run_inbound_dispatch(
        Arc::clone(&service),
        channels.inbound_rx,
    ));
    let relay_dispatch = tokio::spawn(dispatcher::run_relay_dispatcher(
        Arc::clone(&service),
        channels.relay_rx,
    ));

    Ok(NodeHandle {
        service,
        reactor,
        inbound_dispatch,
        relay_dispatch,
    })
}
