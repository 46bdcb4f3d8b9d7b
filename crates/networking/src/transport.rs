// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use std::io;
use std::net::SocketAddr;

use async_trait::async_trait;
use tokio::net::UdpSocket;

/// NAT traversal / hole punching is out of core scope: this overlay treats
/// it as a black box that hands back a UDP-capable socket already bound
/// and, where applicable, punched through. [`LocalBind`] is the trivial
/// stand-in used when no traversal is needed (LAN, or a publicly routable
/// host).
#[async_trait]
pub trait SocketProvider: Send + Sync {
    async fn bind(&self, desired_port: u16) -> io::Result<UdpSocket>;
}

pub struct LocalBind;

#[async_trait]
impl SocketProvider for LocalBind {
    async fn bind(&self, desired_port: u16) -> io::Result<UdpSocket> {
        let addr: SocketAddr = ([0, 0, 0, 0], desired_port).into();
        UdpSocket::bind(addr).await
    }
}
