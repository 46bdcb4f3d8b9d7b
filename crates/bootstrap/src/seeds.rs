// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use std::net::{IpAddr, SocketAddr};

/// A hardcoded set of well-known `(ip, port)` pairs, shipped with every
/// node so a fresh install has somewhere to dial on first start. Per
/// `network.bootstrap_nodes`, an operator-supplied list always takes
/// precedence; these are the fallback when none is configured.
///
/// These addresses are placeholders: a real deployment substitutes its own
/// operated seed nodes here before shipping.
const DEFAULT_BOOTSTRAP_NODES: &[(IpAddr, u16)] = &[
    (IpAddr::V4(std::net::Ipv4Addr::new(139, 162, 5, 14)), 11100),
    (IpAddr::V4(std::net::Ipv4Addr::new(172, 104, 18, 252)), 11100),
    (IpAddr::V4(std::net::Ipv4Addr::new(45, 79, 178, 25)), 11100),
];

pub fn default_seeds() -> Vec<SocketAddr> {
    DEFAULT_BOOTSTRAP_NODES
        .iter()
        .map(|(ip, port)| SocketAddr::new(*ip, *port))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_seeds_is_non_empty() {
        assert!(!default_seeds().is_empty());
    }
}
