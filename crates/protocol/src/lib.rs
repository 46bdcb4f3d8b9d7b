// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

//! Wallet-derived node identity, signed message envelopes, the msgpack wire
//! codec, and the application message schemas that ride inside `DIRECT`
//! and `RELAY` payloads.

pub mod codec;
pub mod envelope;
pub mod error;
pub mod identity;
pub mod messages;
pub mod version;

pub use envelope::Envelope;
pub use error::ProtocolError;
pub use identity::Keypair;
pub use version::PROTOCOL_VERSION;
