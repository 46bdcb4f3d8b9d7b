// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use std::fmt;

use serde::de::{Error as DeError, Visitor};
use serde::{Deserializer, Serializer};

use crate::distance::Distance;
use crate::error::PrimitivesError;

/// Width of the overlay's id space, in bits.
pub const ID_BITS: usize = 160;
/// Width of the overlay's id space, in bytes.
pub const ID_BYTES: usize = ID_BITS / 8;

/// A 160-bit node identifier, derived elsewhere from `RIPEMD160(SHA256(pubkey))`.
///
/// Encodes on the wire as a raw 20-byte binary string (msgpack `bin`), never
/// as a byte sequence, matching the wire contract the rest of the overlay
/// relies on.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId([u8; ID_BYTES]);

impl NodeId {
    pub const ZERO: NodeId = NodeId([0u8; ID_BYTES]);

    pub fn from_bytes(bytes: [u8; ID_BYTES]) -> Self {
        NodeId(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != ID_BYTES {
            return Err(PrimitivesError::InvalidNodeIdLength(bytes.len()));
        }
        let mut buf = [0u8; ID_BYTES];
        buf.copy_from_slice(bytes);
        Ok(NodeId(buf))
    }

    pub fn as_bytes(&self) -> &[u8; ID_BYTES] {
        &self.0
    }

    /// XOR distance between two ids, per the Kademlia metric.
    pub fn distance(&self, other: &NodeId) -> Distance {
        let mut out = [0u8; ID_BYTES];
        for i in 0..ID_BYTES {
            out[i] = self.0[i] ^ other.0[i];
        }
        Distance::from_bytes(out)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", hex::encode(self.0))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl serde::Serialize for NodeId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bytes(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NodeId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct BytesVisitor;

        impl<'de> Visitor<'de> for BytesVisitor {
            type Value = NodeId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "a {ID_BYTES}-byte node id")
            }

            fn visit_bytes<E>(self, v: &[u8]) -> Result<Self::Value, E>
            where
                E: DeError,
            {
                NodeId::from_slice(v).map_err(|_| E::invalid_length(v.len(), &self))
            }

            fn visit_byte_buf<E>(self, v: Vec<u8>) -> Result<Self::Value, E>
            where
                E: DeError,
            {
                self.visit_bytes(&v)
            }
        }

        deserializer.deserialize_bytes(BytesVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xor_distance_is_symmetric() {
        let a = NodeId::from_bytes([1u8; ID_BYTES]);
        let b = NodeId::from_bytes([2u8; ID_BYTES]);
        assert_eq!(a.distance(&b), b.distance(&a));
    }

    #[test]
    fn distance_to_self_is_zero() {
        let a = NodeId::from_bytes([7u8; ID_BYTES]);
        assert_eq!(a.distance(&a), Distance::from_bytes([0u8; ID_BYTES]));
    }

    #[test]
    fn roundtrips_through_msgpack_as_bin() {
        let id = NodeId::from_bytes([9u8; ID_BYTES]);
        let packed = rmp_serde::to_vec(&id).unwrap();
        // msgpack bin8 header for a 20 byte payload: 0xc4, 0x14
        assert_eq!(&packed[..2], &[0xc4, 0x14]);
        let back: NodeId = rmp_serde::from_slice(&packed).unwrap();
        assert_eq!(back, id);
    }
}
