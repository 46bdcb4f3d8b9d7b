// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use std::cmp::Ordering;
use std::fmt;

use crate::node_id::ID_BYTES;

/// XOR distance between two [`NodeId`](crate::NodeId)s, ordered as a
/// big-endian 160-bit unsigned integer.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Distance([u8; ID_BYTES]);

impl Distance {
    pub fn from_bytes(bytes: [u8; ID_BYTES]) -> Self {
        Distance(bytes)
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Index of the bucket this distance falls into: `159 - leading_zero_bits`.
    /// `None` when the distance is zero (i.e. the two ids are identical).
    pub fn bucket_index(&self) -> Option<usize> {
        for (byte_idx, byte) in self.0.iter().enumerate() {
            if *byte != 0 {
                let leading = byte.leading_zeros() as usize;
                let bit_idx = byte_idx * 8 + leading;
                return Some(ID_BYTES * 8 - 1 - bit_idx);
            }
        }
        None
    }
}

impl fmt::Debug for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Distance({})", hex::encode(self.0))
    }
}

impl PartialOrd for Distance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Distance {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NodeId;

    #[test]
    fn bucket_index_of_closest_neighbor_is_zero() {
        let a = NodeId::from_bytes([0u8; ID_BYTES]);
        let mut other = [0u8; ID_BYTES];
        other[ID_BYTES - 1] = 1;
        let b = NodeId::from_bytes(other);
        assert_eq!(a.distance(&b).bucket_index(), Some(0));
    }

    #[test]
    fn bucket_index_of_maximally_far_neighbor_is_top() {
        let a = NodeId::from_bytes([0u8; ID_BYTES]);
        let b = NodeId::from_bytes([0xffu8; ID_BYTES]);
        assert_eq!(a.distance(&b).bucket_index(), Some(ID_BYTES * 8 - 1));
    }

    #[test]
    fn identical_ids_have_no_bucket() {
        let a = NodeId::from_bytes([3u8; ID_BYTES]);
        assert_eq!(a.distance(&a).bucket_index(), None);
    }

    #[test]
    fn ordering_matches_big_endian_magnitude() {
        let small = Distance::from_bytes([0u8; ID_BYTES]);
        let mut big_bytes = [0u8; ID_BYTES];
        big_bytes[0] = 1;
        let big = Distance::from_bytes(big_bytes);
        assert!(small < big);
    }
}
