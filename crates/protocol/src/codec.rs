// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

/// Maximum payload per UDP datagram: 576 byte MTU minus a 20 byte IPv4
/// header minus an 8 byte UDP header.
pub const MAX_DATAGRAM_PAYLOAD: usize = 548;

pub fn to_msgpack<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    Ok(rmp_serde::to_vec_named(value)?)
}

pub fn from_msgpack<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(rmp_serde::from_slice(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Sample {
        a: u32,
        b: String,
    }

    #[test]
    fn roundtrips_a_struct() {
        let sample = Sample {
            a: 7,
            b: "seven".to_string(),
        };
        let packed = to_msgpack(&sample).unwrap();
        let unpacked: Sample = from_msgpack(&packed).unwrap();
        assert_eq!(sample, unpacked);
    }
}
