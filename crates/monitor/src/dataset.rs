// Copyright 2026 Kadmesh Contributors.
//
// Licensed under the GNU General Public License v3.0 (GPL-3.0-or-later).
// See the LICENSE file in the repository root for full terms.

use kadmesh_networking::{LookupOutcome, Service};

use crate::error::Result;

/// The deterministic DHT key a given local address publishes dataset `num`
/// under.
pub fn predictable_key(address: &str, num: u64) -> Vec<u8> {
    format!("monitor_dataset_{address}_{num}").into_bytes()
}

async fn is_set(service: &Service, address: &str, num: u64) -> Result<bool> {
    let key = predictable_key(address, num);
    match service.iterative_find_value(key).await {
        Ok(LookupOutcome::Value(_)) => Ok(true),
        Ok(LookupOutcome::ClosestNodes(_)) => Ok(false),
        Err(_) => Ok(false),
    }
}

/// Find the smallest `n` such that `monitor_dataset_<address>_<n>` is
/// unset: exponential probe outward to find an unset upper bound, then
/// binary search the gap between the last confirmed-set and first
/// confirmed-unset index.
pub async fn find_next_free_dataset_num(service: &Service, address: &str) -> Result<u64> {
    if !is_set(service, address, 0).await? {
        return Ok(0);
    }

    let mut low = 0u64;
    let mut high = 1u64;
    while is_set(service, address, high).await? {
        low = high;
        high = high
            .checked_mul(2)
            .unwrap_or(u64::MAX)
            .max(high.saturating_add(1));
    }

    while high - low > 1 {
        let mid = low + (high - low) / 2;
        if is_set(service, address, mid).await? {
            low = mid;
        } else {
            high = mid;
        }
    }
    Ok(high)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predictable_key_is_deterministic() {
        let a = predictable_key("1Addr", 3);
        let b = predictable_key("1Addr", 3);
        assert_eq!(a, b);
        assert_eq!(a, b"monitor_dataset_1Addr_3".to_vec());
    }
}
