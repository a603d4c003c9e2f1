//! CIDR option enumerator.
//!
//! Lists the prefix lengths at which an address is a network address, so a
//! caller can only offer prefixes where the entered address is not a host.

use crate::models::{
    address_to_int, block_size, broadcast_addr, int_to_address, is_aligned, is_valid_address,
    MAX_LENGTH,
};
use serde::Serialize;

/// Smallest prefix offered by default. Shorter prefixes are valid arithmetic
/// but are not offered as choices.
pub const MIN_OPTION_PREFIX: u8 = 8;

/// One selectable prefix for an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CidrOption {
    pub prefix: u8,
    /// "/" followed by the prefix length.
    pub label: String,
    pub total_addresses: u64,
    pub usable_addresses: u64,
    /// First address of the candidate block.
    pub first: String,
    /// Last address of the candidate block.
    pub last: String,
}

/// Aligned prefixes of `address` in `[8, 32]`, ascending.
///
/// Empty if `address` is not a dotted-quad.
pub fn enumerate_aligned_prefixes(address: &str) -> Vec<CidrOption> {
    enumerate_aligned_prefixes_from(address, MIN_OPTION_PREFIX)
}

/// Aligned prefixes of `address` in `[min_prefix, 32]`, ascending.
pub fn enumerate_aligned_prefixes_from(address: &str, min_prefix: u8) -> Vec<CidrOption> {
    if !is_valid_address(address) {
        log::debug!("enumerate_aligned_prefixes: not an address {address:?}");
        return Vec::new();
    }
    let addr = match address_to_int(address) {
        Ok(addr) => addr,
        Err(_) => return Vec::new(),
    };

    (min_prefix.min(MAX_LENGTH)..=MAX_LENGTH)
        .filter(|&prefix| is_aligned(addr, prefix))
        .map(|prefix| {
            let total = block_size(prefix).unwrap_or(1);
            let usable = if prefix >= MAX_LENGTH - 1 {
                total
            } else {
                total - 2
            };
            CidrOption {
                prefix,
                label: format!("/{prefix}"),
                total_addresses: total,
                usable_addresses: usable,
                first: int_to_address(addr),
                last: int_to_address(broadcast_addr(addr, prefix).unwrap_or(addr)),
            }
        })
        .collect()
}

/// True when `prefix` is one of the options offered for `address`.
pub fn is_offered_prefix(address: &str, prefix: u8, min_prefix: u8) -> bool {
    enumerate_aligned_prefixes_from(address, min_prefix)
        .iter()
        .any(|o| o.prefix == prefix)
}
