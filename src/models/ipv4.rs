//! IPv4 address arithmetic.
//!
//! Addresses are plain `u32` values; the text form is dotted-quad.

use crate::error::SubnetError;
use regex::Regex;
use std::net::Ipv4Addr;
use std::sync::OnceLock;

/// Maximum length for an IPv4 subnet mask (32 bits).
pub const MAX_LENGTH: u8 = 32;

/// Four dot-separated octets, each 0-255, nothing before or after.
static ADDRESS_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_address_regex() -> &'static Regex {
    ADDRESS_REGEX.get_or_init(|| {
        let octet = r"(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)";
        Regex::new(&format!(r"^{octet}\.{octet}\.{octet}\.{octet}$")).expect("Invalid Regex")
    })
}

/// Check that `text` is a dotted-quad IPv4 address.
///
/// Leading zeros inside an octet are accepted (`010.0.0.1`), surrounding
/// whitespace is not.
pub fn is_valid_address(text: &str) -> bool {
    get_address_regex().is_match(text)
}

/// Pack a dotted-quad address into a `u32`, most significant octet first.
///
/// # Examples
/// ```
/// use subnet_planner::models::address_to_int;
/// assert_eq!(address_to_int("192.168.0.1").unwrap(), 0xC0A8_0001);
/// ```
pub fn address_to_int(text: &str) -> Result<u32, SubnetError> {
    if !is_valid_address(text) {
        return Err(SubnetError::InvalidAddress(text.to_string()));
    }
    text.split('.').try_fold(0u32, |acc, octet| {
        let octet: u8 = octet
            .parse()
            .map_err(|_| SubnetError::InvalidAddress(text.to_string()))?;
        Ok((acc << 8) | u32::from(octet))
    })
}

/// Format a `u32` as dotted-quad text. Total over all 32-bit values.
pub fn int_to_address(value: u32) -> String {
    Ipv4Addr::from(value).to_string()
}

/// Convert a CIDR prefix length to a subnet mask as u32.
///
/// # Examples
/// ```
/// use subnet_planner::models::get_cidr_mask;
/// assert_eq!(get_cidr_mask(24).unwrap(), 0xFFFFFF00);
/// ```
pub fn get_cidr_mask(len: u8) -> Result<u32, SubnetError> {
    if len > MAX_LENGTH {
        Err(prefix_too_long(len))
    } else {
        let right_len = MAX_LENGTH - len;
        let all_bits = u32::MAX as u64;
        let mask = (all_bits >> right_len) << right_len;
        Ok(mask as u32)
    }
}

/// Number of addresses in a block of the given prefix length.
pub fn block_size(len: u8) -> Result<u64, SubnetError> {
    if len > MAX_LENGTH {
        Err(prefix_too_long(len))
    } else {
        Ok(1u64 << (MAX_LENGTH - len))
    }
}

/// Last address of the block of length `len` containing `addr`.
pub fn broadcast_addr(addr: u32, len: u8) -> Result<u32, SubnetError> {
    let mask = get_cidr_mask(len)?;
    Ok((addr & mask) | !mask)
}

/// Smallest prefix length for which `addr` is a network address.
///
/// `0.0.0.0` is aligned to every prefix and yields 0.
pub fn lo_mask(addr: u32) -> u8 {
    let trailing_zeros = addr.trailing_zeros() as u8;
    MAX_LENGTH - trailing_zeros.min(MAX_LENGTH)
}

/// True when `addr` is the first address of its block of length `len`.
pub fn is_aligned(addr: u32, len: u8) -> bool {
    len <= MAX_LENGTH && lo_mask(addr) <= len
}

fn prefix_too_long(len: u8) -> SubnetError {
    SubnetError::InvalidPrefix {
        prefix: len,
        reason: format!("network length is longer than {MAX_LENGTH}"),
    }
}
