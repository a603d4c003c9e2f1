//! Domain models for the subnet planner.
//!
//! - `ipv4` - address arithmetic on `u32` values
//! - [`Block`] - one aligned subnet block and its derived values

mod block;
mod ipv4;

// Re-export public types
pub use block::{Block, BlockId};
pub use ipv4::{
    address_to_int, block_size, broadcast_addr, get_cidr_mask, int_to_address, is_aligned,
    is_valid_address, lo_mask, MAX_LENGTH,
};
