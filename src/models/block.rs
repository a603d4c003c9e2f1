//! Subnet block data model.

use super::ipv4::{int_to_address, is_aligned, MAX_LENGTH};
use crate::error::SubnetError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a block within one partition.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub u64);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An aligned power-of-two range of IPv4 addresses.
///
/// `base` is always the first address of the block; derived values
/// (netmask, broadcast, usable range, host count) are computed on demand.
/// Only [`Block::new`] builds one, so `prefix <= 32` and alignment always hold.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Block {
    id: BlockId,
    base: u32,
    prefix: u8,
    parent: Option<BlockId>,
}

impl Block {
    /// Checked constructor: `prefix` must be 0..=32 and `base` the first address of its block.
    pub fn new(
        id: BlockId,
        base: u32,
        prefix: u8,
        parent: Option<BlockId>,
    ) -> Result<Block, SubnetError> {
        if prefix > MAX_LENGTH {
            return Err(SubnetError::InvalidPrefix {
                prefix,
                reason: format!("must be between 0 and {MAX_LENGTH}"),
            });
        }
        if !is_aligned(base, prefix) {
            return Err(SubnetError::InvalidPrefix {
                prefix,
                reason: format!(
                    "{} is not the first address of a /{prefix} block",
                    int_to_address(base)
                ),
            });
        }
        Ok(Block {
            id,
            base,
            prefix,
            parent,
        })
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    /// First address of the block.
    pub fn base(&self) -> u32 {
        self.base
    }

    /// Prefix length, 0..=32.
    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// Block this one was split from, `None` for a root.
    pub fn parent(&self) -> Option<BlockId> {
        self.parent
    }

    /// Number of addresses covered by this block.
    pub fn size(&self) -> u64 {
        1u64 << (MAX_LENGTH - self.prefix)
    }

    pub fn netmask(&self) -> u32 {
        (u32::MAX as u64 >> (MAX_LENGTH - self.prefix) << (MAX_LENGTH - self.prefix)) as u32
    }

    /// Last address of the block.
    pub fn broadcast(&self) -> u32 {
        self.base | !self.netmask()
    }

    /// First and last usable host. /31 and /32 have no reserved addresses.
    pub fn usable_range(&self) -> (u32, u32) {
        if self.prefix >= MAX_LENGTH - 1 {
            (self.base, self.broadcast())
        } else {
            (self.base + 1, self.broadcast() - 1)
        }
    }

    pub fn host_count(&self) -> u64 {
        if self.prefix >= MAX_LENGTH - 1 {
            self.size()
        } else {
            self.size() - 2
        }
    }

    /// True when the two blocks share at least one address.
    pub fn overlaps(&self, other: &Block) -> bool {
        self.base <= other.broadcast() && other.base <= self.broadcast()
    }

    pub fn cidr_text(&self) -> String {
        self.to_string()
    }

    pub fn netmask_text(&self) -> String {
        int_to_address(self.netmask())
    }

    pub fn range_text(&self) -> String {
        format!(
            "{} - {}",
            int_to_address(self.base),
            int_to_address(self.broadcast())
        )
    }

    pub fn usable_range_text(&self) -> String {
        let (first, last) = self.usable_range();
        format!("{} - {}", int_to_address(first), int_to_address(last))
    }

    /// Same address range, ignoring identity and parent link.
    pub fn same_range(&self, other: &Block) -> bool {
        self.base == other.base && self.prefix == other.prefix
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", int_to_address(self.base), self.prefix)
    }
}
