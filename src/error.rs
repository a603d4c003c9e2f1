//! Error taxonomy for the split/merge engine.

use thiserror::Error;

/// Errors returned by address parsing and the block tree engine.
///
/// A failed operation never leaves the engine half-mutated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubnetError {
    /// Text is not a dotted-quad IPv4 address.
    #[error("Invalid address: {0:?}")]
    InvalidAddress(String),

    /// Prefix outside 0..=32, or the address is not the base of a block of that size.
    #[error("Invalid prefix /{prefix}: {reason}")]
    InvalidPrefix { prefix: u8, reason: String },

    /// Block is already a single host.
    #[error("Cannot split {0}: block is a single host")]
    CannotSplit(String),

    /// Merge requested on a root block.
    #[error("Cannot merge {0}: block has no parent")]
    NoParent(String),

    /// Parent bookkeeping is missing for a block that claims one.
    #[error("Parent of {0} not found in hidden set")]
    ParentNotFound(String),

    /// The sibling has been split further and must be merged first.
    #[error("Sibling {0} has been split, merge its children first")]
    SiblingAlreadySplit(String),

    /// Row index does not refer to a visible block.
    #[error("No visible block at index {index} ({visible} visible)")]
    UnknownBlock { index: usize, visible: usize },

    /// Table row (1-based) does not exist.
    #[error("No row {row} in the table ({visible} rows)")]
    UnknownRow { row: usize, visible: usize },

    /// The visible set no longer partitions the root range.
    #[error("Partition broken: {0}")]
    PartitionBroken(String),
}

impl SubnetError {
    /// True for bookkeeping failures that point at a sequencing bug rather than bad input.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            SubnetError::ParentNotFound(_)
                | SubnetError::SiblingAlreadySplit(_)
                | SubnetError::PartitionBroken(_)
        )
    }
}
