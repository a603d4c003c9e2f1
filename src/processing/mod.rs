//! Subnet processing logic.
//!
//! - [`options`] - prefixes at which an address is a network address
//! - [`partition`] - split/merge engine over a root block

pub mod options;
pub mod partition;

// Re-export public functions
pub use options::{
    enumerate_aligned_prefixes, enumerate_aligned_prefixes_from, is_offered_prefix, CidrOption,
    MIN_OPTION_PREFIX,
};
pub use partition::{BlockRow, PartitionState};
