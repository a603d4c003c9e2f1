//! Split and merge IPv4 subnet blocks while keeping an exact partition of
//! the original allocation.

pub mod cmd;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod processing;
pub mod shell;

pub use error::SubnetError;
pub use processing::{enumerate_aligned_prefixes, BlockRow, CidrOption, PartitionState};
