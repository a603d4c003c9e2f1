//! Output formatting for the block table.
//!
//! - [`csv`] - quoted CSV rows
//! - [`json`] - serde_json rendering
//! - [`terminal`] - field and option helpers

pub mod csv;
pub mod json;
pub mod terminal;

pub use csv::{csv_header, format_csv_row, print_csv};
pub use json::{print_json, rows_to_json};
pub use terminal::{format_field, format_options};
