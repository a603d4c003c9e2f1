//! JSON output for the visible block table.

use crate::processing::BlockRow;
use std::error::Error;

/// Pretty-printed JSON array of rows.
pub fn rows_to_json(rows: &[BlockRow]) -> Result<String, Box<dyn Error>> {
    serde_json::to_string_pretty(rows).map_err(|e| format!("Error serializing rows: {e}").into())
}

pub fn print_json(rows: &[BlockRow]) -> Result<(), Box<dyn Error>> {
    println!("{}", rows_to_json(rows)?);
    Ok(())
}
