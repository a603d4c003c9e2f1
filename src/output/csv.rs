//! CSV output formatting for the visible block table.

use super::terminal::format_field;
use crate::processing::BlockRow;

/// Header line matching [`format_csv_row`] column widths.
pub fn csv_header() -> String {
    [
        format_field("cnt", 5),
        format_field("cidr", 20),
        format_field("netmask", 17),
        format_field("range", 33),
        format_field("usable_range", 33),
        format_field("hosts", 12),
        format_field("parent", 8),
    ]
    .join(",")
}

/// Format a single CSV row.
pub fn format_csv_row(row: &BlockRow) -> String {
    let parent = row
        .parent
        .map(|p| p.to_string())
        .unwrap_or_else(|| "root".to_string());
    [
        format_field(row.index, 5),
        format_field(format!("{}{}", " ".repeat(row.depth as usize), row.cidr), 20),
        format_field(&row.netmask, 17),
        format_field(&row.range, 33),
        format_field(&row.usable_range, 33),
        format_field(row.hosts, 12),
        format_field(parent, 8),
    ]
    .join(",")
}

/// Print the table to stdout, header first.
pub fn print_csv(rows: &[BlockRow]) {
    log::debug!("print_csv: {} rows", rows.len());
    println!("{}", csv_header());
    for row in rows {
        println!("{}", format_csv_row(row));
    }
}
