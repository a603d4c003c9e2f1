//! Terminal output utilities.

use crate::processing::CidrOption;
use colored::Colorize;

/// Format a value as a quoted, right-aligned field.
///
/// Values longer than `width` are never truncated.
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let quoted = format!("\"{}\"", value.to_string());
    format!("{quoted:>width$}")
}

/// One line per prefix option, e.g. `/24  192.168.1.0 - 192.168.1.255  254 usable`.
pub fn format_options(address: &str, options: &[CidrOption]) -> Vec<String> {
    if options.is_empty() {
        return vec![format!("{} no aligned prefixes for {address:?}", "!".red())];
    }
    options
        .iter()
        .map(|o| {
            format!(
                "{label:>4}  {first} - {last}  {usable} usable",
                label = o.label.green(),
                first = o.first,
                last = o.last,
                usable = o.usable_addresses
            )
        })
        .collect()
}
