//! Command line parsing for the interactive shell.

use crate::config::OutputFormat;
use regex::Regex;
use std::error::Error;
use std::sync::OnceLock;

/// Regex for splitting command strings while preserving quoted substrings.
static COMMAND_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_command_regex() -> &'static Regex {
    COMMAND_REGEX.get_or_init(|| {
        Regex::new(r#"'([^']*)'\s*|\"([^\"]*)\"\s*|([^'\s]*)\s*"#).expect("Invalid Regex")
    })
}

/// Split a command string on spaces, preserving quoted substrings.
fn split_and_strip(input: &str) -> Vec<&str> {
    get_command_regex()
        .find_iter(input.trim())
        .map(|m| m.as_str().trim().trim_matches('\'').trim_matches('"'))
        .collect()
}

/// One shell command. Row numbers are 1-based as printed in the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Options(String),
    Go { address: String, prefix: u8 },
    Split(usize),
    Merge(usize),
    /// `None` uses the configured format.
    Show(Option<OutputFormat>),
    Check,
    Reset,
    Help,
    Quit,
}

pub const USAGE: &[&str] = &[
    "options <addr>          list prefixes at which <addr> is a network address",
    "go <addr> <prefix>      start a new partition (also: go <addr>/<prefix>)",
    "split <row>             split the block at <row> in half",
    "merge <row>             merge the block at <row> with its sibling",
    "show | csv | json       print the visible blocks",
    "check                   verify the partition",
    "reset                   drop all blocks",
    "help                    this text",
    "quit | exit             leave",
];

/// Parse one input line. Blank lines and `#` comments give `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, Box<dyn Error>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let tokens = split_and_strip(line);
    log::trace!("parse_command tokens={:?}", tokens);

    let (name, args) = match tokens.split_first() {
        Some((name, args)) => (name.to_ascii_lowercase(), args),
        None => return Ok(None),
    };

    let command = match (name.as_str(), args) {
        ("options", [address]) => Command::Options(address.to_string()),
        ("go", [cidr]) => {
            let (address, prefix) = cidr
                .split_once('/')
                .ok_or_else(|| format!("Expected <addr>/<prefix>, got {cidr:?}"))?;
            Command::Go {
                address: address.to_string(),
                prefix: parse_prefix(prefix)?,
            }
        }
        ("go", [address, prefix]) => Command::Go {
            address: address.to_string(),
            prefix: parse_prefix(prefix.trim_start_matches('/'))?,
        },
        ("split", [row]) => Command::Split(parse_row(row)?),
        ("merge", [row]) => Command::Merge(parse_row(row)?),
        ("show", []) => Command::Show(None),
        ("csv", []) => Command::Show(Some(OutputFormat::Csv)),
        ("json", []) => Command::Show(Some(OutputFormat::Json)),
        ("check", []) => Command::Check,
        ("reset", []) => Command::Reset,
        ("help", []) | ("?", []) => Command::Help,
        ("quit", []) | ("exit", []) => Command::Quit,
        _ => return Err(format!("Unknown command {line:?}, try 'help'").into()),
    };
    Ok(Some(command))
}

fn parse_prefix(text: &str) -> Result<u8, Box<dyn Error>> {
    text.parse()
        .map_err(|_| format!("Invalid prefix {text:?}").into())
}

fn parse_row(text: &str) -> Result<usize, Box<dyn Error>> {
    match text.parse::<usize>() {
        Ok(0) => Err("Rows are numbered from 1".into()),
        Ok(row) => Ok(row),
        Err(_) => Err(format!("Invalid row number {text:?}").into()),
    }
}
