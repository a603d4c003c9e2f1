//! Interactive session: applies parsed commands to one partition.

use crate::cmd::{Command, USAGE};
use crate::config::{Config, OutputFormat};
use crate::error::SubnetError;
use crate::models::address_to_int;
use crate::output::format_options;
use crate::processing::{enumerate_aligned_prefixes_from, is_offered_prefix, PartitionState};

/// What the caller should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Lines(Vec<String>),
    /// Print the visible table in the given format.
    Table(OutputFormat),
    Quit,
}

#[derive(Debug, Default)]
pub struct Session {
    pub state: PartitionState,
    pub config: Config,
}

impl Session {
    pub fn new(config: Config) -> Session {
        Session {
            state: PartitionState::new(),
            config,
        }
    }

    /// Apply one command.
    ///
    /// Bookkeeping failures reset the partition before the error is returned.
    pub fn execute(&mut self, command: Command) -> Result<Reply, SubnetError> {
        log::debug!("execute {:?}", command);
        let result = self.apply(command);
        if let Err(e) = &result {
            if e.is_internal() {
                log::error!("{e}, resetting partition");
                self.state.reset();
            } else {
                log::warn!("{e}");
            }
        }
        result
    }

    fn apply(&mut self, command: Command) -> Result<Reply, SubnetError> {
        let table = Reply::Table(self.config.output);
        match command {
            Command::Options(address) => {
                let options = enumerate_aligned_prefixes_from(&address, self.config.min_prefix);
                Ok(Reply::Lines(format_options(&address, &options)))
            }
            Command::Go { address, prefix } => {
                address_to_int(&address)?;
                if !is_offered_prefix(&address, prefix, self.config.min_prefix) {
                    return Err(SubnetError::InvalidPrefix {
                        prefix,
                        reason: format!(
                            "not offered for {address}, see 'options {address}'"
                        ),
                    });
                }
                self.state.compute_block(&address, prefix)?;
                Ok(table)
            }
            Command::Split(row) => {
                let index = self.row_index(row)?;
                self.state.split(index).map_err(|e| self.row_error(e))?;
                Ok(table)
            }
            Command::Merge(row) => {
                let index = self.row_index(row)?;
                self.state.merge(index).map_err(|e| self.row_error(e))?;
                Ok(table)
            }
            Command::Show(format) => Ok(Reply::Table(format.unwrap_or(self.config.output))),
            Command::Check => {
                self.state.check_partition()?;
                Ok(Reply::Lines(vec![format!(
                    "ok: {} visible, {} hidden",
                    self.state.len(),
                    self.state.hidden_len()
                )]))
            }
            Command::Reset => {
                self.state.reset();
                Ok(Reply::Lines(vec!["reset".to_string()]))
            }
            Command::Help => Ok(Reply::Lines(USAGE.iter().map(|s| s.to_string()).collect())),
            Command::Quit => Ok(Reply::Quit),
        }
    }

    /// 1-based table row to 0-based engine index.
    fn row_index(&self, row: usize) -> Result<usize, SubnetError> {
        row.checked_sub(1).ok_or(SubnetError::UnknownRow {
            row,
            visible: self.state.len(),
        })
    }

    /// Report engine indices as the row numbers the user typed.
    fn row_error(&self, e: SubnetError) -> SubnetError {
        match e {
            SubnetError::UnknownBlock { index, visible } => SubnetError::UnknownRow {
                row: index + 1,
                visible,
            },
            other => other,
        }
    }
}
