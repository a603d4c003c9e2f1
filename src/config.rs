//! Runtime configuration read from the environment (and `.env` via dotenv).

use crate::models::MAX_LENGTH;
use crate::processing::MIN_OPTION_PREFIX;
use std::error::Error;
use std::path::PathBuf;
use std::str::FromStr;

pub const ENV_LOG_CONFIG: &str = "SUBNET_PLANNER_LOG_CONFIG";
pub const ENV_MIN_PREFIX: &str = "SUBNET_PLANNER_MIN_PREFIX";
pub const ENV_OUTPUT: &str = "SUBNET_PLANNER_OUTPUT";

/// Table rendering used by `show`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl FromStr for OutputFormat {
    type Err = Box<dyn Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("Unknown output format {other:?}, expected csv or json").into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// log4rs YAML file.
    pub log_config: PathBuf,
    /// Shortest prefix offered for `go`.
    pub min_prefix: u8,
    pub output: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_config: PathBuf::from("log4rs.yml"),
            min_prefix: MIN_OPTION_PREFIX,
            output: OutputFormat::Csv,
        }
    }
}

impl Config {
    /// Read the process environment. Call `dotenv::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Config, Box<dyn Error>> {
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, Box<dyn Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        if let Some(path) = lookup(ENV_LOG_CONFIG) {
            config.log_config = PathBuf::from(path);
        }
        if let Some(value) = lookup(ENV_MIN_PREFIX) {
            let min_prefix: u8 = value
                .trim()
                .parse()
                .map_err(|_| format!("{ENV_MIN_PREFIX}={value:?} is not a number"))?;
            if min_prefix > MAX_LENGTH {
                return Err(format!("{ENV_MIN_PREFIX}={min_prefix} is longer than /{MAX_LENGTH}").into());
            }
            config.min_prefix = min_prefix;
        }
        if let Some(value) = lookup(ENV_OUTPUT) {
            config.output = value.parse()?;
        }
        Ok(config)
    }
}
