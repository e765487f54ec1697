//! Config for the evaluator behaviors
//!
//! This module provides configuration options for controlling the behavior of the evaluator.
//!
//! Configuration can be created programmatically using [`Configuration::new()`] or by reading
//! environment variables using [`Configuration::from_env()`].
//!
//! # Environment Variables
//!
//! All values are optional. Flags are case-insensitive; set them to `"true"` to enable.
//!
//! - `TOURNAMENT_VERBOSITY`: One of `debug`, `info`, `warning`, `error` (default: `info`)
//! - `TOURNAMENT_LOG_DIR`: Directory receiving one log file per match (default: none)
//! - `TOURNAMENT_CLEAN_LOGS`: Remove old files from the log directory first (default: `true`)
//! - `TOURNAMENT_LOG`: Also write the process log to a file in the log directory (default: `false`)
//! - `TOURNAMENT_PARALLEL`: Number of matches run at the same time (default: `1`)

use std::{fmt::Display, path::PathBuf, str::FromStr};

use anyhow::bail;
use tracing::level_filters::LevelFilter;

/// How much the run tells. `Debug` and `Info` also narrate every move in the match logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Per-move narration, debug output in the process log.
    Debug,
    /// Per-move narration, progress in the process log.
    #[default]
    Info,
    /// Match logs keep faults and results; warnings and errors in the process log.
    Warning,
    /// Match logs keep faults and results; only errors in the process log.
    Error,
}

impl Verbosity {
    /// Whether match logs contain per-move narration.
    pub fn narrates_moves(self) -> bool {
        matches!(self, Verbosity::Debug | Verbosity::Info)
    }

    /// The matching `tracing` filter.
    pub fn level_filter(self) -> LevelFilter {
        match self {
            Verbosity::Debug => LevelFilter::DEBUG,
            Verbosity::Info => LevelFilter::INFO,
            Verbosity::Warning => LevelFilter::WARN,
            Verbosity::Error => LevelFilter::ERROR,
        }
    }
}

impl FromStr for Verbosity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Verbosity::Debug),
            "info" => Ok(Verbosity::Info),
            "warning" | "warn" => Ok(Verbosity::Warning),
            "error" => Ok(Verbosity::Error),
            other => bail!("unknown verbosity '{other}' (expected debug, info, warning or error)"),
        }
    }
}

impl Display for Verbosity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Verbosity::Debug => "debug",
            Verbosity::Info => "info",
            Verbosity::Warning => "warning",
            Verbosity::Error => "error",
        })
    }
}

/// Configuration for evaluator behaviors.
#[derive(Debug, Clone)]
pub struct Configuration {
    pub(crate) verbosity: Verbosity,
    pub(crate) log_dir: Option<PathBuf>,
    pub(crate) clean_log_dir: bool,
    pub(crate) log: bool,
    pub(crate) parallel_matches: usize,
}

impl Configuration {
    /// Create a new configuration with default parameters.
    ///
    /// By default:
    /// - Verbosity is `info`, so match logs narrate every move.
    /// - No match log files are written.
    /// - The log directory, once set, is cleaned before the run.
    /// - The process log is not written to a file.
    /// - Matches run one at a time.
    pub fn new() -> Self {
        Self {
            verbosity: Verbosity::Info,
            log_dir: None,
            clean_log_dir: true,
            log: false,
            parallel_matches: 1,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// See the [module documentation](self) for the recognized variables. Unset variables keep
    /// their default; an unparsable verbosity or parallelism is an error.
    pub fn from_env() -> anyhow::Result<Self> {
        fn get_env_flag(var: &str, default: bool) -> bool {
            match std::env::var(var) {
                Ok(val) => val.eq_ignore_ascii_case("true"),
                Err(_) => default,
            }
        }

        let mut config = Self::new()
            .with_clean_log_dir(get_env_flag("TOURNAMENT_CLEAN_LOGS", true))
            .with_log(get_env_flag("TOURNAMENT_LOG", false));
        if let Ok(level) = std::env::var("TOURNAMENT_VERBOSITY") {
            config = config.with_verbosity(level.parse()?);
        }
        if let Ok(dir) = std::env::var("TOURNAMENT_LOG_DIR") {
            config = config.with_log_dir(dir);
        }
        if let Ok(n) = std::env::var("TOURNAMENT_PARALLEL") {
            let Ok(n) = n.parse::<usize>() else {
                bail!("TOURNAMENT_PARALLEL must be a positive integer, got '{n}'");
            };
            config = config.with_parallel_matches(n);
        }
        Ok(config)
    }

    /// Set the verbosity.
    pub fn with_verbosity(mut self, value: Verbosity) -> Self {
        self.verbosity = value;
        self
    }

    /// Write one log file per match into this directory.
    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    /// Enable or disable removing old files from the log directory before the run.
    pub fn with_clean_log_dir(mut self, value: bool) -> Self {
        self.clean_log_dir = value;
        self
    }

    /// Enable or disable logging to file.
    pub fn with_log(mut self, value: bool) -> Self {
        self.log = value;
        self
    }

    /// Number of matches allowed to run at the same time. `0` is treated as `1`.
    pub fn with_parallel_matches(mut self, value: usize) -> Self {
        self.parallel_matches = value.max(1);
        self
    }

    /// Current verbosity.
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Directory of the match logs, if any.
    pub fn log_dir(&self) -> Option<&std::path::Path> {
        self.log_dir.as_deref()
    }

    /// Whether old files are removed from the log directory before the run.
    pub fn clean_log_dir(&self) -> bool {
        self.clean_log_dir
    }

    /// Whether the process log goes to a file too.
    pub fn log(&self) -> bool {
        self.log
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_parsing() {
        assert_eq!("debug".parse::<Verbosity>().unwrap(), Verbosity::Debug);
        assert_eq!("INFO".parse::<Verbosity>().unwrap(), Verbosity::Info);
        assert_eq!("warning".parse::<Verbosity>().unwrap(), Verbosity::Warning);
        assert_eq!("error".parse::<Verbosity>().unwrap(), Verbosity::Error);
        assert!("loud".parse::<Verbosity>().is_err());
    }

    #[test]
    fn test_narration_levels() {
        assert!(Verbosity::Debug.narrates_moves());
        assert!(Verbosity::Info.narrates_moves());
        assert!(!Verbosity::Warning.narrates_moves());
        assert!(!Verbosity::Error.narrates_moves());
    }

    #[test]
    fn test_builder() {
        let config = Configuration::new()
            .with_verbosity(Verbosity::Error)
            .with_log_dir("/tmp/somewhere")
            .with_parallel_matches(0);
        assert_eq!(config.verbosity(), Verbosity::Error);
        assert_eq!(config.log_dir(), Some(std::path::Path::new("/tmp/somewhere")));
        assert_eq!(config.parallel_matches, 1);
        assert!(config.clean_log_dir);
        assert!(!config.log());
    }
}
