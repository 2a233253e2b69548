//! Environment-based configuration
//!
//! Every command-line argument is forwarded to the test command, so the few
//! knobs autotest has are read from the environment instead:
//! - `AUTOTEST_PROGRAM` - test executable (default: `go`)
//! - `AUTOTEST_SUBCOMMAND` - arguments placed before the forwarded ones (default: `test`)
//! - `AUTOTEST_SUFFIX` - source-file suffix that triggers a run (default: `.go`)
//! - `AUTOTEST_RECURSIVE` - also watch subdirectories (default: `false`)

use crate::change::SuffixFilter;
use thiserror::Error;

pub const PROGRAM_VAR: &str = "AUTOTEST_PROGRAM";
pub const SUBCOMMAND_VAR: &str = "AUTOTEST_SUBCOMMAND";
pub const SUFFIX_VAR: &str = "AUTOTEST_SUFFIX";
pub const RECURSIVE_VAR: &str = "AUTOTEST_RECURSIVE";

const DEFAULT_PROGRAM: &str = "go";
const DEFAULT_SUBCOMMAND: &str = "test";
const DEFAULT_SUFFIX: &str = ".go";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{var} must be a boolean, got '{value}'")]
    InvalidBool { var: &'static str, value: String },
}

/// Watch configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchConfig {
    /// Test executable
    pub program: String,

    /// Arguments placed before the forwarded ones
    pub base_args: Vec<String>,

    /// Suffix a changed path must end with to trigger a run
    pub suffix: String,

    /// Watch subdirectories as well as the root
    pub recursive: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            base_args: vec![DEFAULT_SUBCOMMAND.to_string()],
            suffix: DEFAULT_SUFFIX.to_string(),
            recursive: false,
        }
    }
}

impl WatchConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(program) = lookup(PROGRAM_VAR) {
            let program = program.trim();
            if program.is_empty() {
                return Err(ConfigError::Empty(PROGRAM_VAR));
            }
            config.program = program.to_string();
        }

        if let Some(subcommand) = lookup(SUBCOMMAND_VAR) {
            config.base_args = subcommand.split_whitespace().map(str::to_string).collect();
        }

        if let Some(suffix) = lookup(SUFFIX_VAR) {
            if suffix.is_empty() {
                return Err(ConfigError::Empty(SUFFIX_VAR));
            }
            config.suffix = suffix;
        }

        if let Some(value) = lookup(RECURSIVE_VAR) {
            config.recursive = parse_bool(RECURSIVE_VAR, &value)?;
        }

        Ok(config)
    }

    pub fn filter(&self) -> SuffixFilter {
        SuffixFilter::new(self.suffix.clone())
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            var,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var: &str| vars.get(var).cloned()
    }

    #[test]
    fn test_defaults_run_go_test() {
        let config = WatchConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, WatchConfig::default());
        assert_eq!(config.program, "go");
        assert_eq!(config.base_args, vec!["test".to_string()]);
        assert_eq!(config.suffix, ".go");
        assert!(!config.recursive);
    }

    #[test]
    fn test_overrides() {
        let config = WatchConfig::from_lookup(lookup_from(&[
            (PROGRAM_VAR, "cargo"),
            (SUBCOMMAND_VAR, "test --quiet"),
            (SUFFIX_VAR, ".rs"),
            (RECURSIVE_VAR, "yes"),
        ]))
        .unwrap();

        assert_eq!(config.program, "cargo");
        assert_eq!(config.base_args, vec!["test", "--quiet"]);
        assert_eq!(config.suffix, ".rs");
        assert!(config.recursive);
        assert!(config.filter().matches(std::path::Path::new("src/main.rs")));
    }

    #[test]
    fn test_empty_subcommand_means_no_base_args() {
        let config =
            WatchConfig::from_lookup(lookup_from(&[(SUBCOMMAND_VAR, "  ")])).unwrap();
        assert!(config.base_args.is_empty());
    }

    #[test]
    fn test_empty_program_rejected() {
        let err = WatchConfig::from_lookup(lookup_from(&[(PROGRAM_VAR, " ")])).unwrap_err();
        assert_eq!(err, ConfigError::Empty(PROGRAM_VAR));
        assert_eq!(err.to_string(), "AUTOTEST_PROGRAM must not be empty");
    }

    #[test]
    fn test_empty_suffix_rejected() {
        let err = WatchConfig::from_lookup(lookup_from(&[(SUFFIX_VAR, "")])).unwrap_err();
        assert_eq!(err, ConfigError::Empty(SUFFIX_VAR));
    }

    #[test]
    fn test_invalid_recursive_flag() {
        let err =
            WatchConfig::from_lookup(lookup_from(&[(RECURSIVE_VAR, "sometimes")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBool { var: RECURSIVE_VAR, .. }));
    }
}
