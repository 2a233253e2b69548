//! Core types for autotest
//!
//! This crate provides:
//! - The change model (kinds, pending changes, relative path resolution)
//! - Source-file suffix filtering
//! - Environment-based configuration
//! - The command runner that executes the test command

pub mod change;
pub mod config;
pub mod runner;

use std::time::Duration;

// Re-exports
pub use change::{relative_to, ChangeKind, PendingChange, SuffixFilter};
pub use config::{ConfigError, WatchConfig};
pub use runner::{CommandRunner, RunError, TestRunner};

/// Quiet period that must elapse after the last change before tests run.
pub const DEBOUNCE_PERIOD: Duration = Duration::from_secs(2);
