//! File system watching for autotest
//!
//! This crate provides:
//! - A notify-backed event source split into change and error streams
//! - A rearmable debounce timer
//! - Per-path event coalescing
//! - The aggregator loop that decides when to re-run tests

pub mod aggregator;
pub mod coalesce;
pub mod debounce;
pub mod source;

pub use aggregator::Aggregator;
pub use coalesce::PendingBuffer;
pub use debounce::DebounceTimer;
pub use source::{FsWatcher, WatchError, WatchEvent, WatchStreams, WatcherError};
