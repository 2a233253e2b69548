//! notify-backed event source
//!
//! The backend callback runs on notify's own thread. It splits results into
//! two unbounded channels (changes and errors) so nothing blocks the backend
//! while a test run holds up the aggregator; notifications simply queue.

use autotest_core::ChangeKind;
use notify::event::ModifyKind;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, trace};

/// File system change for a single absolute path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    /// Path that changed
    pub path: PathBuf,
    /// Type of change
    pub kind: ChangeKind,
}

/// Error reported by the notification backend while watching
#[derive(Error, Debug)]
#[error(transparent)]
pub struct WatchError(#[from] pub notify::Error);

/// Failure to set up watching
#[derive(Error, Debug)]
pub enum WatcherError {
    #[error("failed to initialize file watcher")]
    Init(#[source] notify::Error),

    #[error("failed to watch {}", path.display())]
    Watch {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },
}

/// Receiving ends of the change and error streams
pub struct WatchStreams {
    pub events: UnboundedReceiver<WatchEvent>,
    pub errors: UnboundedReceiver<WatchError>,
}

/// Watch handle for a root directory
///
/// Watching stops when the handle is dropped.
pub struct FsWatcher {
    root: PathBuf,
    inner: RecommendedWatcher,
}

impl FsWatcher {
    /// Start watching `root`
    ///
    /// If registration fails the partially created backend is dropped before
    /// the error is returned.
    pub fn new(root: &Path, recursive: bool) -> Result<(Self, WatchStreams), WatcherError> {
        let (event_tx, events) = mpsc::unbounded_channel();
        let (error_tx, errors) = mpsc::unbounded_channel();

        let mut inner = RecommendedWatcher::new(
            move |res: notify::Result<Event>| dispatch(res, &event_tx, &error_tx),
            Config::default(),
        )
        .map_err(WatcherError::Init)?;

        let mode = if recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        inner
            .watch(root, mode)
            .map_err(|source| WatcherError::Watch {
                path: root.to_path_buf(),
                source,
            })?;

        debug!("Watching {} ({:?})", root.display(), mode);

        let watcher = Self {
            root: root.to_path_buf(),
            inner,
        };
        Ok((watcher, WatchStreams { events, errors }))
    }

    #[cfg(test)]
    pub(crate) fn root(&self) -> &Path {
        &self.root
    }
}

impl Drop for FsWatcher {
    fn drop(&mut self) {
        match self.inner.unwatch(&self.root) {
            Ok(()) => info!("Stopped watching {}", self.root.display()),
            Err(e) => debug!("Unwatch of {} failed: {}", self.root.display(), e),
        }
    }
}

/// Route one backend result into the change or error stream
///
/// Send failures mean the aggregator has gone away; the result is dropped.
fn dispatch(
    res: notify::Result<Event>,
    event_tx: &UnboundedSender<WatchEvent>,
    error_tx: &UnboundedSender<WatchError>,
) {
    match res {
        Ok(event) => {
            for change in translate(&event) {
                let _ = event_tx.send(change);
            }
        }
        Err(err) => {
            let _ = error_tx.send(WatchError(err));
        }
    }
}

/// Split a backend event into one change per path
///
/// Renames with both paths yield a change for each side.
pub fn translate(event: &Event) -> Vec<WatchEvent> {
    let Some(kind) = classify(&event.kind) else {
        trace!("Ignoring {:?} for {:?}", event.kind, event.paths);
        return Vec::new();
    };

    event
        .paths
        .iter()
        .map(|path| WatchEvent {
            path: path.clone(),
            kind,
        })
        .collect()
}

/// Map a backend event kind onto a change kind
///
/// Access notifications (open, read, close) are not changes and yield `None`.
pub fn classify(kind: &EventKind) -> Option<ChangeKind> {
    match kind {
        EventKind::Create(_) => Some(ChangeKind::Created),
        EventKind::Remove(_) => Some(ChangeKind::Removed),
        EventKind::Modify(ModifyKind::Name(_)) => Some(ChangeKind::Renamed),
        EventKind::Modify(_) => Some(ChangeKind::Modified),
        EventKind::Access(_) => None,
        EventKind::Any | EventKind::Other => Some(ChangeKind::Unknown),
    }
}
