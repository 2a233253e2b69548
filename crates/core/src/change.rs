//! Change model shared by the watcher and the aggregator

use std::fmt;
use std::path::{Path, PathBuf};

/// Type of file system change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// File created
    Created,
    /// File deleted
    Removed,
    /// File contents or metadata modified
    Modified,
    /// File renamed
    Renamed,
    /// The backend could not classify the change
    Unknown,
}

impl ChangeKind {
    /// Human-readable descriptor used in log lines
    ///
    /// `Unknown` has an empty descriptor.
    pub fn descriptor(self) -> &'static str {
        match self {
            ChangeKind::Created => "created",
            ChangeKind::Removed => "removed",
            ChangeKind::Modified => "modified",
            ChangeKind::Renamed => "renamed",
            ChangeKind::Unknown => "",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.descriptor())
    }
}

/// A change recorded for one path during a debounce cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingChange {
    /// Path relative to the watched root (absolute if it lies outside it)
    pub path: PathBuf,
    /// Most recent kind reported for this path
    pub kind: ChangeKind,
}

impl fmt::Display for PendingChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.path.display())
    }
}

/// Resolve `path` relative to `root`
///
/// Paths outside `root` are returned unchanged.
pub fn relative_to(root: &Path, path: &Path) -> PathBuf {
    match path.strip_prefix(root) {
        Ok(rel) => rel.to_path_buf(),
        Err(_) => path.to_path_buf(),
    }
}

/// Decides whether a changed path is a source file worth re-testing for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixFilter {
    suffix: String,
}

impl SuffixFilter {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// True if the path ends with the configured suffix
    pub fn matches(&self, path: &Path) -> bool {
        path.to_string_lossy().ends_with(self.suffix.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptors() {
        assert_eq!(ChangeKind::Created.to_string(), "created");
        assert_eq!(ChangeKind::Removed.to_string(), "removed");
        assert_eq!(ChangeKind::Modified.to_string(), "modified");
        assert_eq!(ChangeKind::Renamed.to_string(), "renamed");
        assert_eq!(ChangeKind::Unknown.to_string(), "");
    }

    #[test]
    fn test_pending_change_display() {
        let change = PendingChange {
            path: PathBuf::from("main.go"),
            kind: ChangeKind::Modified,
        };
        assert_eq!(change.to_string(), "modified main.go");

        // Unclassified changes keep the separator, just no descriptor
        let change = PendingChange {
            path: PathBuf::from("pkg/util.go"),
            kind: ChangeKind::Unknown,
        };
        assert_eq!(change.to_string(), " pkg/util.go");
    }

    #[test]
    fn test_relative_to_inside_root() {
        let root = Path::new("/work/project");
        assert_eq!(
            relative_to(root, Path::new("/work/project/main.go")),
            PathBuf::from("main.go")
        );
        assert_eq!(
            relative_to(root, Path::new("/work/project/pkg/util.go")),
            PathBuf::from("pkg/util.go")
        );
    }

    #[test]
    fn test_relative_to_falls_back_to_given_path() {
        let root = Path::new("/work/project");
        assert_eq!(
            relative_to(root, Path::new("/elsewhere/main.go")),
            PathBuf::from("/elsewhere/main.go")
        );
    }

    #[test]
    fn test_suffix_filter() {
        let filter = SuffixFilter::new(".go");
        assert!(filter.matches(Path::new("main.go")));
        assert!(filter.matches(Path::new("pkg/handler_test.go")));
        assert!(!filter.matches(Path::new("README.md")));
        assert!(!filter.matches(Path::new("go.mod")));
        assert!(!filter.matches(Path::new("main.go.swp")));
    }

    #[test]
    fn test_suffix_filter_is_plain_suffix() {
        // No extension parsing: anything ending in the suffix counts
        let filter = SuffixFilter::new(".rs");
        assert!(filter.matches(Path::new("src/lib.rs")));
        assert!(filter.matches(Path::new("weird.tar.rs")));
        assert!(!filter.matches(Path::new("src/lib.rsx")));
    }
}
