//! Result file discovery.
//!
//! This module lists a results directory and routes each JSON file to the
//! loader that understands its shape.

pub mod seed;

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Suffix that marks a history file.
pub const HISTORY_SUFFIX: &str = "_history.json";

/// Which loader a file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    History,
    Other,
}

impl FileKind {
    /// Classify a file name, or `None` for non-JSON files.
    pub fn classify(name: &str) -> Option<Self> {
        if name.ends_with(HISTORY_SUFFIX) {
            Some(FileKind::History)
        } else if name.ends_with(".json") {
            Some(FileKind::Other)
        } else {
            None
        }
    }
}

/// Files found in a results directory, each list sorted by file name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscoveredFiles {
    pub history: Vec<PathBuf>,
    pub other: Vec<PathBuf>,
    /// Directory entries that could not be read.
    pub unreadable: usize,
}

impl DiscoveredFiles {
    /// Route one directory entry to its list.
    fn add_entry(&mut self, entry: io::Result<PathBuf>) {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                warn!("Could not read directory entry: {}. Skipping.", e);
                self.unreadable += 1;
                return;
            }
        };

        if !path.is_file() {
            debug!("Ignoring non-file entry: {}", path.display());
            return;
        }

        let name = match path.file_name() {
            Some(name) => name.to_string_lossy().to_string(),
            None => return,
        };
        match FileKind::classify(&name) {
            Some(FileKind::History) => self.history.push(path),
            Some(FileKind::Other) => self.other.push(path),
            None => debug!("Ignoring non-JSON file: {}", name),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty() && self.other.is_empty()
    }

    pub fn total(&self) -> usize {
        self.history.len() + self.other.len()
    }
}

/// Scanner over a single, non-recursive results directory.
pub struct ResultScanner {
    root: PathBuf,
}

impl ResultScanner {
    /// Create a scanner, failing if `root` is missing or not a directory.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.exists() {
            anyhow::bail!("Directory not found at path: {}", root.display());
        }
        if !root.is_dir() {
            anyhow::bail!("Path is not a directory: {}", root.display());
        }

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List regular files directly under the root and split them by kind.
    pub fn scan(&self) -> Result<DiscoveredFiles> {
        let entries = fs::read_dir(&self.root)
            .with_context(|| format!("Failed to list directory: {}", self.root.display()))?;

        let mut found = DiscoveredFiles::default();

        for entry in entries {
            found.add_entry(entry.map(|e| e.path()));
        }

        found.history.sort();
        found.other.sort();

        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_classify() {
        assert_eq!(FileKind::classify("AAPL_history.json"), Some(FileKind::History));
        assert_eq!(FileKind::classify("_history.json"), Some(FileKind::History));
        assert_eq!(FileKind::classify("info.json"), Some(FileKind::Other));
        assert_eq!(FileKind::classify("history.json"), Some(FileKind::Other));
        assert_eq!(FileKind::classify("notes.txt"), None);
        assert_eq!(FileKind::classify("data.json.bak"), None);
    }

    #[test]
    fn test_scan_splits_and_sorts() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["b_history.json", "a_history.json", "z.json", "m.json", "readme.md"] {
            std::fs::write(temp_dir.path().join(name), "{}").unwrap();
        }
        std::fs::create_dir(temp_dir.path().join("nested_history.json")).unwrap();

        let scanner = ResultScanner::new(temp_dir.path()).unwrap();
        let found = scanner.scan().unwrap();

        let names = |paths: &[PathBuf]| -> Vec<String> {
            paths
                .iter()
                .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
                .collect()
        };

        assert_eq!(names(&found.history), vec!["a_history.json", "b_history.json"]);
        assert_eq!(names(&found.other), vec!["m.json", "z.json"]);
        assert_eq!(found.total(), 4);
    }

    #[test]
    fn test_unreadable_entry_is_counted() {
        let temp_dir = TempDir::new().unwrap();
        let good = temp_dir.path().join("a_history.json");
        std::fs::write(&good, "{}").unwrap();

        let mut found = DiscoveredFiles::default();
        found.add_entry(Err(io::Error::new(io::ErrorKind::NotFound, "vanished")));
        found.add_entry(Ok(temp_dir.path().join("gone.json")));
        found.add_entry(Ok(good.clone()));

        assert_eq!(found.unreadable, 1);
        assert_eq!(found.history, vec![good]);
        assert!(found.other.is_empty());
    }

    #[test]
    fn test_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        assert!(ResultScanner::new(temp_dir.path().join("nope")).is_err());

        let file = temp_dir.path().join("file.json");
        std::fs::write(&file, "[]").unwrap();
        assert!(ResultScanner::new(&file).is_err());
    }

    #[test]
    fn test_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let found = ResultScanner::new(temp_dir.path()).unwrap().scan().unwrap();
        assert!(found.is_empty());
    }
}
