//! Typed failures for result loading and git invocation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Why a single result file contributed nothing to the aggregate.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not decode JSON from {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unexpected JSON structure in {}: {reason}", path.display())]
    Structure { path: PathBuf, reason: String },
}

impl LoadError {
    /// Short label used in per-file diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            LoadError::NotFound { .. } => "not-found",
            LoadError::Io { .. } => "io",
            LoadError::Malformed { .. } => "malformed-json",
            LoadError::Structure { .. } => "structural-mismatch",
        }
    }
}

/// Failure of a single `git` invocation.
#[derive(Debug, Error)]
pub enum GitError {
    #[error("git command not found; ensure git is installed and in your PATH: {0}")]
    Spawn(#[source] io::Error),
    #[error("'git {command}' failed: {stderr}")]
    Failed {
        command: String,
        stdout: String,
        stderr: String,
    },
    #[error("clone failed: {0}")]
    Clone(#[from] git2::Error),
}

impl GitError {
    /// Combined lowercase output of a failed command, for message matching.
    pub fn output_lower(&self) -> String {
        match self {
            GitError::Failed { stdout, stderr, .. } => {
                format!("{}\n{}", stdout, stderr).to_lowercase()
            }
            other => other.to_string().to_lowercase(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_kind() {
        let err = LoadError::Structure {
            path: PathBuf::from("a.json"),
            reason: "expected an array".to_string(),
        };
        assert_eq!(err.kind(), "structural-mismatch");
        assert!(err.to_string().contains("a.json"));
        assert!(err.to_string().contains("expected an array"));
    }

    #[test]
    fn test_git_error_output_lower() {
        let err = GitError::Failed {
            command: "push".to_string(),
            stdout: String::new(),
            stderr: "! [rejected] main -> main (Non-Fast-Forward)".to_string(),
        };
        assert!(err.output_lower().contains("non-fast-forward"));
        assert!(err.to_string().contains("'git push' failed"));
    }
}
