//! The seam between the updater and the version-control tool.

use super::cloner::{self, CloneOptions};
use super::credentials::Credentials;
use crate::errors::GitError;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Operations the repository updater needs from git.
pub trait GitBackend {
    fn is_repository(&self, path: &Path) -> bool;

    fn clone_repo(&self, url: &str, target: &Path, branch: &str) -> Result<(), GitError>;

    /// `git pull <remote> <branch>`.
    fn pull(&self, repo: &Path, remote: &str, branch: &str) -> Result<(), GitError>;

    /// `git pull <remote> <branch> --rebase`.
    fn pull_rebase(&self, repo: &Path, remote: &str, branch: &str) -> Result<(), GitError>;

    /// Stage every change in the working tree.
    fn add_all(&self, repo: &Path) -> Result<(), GitError>;

    fn commit(&self, repo: &Path, message: &str) -> Result<(), GitError>;

    fn push(&self, repo: &Path, remote: &str, branch: &str, force: bool) -> Result<(), GitError>;
}

/// [`GitBackend`] backed by the `git` executable, with git2 for cloning.
#[derive(Debug, Clone)]
pub struct GitCli {
    credentials: Credentials,
    show_progress: bool,
}

impl GitCli {
    pub fn new(credentials: Credentials, show_progress: bool) -> Self {
        Self {
            credentials,
            show_progress,
        }
    }

    fn run(&self, repo: &Path, args: &[&str]) -> Result<String, GitError> {
        let command_line = self.credentials.redact(&args.join(" "));
        debug!("Executing 'git {}' in {}", command_line, repo.display());

        let output = Command::new("git")
            .args(args)
            .current_dir(repo)
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .map_err(GitError::Spawn)?;

        let stdout = self.credentials.redact(&String::from_utf8_lossy(&output.stdout));
        let stderr = self.credentials.redact(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            return Err(GitError::Failed {
                command: command_line,
                stdout,
                stderr: stderr.trim().to_string(),
            });
        }

        debug!("'git {}' successful.", command_line);
        Ok(stdout)
    }
}

impl GitBackend for GitCli {
    fn is_repository(&self, path: &Path) -> bool {
        cloner::is_repository(path)
    }

    fn clone_repo(&self, url: &str, target: &Path, branch: &str) -> Result<(), GitError> {
        let options = CloneOptions {
            branch: Some(branch.to_string()),
            show_progress: self.show_progress,
            credentials: Some(self.credentials.clone()),
            ..CloneOptions::default()
        };
        cloner::clone_repository(url, target, options).map(|_| ())
    }

    fn pull(&self, repo: &Path, remote: &str, branch: &str) -> Result<(), GitError> {
        self.run(repo, &["pull", remote, branch]).map(|_| ())
    }

    fn pull_rebase(&self, repo: &Path, remote: &str, branch: &str) -> Result<(), GitError> {
        self.run(repo, &["pull", remote, branch, "--rebase"]).map(|_| ())
    }

    fn add_all(&self, repo: &Path) -> Result<(), GitError> {
        self.run(repo, &["add", "-A"]).map(|_| ())
    }

    fn commit(&self, repo: &Path, message: &str) -> Result<(), GitError> {
        self.run(repo, &["commit", "-m", message]).map(|_| ())
    }

    fn push(&self, repo: &Path, remote: &str, branch: &str, force: bool) -> Result<(), GitError> {
        let mut args = vec!["push", remote, branch];
        if force {
            args.push("--force");
        }
        self.run(repo, &args).map(|_| ())
    }
}
