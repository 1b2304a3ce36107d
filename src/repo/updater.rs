//! Clone-or-pull, write info files, commit and push.
//!
//! A push rejected as non-fast-forward is retried once as
//! `pull --rebase` followed by a force push.

use super::credentials::{https_url, Credentials};
use super::git::GitBackend;
use crate::config::SyncConfig;
use crate::errors::GitError;
use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Push failure text that triggers the rebase-and-force fallback.
const REJECTION_MARKERS: &[&str] = &["non-fast-forward", "rejected", "failed to push some refs"];

/// Commit output meaning there was nothing new to record.
const NOTHING_TO_COMMIT_MARKERS: &[&str] = &["nothing to commit", "no changes added to commit"];

/// How the commit-and-push step ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// The working tree had no changes; nothing was pushed.
    NothingToCommit,
    /// The first push succeeded.
    Pushed,
    /// The first push was rejected and the rebased branch was force-pushed.
    ForcePushed,
}

/// Drives a [`GitBackend`] through one update run.
pub struct RepoUpdater<G: GitBackend> {
    git: G,
    settings: SyncConfig,
    clone_url: String,
    authenticated_url: String,
}

impl<G: GitBackend> RepoUpdater<G> {
    pub fn new(git: G, settings: SyncConfig) -> Self {
        let credentials = Credentials::new(settings.username.clone(), settings.token.clone());
        let authenticated_url = credentials.authenticated_url(&settings.repo_url);
        // Cloning authenticates through the backend, not the URL.
        let clone_url = https_url(&settings.repo_url);
        Self {
            git,
            settings,
            clone_url,
            authenticated_url,
        }
    }

    pub fn local_path(&self) -> &Path {
        &self.settings.local_path
    }

    pub fn output_dir(&self) -> PathBuf {
        self.settings.local_path.join(&self.settings.output_dir)
    }

    /// Pull when the local path is already a repository, clone when it is missing.
    pub fn clone_or_pull(&self) -> Result<()> {
        let local = self.local_path();

        if local.exists() {
            if !self.git.is_repository(local) {
                anyhow::bail!(
                    "Path '{}' exists but is not a git repository",
                    local.display()
                );
            }
            info!(
                "Path '{}' exists and is a git repository. Pulling...",
                local.display()
            );
            self.git
                .pull(local, &self.authenticated_url, &self.settings.branch)
                .with_context(|| format!("Failed to pull repository in '{}'", local.display()))?;
            info!("Successfully pulled repository in '{}'.", local.display());
        } else {
            info!(
                "Path '{}' does not exist. Cloning {}...",
                local.display(),
                self.clone_url
            );
            self.git
                .clone_repo(&self.clone_url, local, &self.settings.branch)
                .with_context(|| format!("Failed to clone {}", self.clone_url))?;
        }

        Ok(())
    }

    /// Write `info1.txt..infoN.txt` stamped with the current local time.
    pub fn create_info_files(&self) -> Result<Vec<PathBuf>> {
        self.create_info_files_at(Local::now().naive_local())
    }

    /// Write the info files with an explicit timestamp.
    pub fn create_info_files_at(&self, now: NaiveDateTime) -> Result<Vec<PathBuf>> {
        let output_dir = self.output_dir();
        std::fs::create_dir_all(&output_dir).with_context(|| {
            format!("Failed to create output directory {}", output_dir.display())
        })?;
        info!("Ensured output directory exists: '{}'", output_dir.display());

        let timestamp = now.format("%Y-%m-%d %H:%M:%S").to_string();
        let mut written = Vec::with_capacity(self.settings.file_count);

        for i in 1..=self.settings.file_count {
            let path = output_dir.join(format!("info{}.txt", i));
            std::fs::write(&path, &timestamp)
                .with_context(|| format!("Error writing to file '{}'", path.display()))?;
            info!("File '{}' written with timestamp {}", path.display(), timestamp);
            written.push(path);
        }

        Ok(written)
    }

    /// Stage, commit and push, falling back to rebase and force push on rejection.
    pub fn commit_and_push(&self) -> Result<PushOutcome> {
        let local = self.local_path();
        let branch = &self.settings.branch;

        if !self.git.is_repository(local) {
            anyhow::bail!("'{}' is not a git repository", local.display());
        }

        self.git.add_all(local).context("Error during 'git add'")?;

        if let Err(e) = self.git.commit(local, &self.settings.commit_message) {
            if matches_any(&e, NOTHING_TO_COMMIT_MARKERS) {
                info!("No changes to commit.");
                return Ok(PushOutcome::NothingToCommit);
            }
            return Err(e).context("Error during 'git commit'");
        }
        info!("Committed: {}", self.settings.commit_message);

        match self.git.push(local, &self.authenticated_url, branch, false) {
            Ok(()) => {
                info!("Pushed to {}.", branch);
                Ok(PushOutcome::Pushed)
            }
            Err(e) if matches_any(&e, REJECTION_MARKERS) => {
                warn!("Push rejected: {}", e);
                warn!("Attempting to pull with rebase and force push...");

                self.git
                    .pull_rebase(local, &self.authenticated_url, branch)
                    .context("Error during 'git pull --rebase'")?;
                self.git
                    .push(local, &self.authenticated_url, branch, true)
                    .context("Error during 'git push --force'")?;

                info!("Force-pushed rebased {}.", branch);
                Ok(PushOutcome::ForcePushed)
            }
            Err(e) => Err(e).context("Error during 'git push'"),
        }
    }

    /// Run every step in order; the first failure aborts the run.
    pub fn run(&self) -> Result<PushOutcome> {
        info!("Starting repository update process...");

        self.clone_or_pull()
            .context("Failed to clone or pull repository")?;
        self.create_info_files()
            .context("Failed to create info files")?;
        let outcome = self
            .commit_and_push()
            .context("Failed to commit and push changes")?;

        info!("Repository update process completed.");
        Ok(outcome)
    }
}

fn matches_any(error: &GitError, markers: &[&str]) -> bool {
    let output = error.output_lower();
    markers.iter().any(|m| output.contains(m))
}
