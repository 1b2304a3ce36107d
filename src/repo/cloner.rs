//! Git repository cloning functionality.
//!
//! This module clones the shard repository into its configured local path
//! using the git2 library, authenticating with a username and token.

use super::credentials::Credentials;
use crate::errors::GitError;
use git2::{Cred, FetchOptions, Progress, RemoteCallbacks, Repository};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Options for cloning a repository.
#[derive(Debug, Clone)]
pub struct CloneOptions {
    /// Branch to checkout (None for default branch).
    pub branch: Option<String>,
    /// Depth for shallow clone (None for full clone).
    pub depth: Option<i32>,
    /// Whether to show progress.
    pub show_progress: bool,
    /// HTTPS credentials, if the remote needs them.
    pub credentials: Option<Credentials>,
}

impl Default for CloneOptions {
    fn default() -> Self {
        Self {
            branch: None,
            // Full history so later rebases have a merge base
            depth: None,
            show_progress: true,
            credentials: None,
        }
    }
}

/// Clone a repository from a URL into `target`.
pub fn clone_repository(
    url: &str,
    target: &Path,
    options: CloneOptions,
) -> Result<Repository, GitError> {
    info!("Cloning repository {} into {}", url, target.display());

    let progress_bar = if options.show_progress {
        let pb = ProgressBar::new(0);
        if let Ok(style) = ProgressStyle::default_bar().template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
        ) {
            pb.set_style(style.progress_chars("#>-"));
        }
        Some(Arc::new(pb))
    } else {
        None
    };

    let pb_clone = progress_bar.clone();
    let mut callbacks = RemoteCallbacks::new();

    callbacks.transfer_progress(move |progress: Progress<'_>| {
        if let Some(ref pb) = pb_clone {
            pb.set_length(progress.total_objects() as u64);
            pb.set_position(progress.received_objects() as u64);
        }
        true
    });

    if let Some(creds) = options.credentials {
        let mut attempts = 0;
        callbacks.credentials(move |_url, _username_from_url, _allowed| {
            attempts += 1;
            if attempts > 1 {
                // libgit2 keeps asking after a rejection; stop after one try.
                return Err(git2::Error::from_str("authentication rejected by remote"));
            }
            debug!("Supplying credentials for user {}", creds.username);
            Cred::userpass_plaintext(&creds.username, &creds.token)
        });
    }

    let mut fetch_opts = FetchOptions::new();
    fetch_opts.remote_callbacks(callbacks);

    if let Some(depth) = options.depth {
        fetch_opts.depth(depth);
    }

    let mut builder = git2::build::RepoBuilder::new();
    builder.fetch_options(fetch_opts);

    if let Some(ref branch) = options.branch {
        builder.branch(branch);
    }

    let repo = builder.clone(url, target)?;

    if let Some(pb) = progress_bar {
        pb.finish_with_message("Clone complete");
    }

    info!("Successfully cloned repository to: {}", target.display());

    Ok(repo)
}

/// Whether `path` is the root of a git working tree.
pub fn is_repository(path: &Path) -> bool {
    Repository::open(path).is_ok()
}
