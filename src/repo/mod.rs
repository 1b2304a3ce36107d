//! Shard repository synchronization.

pub mod cloner;
pub mod credentials;
pub mod git;
pub mod updater;

pub use credentials::Credentials;
pub use git::{GitBackend, GitCli};
pub use updater::{PushOutcome, RepoUpdater};
