//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.shardsync.toml` files, and from the legacy flat `config.json`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = ".shardsync.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Repository sync settings.
    #[serde(default)]
    pub sync: SyncConfig,

    /// Result summary settings.
    #[serde(default)]
    pub results: ResultsConfig,
}

/// Settings for pushing timestamp shards to a remote.
#[derive(Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Remote repository URL, with or without scheme.
    #[serde(default)]
    pub repo_url: String,

    /// Local working copy.
    #[serde(default = "default_local_path")]
    pub local_path: PathBuf,

    /// Username for HTTPS authentication.
    #[serde(default)]
    pub username: String,

    /// Personal access token for HTTPS authentication.
    #[serde(default)]
    pub token: String,

    /// Branch to pull from and push to.
    #[serde(default = "default_branch")]
    pub branch: String,

    /// Directory inside the working copy that receives the info files.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Number of `infoN.txt` files to write.
    #[serde(default = "default_file_count")]
    pub file_count: usize,

    /// Commit message for the update.
    #[serde(default = "default_commit_message")]
    pub commit_message: String,
}

impl std::fmt::Debug for SyncConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncConfig")
            .field("repo_url", &self.repo_url)
            .field("local_path", &self.local_path)
            .field("username", &self.username)
            .field("token", &if self.token.is_empty() { "" } else { "***" })
            .field("branch", &self.branch)
            .field("output_dir", &self.output_dir)
            .field("file_count", &self.file_count)
            .field("commit_message", &self.commit_message)
            .finish()
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            repo_url: String::new(),
            local_path: default_local_path(),
            username: String::new(),
            token: String::new(),
            branch: default_branch(),
            output_dir: default_output_dir(),
            file_count: default_file_count(),
            commit_message: default_commit_message(),
        }
    }
}

fn default_local_path() -> PathBuf {
    PathBuf::from("./auto-shards-repo")
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_output_dir() -> String {
    "output".to_string()
}

fn default_file_count() -> usize {
    5
}

fn default_commit_message() -> String {
    "Automated update: info files to output directory".to_string()
}

/// Result summary settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultsConfig {
    /// Symbols shown per section in the text summary.
    #[serde(default = "default_max_symbols")]
    pub max_symbols: usize,

    /// Date entries shown per category in the text summary.
    #[serde(default = "default_max_entries")]
    pub max_entries_per_category: usize,
}

impl Default for ResultsConfig {
    fn default() -> Self {
        Self {
            max_symbols: default_max_symbols(),
            max_entries_per_category: default_max_entries(),
        }
    }
}

fn default_max_symbols() -> usize {
    3
}

fn default_max_entries() -> usize {
    2
}

/// The flat `config.json` layout used by earlier sync scripts.
#[derive(Debug, Deserialize)]
struct LegacyConfig {
    #[serde(rename = "BASE_REPO_URL")]
    base_repo_url: String,
    #[serde(rename = "LOCAL_REPO_PATH")]
    local_repo_path: PathBuf,
    #[serde(rename = "GIT_USERNAME")]
    git_username: String,
    #[serde(rename = "GIT_TOKEN")]
    git_token: String,
}

impl From<LegacyConfig> for Config {
    fn from(legacy: LegacyConfig) -> Self {
        Config {
            sync: SyncConfig {
                repo_url: legacy.base_repo_url,
                local_path: legacy.local_repo_path,
                username: legacy.git_username,
                token: legacy.git_token,
                ..SyncConfig::default()
            },
            ..Config::default()
        }
    }
}

impl Config {
    /// Load configuration from a file path.
    ///
    /// `.json` files are read in the legacy flat layout, anything else as TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if path.extension().and_then(|e| e.to_str()) == Some("json") {
            let legacy: LegacyConfig = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            let config: Config = legacy.into();
            config
                .validate()
                .with_context(|| format!("Invalid config file: {}", path.display()))?;
            return Ok(config);
        }

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Apply the same bounds the command line enforces.
    pub fn validate(&self) -> Result<()> {
        if self.results.max_symbols == 0 {
            anyhow::bail!("results.max_symbols must be at least 1");
        }
        if self.results.max_entries_per_category == 0 {
            anyhow::bail!("results.max_entries_per_category must be at least 1");
        }
        if self.sync.file_count == 0 {
            anyhow::bail!("sync.file_count must be at least 1");
        }
        if self.sync.branch.trim().is_empty() {
            anyhow::bail!("sync.branch cannot be empty");
        }
        Ok(())
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.shardsync.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(DEFAULT_CONFIG_FILE);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Apply `sync` subcommand overrides. Only explicitly given values win.
    pub fn merge_sync_args(&mut self, args: &crate::cli::SyncArgs) {
        if let Some(ref repo) = args.repo {
            self.sync.repo_url = repo.clone();
        }
        if let Some(ref local_path) = args.local_path {
            self.sync.local_path = local_path.clone();
        }
        if let Some(ref username) = args.username {
            self.sync.username = username.clone();
        }
        if let Some(ref token) = args.token {
            self.sync.token = token.clone();
        }
        if let Some(ref branch) = args.branch {
            self.sync.branch = branch.clone();
        }
        if let Some(ref message) = args.message {
            self.sync.commit_message = message.clone();
        }
        if let Some(file_count) = args.file_count {
            self.sync.file_count = file_count;
        }
    }

    /// Apply `results` subcommand overrides.
    pub fn merge_results_args(&mut self, args: &crate::cli::ResultsArgs) {
        if let Some(max_symbols) = args.max_symbols {
            self.results.max_symbols = max_symbols;
        }
        if let Some(max_entries) = args.max_entries {
            self.results.max_entries_per_category = max_entries;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{OutputFormat, ResultsArgs, SyncArgs};
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.sync.branch, "main");
        assert_eq!(config.sync.file_count, 5);
        assert_eq!(config.sync.output_dir, "output");
        assert_eq!(config.results.max_symbols, 3);
        assert_eq!(config.results.max_entries_per_category, 2);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[sync]
repo_url = "https://github.com/owner/shards.git"
username = "alice"
branch = "trunk"

[results]
max_symbols = 10
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.sync.repo_url, "https://github.com/owner/shards.git");
        assert_eq!(config.sync.username, "alice");
        assert_eq!(config.sync.branch, "trunk");
        assert_eq!(config.sync.file_count, 5);
        assert_eq!(config.results.max_symbols, 10);
        assert_eq!(config.results.max_entries_per_category, 2);
    }

    #[test]
    fn test_load_legacy_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{
                "BASE_REPO_URL": "https://github.com/owner/shards.git",
                "LOCAL_REPO_PATH": "./shards",
                "GIT_USERNAME": "alice",
                "GIT_TOKEN": "s3cret"
            }"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.sync.repo_url, "https://github.com/owner/shards.git");
        assert_eq!(config.sync.local_path, PathBuf::from("./shards"));
        assert_eq!(config.sync.username, "alice");
        assert_eq!(config.sync.token, "s3cret");
        assert_eq!(config.sync.branch, "main");
        assert!(!format!("{:?}", config.sync).contains("s3cret"));
    }

    #[test]
    fn test_legacy_json_missing_key() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{"BASE_REPO_URL": "x"}"#).unwrap();

        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_load_from_dir() {
        let temp_dir = TempDir::new().unwrap();
        assert!(Config::load_from_dir(temp_dir.path()).unwrap().is_none());

        std::fs::write(
            temp_dir.path().join(DEFAULT_CONFIG_FILE),
            "[results]\nmax_symbols = 1\n",
        )
        .unwrap();
        let config = Config::load_from_dir(temp_dir.path()).unwrap().unwrap();
        assert_eq!(config.results.max_symbols, 1);
    }

    #[test]
    fn test_zero_limits_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(DEFAULT_CONFIG_FILE);

        std::fs::write(&path, "[results]\nmax_symbols = 0\n").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("max_symbols"));

        std::fs::write(&path, "[results]\nmax_entries_per_category = 0\n").unwrap();
        assert!(Config::load(&path).is_err());

        std::fs::write(&path, "[sync]\nfile_count = 0\n").unwrap();
        assert!(Config::load(&path).is_err());

        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_merge_args() {
        let mut config = Config::default();
        config.sync.username = "from-file".to_string();

        let sync_args = SyncArgs {
            repo: Some("https://github.com/owner/repo.git".to_string()),
            local_path: None,
            username: None,
            token: Some("tok".to_string()),
            branch: None,
            message: None,
            file_count: Some(2),
            no_progress: true,
        };
        config.merge_sync_args(&sync_args);

        assert_eq!(config.sync.repo_url, "https://github.com/owner/repo.git");
        assert_eq!(config.sync.username, "from-file");
        assert_eq!(config.sync.token, "tok");
        assert_eq!(config.sync.file_count, 2);
        assert_eq!(config.sync.branch, "main");

        let results_args = ResultsArgs {
            dir: PathBuf::from("."),
            format: OutputFormat::Text,
            output: None,
            max_symbols: None,
            max_entries: Some(7),
            create_dummy: false,
        };
        config.merge_results_args(&results_args);
        assert_eq!(config.results.max_symbols, 3);
        assert_eq!(config.results.max_entries_per_category, 7);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[sync]"));
        assert!(toml_str.contains("[results]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.sync.branch, "main");
    }
}
