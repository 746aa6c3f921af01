//! Configuration file handling.
//!
//! The configuration file is stored at `$BUDGET_HOME/config.json` and contains the owner that the
//! CLI acts as, backup and polling settings, and any extra classification rules.

use crate::backup::Backup;
use crate::classify::{Classifier, KeywordRule};
use crate::store::{FileStore, Store};
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_NAME: &str = "budget-buddy";
const CONFIG_VERSION: u8 = 1;
const DEFAULT_OWNER: &str = "me";
const BACKUP_COPIES: u32 = 5;
const POLL_INTERVAL_SECS: u64 = 60;
const BACKUPS: &str = ".backups";
const CONFIG_JSON: &str = "config.json";
const STORE_JSON: &str = "store.json";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$BUDGET_HOME` and from there it loads `$BUDGET_HOME/config.json`. It also opens the
/// record store found in the same directory.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    backups: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    store: FileStore,
}

impl Config {
    /// Creates the data directory, its subdirectories, an initial `config.json` and an empty
    /// store.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of data directory, e.g. `$HOME/budget-buddy`
    /// - `owner` - The owner id that records will be filed under. Defaults to `me`.
    ///
    /// # Errors
    /// - Returns an error if a config file already exists in `dir`.
    /// - Returns an error if any file operations fail.
    pub async fn create(dir: impl Into<PathBuf>, owner: Option<&str>) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the budget home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if config_path.exists() {
            bail!(
                "A config file already exists at '{}'",
                config_path.display()
            );
        }

        let backups = root.join(BACKUPS);
        utils::make_dir(&backups).await?;

        let mut config_file = ConfigFile::default();
        if let Some(owner) = owner {
            let owner = owner.trim();
            anyhow::ensure!(!owner.is_empty(), "The owner cannot be empty");
            config_file.owner = owner.to_string();
        }
        config_file.save(&config_path).await?;

        let store = FileStore::init(root.join(STORE_JSON))
            .await
            .context("Unable to create the store")?;

        Ok(Self {
            root,
            backups,
            config_path,
            config_file,
            store,
        })
    }

    /// This will
    /// - validate that `budget_home` exists and that the config file exists
    /// - load the config file
    /// - validate that the backups directory exists
    /// - load the store
    pub async fn load(budget_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = budget_home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("Budget home is missing, run 'budget init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        let backups = root.join(BACKUPS);
        if !backups.is_dir() {
            bail!("The backups directory is missing '{}'", backups.display())
        }

        let store = FileStore::load(root.join(STORE_JSON))
            .await
            .context("Unable to load the store")?;

        Ok(Self {
            root,
            backups,
            config_path,
            config_file,
            store,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn backups(&self) -> &Path {
        &self.backups
    }

    pub fn store_path(&self) -> &Path {
        self.store.path()
    }

    pub fn store(&self) -> &dyn Store {
        &self.store
    }

    pub fn owner(&self) -> &str {
        &self.config_file.owner
    }

    pub fn backup_copies(&self) -> u32 {
        self.config_file.backup_copies
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.config_file.poll_interval_secs.max(1))
    }

    /// A classifier that applies the configured keyword rules before the built-in table.
    pub fn classifier(&self) -> Classifier {
        // Rules are rebuilt so that hand-edited labels and keywords get normalized.
        Classifier::with_rules(
            self.config_file
                .keyword_rules
                .iter()
                .map(|r| KeywordRule::new(r.category(), r.keywords())),
        )
    }

    /// Creates a new `Backup` instance for managing backup files.
    pub fn backup(&self) -> Backup {
        Backup::new(self)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "budget-buddy",
///   "config_version": 1,
///   "owner": "me",
///   "backup_copies": 5,
///   "poll_interval_secs": 60,
///   "keyword_rules": [
///     { "category": "pets", "keywords": ["vet", "kibble"] }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "budget-buddy"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// The owner id that the CLI reads and writes records as
    #[serde(default = "default_owner")]
    owner: String,

    /// Number of backup copies to keep per kind of backup
    #[serde(default = "default_backup_copies")]
    backup_copies: u32,

    /// How often `reminder watch` re-evaluates reminders
    #[serde(default = "default_poll_interval_secs")]
    poll_interval_secs: u64,

    /// Classification rules consulted before the built-in keyword table
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    keyword_rules: Vec<KeywordRule>,
}

fn default_owner() -> String {
    DEFAULT_OWNER.to_string()
}

fn default_backup_copies() -> u32 {
    BACKUP_COPIES
}

fn default_poll_interval_secs() -> u64 {
    POLL_INTERVAL_SECS
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            owner: default_owner(),
            backup_copies: BACKUP_COPIES,
            poll_interval_secs: POLL_INTERVAL_SECS,
            keyword_rules: Vec::new(),
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or names a different app.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path).await?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            !config.owner.trim().is_empty(),
            "Invalid owner in config file: the owner cannot be empty"
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TransactionKind;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_config_create_and_load() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("budget_home");

        let config = Config::create(&home, Some(" alice ")).await.unwrap();
        assert_eq!(config.owner(), "alice");
        assert!(config.backups().is_dir());
        assert!(config.store_path().is_file());
        assert!(config.config_path().is_file());

        let loaded = Config::load(&home).await.unwrap();
        assert_eq!(loaded.owner(), "alice");
        assert_eq!(loaded.backup_copies(), BACKUP_COPIES);
        assert_eq!(loaded.poll_interval(), Duration::from_secs(60));
        assert_eq!(loaded.root(), config.root());
    }

    #[tokio::test]
    async fn test_config_create_twice_fails() {
        let dir = TempDir::new().unwrap();
        Config::create(dir.path(), None).await.unwrap();
        let err = Config::create(dir.path(), None).await.unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[tokio::test]
    async fn test_config_create_rejects_blank_owner() {
        let dir = TempDir::new().unwrap();
        assert!(Config::create(dir.path(), Some("  ")).await.is_err());
    }

    #[tokio::test]
    async fn test_config_load_missing_home() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(dir.path().join("nope")).await.unwrap_err();
        assert!(err.to_string().contains("budget init"));
    }

    #[tokio::test]
    async fn test_config_file_load_with_minimal_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        utils::write(&path, r#"{"app_name": "budget-buddy", "config_version": 1}"#)
            .await
            .unwrap();

        let config = ConfigFile::load(&path).await.unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[tokio::test]
    async fn test_config_file_load_invalid_app_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        utils::write(&path, r#"{"app_name": "ledger", "config_version": 1}"#)
            .await
            .unwrap();

        let result = ConfigFile::load(&path).await;
        assert!(result.unwrap_err().to_string().contains("Invalid app_name"));
    }

    #[tokio::test]
    async fn test_keyword_rules_feed_classifier() {
        let dir = TempDir::new().unwrap();
        let config = Config::create(dir.path(), None).await.unwrap();
        let json = r#"{
            "app_name": "budget-buddy",
            "config_version": 1,
            "keyword_rules": [{"category": "pets", "keywords": ["vet"]}]
        }"#;
        utils::write(config.config_path(), json).await.unwrap();

        let config = Config::load(dir.path()).await.unwrap();
        let classifier = config.classifier();
        assert_eq!(
            classifier.classify("Vet checkup", TransactionKind::Expense),
            "pets"
        );
        assert_eq!(
            classifier.classify("netflix", TransactionKind::Expense),
            "entertainment"
        );
    }

    #[test]
    fn test_config_file_serialization_omits_empty_rules() {
        let json = serde_json::to_string(&ConfigFile::default()).unwrap();
        assert!(!json.contains("keyword_rules"));
    }
}
