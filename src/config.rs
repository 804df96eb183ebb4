//! Configuration file handling.
//!
//! The configuration file is stored at `$RIDER_HOME/config.json`. The data
//! directory also holds the `tables/` directory with one CSV file per ledger
//! table, the plain-text `goal.txt`, and the `.backups/` directory for
//! pre-replace snapshots.

use crate::backup::Backup;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "rider-ledger";
const CONFIG_VERSION: u8 = 1;
const BACKUP_COPIES: u32 = 5;
const TABLES: &str = "tables";
const BACKUPS: &str = ".backups";
const CONFIG_JSON: &str = "config.json";
const GOAL_TXT: &str = "goal.txt";

/// The `Config` object represents the data directory. You instantiate it by
/// providing the path to `$RIDER_HOME`, and from there it loads
/// `$RIDER_HOME/config.json` and provides paths to the items expected inside
/// the directory.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    tables: PathBuf,
    backups: PathBuf,
    config_path: PathBuf,
    goal_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the data directory and its contents:
    /// - `config.json` with default settings
    /// - the `tables/` directory (table files are created on first write)
    /// - the `.backups/` directory
    ///
    /// # Errors
    /// Returns an error if any file operation fails.
    pub async fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the ledger home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let tables = root.join(TABLES);
        utils::make_dir(&tables).await?;
        let backups = root.join(BACKUPS);
        utils::make_dir(&backups).await?;

        let config_path = root.join(CONFIG_JSON);
        let config_file = ConfigFile::default();
        config_file.save(&config_path).await?;

        Ok(Self {
            root: root.clone(),
            tables,
            backups,
            config_path,
            goal_path: root.join(GOAL_TXT),
            config_file,
        })
    }

    /// Validates that the home directory and config file exist, loads the
    /// config file, and validates the directory layout.
    pub async fn load(ledger_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = ledger_home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("Ledger home is missing, run 'rider init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        let config = Self {
            root: root.clone(),
            tables: root.join(TABLES),
            backups: root.join(BACKUPS),
            config_path,
            goal_path: root.join(GOAL_TXT),
            config_file,
        };
        if !config.tables.is_dir() {
            bail!(
                "The tables directory is missing '{}'",
                config.tables.display()
            )
        }
        if !config.backups.is_dir() {
            bail!(
                "The backups directory is missing '{}'",
                config.backups.display()
            )
        }
        Ok(config)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn tables(&self) -> &Path {
        &self.tables
    }

    pub fn backups(&self) -> &Path {
        &self.backups
    }

    pub fn goal_path(&self) -> &Path {
        &self.goal_path
    }

    pub fn backup_copies(&self) -> u32 {
        self.config_file.backup_copies
    }

    /// Creates a new `Backup` instance for managing snapshot files.
    pub(crate) fn backup(&self) -> Backup {
        Backup::new(&self.backups, self.backup_copies())
    }
}

/// The serialization format of the configuration file.
///
/// ```json
/// {
///   "app_name": "rider-ledger",
///   "config_version": 1,
///   "backup_copies": 5
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "rider-ledger".
    app_name: String,

    /// Configuration file version.
    config_version: u8,

    /// Number of pre-replace snapshots to keep per table.
    backup_copies: u32,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            backup_copies: BACKUP_COPIES,
        }
    }
}

impl ConfigFile {
    async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path).await?;
        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        Ok(config)
    }

    async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(path.as_ref(), data)
            .await
            .context("Unable to write config file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_config_create_and_load() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("ledger_home");

        let created = Config::create(&home).await.unwrap();
        assert!(created.tables().is_dir());
        assert!(created.backups().is_dir());
        assert!(created.config_path().is_file());
        assert_eq!(created.backup_copies(), BACKUP_COPIES);

        let loaded = Config::load(&home).await.unwrap();
        assert_eq!(loaded.root(), created.root());
        assert_eq!(loaded.backup_copies(), BACKUP_COPIES);
    }

    #[tokio::test]
    async fn test_load_missing_home_fails() {
        let dir = TempDir::new().unwrap();
        let result = Config::load(dir.path().join("nope")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_load_rejects_wrong_app_name() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("home");
        Config::create(&home).await.unwrap();

        let json = r#"{"app_name": "other-app", "config_version": 1, "backup_copies": 5}"#;
        tokio::fs::write(home.join(CONFIG_JSON), json).await.unwrap();

        let result = Config::load(&home).await;
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Invalid app_name"));
    }
}
