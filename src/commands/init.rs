use crate::commands::Out;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory, its subdirectories, and an initial
/// `config.json` with default settings.
///
/// # Arguments
/// - `ledger_home` - The directory that will be the root of the data
///   directory, e.g. `$HOME/rider-ledger`
///
/// # Errors
/// - Returns an error if any file operations fail.
pub async fn init(ledger_home: &Path) -> Result<Out<()>> {
    let _config = Config::create(ledger_home)
        .await
        .context("Unable to create the data directory and configs")?;
    Ok(format!(
        "Successfully created the ledger directory at {}",
        ledger_home.display()
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_creates_layout() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("rider-ledger");
        let out = init(&home).await.unwrap();
        assert!(out.message().contains("Successfully created"));
        assert!(home.join("config.json").is_file());
        assert!(home.join("tables").is_dir());

        // Loading the freshly created home works.
        Config::load(&home).await.unwrap();
    }
}
