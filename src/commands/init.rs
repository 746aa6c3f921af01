use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory, its subdirectories, an initial `config.json` and an empty store.
///
/// # Arguments
/// - `budget_home` - The directory that will be the root of data directory, e.g.
///   `$HOME/budget-buddy`
/// - `owner` - The owner id that records are filed under. Defaults to `me`.
///
/// # Errors
/// - Returns an error if the directory has already been initialized.
/// - Returns an error if any file operations fail.
pub async fn init(budget_home: &Path, owner: Option<&str>) -> Result<Out<()>> {
    let config = Config::create(budget_home, owner)
        .await
        .context("Unable to create the data directory and configs")
        .pub_result(ErrorType::Config)?;
    Ok(format!(
        "Successfully created the budget directory at {} for owner '{}'",
        config.root().display(),
        config.owner()
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_then_load() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("home");
        let out = init(&home, Some("alice")).await.unwrap();
        assert!(out.message().contains("alice"));

        let config = Config::load(&home).await.unwrap();
        assert_eq!(config.owner(), "alice");
    }

    #[tokio::test]
    async fn test_init_twice_fails_with_config_error() {
        let dir = TempDir::new().unwrap();
        init(dir.path(), None).await.unwrap();
        let err = init(dir.path(), None).await.unwrap_err();
        assert_eq!(err.to_string(), "Configuration error");
    }
}
