use crate::model::Amount;
use crate::Result;
use anyhow::{bail, Context};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio::fs::ReadDir;

/// Write a file.
pub(crate) async fn write(path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Result<()> {
    let path = path.as_ref();
    tokio::fs::write(path, contents)
        .await
        .context(format!("Unable to write to {}", path.to_string_lossy()))
}

/// Read a file to a `String`.
pub(crate) async fn read(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read file at {}", path.display()))
}

/// Deserialize a JSON file into type `T`.
pub(crate) async fn deserialize<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned,
{
    let content = read(path).await?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON file at {}", path.display()))
}

/// Basically move a file. Renames `from` -> `to`.
pub(crate) async fn rename(from: impl AsRef<Path>, to: impl AsRef<Path>) -> Result<()> {
    tokio::fs::rename(from.as_ref(), to.as_ref())
        .await
        .with_context(|| {
            format!(
                "Unable to move file from '{}' to '{}'",
                from.as_ref().to_string_lossy(),
                to.as_ref().to_string_lossy()
            )
        })
}

/// Create a directory and any missing parents.
pub(crate) async fn make_dir(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    tokio::fs::create_dir_all(path)
        .await
        .with_context(|| format!("Unable to create directory at {}", path.to_string_lossy()))
}

pub(crate) async fn canonicalize(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    tokio::fs::canonicalize(path)
        .await
        .with_context(|| format!("Unable to canonicalize the path {}", path.to_string_lossy()))
}

pub(crate) async fn read_dir(path: impl AsRef<Path>) -> Result<ReadDir> {
    let path = path.as_ref();
    tokio::fs::read_dir(path)
        .await
        .with_context(|| format!("Unable to read directory {}", path.to_string_lossy()))
}

pub(crate) async fn remove_file(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    tokio::fs::remove_file(path)
        .await
        .with_context(|| format!("Unable to remove file {}", path.to_string_lossy()))
}

/// Parse an amount for use as a clap `value_parser`.
pub fn parse_amount(s: &str) -> Result<Amount> {
    Amount::from_str(s).with_context(|| format!("Unable to parse '{s}' as an amount"))
}

/// Parse a point in time. Accepts RFC 3339 (`2025-03-01T09:30:00+05:30`), a `datetime-local`
/// style value without offset (`2025-03-01T09:30`, seconds optional), or a bare date
/// (`2025-03-01`, meaning midnight). Values without an offset are UTC.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }
    bail!("Unable to parse '{s}' as a date, expected e.g. 2025-03-01 or 2025-03-01T09:30:00Z")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_datetime_rfc3339() {
        let dt = parse_datetime("2025-03-01T09:30:00+05:30").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 3, 1, 4, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_datetime_local() {
        let dt = parse_datetime("2025-03-01T09:30").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_datetime_date_only() {
        let dt = parse_datetime(" 2025-03-01 ").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_datetime_rejects_garbage() {
        assert!(parse_datetime("next tuesday").is_err());
        assert!(parse_datetime("2025-13-01").is_err());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1,000").unwrap().to_string(), "1,000.00");
        let err = parse_amount("abc").unwrap_err();
        assert!(err.to_string().contains("'abc'"));
    }
}
