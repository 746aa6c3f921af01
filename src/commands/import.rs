//! Bulk import of transactions from CSV.

use crate::backup::PRE_IMPORT;
use crate::commands::{plural, Out};
use crate::error::{ErrorType, IntoResult};
use crate::model::{NewTransaction, Transaction, TransactionKind};
use crate::{utils, Config, Result};
use anyhow::{anyhow, Context};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// One row of an import file. Only `date`, `description` and `amount` are required.
#[derive(Debug, Clone, Deserialize)]
struct CsvRecord {
    date: String,
    description: String,
    amount: String,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    pub imported: usize,
    pub backup: Option<String>,
}

/// Reads every row of the CSV file at `path` and saves them as transactions of the owner.
///
/// Rows are validated the same way as `transaction add`. If any row is invalid nothing is saved and
/// the error names the line. A backup of the store is taken before anything is written.
pub async fn import_csv(config: Config, path: &Path) -> Result<Out<ImportReport>> {
    let content = utils::read(path).await.pub_result(ErrorType::Request)?;
    let transactions =
        parse_csv(&content, &config, Utc::now()).pub_result(ErrorType::Request)?;
    if transactions.is_empty() {
        return Ok(Out::new(
            format!("No transactions found in {}", path.display()),
            ImportReport {
                imported: 0,
                backup: None,
            },
        ));
    }

    let snapshot = config.store().snapshot().await.pub_result(ErrorType::Store)?;
    let backup = config
        .backup()
        .save_json(PRE_IMPORT, &snapshot)
        .await
        .pub_result(ErrorType::Store)?;
    debug!("Backed up the store to {}", backup.display());

    let imported = transactions.len();
    config
        .store()
        .save_transactions(transactions)
        .await
        .pub_result(ErrorType::Store)?;

    Ok(Out::new(
        format!(
            "Imported {imported} transaction{} from {}",
            plural(imported),
            path.display()
        ),
        ImportReport {
            imported,
            backup: Some(backup.to_string_lossy().to_string()),
        },
    ))
}

fn parse_csv(content: &str, config: &Config, now: DateTime<Utc>) -> Result<Vec<Transaction>> {
    let classifier = config.classifier();
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut transactions = Vec::new();
    for (ix, result) in rdr.deserialize::<CsvRecord>().enumerate() {
        // Line 1 is the header.
        let line = ix + 2;
        let record = result.with_context(|| format!("Unable to read line {line}"))?;
        let transaction = to_new_transaction(record)
            .and_then(|new| new.build(config.owner(), &classifier, now))
            .with_context(|| format!("Invalid transaction on line {line}"))?;
        transactions.push(transaction);
    }
    Ok(transactions)
}

fn to_new_transaction(record: CsvRecord) -> Result<NewTransaction> {
    let occurred_at = utils::parse_datetime(&record.date)?;
    let amount = utils::parse_amount(&record.amount)?;
    let kind = match record.kind.as_deref().map(str::trim) {
        None | Some("") => TransactionKind::Expense,
        Some(kind) => TransactionKind::from_str(&kind.to_lowercase())
            .map_err(|_| anyhow!("Unknown kind '{kind}', expected expense or income"))?,
    };

    let mut new = NewTransaction::new(amount, record.description, kind).with_occurred_at(occurred_at);
    new.category = record.category;
    Ok(new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;
    use rust_decimal::Decimal;

    async fn write_csv(env: &TestEnv, content: &str) -> std::path::PathBuf {
        let path = env.config().root().join("import.csv");
        utils::write(&path, content).await.unwrap();
        path
    }

    #[tokio::test]
    async fn test_import_csv() {
        let env = TestEnv::new().await;
        let path = write_csv(
            &env,
            "date,description,amount,kind,category\n\
             2025-05-01,Salary,\"50,000\",Income,\n\
             2025-05-02,Ola to office,120,,\n\
             2025-05-03T19:30,Team dinner,900,expense, Celebrations \n",
        )
        .await;

        let out = import_csv(env.config(), &path).await.unwrap();
        let report = out.structure().unwrap();
        assert_eq!(report.imported, 3);
        assert!(report.backup.as_deref().unwrap().contains(PRE_IMPORT));

        let stored = env.config().store().list_transactions("me").await.unwrap();
        let categories: Vec<&str> = stored.iter().map(|t| t.category()).collect();
        assert_eq!(categories, vec!["income", "transport", "celebrations"]);
        assert_eq!(stored[0].amount().value(), Decimal::from(50000));
        assert_eq!(stored[0].kind(), TransactionKind::Income);
    }

    #[tokio::test]
    async fn test_import_csv_without_optional_columns() {
        let env = TestEnv::new().await;
        let path = write_csv(&env, "date,description,amount\n2025-05-02,Movie night,300\n").await;
        import_csv(env.config(), &path).await.unwrap();
        let stored = env.config().store().list_transactions("me").await.unwrap();
        assert_eq!(stored[0].category(), "entertainment");
        assert_eq!(stored[0].kind(), TransactionKind::Expense);
    }

    #[tokio::test]
    async fn test_import_csv_is_all_or_nothing() {
        let env = TestEnv::new().await;
        let path = write_csv(
            &env,
            "date,description,amount\n2025-05-02,Movie night,300\n2025-05-03,Refund,-20\n",
        )
        .await;

        let err = import_csv(env.config(), &path).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid request");
        assert!(format!("{err:#}").contains("line 3"));
        assert!(env.config().store().list_transactions("me").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_import_csv_unknown_kind() {
        let env = TestEnv::new().await;
        let path = write_csv(&env, "date,description,amount,kind\n2025-05-02,x,3,transfer\n").await;
        let err = import_csv(env.config(), &path).await.unwrap_err();
        assert!(format!("{err:#}").contains("Unknown kind 'transfer'"));
    }

    #[tokio::test]
    async fn test_import_empty_file() {
        let env = TestEnv::new().await;
        let path = write_csv(&env, "date,description,amount\n").await;
        let out = import_csv(env.config(), &path).await.unwrap();
        assert_eq!(out.structure().unwrap().imported, 0);
        assert!(out.structure().unwrap().backup.is_none());
    }
}
