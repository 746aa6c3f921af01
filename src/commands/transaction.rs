//! Transaction command handlers.

use crate::args::AddTransactionArgs;
use crate::backup::PRE_DELETE;
use crate::commands::{plural, Out};
use crate::error::{ErrorType, IntoResult};
use crate::model::{NewTransaction, Transaction};
use crate::{Config, Result};
use chrono::Utc;
use tracing::debug;

/// Records a transaction. An expense without a category is classified from its description.
pub async fn add_transaction(config: Config, args: AddTransactionArgs) -> Result<Out<Transaction>> {
    let mut new = NewTransaction::new(args.amount, args.description, args.kind);
    new.category = args.category;
    new.occurred_at = args.date;

    let transaction = new
        .build(config.owner(), &config.classifier(), Utc::now())
        .pub_result(ErrorType::Request)?;
    config
        .store()
        .save_transaction(transaction.clone())
        .await
        .pub_result(ErrorType::Store)?;

    let message = format!(
        "Added {} of {} for '{}' in {} with ID: {}",
        transaction.kind(),
        transaction.amount(),
        transaction.description(),
        transaction.category(),
        transaction.id()
    );
    Ok(Out::new(message, transaction))
}

/// Lists the owner's transactions, newest first.
pub async fn list_transactions(config: Config) -> Result<Out<Vec<Transaction>>> {
    let mut transactions = config
        .store()
        .list_transactions(config.owner())
        .await
        .pub_result(ErrorType::Store)?;
    transactions.sort_by(|a, b| b.occurred_at().cmp(&a.occurred_at()));

    let mut message = format!(
        "{} transaction{}",
        transactions.len(),
        plural(transactions.len())
    );
    for t in &transactions {
        message.push_str(&format!(
            "\n{}  {:<7}  {:>12}  {:<14}  {}  ({})",
            t.occurred_at().format("%Y-%m-%d"),
            t.kind().to_string(),
            t.amount().to_string(),
            t.category(),
            t.description(),
            t.id()
        ));
    }
    Ok(Out::new(message, transactions))
}

/// Deletes a transaction by id after saving a backup of the store.
pub async fn delete_transaction(config: Config, id: &str) -> Result<Out<Transaction>> {
    let snapshot = config.store().snapshot().await.pub_result(ErrorType::Store)?;
    let backup = config
        .backup()
        .save_json(PRE_DELETE, &snapshot)
        .await
        .pub_result(ErrorType::Store)?;
    debug!("Backed up the store to {}", backup.display());

    let deleted = config
        .store()
        .delete_transaction(config.owner(), id)
        .await
        .pub_result(ErrorType::Request)?;
    Ok(Out::new(
        format!("Deleted transaction {}", deleted.id()),
        deleted,
    ))
}
