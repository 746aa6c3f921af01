//! The record store that commands read from and write to.
//!
//! The engine never touches the store: commands fetch snapshots from it, hand them to the pure
//! functions in `budget`, `reminders` and `summary`, and save whatever the user created.

mod file;
mod memory;

use crate::model::{upsert_budget_category, Amount, BudgetCategory, Reminder, StoreData, Transaction};
use crate::Result;
use anyhow::bail;
use std::fmt::Debug;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Persistence for transactions, budget categories and reminders. Every read is scoped to one
/// owner.
#[async_trait::async_trait]
pub trait Store: Debug + Send + Sync {
    async fn list_transactions(&self, owner_id: &str) -> Result<Vec<Transaction>>;

    async fn list_budget_categories(&self, owner_id: &str) -> Result<Vec<BudgetCategory>>;

    async fn list_reminders(&self, owner_id: &str) -> Result<Vec<Reminder>>;

    /// Returns the reminder with `id` if it exists and belongs to `owner_id`.
    async fn get_reminder(&self, owner_id: &str, id: &str) -> Result<Option<Reminder>>;

    /// Inserts the transaction, or replaces one with the same id.
    async fn save_transaction(&self, transaction: Transaction) -> Result<()>;

    /// Saves several transactions in one write.
    async fn save_transactions(&self, transactions: Vec<Transaction>) -> Result<()>;

    /// Removes and returns a transaction. Errors if no transaction with `id` belongs to
    /// `owner_id`.
    async fn delete_transaction(&self, owner_id: &str, id: &str) -> Result<Transaction>;

    /// Adds the budget category or changes its limit. Returns the previous limit, if any.
    async fn set_budget_limit(&self, owner_id: &str, category: BudgetCategory)
        -> Result<Option<Amount>>;

    /// Inserts the reminder, or replaces one with the same id.
    async fn save_reminder(&self, reminder: Reminder) -> Result<()>;

    /// Removes and returns a reminder. Errors if no reminder with `id` belongs to `owner_id`.
    async fn delete_reminder(&self, owner_id: &str, id: &str) -> Result<Reminder>;

    /// A copy of everything in the store, used for backups.
    async fn snapshot(&self) -> Result<StoreData>;

    /// Picks up changes made outside this handle, if the backing storage can have any.
    async fn refresh(&self) -> Result<()>;
}

// The functions below hold the record-keeping rules shared by every `Store` implementation.

fn owned_transactions(data: &StoreData, owner_id: &str) -> Vec<Transaction> {
    data.transactions
        .iter()
        .filter(|t| t.owner_id == owner_id)
        .cloned()
        .collect()
}

fn owned_reminders(data: &StoreData, owner_id: &str) -> Vec<Reminder> {
    data.reminders
        .iter()
        .filter(|r| r.owner_id == owner_id)
        .cloned()
        .collect()
}

fn find_reminder(data: &StoreData, owner_id: &str, id: &str) -> Option<Reminder> {
    data.reminders
        .iter()
        .find(|r| r.owner_id == owner_id && r.id == id)
        .cloned()
}

fn put_transaction(data: &mut StoreData, transaction: Transaction) {
    match data.transactions.iter_mut().find(|t| t.id == transaction.id) {
        Some(existing) => *existing = transaction,
        None => data.transactions.push(transaction),
    }
}

fn remove_transaction(data: &mut StoreData, owner_id: &str, id: &str) -> Result<Transaction> {
    match data
        .transactions
        .iter()
        .position(|t| t.owner_id == owner_id && t.id == id)
    {
        Some(ix) => Ok(data.transactions.remove(ix)),
        None => bail!("Transaction not found: {id}"),
    }
}

fn put_budget_category(
    data: &mut StoreData,
    owner_id: &str,
    category: BudgetCategory,
) -> Option<Amount> {
    let categories = data.budgets.entry(owner_id.to_string()).or_default();
    upsert_budget_category(categories, category)
}

fn put_reminder(data: &mut StoreData, reminder: Reminder) {
    match data.reminders.iter_mut().find(|r| r.id == reminder.id) {
        Some(existing) => *existing = reminder,
        None => data.reminders.push(reminder),
    }
}

fn remove_reminder(data: &mut StoreData, owner_id: &str, id: &str) -> Result<Reminder> {
    match data
        .reminders
        .iter()
        .position(|r| r.owner_id == owner_id && r.id == id)
    {
        Some(ix) => Ok(data.reminders.remove(ix)),
        None => bail!("Reminder not found: {id}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Classifier;
    use crate::model::{NewTransaction, ReminderCategory, TransactionKind};
    use chrono::{Duration, Utc};
    use std::str::FromStr;

    fn transaction(owner: &str, description: &str) -> Transaction {
        NewTransaction::new(
            Amount::from_str("10").unwrap(),
            description,
            TransactionKind::Expense,
        )
        .build(owner, &Classifier::default(), Utc::now())
        .unwrap()
    }

    /// Runs the same checks against any implementation.
    pub(super) async fn exercise(store: &dyn Store) {
        let mine = transaction("me", "coffee");
        let theirs = transaction("you", "bus");
        store.save_transaction(mine.clone()).await.unwrap();
        store.save_transaction(theirs.clone()).await.unwrap();
        assert_eq!(store.list_transactions("me").await.unwrap(), vec![mine.clone()]);

        // Another owner cannot delete my transaction.
        let err = store.delete_transaction("you", mine.id()).await.unwrap_err();
        assert!(err.to_string().contains("Transaction not found"));
        let deleted = store.delete_transaction("me", mine.id()).await.unwrap();
        assert_eq!(deleted, mine);
        assert!(store.list_transactions("me").await.unwrap().is_empty());

        let food = BudgetCategory::new("food", Amount::from_str("100").unwrap()).unwrap();
        assert_eq!(store.set_budget_limit("me", food).await.unwrap(), None);
        let food = BudgetCategory::new("Food", Amount::from_str("150").unwrap()).unwrap();
        assert_eq!(
            store.set_budget_limit("me", food).await.unwrap(),
            Some(Amount::from_str("100").unwrap())
        );
        let categories = store.list_budget_categories("me").await.unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].limit(), Amount::from_str("150").unwrap());
        assert!(store.list_budget_categories("you").await.unwrap().is_empty());

        let now = Utc::now();
        let mut reminder = Reminder::new(
            "me",
            "rent",
            now + Duration::days(2),
            ReminderCategory::Rent,
            now,
        )
        .unwrap();
        store.save_reminder(reminder.clone()).await.unwrap();
        reminder.toggle(now);
        store.save_reminder(reminder.clone()).await.unwrap();
        let reminders = store.list_reminders("me").await.unwrap();
        assert_eq!(reminders, vec![reminder.clone()]);
        assert_eq!(
            store.get_reminder("me", reminder.id()).await.unwrap(),
            Some(reminder.clone())
        );
        assert_eq!(store.get_reminder("you", reminder.id()).await.unwrap(), None);
        store.delete_reminder("me", reminder.id()).await.unwrap();
        assert!(store.delete_reminder("me", reminder.id()).await.is_err());

        let snapshot = store.snapshot().await.unwrap();
        assert_eq!(snapshot.transactions(), &[theirs.clone()]);

        // Nothing else wrote, so a refresh changes nothing.
        store.refresh().await.unwrap();
        assert_eq!(store.list_transactions("you").await.unwrap(), vec![theirs]);
    }
}
