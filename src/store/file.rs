use crate::model::{Amount, BudgetCategory, Reminder, StoreData, Transaction};
use crate::store::Store;
use crate::{utils, Result};
use anyhow::{bail, Context};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::trace;

/// A `Store` that keeps every record in a single JSON document.
///
/// The document is read on load and on `refresh`, and held in memory in between. Every mutation
/// rewrites the whole file while the lock is held, writing to a sibling temp file first and
/// renaming it into place so a crash never leaves a half-written store behind.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    data: Arc<Mutex<StoreData>>,
}

impl FileStore {
    /// Creates a new, empty store file at `path`.
    ///
    /// # Errors
    /// - A file already exists at `path`.
    /// - The file cannot be written.
    pub async fn init(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.exists() {
            bail!("A store already exists at '{}'", path.display());
        }
        let store = Self {
            path,
            data: Arc::new(Mutex::new(StoreData::default())),
        };
        let data = store.data.lock().await;
        store.persist(&data).await?;
        drop(data);
        Ok(store)
    }

    /// Loads an existing store file.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = read_document(&path).await?;
        Ok(Self {
            path,
            data: Arc::new(Mutex::new(data)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, data: &MutexGuard<'_, StoreData>) -> Result<()> {
        let json = serde_json::to_string_pretty(&**data).context("Unable to serialize the store")?;
        let tmp = self.path.with_extension("json.tmp");
        utils::write(&tmp, json).await?;
        utils::rename(&tmp, &self.path).await
    }

    /// Applies `f` to the document and writes the result to disk. Nothing is written if `f` fails.
    async fn mutate<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut StoreData) -> Result<T> + Send,
        T: Send,
    {
        let mut data = self.data.lock().await;
        let mut updated = data.clone();
        let value = f(&mut updated)?;
        *data = updated;
        self.persist(&data).await?;
        Ok(value)
    }
}

/// Reads and validates the document at `path`.
async fn read_document(path: &Path) -> Result<StoreData> {
    if !path.is_file() {
        bail!("The store file is missing '{}'", path.display());
    }
    let data: StoreData = utils::deserialize(path).await?;
    data.validate()
        .with_context(|| format!("The store file '{}' is not valid", path.display()))?;
    trace!(
        "Loaded {} transactions and {} reminders from {}",
        data.transactions().len(),
        data.reminders().len(),
        path.display()
    );
    Ok(data)
}

#[async_trait::async_trait]
impl Store for FileStore {
    /// Re-reads the file so that writes made by other processes become visible.
    async fn refresh(&self) -> Result<()> {
        let mut data = self.data.lock().await;
        *data = read_document(&self.path).await?;
        Ok(())
    }

    async fn list_transactions(&self, owner_id: &str) -> Result<Vec<Transaction>> {
        Ok(super::owned_transactions(&*self.data.lock().await, owner_id))
    }

    async fn list_budget_categories(&self, owner_id: &str) -> Result<Vec<BudgetCategory>> {
        Ok(self.data.lock().await.budget_categories(owner_id).to_vec())
    }

    async fn list_reminders(&self, owner_id: &str) -> Result<Vec<Reminder>> {
        Ok(super::owned_reminders(&*self.data.lock().await, owner_id))
    }

    async fn get_reminder(&self, owner_id: &str, id: &str) -> Result<Option<Reminder>> {
        Ok(super::find_reminder(&*self.data.lock().await, owner_id, id))
    }

    async fn save_transaction(&self, transaction: Transaction) -> Result<()> {
        self.mutate(|data| {
            super::put_transaction(data, transaction);
            Ok(())
        })
        .await
    }

    async fn save_transactions(&self, transactions: Vec<Transaction>) -> Result<()> {
        self.mutate(|data| {
            for transaction in transactions {
                super::put_transaction(data, transaction);
            }
            Ok(())
        })
        .await
    }

    async fn delete_transaction(&self, owner_id: &str, id: &str) -> Result<Transaction> {
        self.mutate(|data| super::remove_transaction(data, owner_id, id))
            .await
    }

    async fn set_budget_limit(
        &self,
        owner_id: &str,
        category: BudgetCategory,
    ) -> Result<Option<Amount>> {
        self.mutate(|data| Ok(super::put_budget_category(data, owner_id, category)))
            .await
    }

    async fn save_reminder(&self, reminder: Reminder) -> Result<()> {
        self.mutate(|data| {
            super::put_reminder(data, reminder);
            Ok(())
        })
        .await
    }

    async fn delete_reminder(&self, owner_id: &str, id: &str) -> Result<Reminder> {
        self.mutate(|data| super::remove_reminder(data, owner_id, id))
            .await
    }

    async fn snapshot(&self) -> Result<StoreData> {
        Ok(self.data.lock().await.clone())
    }
}
