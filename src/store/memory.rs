use crate::model::{Amount, BudgetCategory, Reminder, StoreData, Transaction};
use crate::store::Store;
use crate::Result;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A `Store` that lives only as long as the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    data: Arc<Mutex<StoreData>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl Store for MemoryStore {
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
        super::put_transaction(&mut *self.data.lock().await, transaction);
        Ok(())
    }

    async fn save_transactions(&self, transactions: Vec<Transaction>) -> Result<()> {
        let mut data = self.data.lock().await;
        for transaction in transactions {
            super::put_transaction(&mut data, transaction);
        }
        Ok(())
    }

    async fn delete_transaction(&self, owner_id: &str, id: &str) -> Result<Transaction> {
        super::remove_transaction(&mut *self.data.lock().await, owner_id, id)
    }

    async fn set_budget_limit(
        &self,
        owner_id: &str,
        category: BudgetCategory,
    ) -> Result<Option<Amount>> {
        Ok(super::put_budget_category(
            &mut *self.data.lock().await,
            owner_id,
            category,
        ))
    }

    async fn save_reminder(&self, reminder: Reminder) -> Result<()> {
        super::put_reminder(&mut *self.data.lock().await, reminder);
        Ok(())
    }

    async fn delete_reminder(&self, owner_id: &str, id: &str) -> Result<Reminder> {
        super::remove_reminder(&mut *self.data.lock().await, owner_id, id)
    }

    async fn snapshot(&self) -> Result<StoreData> {
        Ok(self.data.lock().await.clone())
    }

    async fn refresh(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryStore::new();
        crate::store::tests::exercise(&store).await;
    }
}
