//! Types that represent the core data model, such as `Transaction`, `BudgetCategory` and
//! `Reminder`.
mod amount;
mod budget;
mod reminder;
mod transaction;

pub use amount::{Amount, AmountError};
pub(crate) use budget::upsert as upsert_budget_category;
pub use budget::BudgetCategory;
pub use reminder::{Reminder, ReminderCategory, ReminderUpdates};
use crate::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};
pub use transaction::{NewTransaction, Transaction, TransactionKind};

/// Every record the store holds. This is also the shape of `store.json` and of backup files.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StoreData {
    #[serde(default)]
    pub(crate) transactions: Vec<Transaction>,
    /// Budget categories keyed by owner id.
    #[serde(default)]
    pub(crate) budgets: std::collections::BTreeMap<String, Vec<BudgetCategory>>,
    #[serde(default)]
    pub(crate) reminders: Vec<Reminder>,
}

impl StoreData {
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn reminders(&self) -> &[Reminder] {
        &self.reminders
    }

    /// Checks every record against the rules their constructors enforce, so that a hand-edited
    /// document cannot smuggle in a negative amount or a blank title.
    pub(crate) fn validate(&self) -> Result<()> {
        for t in &self.transactions {
            t.validate()
                .with_context(|| format!("Invalid transaction '{}'", t.id))?;
        }
        for (owner_id, categories) in &self.budgets {
            for c in categories {
                c.validate()
                    .with_context(|| format!("Invalid budget category for owner '{owner_id}'"))?;
            }
        }
        for r in &self.reminders {
            r.validate()
                .with_context(|| format!("Invalid reminder '{}'", r.id))?;
        }
        Ok(())
    }

    pub fn budget_categories(&self, owner_id: &str) -> &[BudgetCategory] {
        self.budgets
            .get(owner_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Trims and lower-cases a category label. Returns `None` when nothing is left.
pub fn normalize_label(label: &str) -> Option<String> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}
