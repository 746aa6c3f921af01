use crate::classify::Classifier;
use crate::model::{normalize_label, Amount};
use crate::Result;
use anyhow::ensure;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether money left or arrived.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    #[default]
    Expense,
    Income,
}

serde_plain::derive_display_from_serialize!(TransactionKind);
serde_plain::derive_fromstr_from_deserialize!(TransactionKind);

/// A single recorded income or expense.
///
/// Once created a transaction is never edited, only deleted. `category` is never empty: it is
/// either what the owner typed or what the `Classifier` picked.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Transaction {
    pub(crate) id: String,
    pub(crate) owner_id: String,
    pub(crate) amount: Amount,
    pub(crate) description: String,
    pub(crate) category: String,
    pub(crate) kind: TransactionKind,
    pub(crate) occurred_at: DateTime<Utc>,
}

impl Transaction {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// Checks the rules that `NewTransaction::build` enforces. Used on records read from disk.
    pub(crate) fn validate(&self) -> Result<()> {
        ensure!(!self.id.trim().is_empty(), "A transaction needs an id");
        ensure!(
            !self.owner_id.trim().is_empty(),
            "Transaction {} has no owner",
            self.id
        );
        check_amount(self.amount)?;
        ensure!(
            !self.description.trim().is_empty(),
            "Description is required"
        );
        ensure!(
            normalize_label(&self.category).as_deref() == Some(self.category.as_str()),
            "Invalid category '{}' on transaction {}",
            self.category,
            self.id
        );
        Ok(())
    }
}

/// What a user submits. Turned into a `Transaction` by `NewTransaction::build`, which validates
/// the fields and fills in the category when none was given.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub amount: Amount,
    pub description: String,
    #[serde(default)]
    pub kind: TransactionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurred_at: Option<DateTime<Utc>>,
}

impl NewTransaction {
    pub fn new(amount: Amount, description: impl Into<String>, kind: TransactionKind) -> Self {
        Self {
            amount,
            description: description.into(),
            kind,
            category: None,
            occurred_at: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_occurred_at(mut self, occurred_at: DateTime<Utc>) -> Self {
        self.occurred_at = Some(occurred_at);
        self
    }

    /// Validates the submission and produces a `Transaction` with a fresh id.
    ///
    /// # Errors
    /// - The amount is zero or negative.
    /// - The amount is above 10^15 or has more than two decimal places.
    /// - The description is empty after trimming.
    pub fn build(
        self,
        owner_id: &str,
        classifier: &Classifier,
        now: DateTime<Utc>,
    ) -> Result<Transaction> {
        check_amount(self.amount)?;
        let description = self.description.trim().to_string();
        ensure!(!description.is_empty(), "Description is required");

        let category = match self.category.as_deref().and_then(normalize_label) {
            Some(label) => label,
            None => classifier.classify(&description, self.kind),
        };

        Ok(Transaction {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            amount: self.amount,
            description,
            category,
            kind: self.kind,
            occurred_at: self.occurred_at.unwrap_or(now),
        })
    }
}

fn check_amount(amount: Amount) -> Result<()> {
    ensure!(
        amount.is_positive(),
        "Amount must be greater than zero, got {amount}"
    );
    ensure!(
        amount.is_within_bounds(),
        "Amount must be at most 1,000,000,000,000,000 with at most two decimal places, got {}",
        amount.value()
    );
    Ok(())
}
