use crate::model::{normalize_label, Amount};
use crate::Result;
use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};

/// The spending ceiling an owner has set for one category label.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BudgetCategory {
    pub(crate) name: String,
    pub(crate) limit: Amount,
}

impl BudgetCategory {
    /// Creates a budget line. The name is normalized the same way transaction categories are so
    /// that `Groceries` and `groceries` refer to the same budget.
    ///
    /// # Errors
    /// - The name is empty.
    /// - The limit is negative, above 10^15 or has more than two decimal places.
    pub fn new(name: &str, limit: Amount) -> Result<Self> {
        let name = normalize_label(name).context("A budget category needs a name")?;
        let category = Self { name, limit };
        category.validate()?;
        Ok(category)
    }

    /// Checks the rules that `new` enforces. Used on records read from disk.
    pub(crate) fn validate(&self) -> Result<()> {
        let name = &self.name;
        let limit = self.limit;
        ensure!(
            normalize_label(name).as_deref() == Some(name.as_str()),
            "Invalid budget category name '{name}'"
        );
        ensure!(
            !limit.is_negative(),
            "The limit for '{name}' cannot be negative, got {limit}"
        );
        ensure!(
            limit.is_within_bounds(),
            "The limit for '{name}' must be at most 1,000,000,000,000,000 with at most two \
            decimal places, got {}",
            limit.value()
        );
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn limit(&self) -> Amount {
        self.limit
    }
}

/// Inserts `category` into `categories`, replacing the limit of an existing entry with the same
/// name. Returns the previous limit if there was one.
pub(crate) fn upsert(categories: &mut Vec<BudgetCategory>, category: BudgetCategory) -> Option<Amount> {
    match categories.iter_mut().find(|c| c.name == category.name) {
        Some(existing) => Some(std::mem::replace(&mut existing.limit, category.limit)),
        None => {
            categories.push(category);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_new_normalizes_name() {
        let c = BudgetCategory::new(" Groceries ", Amount::from_str("500").unwrap()).unwrap();
        assert_eq!(c.name(), "groceries");
    }

    #[test]
    fn test_new_rejects_negative_limit() {
        let err = BudgetCategory::new("food", Amount::from_str("-1").unwrap()).unwrap_err();
        assert!(err.to_string().contains("cannot be negative"));
    }

    #[test]
    fn test_new_rejects_out_of_range_limit() {
        for limit in ["100000000000000000000", "0.0000001"] {
            let err = BudgetCategory::new("food", Amount::from_str(limit).unwrap()).unwrap_err();
            assert!(err.to_string().contains("at most"), "{limit}: {err}");
        }
    }

    #[test]
    fn test_validate_catches_unnormalized_name() {
        let mut c = BudgetCategory::new("food", Amount::ZERO).unwrap();
        c.name = "Food ".to_string();
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_new_allows_zero_limit() {
        assert!(BudgetCategory::new("food", Amount::ZERO).is_ok());
    }

    #[test]
    fn test_new_rejects_empty_name() {
        assert!(BudgetCategory::new("  ", Amount::ZERO).is_err());
    }

    #[test]
    fn test_upsert_keeps_names_unique() {
        let mut set = Vec::new();
        let a = BudgetCategory::new("food", Amount::from_str("100").unwrap()).unwrap();
        let b = BudgetCategory::new("FOOD", Amount::from_str("250").unwrap()).unwrap();
        assert_eq!(upsert(&mut set, a), None);
        assert_eq!(upsert(&mut set, b), Some(Amount::from_str("100").unwrap()));
        assert_eq!(set.len(), 1);
        assert_eq!(set[0].limit(), Amount::from_str("250").unwrap());
    }
}
