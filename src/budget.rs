//! Aggregation of expense transactions against per-category budget limits.
//!
//! `aggregate` is pure: it takes snapshots of an owner's transactions and budget categories and
//! produces a report. All arithmetic happens in `Decimal`.

use crate::model::{BudgetCategory, Transaction};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Progress above this percentage is `NearLimit`.
const NEAR_LIMIT_PERCENT: u8 = 80;

/// Progress above this percentage is `OverBudget`.
const OVER_BUDGET_PERCENT: u8 = 100;

/// How much of a limit has been used.
///
/// A zero limit cannot be divided by. With no spending its progress is `Percent(0)`; with any
/// spending it is `Unbounded`, which always counts as over budget. A percentage too large for
/// `Decimal` is also `Unbounded`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Progress {
    Percent(Decimal),
    Unbounded,
}

impl Progress {
    fn of(spent: Decimal, limit: Decimal) -> Self {
        if limit.is_zero() {
            if spent > Decimal::ZERO {
                Progress::Unbounded
            } else {
                Progress::Percent(Decimal::ZERO)
            }
        } else {
            spent
                .checked_div(limit)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .map_or(Progress::Unbounded, Progress::Percent)
        }
    }

    /// The percentage, or `None` when unbounded.
    pub fn percent(&self) -> Option<Decimal> {
        match self {
            Progress::Percent(p) => Some(*p),
            Progress::Unbounded => None,
        }
    }
}

impl Display for Progress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Progress::Percent(p) => write!(f, "{}%", p.round_dp(0)),
            Progress::Unbounded => write!(f, "∞"),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    OnTrack,
    NearLimit,
    OverBudget,
}

serde_plain::derive_display_from_serialize!(BudgetStatus);
serde_plain::derive_fromstr_from_deserialize!(BudgetStatus);

impl BudgetStatus {
    /// Over is checked first, so exactly 100% is `NearLimit` and exactly 80% is `OnTrack`.
    pub fn from_progress(progress: Progress) -> Self {
        match progress {
            Progress::Unbounded => BudgetStatus::OverBudget,
            Progress::Percent(p) if p > Decimal::from(OVER_BUDGET_PERCENT) => {
                BudgetStatus::OverBudget
            }
            Progress::Percent(p) if p > Decimal::from(NEAR_LIMIT_PERCENT) => {
                BudgetStatus::NearLimit
            }
            Progress::Percent(_) => BudgetStatus::OnTrack,
        }
    }
}

/// One budget line of a `BudgetReport`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct CategoryReport {
    pub name: String,
    pub limit: Decimal,
    pub spent: Decimal,
    /// `limit - spent`, negative when overspent.
    pub remaining: Decimal,
    pub progress: Progress,
    pub status: BudgetStatus,
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub total_budget: Decimal,
    pub total_spent: Decimal,
    pub total_remaining: Decimal,
}

/// Spend on a label that has no budget line.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct UncategorizedSpend {
    pub category: String,
    pub spent: Decimal,
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct BudgetReport {
    /// In the same order as the budget categories that were passed in.
    pub per_category: Vec<CategoryReport>,
    pub totals: Totals,
    /// The sum of all expenses whose category has no budget line.
    pub uncategorized_spend: Decimal,
    /// `uncategorized_spend` broken down by label, sorted by label.
    pub uncategorized: Vec<UncategorizedSpend>,
}

impl BudgetReport {
    pub fn over_budget(&self) -> impl Iterator<Item = &CategoryReport> {
        self.per_category
            .iter()
            .filter(|c| c.status == BudgetStatus::OverBudget)
    }
}

/// Computes spent, remaining, progress and status for every budget category, plus totals.
///
/// Income transactions are ignored. Expenses on labels with no budget line are not dropped: they
/// show up in `uncategorized_spend`, so that every expense is counted exactly once.
pub fn aggregate(transactions: &[Transaction], categories: &[BudgetCategory]) -> BudgetReport {
    let mut spent_by_label: BTreeMap<&str, Decimal> = BTreeMap::new();
    for t in transactions.iter().filter(|t| t.is_expense()) {
        *spent_by_label.entry(t.category()).or_default() += t.amount().value();
    }

    let mut totals = Totals::default();
    let mut per_category = Vec::with_capacity(categories.len());
    for category in categories {
        let limit = category.limit().value();
        let spent = spent_by_label
            .remove(category.name())
            .unwrap_or(Decimal::ZERO);
        let progress = Progress::of(spent, limit);
        totals.total_budget += limit;
        totals.total_spent += spent;
        per_category.push(CategoryReport {
            name: category.name().to_string(),
            limit,
            spent,
            remaining: limit - spent,
            progress,
            status: BudgetStatus::from_progress(progress),
        });
    }
    totals.total_remaining = totals.total_budget - totals.total_spent;

    let uncategorized: Vec<UncategorizedSpend> = spent_by_label
        .into_iter()
        .map(|(category, spent)| UncategorizedSpend {
            category: category.to_string(),
            spent,
        })
        .collect();
    let uncategorized_spend: Decimal = uncategorized.iter().map(|u| u.spent).sum();

    BudgetReport {
        per_category,
        totals,
        uncategorized_spend,
        uncategorized,
    }
}
