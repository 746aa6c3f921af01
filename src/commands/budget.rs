//! Budget command handlers.

use crate::args::SetLimitArgs;
use crate::budget::{aggregate, BudgetReport};
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::model::BudgetCategory;
use crate::{Config, Result};
use std::fmt::Write;
use tracing::warn;

/// Adds a budget category or changes the limit of an existing one.
pub async fn set_budget_limit(config: Config, args: SetLimitArgs) -> Result<Out<BudgetCategory>> {
    let category = BudgetCategory::new(&args.category, args.limit).pub_result(ErrorType::Request)?;
    let previous = config
        .store()
        .set_budget_limit(config.owner(), category.clone())
        .await
        .pub_result(ErrorType::Store)?;

    let message = match previous {
        Some(previous) => format!(
            "Changed the {} limit from {previous} to {}",
            category.name(),
            category.limit()
        ),
        None => format!(
            "Added budget category {} with a limit of {}",
            category.name(),
            category.limit()
        ),
    };
    Ok(Out::new(message, category))
}

/// Reports spending against every budget category of the owner.
pub async fn budget_report(config: Config) -> Result<Out<BudgetReport>> {
    let store = config.store();
    let transactions = store
        .list_transactions(config.owner())
        .await
        .pub_result(ErrorType::Store)?;
    let categories = store
        .list_budget_categories(config.owner())
        .await
        .pub_result(ErrorType::Store)?;

    let report = aggregate(&transactions, &categories);
    for over in report.over_budget() {
        warn!(
            "{} is over budget: spent {} of {}",
            over.name, over.spent, over.limit
        );
    }
    Ok(Out::new(render(&report), report))
}

fn render(report: &BudgetReport) -> String {
    if report.per_category.is_empty() && report.uncategorized.is_empty() {
        return "No budget categories or expenses yet".to_string();
    }
    let mut s = format!(
        "{:<16}{:>12}{:>12}{:>12}{:>8}  status",
        "category", "limit", "spent", "remaining", "used"
    );
    for c in &report.per_category {
        let _ = write!(
            s,
            "\n{:<16}{:>12.2}{:>12.2}{:>12.2}{:>8}  {}",
            c.name,
            c.limit,
            c.spent,
            c.remaining,
            c.progress.to_string(),
            c.status
        );
    }
    let _ = write!(
        s,
        "\n{:<16}{:>12.2}{:>12.2}{:>12.2}",
        "total",
        report.totals.total_budget,
        report.totals.total_spent,
        report.totals.total_remaining
    );
    if !report.uncategorized.is_empty() {
        let _ = write!(
            s,
            "\nSpent outside any budget: {:.2}",
            report.uncategorized_spend
        );
        for u in &report.uncategorized {
            let _ = write!(s, "\n  {:<14}{:>12.2}", u.category, u.spent);
        }
    }
    s
}
