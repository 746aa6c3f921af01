use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::summary::{daily_flows, spending_by_category, summarize, DailyFlow, Summary};
use crate::{Config, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Everything `budget summary` reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryReport {
    pub summary: Summary,
    pub by_category: Vec<(String, Decimal)>,
    pub daily: Vec<DailyFlow>,
}

/// Totals income and expenses, breaks spending down by category and shows the daily cash flow.
pub async fn summary(config: Config) -> Result<Out<SummaryReport>> {
    let transactions = config
        .store()
        .list_transactions(config.owner())
        .await
        .pub_result(ErrorType::Store)?;

    let report = SummaryReport {
        summary: summarize(&transactions),
        by_category: spending_by_category(&transactions),
        daily: daily_flows(&transactions),
    };
    Ok(Out::new(render(&report), report))
}

fn render(report: &SummaryReport) -> String {
    let s = &report.summary;
    let mut out = format!(
        "Income {:.2} ({}), expenses {:.2} ({}), balance {:.2}, savings rate {:.1}%",
        s.total_income,
        s.income_count,
        s.total_expenses,
        s.expense_count,
        s.balance,
        s.savings_rate
    );
    if !report.by_category.is_empty() {
        out.push_str("\nSpending by category:");
        for (category, spent) in &report.by_category {
            let _ = write!(out, "\n  {category:<14}{spent:>12.2}");
        }
    }
    if !report.daily.is_empty() {
        let _ = write!(
            out,
            "\n{:<12}{:>12}{:>12}{:>12}{:>12}",
            "date", "income", "expense", "net", "balance"
        );
        for d in &report.daily {
            let _ = write!(
                out,
                "\n{:<12}{:>12.2}{:>12.2}{:>12.2}{:>12.2}",
                d.date.to_string(),
                d.income,
                d.expense,
                d.net,
                d.running_balance
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TransactionKind;
    use crate::test::TestEnv;
    use chrono::{TimeZone, Utc};

    #[tokio::test]
    async fn test_summary_command() {
        let env = TestEnv::new().await;
        let day1 = Utc.with_ymd_and_hms(2025, 4, 1, 10, 0, 0).unwrap();
        let day2 = Utc.with_ymd_and_hms(2025, 4, 2, 10, 0, 0).unwrap();
        env.insert_transaction("1000", "Salary", TransactionKind::Income, day1)
            .await;
        env.insert_transaction("200", "Bigbasket order", TransactionKind::Expense, day1)
            .await;
        env.insert_transaction("50", "Coffee", TransactionKind::Expense, day2)
            .await;

        let out = summary(env.config()).await.unwrap();
        let report = out.structure().unwrap();
        assert_eq!(report.summary.balance, Decimal::from(750));
        assert_eq!(report.summary.savings_rate, Decimal::from(75));
        assert_eq!(report.by_category[0], ("groceries".to_string(), Decimal::from(200)));
        assert_eq!(report.daily.len(), 2);
        assert_eq!(report.daily[1].running_balance, Decimal::from(750));
        assert!(out.message().starts_with("Income 1000.00 (1)"));
    }

    #[tokio::test]
    async fn test_summary_empty() {
        let env = TestEnv::new().await;
        let out = summary(env.config()).await.unwrap();
        let report = out.structure().unwrap();
        assert_eq!(report.summary, Summary::default());
        assert!(report.daily.is_empty());
    }
}
