//! Income and expense totals and day-by-day cash flow.

use crate::model::{Transaction, TransactionKind};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    /// `total_income - total_expenses`.
    pub balance: Decimal,
    /// `balance` as a percentage of `total_income`; zero when there is no income.
    pub savings_rate: Decimal,
    pub income_count: usize,
    pub expense_count: usize,
}

pub fn summarize(transactions: &[Transaction]) -> Summary {
    let mut summary = Summary::default();
    for t in transactions {
        match t.kind() {
            TransactionKind::Income => {
                summary.total_income += t.amount().value();
                summary.income_count += 1;
            }
            TransactionKind::Expense => {
                summary.total_expenses += t.amount().value();
                summary.expense_count += 1;
            }
        }
    }
    summary.balance = summary.total_income - summary.total_expenses;
    if summary.total_income > Decimal::ZERO {
        summary.savings_rate = summary.balance / summary.total_income * Decimal::ONE_HUNDRED;
    }
    summary
}

/// Money in and out on one calendar day (UTC).
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct DailyFlow {
    pub date: NaiveDate,
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
    /// The sum of `net` for this day and every earlier day.
    pub running_balance: Decimal,
}

/// Groups transactions by day, earliest first. Days without transactions are omitted.
pub fn daily_flows(transactions: &[Transaction]) -> Vec<DailyFlow> {
    let mut days: BTreeMap<NaiveDate, (Decimal, Decimal)> = BTreeMap::new();
    for t in transactions {
        let (income, expense) = days.entry(t.occurred_at().date_naive()).or_default();
        match t.kind() {
            TransactionKind::Income => *income += t.amount().value(),
            TransactionKind::Expense => *expense += t.amount().value(),
        }
    }

    let mut running_balance = Decimal::ZERO;
    days.into_iter()
        .map(|(date, (income, expense))| {
            let net = income - expense;
            running_balance += net;
            DailyFlow {
                date,
                income,
                expense,
                net,
                running_balance,
            }
        })
        .collect()
}

/// Total expense per category label, largest first. Ties are ordered by label.
pub fn spending_by_category(transactions: &[Transaction]) -> Vec<(String, Decimal)> {
    let mut by_label: BTreeMap<&str, Decimal> = BTreeMap::new();
    for t in transactions.iter().filter(|t| t.is_expense()) {
        *by_label.entry(t.category()).or_default() += t.amount().value();
    }
    let mut spending: Vec<(String, Decimal)> = by_label
        .into_iter()
        .map(|(label, spent)| (label.to_string(), spent))
        .collect();
    // The BTreeMap already ordered by label and sort_by is stable.
    spending.sort_by(|a, b| b.1.cmp(&a.1));
    spending
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Classifier;
    use crate::model::{Amount, NewTransaction};
    use chrono::{DateTime, TimeZone, Utc};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, day, hour, 0, 0).unwrap()
    }

    fn txn(amount: &str, description: &str, kind: TransactionKind, when: DateTime<Utc>) -> Transaction {
        NewTransaction::new(Amount::from_str(amount).unwrap(), description, kind)
            .with_occurred_at(when)
            .build("me", &Classifier::default(), when)
            .unwrap()
    }

    fn sample() -> Vec<Transaction> {
        vec![
            txn("50000", "salary", TransactionKind::Income, at(1, 9)),
            txn("1200.50", "grocery store", TransactionKind::Expense, at(1, 18)),
            txn("300", "uber", TransactionKind::Expense, at(3, 8)),
            txn("450", "dinner", TransactionKind::Expense, at(2, 20)),
            txn("99.50", "milk", TransactionKind::Expense, at(3, 7)),
        ]
    }

    #[test]
    fn test_summarize_largest_allowed_values() {
        let max = "1,000,000,000,000,000";
        let mut transactions: Vec<Transaction> = (0..1000)
            .map(|_| txn(max, "rent", TransactionKind::Expense, at(1, 9)))
            .collect();
        transactions.push(txn("0.01", "salary", TransactionKind::Income, at(1, 9)));

        let s = summarize(&transactions);
        assert_eq!(s.total_expenses, dec("1000000000000000000"));
        assert!(s.savings_rate < Decimal::ZERO);
        let flows = daily_flows(&transactions);
        assert_eq!(flows[0].running_balance, s.balance);
    }

    #[test]
    fn test_summarize() {
        let s = summarize(&sample());
        assert_eq!(s.total_income, dec("50000"));
        assert_eq!(s.total_expenses, dec("2050"));
        assert_eq!(s.balance, dec("47950"));
        assert_eq!(s.savings_rate, dec("95.9"));
        assert_eq!(s.income_count, 1);
        assert_eq!(s.expense_count, 4);
    }

    #[test]
    fn test_summarize_without_income() {
        let s = summarize(&[txn("10", "tea", TransactionKind::Expense, at(1, 1))]);
        assert_eq!(s.balance, dec("-10"));
        assert_eq!(s.savings_rate, Decimal::ZERO);
    }

    #[test]
    fn test_daily_flows() {
        let flows = daily_flows(&sample());
        let days: Vec<u32> = flows.iter().map(|f| chrono::Datelike::day(&f.date)).collect();
        assert_eq!(days, [1, 2, 3]);
        assert_eq!(flows[0].net, dec("48799.50"));
        assert_eq!(flows[1].expense, dec("450"));
        assert_eq!(flows[2].expense, dec("399.50"));
        assert_eq!(flows[2].running_balance, dec("47950"));
    }

    #[test]
    fn test_spending_by_category() {
        let spending = spending_by_category(&sample());
        assert_eq!(
            spending,
            vec![
                ("groceries".to_string(), dec("1300")),
                ("food".to_string(), dec("450")),
                ("transport".to_string(), dec("300")),
            ]
        );
    }

    #[test]
    fn test_empty() {
        assert_eq!(summarize(&[]), Summary::default());
        assert!(daily_flows(&[]).is_empty());
        assert!(spending_by_category(&[]).is_empty());
    }
}
