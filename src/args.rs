//! These structs provide the CLI interface for the budget CLI.

use crate::model::{Amount, ReminderCategory, ReminderUpdates, TransactionKind};
use crate::utils;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// budget: record income and expenses, keep an eye on budgets, and never miss a bill.
///
/// Expenses recorded without a category are classified from their description. Budget limits are
/// set per category and reports show how much of each limit has been used. Reminders become
/// urgent 24 hours before they are due and overdue after that.
///
/// Run `budget init` once to create the data directory.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory, the configuration file and an empty store.
    Init(InitArgs),
    /// Add, list or delete income and expense transactions.
    Transaction(TransactionArgs),
    /// Show which category a description would be classified into, without saving anything.
    Classify(ClassifyArgs),
    /// Set budget limits and report spending against them.
    Budget(BudgetArgs),
    /// Manage bill and payment reminders and see which need attention.
    Reminder(ReminderArgs),
    /// Show total income, expenses, balance and daily cash flow.
    Summary(OutputArgs),
    /// Import transactions from a CSV file with the headers
    /// `date,description,amount,kind,category` (`kind` and `category` may be omitted or blank).
    Import(ImportArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where data and configuration is held. Defaults to ~/budget-buddy
    #[arg(long, env = "BUDGET_HOME", default_value_t = default_budget_home())]
    budget_home: DisplayPath,
}

impl Common {
    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn budget_home(&self) -> &DisplayPath {
        &self.budget_home
    }
}

/// Args for the `budget init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The owner id that records are filed under. Defaults to `me`.
    #[arg(long)]
    owner: Option<String>,
}

impl InitArgs {
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }
}

/// Controls whether structured output is printed to stdout.
#[derive(Debug, Default, Parser, Clone)]
pub struct OutputArgs {
    /// Print the result as JSON to stdout.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Parser, Clone)]
pub struct TransactionArgs {
    #[command(subcommand)]
    action: TransactionSubcommand,
}

impl TransactionArgs {
    pub fn action(&self) -> &TransactionSubcommand {
        &self.action
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum TransactionSubcommand {
    /// Record a transaction. Expenses without --category are classified from the description.
    Add(AddTransactionArgs),
    /// List transactions, newest first.
    List(OutputArgs),
    /// Delete a transaction by id.
    Delete(IdArgs),
}

/// Args for `budget transaction add`.
#[derive(Debug, Parser, Clone)]
pub struct AddTransactionArgs {
    /// The amount, greater than zero, e.g. `250` or `1,299.50`.
    #[arg(long, value_parser = utils::parse_amount)]
    pub amount: Amount,

    /// What the money was for, e.g. `Lunch at cafe`.
    #[arg(long)]
    pub description: String,

    /// Whether this is an expense or income.
    #[arg(long, value_enum, default_value_t = TransactionKind::Expense)]
    pub kind: TransactionKind,

    /// The category label. If omitted it is derived from the description.
    #[arg(long)]
    pub category: Option<String>,

    /// When the transaction happened. Defaults to now.
    #[arg(long, value_parser = utils::parse_datetime)]
    pub date: Option<DateTime<Utc>>,
}

/// Args for `budget classify`.
#[derive(Debug, Parser, Clone)]
pub struct ClassifyArgs {
    /// The description to classify.
    #[arg(long)]
    pub description: String,

    #[arg(long, value_enum, default_value_t = TransactionKind::Expense)]
    pub kind: TransactionKind,
}

#[derive(Debug, Parser, Clone)]
pub struct BudgetArgs {
    #[command(subcommand)]
    action: BudgetSubcommand,
}

impl BudgetArgs {
    pub fn action(&self) -> &BudgetSubcommand {
        &self.action
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum BudgetSubcommand {
    /// Set the limit for a category, adding the category if it is new.
    Set(SetLimitArgs),
    /// Show spent, remaining and status for every budget category.
    Report(OutputArgs),
}

/// Args for `budget budget set`.
#[derive(Debug, Parser, Clone)]
pub struct SetLimitArgs {
    /// The category label, e.g. `groceries`.
    #[arg(long)]
    pub category: String,

    /// The limit, zero or more.
    #[arg(long, value_parser = utils::parse_amount)]
    pub limit: Amount,
}

#[derive(Debug, Parser, Clone)]
pub struct ReminderArgs {
    #[command(subcommand)]
    action: ReminderSubcommand,
}

impl ReminderArgs {
    pub fn action(&self) -> &ReminderSubcommand {
        &self.action
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum ReminderSubcommand {
    /// Add a reminder.
    Add(AddReminderArgs),
    /// Change some fields of a reminder.
    Update(UpdateReminderArgs),
    /// Mark a reminder completed, or not completed if it already was.
    Toggle(IdArgs),
    /// Delete a reminder by id.
    Delete(IdArgs),
    /// List reminders by due date with their urgency.
    List(OutputArgs),
    /// Show only the reminders that are urgent or overdue.
    Alerts(OutputArgs),
    /// Check reminders periodically and log alerts until interrupted.
    Watch(WatchArgs),
}

/// Args for `budget reminder add`.
#[derive(Debug, Parser, Clone)]
pub struct AddReminderArgs {
    /// What needs doing, e.g. `Electricity bill`.
    #[arg(long)]
    pub title: String,

    /// When it is due: RFC 3339, `YYYY-MM-DDTHH:MM` or `YYYY-MM-DD` (UTC when no offset is given).
    #[arg(long, value_parser = utils::parse_datetime)]
    pub due: DateTime<Utc>,

    #[arg(long, value_enum, default_value_t = ReminderCategory::Other)]
    pub category: ReminderCategory,
}

/// Args for `budget reminder update`.
#[derive(Debug, Parser, Clone)]
pub struct UpdateReminderArgs {
    /// The id of the reminder to update.
    pub id: String,

    #[command(flatten)]
    pub updates: ReminderUpdates,
}

/// Args for `budget reminder watch`.
#[derive(Debug, Parser, Clone)]
pub struct WatchArgs {
    /// Seconds between checks. Defaults to `poll_interval_secs` from the config file.
    #[arg(long)]
    pub interval: Option<u64>,

    /// Stop after this many checks. Runs until interrupted when omitted.
    #[arg(long)]
    pub count: Option<u64>,
}

/// Args for commands that act on a single record.
#[derive(Debug, Parser, Clone)]
pub struct IdArgs {
    /// The record id, as shown by the corresponding `list` command.
    pub id: String,
}

/// Args for `budget import`.
#[derive(Debug, Parser, Clone)]
pub struct ImportArgs {
    /// The CSV file to read.
    #[arg(long, short = 'f')]
    pub file: PathBuf,
}

fn default_budget_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("budget-buddy"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --budget-home or BUDGET_HOME instead of relying on the default \
                directory. If you continue using the program right now, you may have problems!",
            );
            PathBuf::from("budget-buddy")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        let mut argv = vec!["budget", "--budget-home", "/tmp/budget-test"];
        argv.extend_from_slice(args);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_transaction_add_defaults() {
        let args = parse(&["transaction", "add", "--amount", "1,200", "--description", "rent"]);
        let Command::Transaction(t) = args.command() else {
            panic!("wrong command")
        };
        let TransactionSubcommand::Add(add) = t.action() else {
            panic!("wrong action")
        };
        assert_eq!(add.amount.to_string(), "1,200.00");
        assert_eq!(add.kind, TransactionKind::Expense);
        assert!(add.category.is_none());
        assert!(add.date.is_none());
        assert_eq!(args.common().log_level(), LevelFilter::INFO);
        assert_eq!(args.common().budget_home().path(), Path::new("/tmp/budget-test"));
    }

    #[test]
    fn test_reminder_update_flattens_fields() {
        let args = parse(&[
            "reminder",
            "update",
            "abc",
            "--category",
            "insurance",
            "--completed",
            "true",
        ]);
        let Command::Reminder(r) = args.command() else {
            panic!("wrong command")
        };
        let ReminderSubcommand::Update(update) = r.action() else {
            panic!("wrong action")
        };
        assert_eq!(update.id, "abc");
        assert_eq!(update.updates.category, Some(ReminderCategory::Insurance));
        assert_eq!(update.updates.completed, Some(true));
        assert!(update.updates.title.is_none());
    }

    #[test]
    fn test_bad_values_rejected() {
        let base = ["budget", "reminder", "add", "--title", "x", "--due"];
        assert!(Args::try_parse_from(base.iter().chain(&["soon"])).is_err());
        assert!(Args::try_parse_from([
            "budget",
            "transaction",
            "add",
            "--amount",
            "lots",
            "--description",
            "x"
        ])
        .is_err());
        assert!(Args::try_parse_from([
            "budget",
            "reminder",
            "add",
            "--title",
            "x",
            "--due",
            "2025-01-01",
            "--category",
            "groceries"
        ])
        .is_err());
    }

    #[test]
    fn test_init_owner_and_log_level() {
        let args = parse(&["--log-level", "debug", "init", "--owner", "asha"]);
        let Command::Init(init) = args.command() else {
            panic!("wrong command")
        };
        assert_eq!(init.owner(), Some("asha"));
        assert_eq!(args.common().log_level(), LevelFilter::DEBUG);

        let args = parse(&["init"]);
        let Command::Init(init) = args.command() else {
            panic!("wrong command")
        };
        assert!(init.owner().is_none());
    }
}
