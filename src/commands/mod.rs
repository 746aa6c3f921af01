//! Command handlers for the budget CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod budget;
mod classify;
mod import;
mod init;
mod reminder;
mod summary;
mod transaction;

use crate::reminders::plural;
use anyhow::Context;
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

pub use budget::{budget_report, set_budget_limit};
pub use classify::classify;
pub use import::{import_csv, ImportReport};
pub use init::init;
pub use reminder::{
    add_reminder, delete_reminder, list_reminders, reminder_alerts, toggle_reminder,
    update_reminder, watch_reminders,
};
pub use summary::{summary, SummaryReport};
pub use transaction::{add_transaction, delete_transaction, list_transactions};

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data that can be printed as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }

    /// With `json`, writes the structured data to stdout so it can be piped. Otherwise the same
    /// as `print`.
    pub fn print_or_json(&self, json: bool) -> crate::Result<()> {
        if !json {
            self.print();
            return Ok(());
        }
        let json = match self.structure() {
            Some(structure) => serde_json::to_string_pretty(structure),
            None => serde_json::to_string_pretty(&self.message),
        }
        .context("Unable to serialize command output")?;
        println!("{json}");
        Ok(())
    }
}
