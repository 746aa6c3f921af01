use crate::utils;
use crate::Result;
use anyhow::ensure;
use chrono::{DateTime, Utc};
use clap::Parser;
use serde::{Deserialize, Serialize};

/// The kinds of obligation a reminder can be filed under.
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
pub enum ReminderCategory {
    Utilities,
    Rent,
    Subscriptions,
    Insurance,
    #[default]
    Other,
}

serde_plain::derive_display_from_serialize!(ReminderCategory);
serde_plain::derive_fromstr_from_deserialize!(ReminderCategory);

/// Something the owner needs to pay or do by `due_date`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Reminder {
    pub(crate) id: String,
    pub(crate) owner_id: String,
    pub(crate) title: String,
    pub(crate) due_date: DateTime<Utc>,
    #[serde(default)]
    pub(crate) category: ReminderCategory,
    #[serde(default)]
    pub(crate) is_completed: bool,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl Reminder {
    /// Creates an incomplete reminder with a fresh id.
    ///
    /// # Errors
    /// - The title is empty after trimming.
    pub fn new(
        owner_id: &str,
        title: &str,
        due_date: DateTime<Utc>,
        category: ReminderCategory,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let title = title.trim();
        ensure!(!title.is_empty(), "A reminder needs a title");
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            title: title.to_string(),
            due_date,
            category,
            is_completed: false,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn due_date(&self) -> DateTime<Utc> {
        self.due_date
    }

    pub fn category(&self) -> ReminderCategory {
        self.category
    }

    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Checks the rules that `new` enforces. Used on records read from disk.
    pub(crate) fn validate(&self) -> Result<()> {
        ensure!(!self.id.trim().is_empty(), "A reminder needs an id");
        ensure!(
            !self.owner_id.trim().is_empty(),
            "Reminder {} has no owner",
            self.id
        );
        ensure!(
            !self.title.trim().is_empty(),
            "Reminder {} needs a title",
            self.id
        );
        Ok(())
    }

    /// Flips the completion flag.
    pub fn toggle(&mut self, now: DateTime<Utc>) {
        self.is_completed = !self.is_completed;
        self.updated_at = now;
    }

    /// Set any of the fields on `self` that are set in `update`. `updated_at` moves to `now` even
    /// when nothing else changed.
    ///
    /// # Errors
    /// - The new title is empty after trimming. Nothing is changed in that case.
    pub fn merge_updates(&mut self, update: ReminderUpdates, now: DateTime<Utc>) -> Result<()> {
        if let Some(title) = &update.title {
            ensure!(!title.trim().is_empty(), "A reminder needs a title");
        }
        if let Some(x) = update.title {
            self.title = x.trim().to_string();
        }
        if let Some(x) = update.due {
            self.due_date = x;
        }
        if let Some(x) = update.category {
            self.category = x;
        }
        if let Some(x) = update.completed {
            self.is_completed = x;
        }
        self.updated_at = now;
        Ok(())
    }
}

/// The fields to update on a reminder. Only set values will be changed, unset values will not be
/// changed.
#[derive(Debug, Default, Clone, Parser, Serialize, Deserialize)]
pub struct ReminderUpdates {
    /// A new title.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[arg(long)]
    pub title: Option<String>,

    /// A new due date, either RFC 3339 (`2025-03-01T09:00:00Z`), `YYYY-MM-DDTHH:MM` or
    /// `YYYY-MM-DD`. Dates without an offset are taken as UTC.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[arg(long, value_parser = utils::parse_datetime)]
    pub due: Option<DateTime<Utc>>,

    /// A new category.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[arg(long, value_enum)]
    pub category: Option<ReminderCategory>,

    /// Mark the reminder as completed (`true`) or not (`false`).
    #[serde(skip_serializing_if = "Option::is_none")]
    #[arg(long)]
    pub completed: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use std::str::FromStr;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
    }

    fn reminder() -> Reminder {
        Reminder::new("me", " Rent ", t0(), ReminderCategory::Rent, t0()).unwrap()
    }

    #[test]
    fn test_new_trims_and_defaults() {
        let r = reminder();
        assert_eq!(r.title(), "Rent");
        assert!(!r.is_completed());
        assert_eq!(r.created_at(), r.updated_at());
    }

    #[test]
    fn test_new_rejects_empty_title() {
        assert!(Reminder::new("me", "  ", t0(), ReminderCategory::Other, t0()).is_err());
    }

    #[test]
    fn test_validate_catches_blank_title() {
        let mut r = Reminder::new("me", "rent", t0(), ReminderCategory::Rent, t0()).unwrap();
        assert!(r.validate().is_ok());
        r.title = " ".to_string();
        assert!(r.validate().is_err());
    }

    #[test]
    fn test_toggle_refreshes_updated_at() {
        let mut r = reminder();
        let later = t0() + Duration::minutes(5);
        r.toggle(later);
        assert!(r.is_completed());
        assert_eq!(r.updated_at(), later);
        r.toggle(later);
        assert!(!r.is_completed());
    }

    #[test]
    fn test_merge_updates_only_set_fields() {
        let mut r = reminder();
        let later = t0() + Duration::hours(1);
        let update = ReminderUpdates {
            category: Some(ReminderCategory::Utilities),
            ..Default::default()
        };
        r.merge_updates(update, later).unwrap();
        assert_eq!(r.title(), "Rent");
        assert_eq!(r.due_date(), t0());
        assert_eq!(r.category(), ReminderCategory::Utilities);
        assert_eq!(r.updated_at(), later);
    }

    #[test]
    fn test_merge_updates_rejects_blank_title() {
        let mut r = reminder();
        let update = ReminderUpdates {
            title: Some(" ".into()),
            completed: Some(true),
            ..Default::default()
        };
        assert!(r.merge_updates(update, t0()).is_err());
        assert!(!r.is_completed());
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(
            ReminderCategory::from_str("subscriptions").unwrap(),
            ReminderCategory::Subscriptions
        );
        assert!(ReminderCategory::from_str("groceries").is_err());
        assert_eq!(ReminderCategory::default().to_string(), "other");
    }
}
