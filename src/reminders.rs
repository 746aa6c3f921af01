//! Urgency of reminders relative to a point in time.
//!
//! Every view of reminders (the list, the alert digest and the `watch` loop) goes through
//! `UrgencyState::at`, so they can never disagree about whether something is overdue.

use crate::model::Reminder;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// How far ahead of its due date a reminder becomes `Urgent`.
pub const URGENT_WINDOW_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UrgencyState {
    /// Due more than 24 hours from now.
    Upcoming,
    /// Due within the next 24 hours, including exactly now.
    Urgent,
    /// Due strictly before now.
    Overdue,
    /// Done. Time no longer matters.
    Completed,
}

serde_plain::derive_display_from_serialize!(UrgencyState);
serde_plain::derive_fromstr_from_deserialize!(UrgencyState);

impl UrgencyState {
    /// The state of an obligation due at `due_date` as seen at `now`.
    pub fn at(due_date: DateTime<Utc>, is_completed: bool, now: DateTime<Utc>) -> Self {
        if is_completed {
            UrgencyState::Completed
        } else if due_date < now {
            UrgencyState::Overdue
        } else if due_date - now <= Duration::hours(URGENT_WINDOW_HOURS) {
            UrgencyState::Urgent
        } else {
            UrgencyState::Upcoming
        }
    }

    pub fn of(reminder: &Reminder, now: DateTime<Utc>) -> Self {
        Self::at(reminder.due_date(), reminder.is_completed(), now)
    }

    /// Whether a reminder in this state should be surfaced as an alert.
    pub fn is_notify_worthy(&self) -> bool {
        matches!(self, UrgencyState::Urgent | UrgencyState::Overdue)
    }
}

/// A reminder together with its evaluated state.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ReminderStatus {
    pub reminder: Reminder,
    pub state: UrgencyState,
    pub notify_worthy: bool,
}

/// Evaluates every reminder against the same `now`, preserving input order.
pub fn compute_reminder_states(reminders: &[Reminder], now: DateTime<Utc>) -> Vec<ReminderStatus> {
    reminders
        .iter()
        .map(|reminder| {
            let state = UrgencyState::of(reminder, now);
            ReminderStatus {
                reminder: reminder.clone(),
                state,
                notify_worthy: state.is_notify_worthy(),
            }
        })
        .collect()
}

/// Sorts by due date, earliest first, with incomplete reminders ahead of completed ones that are
/// due at the same instant. The sort is stable, so sorting twice changes nothing.
pub fn sort_for_display(reminders: &mut [Reminder]) {
    reminders.sort_by_key(|r| (r.due_date(), r.is_completed()));
}

/// What an alerting surface needs to know after one evaluation.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct AlertDigest {
    /// The notify-worthy reminders in display order.
    pub alerts: Vec<ReminderStatus>,
    pub urgent: usize,
    pub overdue: usize,
    /// True when anything is overdue, which warrants a more insistent alert than a merely urgent
    /// reminder.
    pub escalate: bool,
}

impl AlertDigest {
    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn message(&self) -> String {
        match (self.urgent, self.overdue) {
            (0, 0) => "All caught up, no urgent reminders".to_string(),
            (u, 0) => format!("{u} urgent reminder{}", plural(u)),
            (0, o) => format!("{o} overdue reminder{}", plural(o)),
            (u, o) => format!(
                "{o} overdue and {u} urgent reminder{}",
                plural(o + u)
            ),
        }
    }
}

/// Builds the digest of notify-worthy reminders as of `now`.
pub fn alert_digest(reminders: &[Reminder], now: DateTime<Utc>) -> AlertDigest {
    let mut sorted = reminders.to_vec();
    sort_for_display(&mut sorted);
    let alerts: Vec<ReminderStatus> = compute_reminder_states(&sorted, now)
        .into_iter()
        .filter(|s| s.notify_worthy)
        .collect();
    let overdue = alerts
        .iter()
        .filter(|s| s.state == UrgencyState::Overdue)
        .count();
    let urgent = alerts.len() - overdue;
    AlertDigest {
        alerts,
        urgent,
        overdue,
        escalate: overdue > 0,
    }
}

pub(crate) fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
