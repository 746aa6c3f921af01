//! Reminder command handlers.
//!
//! The list, alerts and watch handlers sample the clock once per evaluation, so every reminder in
//! one listing is judged against the same instant.

use crate::args::{AddReminderArgs, UpdateReminderArgs, WatchArgs};
use crate::backup::PRE_DELETE;
use crate::commands::{plural, Out};
use crate::error::{ErrorType, IntoResult};
use crate::model::Reminder;
use crate::reminders::{alert_digest, compute_reminder_states, sort_for_display, AlertDigest};
use crate::reminders::{ReminderStatus, UrgencyState};
use crate::{Config, Result};
use anyhow::{anyhow, Context};
use chrono::{DateTime, Utc};
use std::fmt::Write;
use std::time::Duration;
use tracing::{debug, info, warn};

pub async fn add_reminder(config: Config, args: AddReminderArgs) -> Result<Out<Reminder>> {
    let reminder = Reminder::new(
        config.owner(),
        &args.title,
        args.due,
        args.category,
        Utc::now(),
    )
    .pub_result(ErrorType::Request)?;
    config
        .store()
        .save_reminder(reminder.clone())
        .await
        .pub_result(ErrorType::Store)?;
    let message = format!(
        "Added reminder '{}' due {} with ID: {}",
        reminder.title(),
        reminder.due_date().format("%Y-%m-%d %H:%M UTC"),
        reminder.id()
    );
    Ok(Out::new(message, reminder))
}

/// Changes the given fields of a reminder. Fields that are not set are left alone.
pub async fn update_reminder(config: Config, args: UpdateReminderArgs) -> Result<Out<Reminder>> {
    let mut reminder = find(&config, &args.id).await?;
    reminder
        .merge_updates(args.updates, Utc::now())
        .pub_result(ErrorType::Request)?;
    config
        .store()
        .save_reminder(reminder.clone())
        .await
        .pub_result(ErrorType::Store)?;
    Ok(Out::new(
        format!("Updated reminder '{}'", reminder.title()),
        reminder,
    ))
}

/// Flips the completion flag of a reminder.
pub async fn toggle_reminder(config: Config, id: &str) -> Result<Out<Reminder>> {
    let mut reminder = find(&config, id).await?;
    reminder.toggle(Utc::now());
    config
        .store()
        .save_reminder(reminder.clone())
        .await
        .pub_result(ErrorType::Store)?;
    let state = if reminder.is_completed() {
        "completed"
    } else {
        "not completed"
    };
    Ok(Out::new(
        format!("Marked '{}' as {state}", reminder.title()),
        reminder,
    ))
}

/// Deletes a reminder by id after saving a backup of the store.
pub async fn delete_reminder(config: Config, id: &str) -> Result<Out<Reminder>> {
    let snapshot = config.store().snapshot().await.pub_result(ErrorType::Store)?;
    let backup = config
        .backup()
        .save_json(PRE_DELETE, &snapshot)
        .await
        .pub_result(ErrorType::Store)?;
    debug!("Backed up the store to {}", backup.display());

    let deleted = config
        .store()
        .delete_reminder(config.owner(), id)
        .await
        .pub_result(ErrorType::Request)?;
    Ok(Out::new(
        format!("Deleted reminder '{}'", deleted.title()),
        deleted,
    ))
}

/// Lists every reminder with its urgency as of now.
pub async fn list_reminders(config: Config) -> Result<Out<Vec<ReminderStatus>>> {
    list_reminders_at(&config, Utc::now()).await
}

/// Lists only the reminders that are urgent or overdue as of now.
pub async fn reminder_alerts(config: Config) -> Result<Out<AlertDigest>> {
    reminder_alerts_at(&config, Utc::now()).await
}

/// Re-evaluates reminders on a fixed interval and logs the notify-worthy ones. Stops after
/// `args.count` checks, or on Ctrl-C.
pub async fn watch_reminders(config: Config, args: WatchArgs) -> Result<Out<u64>> {
    let period = args
        .interval
        .map(|secs| Duration::from_secs(secs.max(1)))
        .unwrap_or_else(|| config.poll_interval());
    info!("Checking reminders every {}s", period.as_secs());

    let mut interval = tokio::time::interval(period);
    let mut checks: u64 = 0;
    loop {
        if args.count.is_some_and(|count| checks >= count) {
            break;
        }
        tokio::select! {
            _ = interval.tick() => {}
            signal = tokio::signal::ctrl_c() => {
                signal.context("Unable to listen for Ctrl-C")?;
                break;
            }
        }
        let digest = check_reminders(&config, Utc::now()).await?;
        announce(digest.structure());
        checks += 1;
    }

    Ok(Out::new(
        format!("Stopped watching after {checks} check{}", plural(checks as usize)),
        checks,
    ))
}

async fn list_reminders_at(config: &Config, now: DateTime<Utc>) -> Result<Out<Vec<ReminderStatus>>> {
    let mut reminders = owned(config).await?;
    sort_for_display(&mut reminders);
    let statuses = compute_reminder_states(&reminders, now);

    let mut message = format!("{} reminder{}", statuses.len(), plural(statuses.len()));
    for s in &statuses {
        let _ = write!(message, "\n{}", line(s));
    }
    Ok(Out::new(message, statuses))
}

async fn reminder_alerts_at(config: &Config, now: DateTime<Utc>) -> Result<Out<AlertDigest>> {
    let reminders = owned(config).await?;
    let digest = alert_digest(&reminders, now);

    let mut message = digest.message();
    for s in &digest.alerts {
        let _ = write!(message, "\n{}", line(s));
    }
    Ok(Out::new(message, digest))
}

/// One watch tick. The store is re-read first so reminders written by other invocations count.
async fn check_reminders(config: &Config, now: DateTime<Utc>) -> Result<Out<AlertDigest>> {
    config.store().refresh().await.pub_result(ErrorType::Store)?;
    reminder_alerts_at(config, now).await
}

fn announce(digest: Option<&AlertDigest>) {
    let Some(digest) = digest else { return };
    if digest.is_empty() {
        debug!("{}", digest.message());
        return;
    }
    for s in &digest.alerts {
        match s.state {
            UrgencyState::Overdue => warn!("{}", line(s)),
            _ => info!("{}", line(s)),
        }
    }
    if digest.escalate {
        warn!("{}", digest.message());
    } else {
        info!("{}", digest.message());
    }
}

fn line(s: &ReminderStatus) -> String {
    format!(
        "{:<9} {}  {:<13}  {}  ({})",
        s.state.to_string(),
        s.reminder.due_date().format("%Y-%m-%d %H:%M"),
        s.reminder.category().to_string(),
        s.reminder.title(),
        s.reminder.id()
    )
}

async fn owned(config: &Config) -> Result<Vec<Reminder>> {
    config
        .store()
        .list_reminders(config.owner())
        .await
        .pub_result(ErrorType::Store)
}

async fn find(config: &Config, id: &str) -> Result<Reminder> {
    config
        .store()
        .get_reminder(config.owner(), id)
        .await
        .pub_result(ErrorType::Store)?
        .ok_or_else(|| anyhow!("Reminder not found: {id}"))
        .pub_result(ErrorType::Request)
}
