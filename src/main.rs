use budget_buddy::args::{
    Args, BudgetSubcommand, Command, ReminderSubcommand, TransactionSubcommand,
};
use budget_buddy::{commands, Config, Result};
use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().budget_home().path();

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Init(init_args) => commands::init(home, init_args.owner()).await?.print(),

        Command::Transaction(transaction_args) => {
            let config = Config::load(home).await?;
            match transaction_args.action() {
                TransactionSubcommand::Add(args) => {
                    commands::add_transaction(config, args.clone())
                        .await?
                        .print()
                }
                TransactionSubcommand::List(out) => commands::list_transactions(config)
                    .await?
                    .print_or_json(out.json)?,
                TransactionSubcommand::Delete(args) => {
                    commands::delete_transaction(config, &args.id)
                        .await?
                        .print()
                }
            }
        }

        Command::Classify(classify_args) => {
            let config = Config::load(home).await?;
            commands::classify(&config, classify_args).print()
        }

        Command::Budget(budget_args) => {
            let config = Config::load(home).await?;
            match budget_args.action() {
                BudgetSubcommand::Set(args) => commands::set_budget_limit(config, args.clone())
                    .await?
                    .print(),
                BudgetSubcommand::Report(out) => commands::budget_report(config)
                    .await?
                    .print_or_json(out.json)?,
            }
        }

        Command::Reminder(reminder_args) => {
            let config = Config::load(home).await?;
            match reminder_args.action() {
                ReminderSubcommand::Add(args) => commands::add_reminder(config, args.clone())
                    .await?
                    .print(),
                ReminderSubcommand::Update(args) => {
                    commands::update_reminder(config, args.clone())
                        .await?
                        .print()
                }
                ReminderSubcommand::Toggle(args) => commands::toggle_reminder(config, &args.id)
                    .await?
                    .print(),
                ReminderSubcommand::Delete(args) => commands::delete_reminder(config, &args.id)
                    .await?
                    .print(),
                ReminderSubcommand::List(out) => commands::list_reminders(config)
                    .await?
                    .print_or_json(out.json)?,
                ReminderSubcommand::Alerts(out) => commands::reminder_alerts(config)
                    .await?
                    .print_or_json(out.json)?,
                ReminderSubcommand::Watch(args) => {
                    commands::watch_reminders(config, args.clone())
                        .await?
                        .print()
                }
            }
        }

        Command::Summary(out) => {
            let config = Config::load(home).await?;
            commands::summary(config).await?.print_or_json(out.json)?
        }

        Command::Import(import_args) => {
            let config = Config::load(home).await?;
            commands::import_csv(config, &import_args.file)
                .await?
                .print()
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for the binary and the library only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_PKG_NAME").replace('-', "_"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
