pub mod args;
pub mod backup;
pub mod budget;
pub mod classify;
pub mod commands;
mod config;
mod error;
pub mod model;
pub mod reminders;
pub mod store;
pub mod summary;
mod utils;


pub use budget::aggregate;
pub use classify::classify;
pub use config::Config;
pub use error::Error;
pub use error::Result;
pub use reminders::compute_reminder_states;
pub use utils::{parse_amount, parse_datetime};
