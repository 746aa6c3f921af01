//! Error and result types used throughout the crate.

use std::fmt::{Display, Formatter};

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// The layer in which a command failed. This is prepended to errors that leave a command handler
/// so that the user can tell a broken config apart from a bad argument.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ErrorType {
    /// The home directory or `config.json` could not be created or loaded.
    Config,
    /// The record store could not be read or written.
    Store,
    /// The request itself was invalid, e.g. a negative amount or an unknown id.
    Request,
}

impl Display for ErrorType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorType::Config => write!(f, "Configuration error"),
            ErrorType::Store => write!(f, "Store error"),
            ErrorType::Request => write!(f, "Invalid request"),
        }
    }
}

/// Converts an internal result into one suitable for returning from a public command handler.
pub trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T> IntoResult<T> for Result<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| e.context(error_type.to_string()))
    }
}
