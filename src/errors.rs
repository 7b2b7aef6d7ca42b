//! Unified error type for the finance manager.
//!
//! Storage faults are classified on the way in: constraint violations reported by the
//! engine become [`Error::Integrity`], everything else stays an [`Error::Storage`].

use rust_decimal::Decimal;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Errors returned by the repositories, the configuration layer and the terminal front end.
#[derive(Debug, Error)]
pub enum Error {
    /// The targeted id does not resolve to an existing row
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity kind, e.g. `"category"`
        entity: &'static str,
        /// The id that was looked up
        id: i64,
    },

    /// A uniqueness, foreign-key or not-null constraint was violated on write
    #[error("Integrity constraint violated: {message}")]
    Integrity {
        /// Description of the violated constraint
        message: String,
    },

    /// Any other failure reaching the storage engine
    #[error("Storage error: {0}")]
    Storage(DbErr),

    /// A transaction value that cannot be persisted (negative amounts)
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// A category name that is empty once trimmed
    #[error("Invalid category name: {name:?}")]
    InvalidName {
        /// The rejected name
        name: String,
    },

    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    /// Terminal I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Short label suitable for showing to an end user.
    ///
    /// The underlying fault detail is meant for the logs, not the screen.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not found",
            Self::Integrity { .. } => "conflicts with existing data",
            Self::Storage(_) => "storage unavailable",
            Self::InvalidAmount { .. } => "amount must not be negative",
            Self::InvalidName { .. } => "name must not be empty",
            Self::Config { .. } => "invalid configuration",
            Self::Io(_) => "terminal I/O failed",
        }
    }

    /// Whether this is a [`Error::NotFound`].
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether this is an [`Error::Integrity`].
    #[must_use]
    pub const fn is_integrity(&self) -> bool {
        matches!(self, Self::Integrity { .. })
    }
}

impl From<DbErr> for Error {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(
                SqlErr::UniqueConstraintViolation(message)
                | SqlErr::ForeignKeyConstraintViolation(message),
            ) => Self::Integrity { message },
            _ => Self::Storage(err),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
