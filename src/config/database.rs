//! Database configuration module.
//!
//! This module handles the database connection and table creation using `SeaORM`.
//! Connection settings travel in an explicit [`DatabaseConfig`] that callers hand to
//! [`create_connection`] (or to a repository constructor), so nothing here relies on
//! process-wide state. Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, which keeps the `UNIQUE` category name and the
//! `ON DELETE RESTRICT` foreign key in step with the Rust structs. The `type` column
//! additionally carries a `CHECK` limiting it to the [`TransactionType`] values.

use crate::entities::{Category, Transaction, TransactionType, transaction};
use crate::errors::{Error, Result};
use sea_orm::{
    ActiveEnum, ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection,
    Iterable, Schema, Statement, sea_query::Expr,
};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument};

const DEFAULT_DATABASE_URL: &str = "sqlite://finance.sqlite?mode=rwc";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_CHARSET: &str = "UTF-8";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(8);

/// Encodings `SQLite` accepts in `PRAGMA encoding`.
const SQLITE_ENCODINGS: [&str; 4] = ["UTF-8", "UTF-16", "UTF-16le", "UTF-16be"];

/// Everything needed to open a database connection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection URL, e.g. `sqlite://finance.sqlite?mode=rwc`
    pub url: String,
    /// Upper bound on pooled connections
    pub max_connections: u32,
    /// Character encoding for newly created databases
    pub charset: Option<String>,
    /// Whether `sqlx` logs every statement
    pub sql_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            charset: Some(DEFAULT_CHARSET.to_string()),
            sql_logging: false,
        }
    }
}

impl DatabaseConfig {
    /// A private in-memory `SQLite` database. One connection only, since every
    /// connection to `:memory:` would otherwise see its own empty database.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            ..Self::default()
        }
    }

    /// Overrides fields from `DATABASE_URL`, `DATABASE_MAX_CONNECTIONS`,
    /// `DATABASE_CHARSET` and `DATABASE_SQL_LOGGING` when they are set.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL") {
            self.url = url;
        }
        if let Some(raw) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.max_connections = raw.trim().parse().map_err(|e| Error::Config {
                message: format!("DATABASE_MAX_CONNECTIONS must be a positive integer: {e}"),
            })?;
        }
        if let Some(charset) = lookup("DATABASE_CHARSET") {
            self.charset = Some(charset).filter(|c| !c.trim().is_empty());
        }
        if let Some(raw) = lookup("DATABASE_SQL_LOGGING") {
            self.sql_logging = matches!(raw.trim(), "1" | "true" | "yes" | "on");
        }
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if self.max_connections == 0 {
            return Err(Error::Config {
                message: "max_connections must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Opens a connection pool described by `config` and applies the configured charset.
#[instrument(skip(config), fields(url = %config.url))]
pub async fn create_connection(config: &DatabaseConfig) -> Result<DatabaseConnection> {
    config.validate()?;

    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .connect_timeout(CONNECT_TIMEOUT)
        .sqlx_logging(config.sql_logging);

    let db = Database::connect(options).await?;
    debug!("Database connection opened.");

    if let Some(charset) = &config.charset {
        apply_charset(&db, charset).await?;
    }

    Ok(db)
}

/// Sets the text encoding. Only meaningful for `SQLite`, and only before the first
/// table exists; other backends take the encoding from the URL.
async fn apply_charset(db: &DatabaseConnection, charset: &str) -> Result<()> {
    if db.get_database_backend() != DatabaseBackend::Sqlite {
        return Ok(());
    }

    let Some(encoding) = SQLITE_ENCODINGS
        .iter()
        .find(|known| known.eq_ignore_ascii_case(charset.trim()))
    else {
        return Err(Error::Config {
            message: format!("Unsupported SQLite charset: {charset}"),
        });
    };

    db.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        format!("PRAGMA encoding = \"{encoding}\";"),
    ))
    .await?;
    Ok(())
}

/// Creates the `categories` and `transactions` tables from the entity definitions,
/// skipping any that already exist.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    // Categories first: transactions carry a foreign key into it
    let mut category_table = schema.create_table_from_entity(Category);
    let mut transaction_table = schema.create_table_from_entity(Transaction);

    category_table.if_not_exists();
    transaction_table.if_not_exists().check(
        Expr::col(transaction::Column::Kind)
            .is_in(TransactionType::iter().map(|kind| kind.to_value())),
    );

    db.execute(builder.build(&category_table)).await?;
    db.execute(builder.build(&transaction_table)).await?;

    info!("Database tables ensured.");
    Ok(())
}
