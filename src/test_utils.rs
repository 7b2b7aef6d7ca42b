//! Shared test utilities for the finance manager.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    config::{DatabaseConfig, create_connection, create_tables},
    core::{CategoryRepository, NewTransaction, TransactionRepository},
    entities::{self, TransactionType},
    errors::Result,
};
use rust_decimal::Decimal;
use sea_orm::{
    ConnectionTrait, DatabaseBackend, DatabaseConnection, DbErr, MockDatabase, Statement,
    prelude::Date,
};
use std::str::FromStr;
use std::sync::{Arc, Once};

static TRACING: Once = Once::new();

/// Installs a test-writer subscriber once per test binary. Set `RUST_LOG` to see output.
pub fn init_test_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<Arc<DatabaseConnection>> {
    let db = create_connection(&DatabaseConfig::in_memory()).await?;
    create_tables(&db).await?;
    Ok(Arc::new(db))
}

/// A database whose `transactions` table has no check on `type`, as written by an older
/// release or another tool. Holds a `Food` category with a 15.00 expense on 2024-01-15
/// and a row with id 99 tagged `Transfer`.
pub async fn setup_with_unknown_tag() -> Result<(Arc<DatabaseConnection>, entities::category::Model)>
{
    init_test_tracing();
    let db = Arc::new(create_connection(&DatabaseConfig::in_memory()).await?);
    for sql in [
        "CREATE TABLE categories (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL UNIQUE)",
        "CREATE TABLE transactions (id INTEGER PRIMARY KEY AUTOINCREMENT, description TEXT, \
         transaction_date TEXT NOT NULL, transaction_value REAL NOT NULL, type TEXT NOT NULL, \
         category_id INTEGER NOT NULL REFERENCES categories (id) ON DELETE RESTRICT)",
    ] {
        db.execute(Statement::from_string(DatabaseBackend::Sqlite, sql))
            .await?;
    }

    let category = create_test_category(&db, "Food").await?;
    create_test_transaction(&db, category.id, "15").await?;
    db.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        format!(
            "INSERT INTO transactions (id, description, transaction_date, transaction_value, type, category_id) \
             VALUES (99, 'odd', '2024-01-10', 99.5, 'Transfer', {})",
            category.id
        ),
    ))
    .await?;
    Ok((db, category))
}

/// Finishes `mock` so that the first write statement fails with a storage fault.
pub fn failing_writes(mock: MockDatabase) -> Arc<DatabaseConnection> {
    Arc::new(
        mock.append_exec_errors([DbErr::Custom("disk full".to_string())])
            .into_connection(),
    )
}

/// Asserts that the mock connection saw a rollback and no commit.
/// Panics if another handle to the connection is still alive.
#[allow(clippy::expect_used)]
pub fn assert_rolled_back(db: Arc<DatabaseConnection>) {
    let db = Arc::try_unwrap(db).expect("connection still shared");
    let log = format!("{:?}", db.into_transaction_log());
    assert!(log.contains("ROLLBACK"), "{log}");
    assert!(!log.contains("COMMIT"), "{log}");
}

/// Parses a decimal literal. Panics on malformed input.
#[allow(clippy::unwrap_used)]
pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Parses a `YYYY-MM-DD` date. Panics on malformed input.
#[allow(clippy::unwrap_used)]
pub fn date(s: &str) -> Date {
    Date::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Creates a test category with the given name.
pub async fn create_test_category(
    db: &Arc<DatabaseConnection>,
    name: &str,
) -> Result<entities::category::Model> {
    CategoryRepository::new(Arc::clone(db)).create(name).await
}

/// An expense with no description.
pub fn new_expense(category_id: i64, on: &str, amount: &str) -> NewTransaction {
    NewTransaction {
        description: None,
        transaction_date: date(on),
        transaction_value: dec(amount),
        kind: TransactionType::Expense,
        category_id,
    }
}

/// An income with no description.
pub fn new_income(category_id: i64, on: &str, amount: &str) -> NewTransaction {
    NewTransaction {
        kind: TransactionType::Income,
        ..new_expense(category_id, on, amount)
    }
}

/// Creates a test transaction with sensible defaults.
///
/// # Defaults
/// * `description`: `"Test transaction"`
/// * `transaction_date`: 2024-01-15
/// * `kind`: `Expense`
pub async fn create_test_transaction(
    db: &Arc<DatabaseConnection>,
    category_id: i64,
    amount: &str,
) -> Result<entities::transaction::Model> {
    create_custom_transaction(
        db,
        category_id,
        amount,
        "2024-01-15",
        TransactionType::Expense,
        Some("Test transaction"),
    )
    .await
}

/// Creates a test transaction with custom parameters.
pub async fn create_custom_transaction(
    db: &Arc<DatabaseConnection>,
    category_id: i64,
    amount: &str,
    on: &str,
    kind: TransactionType,
    description: Option<&str>,
) -> Result<entities::transaction::Model> {
    TransactionRepository::new(Arc::clone(db))
        .create(NewTransaction {
            description: description.map(str::to_string),
            kind,
            ..new_expense(category_id, on, amount)
        })
        .await
}

/// Sets up a complete test environment with one category named "Food".
/// Returns (db, category) for common test scenarios.
pub async fn setup_with_category() -> Result<(Arc<DatabaseConnection>, entities::category::Model)>
{
    init_test_tracing();
    let db = setup_test_db().await?;
    let category = create_test_category(&db, "Food").await?;
    Ok((db, category))
}
