//! Scoped database transactions for repository mutations.
//!
//! Every write runs against a [`DatabaseTransaction`] opened with [`begin`] and is
//! closed with [`finish`], which commits when the work succeeded and rolls back
//! otherwise. A transaction dropped on any other path is rolled back by `SeaORM`.
//! Repositories share one pool through an `Arc`; [`close_shared`] closes it with the
//! last handle.

use crate::errors::{Error, Result};
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Opens a database transaction, logging the failure under `operation`.
pub(crate) async fn begin(
    db: &DatabaseConnection,
    operation: &'static str,
) -> Result<DatabaseTransaction> {
    db.begin().await.map_err(|e| {
        let err = Error::from(e);
        error!(operation, error = %err, "could not open a transaction");
        err
    })
}

/// Commits `txn` if `outcome` is `Ok`, rolls it back otherwise.
///
/// A failed commit is reported like any other failure of the operation. The
/// returned error is the one produced by the work, not by the rollback.
pub(crate) async fn finish<T>(
    txn: DatabaseTransaction,
    outcome: Result<T>,
    operation: &'static str,
) -> Result<T> {
    match outcome {
        Ok(value) => match txn.commit().await {
            Ok(()) => Ok(value),
            Err(e) => {
                let err = Error::from(e);
                error!(operation, error = %err, "commit failed");
                Err(err)
            }
        },
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                warn!(operation, error = %rollback_err, "rollback failed");
            }
            if matches!(err, Error::Storage(_)) {
                error!(operation, error = %err, "rolled back");
            } else {
                warn!(operation, error = %err, "rolled back");
            }
            Err(err)
        }
    }
}

/// Logs a failed read under `operation` and hands the error back.
pub(crate) fn log_read_failure(operation: &'static str, err: Error) -> Error {
    error!(operation, error = %err, "read failed");
    err
}

/// Closes the pool if `db` is its last handle, otherwise only drops the handle.
pub(crate) async fn close_shared(db: Arc<DatabaseConnection>) -> Result<()> {
    match Arc::try_unwrap(db) {
        Ok(db) => db.close().await.map_err(Into::into),
        Err(_) => {
            debug!("Connection still shared, leaving it open.");
            Ok(())
        }
    }
}
