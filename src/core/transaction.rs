//! Transaction business logic - CRUD over dated transactions plus aggregate reports.
//!
//! This module provides [`TransactionRepository`] for creating, retrieving, updating and
//! deleting transactions, and the whole-table aggregations behind the dashboard (totals by
//! type and by month). Every write is atomic: the category reference and the amount are
//! validated inside the same database transaction as the write itself, and a failure at any
//! step rolls the whole operation back. Updates are partial: only the fields set on a
//! [`TransactionPatch`] overwrite stored values, and a patch for an unknown id fails with
//! [`Error::NotFound`] before anything is written.

use crate::{
    config::{DatabaseConfig, create_connection},
    core::{
        report::{self, MonthlyTotals, Totals},
        session::{begin, close_shared, finish, log_read_failure},
    },
    entities::{Category, Transaction, TransactionType, category, transaction},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveEnum, DatabaseTransaction, Iterable, QueryOrder, QuerySelect, Set, prelude::*,
    sea_query::SimpleExpr,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

const ENTITY: &str = "transaction";

/// Fields required to create a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    /// Optional free-text description
    pub description: Option<String>,
    /// Date of the movement
    pub transaction_date: Date,
    /// Non-negative amount
    pub transaction_value: Decimal,
    /// `Income` or `Expense`
    pub kind: TransactionType,
    /// Existing category to file the transaction under
    pub category_id: i64,
}

/// A partial update: `id` selects the row, every `Some` field overwrites the stored value
/// and every `None` leaves it untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionPatch {
    /// Row to update
    pub id: i64,
    /// New description
    pub description: Option<String>,
    /// New date
    pub transaction_date: Option<Date>,
    /// New amount
    pub transaction_value: Option<Decimal>,
    /// New direction
    pub kind: Option<TransactionType>,
    /// New category
    pub category_id: Option<i64>,
}

impl TransactionPatch {
    /// A patch for `id` that changes nothing yet.
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Whether no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.transaction_date.is_none()
            && self.transaction_value.is_none()
            && self.kind.is_none()
            && self.category_id.is_none()
    }
}

/// Repository for [`transaction::Model`] records.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: Arc<DatabaseConnection>,
}

impl TransactionRepository {
    /// Wraps a connection, owned or already shared with other repositories.
    #[must_use]
    pub fn new(db: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { db: db.into() }
    }

    /// Opens a connection described by `config` and wraps it.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        Ok(Self::new(create_connection(config).await?))
    }

    /// The shared connection handle.
    #[must_use]
    pub const fn connection(&self) -> &Arc<DatabaseConnection> {
        &self.db
    }

    /// Releases the connection once no other repository shares it.
    pub async fn close(self) -> Result<()> {
        close_shared(self.db).await
    }

    /// Retrieves every transaction. With `ordered`, the most recent date comes first
    /// (ties broken by newest id).
    #[instrument(skip(self))]
    pub async fn list_all(&self, ordered: bool) -> Result<Vec<transaction::Model>> {
        let mut query = Transaction::find().filter(known_kinds());
        if ordered {
            query = query
                .order_by_desc(transaction::Column::TransactionDate)
                .order_by_desc(transaction::Column::Id);
        }
        query
            .all(self.db.as_ref())
            .await
            .map_err(|e| log_read_failure("list transactions", e.into()))
    }

    /// Like [`Self::list_all`], with each transaction paired with its category.
    #[instrument(skip(self))]
    pub async fn list_with_categories(
        &self,
        ordered: bool,
    ) -> Result<Vec<(transaction::Model, Option<category::Model>)>> {
        let mut query = Transaction::find()
            .filter(known_kinds())
            .find_also_related(Category);
        if ordered {
            query = query
                .order_by_desc(transaction::Column::TransactionDate)
                .order_by_desc(transaction::Column::Id);
        }
        query
            .all(self.db.as_ref())
            .await
            .map_err(|e| log_read_failure("list transactions with categories", e.into()))
    }

    /// Retrieves a specific transaction by its unique ID.
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i64) -> Result<Option<transaction::Model>> {
        Transaction::find_by_id(id)
            .filter(known_kinds())
            .one(self.db.as_ref())
            .await
            .map_err(|e| log_read_failure("get transaction", e.into()))
    }

    /// Retrieves the transactions filed under one category, most recent first.
    #[instrument(skip(self))]
    pub async fn list_by_category(&self, category_id: i64) -> Result<Vec<transaction::Model>> {
        Transaction::find()
            .filter(transaction::Column::CategoryId.eq(category_id))
            .filter(known_kinds())
            .order_by_desc(transaction::Column::TransactionDate)
            .order_by_desc(transaction::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| log_read_failure("list transactions by category", e.into()))
    }

    /// Creates a transaction under an existing category.
    ///
    /// # Errors
    /// - [`Error::InvalidAmount`] if the value is negative
    /// - [`Error::Integrity`] if the category does not exist
    /// - [`Error::Storage`] for any other storage fault
    #[instrument(skip(self, new))]
    pub async fn create(&self, new: NewTransaction) -> Result<transaction::Model> {
        validate_amount(new.transaction_value)?;

        let txn = begin(&self.db, "create transaction").await?;
        let outcome = insert_in(&txn, new).await;
        let created = finish(txn, outcome, "create transaction").await?;

        info!(id = created.id, "Transaction created.");
        Ok(created)
    }

    /// Applies a partial update and returns the stored result.
    ///
    /// # Errors
    /// - [`Error::NotFound`] if `patch.id` does not resolve; nothing is written
    /// - [`Error::InvalidAmount`] if a new value is negative
    /// - [`Error::Integrity`] if a new category does not exist
    #[instrument(skip(self))]
    pub async fn update(&self, patch: TransactionPatch) -> Result<transaction::Model> {
        if let Some(value) = patch.transaction_value {
            validate_amount(value)?;
        }

        let txn = begin(&self.db, "update transaction").await?;
        let outcome = patch_in(&txn, patch).await;
        finish(txn, outcome, "update transaction").await
    }

    /// Deletes a transaction.
    ///
    /// # Errors
    /// - [`Error::NotFound`] if `id` does not resolve
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<()> {
        let txn = begin(&self.db, "delete transaction").await?;
        let outcome = delete_in(&txn, id).await;
        finish(txn, outcome, "delete transaction").await?;

        info!(id, "Transaction deleted.");
        Ok(())
    }

    /// Sums every transaction into income and expense totals.
    ///
    /// Rows whose stored type is neither `Income` nor `Expense` are skipped.
    #[instrument(skip(self))]
    pub async fn totals_by_type(&self) -> Result<Totals> {
        let rows: Vec<(String, Decimal)> = Transaction::find()
            .select_only()
            .column(transaction::Column::Kind)
            .column(transaction::Column::TransactionValue)
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| log_read_failure("totals by type", e.into()))?;

        Ok(report::totals_by_type(
            rows.into_iter()
                .filter_map(|(kind, value)| known_kind(&kind).map(|kind| (kind, value))),
        ))
    }

    /// Income and expense totals per `YYYY-MM` month. Months without transactions are absent.
    #[instrument(skip(self))]
    pub async fn totals_by_month(&self) -> Result<MonthlyTotals> {
        self.monthly_totals(None).await
    }

    /// Per-month totals for the transactions of one category, grouped like
    /// [`Self::totals_by_month`].
    #[instrument(skip(self))]
    pub async fn totals_by_category(&self, category_id: i64) -> Result<MonthlyTotals> {
        self.monthly_totals(Some(category_id)).await
    }

    async fn monthly_totals(&self, category_id: Option<i64>) -> Result<MonthlyTotals> {
        let mut query = Transaction::find()
            .select_only()
            .column(transaction::Column::TransactionDate)
            .column(transaction::Column::Kind)
            .column(transaction::Column::TransactionValue);
        if let Some(category_id) = category_id {
            query = query.filter(transaction::Column::CategoryId.eq(category_id));
        }

        let rows: Vec<(Date, String, Decimal)> = query
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| log_read_failure("monthly totals", e.into()))?;

        Ok(report::totals_by_month(rows.into_iter().filter_map(
            |(date, kind, value)| known_kind(&kind).map(|kind| (date, kind, value)),
        )))
    }
}

/// Rows whose stored type is one of the [`TransactionType`] values. Rows with any other
/// tag (written before the `type` check constraint existed, or by another tool) are
/// invisible to every query.
fn known_kinds() -> SimpleExpr {
    transaction::Column::Kind.is_in(TransactionType::iter().map(|kind| kind.to_value()))
}

fn validate_amount(value: Decimal) -> Result<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(Error::InvalidAmount { amount: value });
    }
    Ok(())
}

fn known_kind(stored: &str) -> Option<TransactionType> {
    let parsed = TransactionType::try_from_value(&stored.to_string()).ok();
    if parsed.is_none() {
        debug!(stored, "Skipping transaction with unknown type.");
    }
    parsed
}

async fn ensure_category_exists(txn: &DatabaseTransaction, category_id: i64) -> Result<()> {
    if Category::find_by_id(category_id).one(txn).await?.is_none() {
        return Err(Error::Integrity {
            message: format!("category {category_id} does not exist"),
        });
    }
    Ok(())
}

async fn insert_in(txn: &DatabaseTransaction, new: NewTransaction) -> Result<transaction::Model> {
    ensure_category_exists(txn, new.category_id).await?;

    transaction::ActiveModel {
        description: Set(new.description),
        transaction_date: Set(new.transaction_date),
        transaction_value: Set(new.transaction_value),
        kind: Set(new.kind),
        category_id: Set(new.category_id),
        ..Default::default()
    }
    .insert(txn)
    .await
    .map_err(Into::into)
}

async fn patch_in(txn: &DatabaseTransaction, patch: TransactionPatch) -> Result<transaction::Model> {
    let existing = Transaction::find_by_id(patch.id)
        .filter(known_kinds())
        .one(txn)
        .await?
        .ok_or(Error::NotFound {
            entity: ENTITY,
            id: patch.id,
        })?;

    if patch.is_empty() {
        return Ok(existing);
    }
    if let Some(category_id) = patch.category_id {
        ensure_category_exists(txn, category_id).await?;
    }

    let mut active_model: transaction::ActiveModel = existing.into();
    if let Some(description) = patch.description {
        active_model.description = Set(Some(description));
    }
    if let Some(date) = patch.transaction_date {
        active_model.transaction_date = Set(date);
    }
    if let Some(value) = patch.transaction_value {
        active_model.transaction_value = Set(value);
    }
    if let Some(kind) = patch.kind {
        active_model.kind = Set(kind);
    }
    if let Some(category_id) = patch.category_id {
        active_model.category_id = Set(category_id);
    }

    active_model.update(txn).await.map_err(Into::into)
}

async fn delete_in(txn: &DatabaseTransaction, id: i64) -> Result<()> {
    let existing = Transaction::find_by_id(id)
        .filter(known_kinds())
        .one(txn)
        .await?
        .ok_or(Error::NotFound { entity: ENTITY, id })?;
    existing.delete(txn).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn stored_expense() -> transaction::Model {
        transaction::Model {
            id: 7,
            description: Some("Lunch".to_string()),
            transaction_date: date("2024-01-15"),
            transaction_value: dec("12.50"),
            kind: TransactionType::Expense,
            category_id: 1,
        }
    }

    #[tokio::test]
    async fn test_create_then_get_by_id() -> Result<()> {
        let (db, category) = setup_with_category().await?;
        let repo = TransactionRepository::new(db);

        let created = repo
            .create(NewTransaction {
                description: Some("Weekly shop".to_string()),
                transaction_date: date("2024-01-15"),
                transaction_value: dec("82.45"),
                kind: TransactionType::Expense,
                category_id: category.id,
            })
            .await?;

        let found = repo.get_by_id(created.id).await?.unwrap();
        assert_eq!(found, created);
        assert_eq!(found.description.as_deref(), Some("Weekly shop"));
        assert_eq!(found.transaction_value, dec("82.45"));
        assert_eq!(found.kind, TransactionType::Expense);
        assert_eq!(found.category_id, category.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_without_description() -> Result<()> {
        let (db, category) = setup_with_category().await?;
        let repo = TransactionRepository::new(db);

        let created = repo
            .create(NewTransaction {
                description: None,
                transaction_date: date("2024-06-01"),
                transaction_value: Decimal::ZERO,
                kind: TransactionType::Income,
                category_id: category.id,
            })
            .await?;
        assert_eq!(created.description, None);
        assert_eq!(created.transaction_value, Decimal::ZERO);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_with_missing_category_is_integrity_error() -> Result<()> {
        init_test_tracing();
        let db = setup_test_db().await?;
        let repo = TransactionRepository::new(db);

        let result = repo.create(new_expense(999, "2024-01-01", "10")).await;
        assert!(matches!(result, Err(Error::Integrity { .. })));

        // Nothing half-written
        assert!(repo.list_all(false).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_negative_amount_rejected() -> Result<()> {
        let repo =
            TransactionRepository::new(MockDatabase::new(DatabaseBackend::Sqlite).into_connection());

        let result = repo.create(new_expense(1, "2024-01-01", "-5.00")).await;
        assert!(matches!(result, Err(Error::InvalidAmount { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_get_by_id_missing_is_none() -> Result<()> {
        let repo = TransactionRepository::new(setup_test_db().await?);
        assert!(repo.get_by_id(999).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_list_all_ordered_most_recent_first() -> Result<()> {
        let (db, category) = setup_with_category().await?;
        let repo = TransactionRepository::new(db);

        let middle = repo
            .create(new_expense(category.id, "2024-02-10", "1"))
            .await?;
        let oldest = repo
            .create(new_expense(category.id, "2023-12-31", "2"))
            .await?;
        let newest = repo
            .create(new_expense(category.id, "2024-03-05", "3"))
            .await?;

        let ordered = repo.list_all(true).await?;
        assert_eq!(ordered, vec![newest, middle, oldest]);

        let unordered = repo.list_all(false).await?;
        assert_eq!(unordered.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_all_idempotent() -> Result<()> {
        let (db, category) = setup_with_category().await?;
        create_test_transaction(&db, category.id, "10").await?;
        create_test_transaction(&db, category.id, "20").await?;
        let repo = TransactionRepository::new(db);

        assert_eq!(repo.list_all(true).await?, repo.list_all(true).await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_with_categories_resolves_category() -> Result<()> {
        let (db, category) = setup_with_category().await?;
        let created = create_test_transaction(&db, category.id, "10").await?;
        let repo = TransactionRepository::new(db);

        let rows = repo.list_with_categories(true).await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0, created);
        assert_eq!(rows[0].1.as_ref(), Some(&category));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_single_field_keeps_others() -> Result<()> {
        let (db, category) = setup_with_category().await?;
        let repo = TransactionRepository::new(db);
        let created = repo
            .create(NewTransaction {
                description: Some("Cinema".to_string()),
                transaction_date: date("2024-04-20"),
                transaction_value: dec("30.00"),
                kind: TransactionType::Expense,
                category_id: category.id,
            })
            .await?;

        let patch = TransactionPatch {
            transaction_value: Some(dec("35.50")),
            ..TransactionPatch::new(created.id)
        };
        let updated = repo.update(patch).await?;
        assert_eq!(updated.transaction_value, dec("35.50"));

        let found = repo.get_by_id(created.id).await?.unwrap();
        assert_eq!(
            found,
            transaction::Model {
                transaction_value: dec("35.50"),
                ..created
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_update_all_fields() -> Result<()> {
        let (db, category) = setup_with_category().await?;
        let other = create_test_category(&db, "Salary").await?;
        let created = create_test_transaction(&db, category.id, "10").await?;
        let repo = TransactionRepository::new(db);

        let updated = repo
            .update(TransactionPatch {
                id: created.id,
                description: Some("March salary".to_string()),
                transaction_date: Some(date("2024-03-28")),
                transaction_value: Some(dec("2500")),
                kind: Some(TransactionType::Income),
                category_id: Some(other.id),
            })
            .await?;

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.description.as_deref(), Some("March salary"));
        assert_eq!(updated.transaction_date, date("2024-03-28"));
        assert_eq!(updated.transaction_value, dec("2500"));
        assert_eq!(updated.kind, TransactionType::Income);
        assert_eq!(updated.category_id, other.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_patch_returns_existing() -> Result<()> {
        let (db, category) = setup_with_category().await?;
        let created = create_test_transaction(&db, category.id, "10").await?;
        let repo = TransactionRepository::new(db);

        assert_eq!(repo.update(TransactionPatch::new(created.id)).await?, created);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() -> Result<()> {
        let repo = TransactionRepository::new(setup_test_db().await?);

        let patch = TransactionPatch {
            description: Some("ghost".to_string()),
            ..TransactionPatch::new(999)
        };
        let result = repo.update(patch).await;
        assert!(matches!(
            result,
            Err(Error::NotFound {
                entity: "transaction",
                id: 999
            })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_to_missing_category_rolls_back() -> Result<()> {
        let (db, category) = setup_with_category().await?;
        let created = create_test_transaction(&db, category.id, "10").await?;
        let repo = TransactionRepository::new(db);

        let result = repo
            .update(TransactionPatch {
                description: Some("moved".to_string()),
                category_id: Some(999),
                ..TransactionPatch::new(created.id)
            })
            .await;
        assert!(matches!(result, Err(Error::Integrity { .. })));
        assert_eq!(repo.get_by_id(created.id).await?.unwrap(), created);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_negative_amount_rejected() -> Result<()> {
        let repo =
            TransactionRepository::new(MockDatabase::new(DatabaseBackend::Sqlite).into_connection());

        let patch = TransactionPatch {
            transaction_value: Some(dec("-1")),
            ..TransactionPatch::new(1)
        };
        assert!(matches!(
            repo.update(patch).await,
            Err(Error::InvalidAmount { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_then_get_is_none() -> Result<()> {
        let (db, category) = setup_with_category().await?;
        let created = create_test_transaction(&db, category.id, "10").await?;
        let repo = TransactionRepository::new(db);

        repo.delete(created.id).await?;
        assert!(repo.get_by_id(created.id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() -> Result<()> {
        let repo = TransactionRepository::new(setup_test_db().await?);
        assert!(matches!(
            repo.delete(999).await,
            Err(Error::NotFound { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_totals_by_type() -> Result<()> {
        let (db, category) = setup_with_category().await?;
        let repo = TransactionRepository::new(db);
        repo.create(new_income(category.id, "2024-01-01", "100"))
            .await?;
        repo.create(new_expense(category.id, "2024-01-02", "40"))
            .await?;
        repo.create(new_expense(category.id, "2024-01-03", "10"))
            .await?;

        let totals = repo.totals_by_type().await?;
        assert_eq!(totals.income, dec("100"));
        assert_eq!(totals.expense, dec("50"));
        assert_eq!(totals.balance(), dec("50"));
        Ok(())
    }

    #[tokio::test]
    async fn test_totals_by_type_empty_table() -> Result<()> {
        let repo = TransactionRepository::new(setup_test_db().await?);
        assert_eq!(repo.totals_by_type().await?, Totals::default());
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_type_rows_are_skipped_everywhere() -> Result<()> {
        let (db, category) = setup_with_unknown_tag().await?;
        let repo = TransactionRepository::new(db);

        let totals = repo.totals_by_type().await?;
        assert_eq!(totals.expense, dec("15"));
        assert_eq!(totals.income, Decimal::ZERO);

        let months = repo.totals_by_month().await?;
        assert_eq!(months.len(), 1);
        assert_eq!(months["2024-01"].expense, dec("15"));

        let by_category = repo.totals_by_category(category.id).await?;
        assert_eq!(by_category, months);

        assert_eq!(repo.list_all(true).await?.len(), 1);
        assert_eq!(repo.list_with_categories(true).await?.len(), 1);
        assert_eq!(repo.list_by_category(category.id).await?.len(), 1);
        assert!(repo.get_by_id(99).await?.is_none());

        // Not editable either: the row is treated as absent
        let patch = TransactionPatch {
            description: Some("fixed".to_string()),
            ..TransactionPatch::new(99)
        };
        assert!(matches!(
            repo.update(patch).await,
            Err(Error::NotFound { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_totals_by_type_storage_error() -> Result<()> {
        let repo = TransactionRepository::new(
            MockDatabase::new(DatabaseBackend::Sqlite)
                .append_query_errors([DbErr::Custom("database is locked".to_string())])
                .into_connection(),
        );

        let result = repo.totals_by_type().await;
        assert!(matches!(result, Err(Error::Storage(_))));
        // Callers fall back to zero totals
        assert_eq!(result.unwrap_or_default(), Totals::default());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_storage_error_rolls_back() -> Result<()> {
        let db = failing_writes(MockDatabase::new(DatabaseBackend::Sqlite).append_query_results([
            vec![category::Model {
                id: 1,
                name: "Food".to_string(),
            }],
        ]));
        let repo = TransactionRepository::new(Arc::clone(&db));

        let result = repo.create(new_expense(1, "2024-01-15", "12.50")).await;
        assert!(matches!(result, Err(Error::Storage(_))));

        drop(repo);
        assert_rolled_back(db);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_storage_error_rolls_back() -> Result<()> {
        let db = failing_writes(
            MockDatabase::new(DatabaseBackend::Sqlite).append_query_results([vec![stored_expense()]]),
        );
        let repo = TransactionRepository::new(Arc::clone(&db));

        let patch = TransactionPatch {
            transaction_value: Some(dec("13.00")),
            ..TransactionPatch::new(7)
        };
        assert!(matches!(repo.update(patch).await, Err(Error::Storage(_))));

        drop(repo);
        assert_rolled_back(db);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_storage_error_rolls_back() -> Result<()> {
        let db = failing_writes(
            MockDatabase::new(DatabaseBackend::Sqlite).append_query_results([vec![stored_expense()]]),
        );
        let repo = TransactionRepository::new(Arc::clone(&db));

        assert!(matches!(repo.delete(7).await, Err(Error::Storage(_))));

        drop(repo);
        assert_rolled_back(db);
        Ok(())
    }

    #[tokio::test]
    async fn test_totals_by_month_groups() -> Result<()> {
        let (db, category) = setup_with_category().await?;
        let repo = TransactionRepository::new(db);
        repo.create(new_expense(category.id, "2024-01-15", "12.30"))
            .await?;
        repo.create(new_expense(category.id, "2024-01-28", "7.70"))
            .await?;
        repo.create(new_income(category.id, "2024-01-31", "1000"))
            .await?;
        repo.create(new_expense(category.id, "2024-02-01", "5"))
            .await?;

        let months = repo.totals_by_month().await?;
        assert_eq!(
            months.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["2024-01", "2024-02"]
        );
        assert_eq!(months["2024-01"].expense, dec("20.00"));
        assert_eq!(months["2024-01"].income, dec("1000"));
        assert_eq!(months["2024-02"].expense, dec("5"));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_and_totals_by_category() -> Result<()> {
        let (db, food) = setup_with_category().await?;
        let rent = create_test_category(&db, "Rent").await?;
        let repo = TransactionRepository::new(db);
        repo.create(new_expense(food.id, "2024-01-05", "20"))
            .await?;
        repo.create(new_expense(food.id, "2024-02-05", "30"))
            .await?;
        repo.create(new_expense(rent.id, "2024-01-01", "900"))
            .await?;

        let food_rows = repo.list_by_category(food.id).await?;
        assert_eq!(food_rows.len(), 2);
        assert!(food_rows.iter().all(|t| t.category_id == food.id));

        let food_months = repo.totals_by_category(food.id).await?;
        assert_eq!(food_months["2024-01"].expense, dec("20"));
        assert_eq!(food_months["2024-02"].expense, dec("30"));

        assert!(repo.list_by_category(999).await?.is_empty());
        Ok(())
    }
}
