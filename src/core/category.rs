//! Category business logic - CRUD over spending/income categories.
//!
//! [`CategoryRepository`] owns a database connection for its lifetime. Reads return
//! `Ok(None)` for a missing row; writes run in a single database transaction that is
//! committed only when every step succeeds and rolled back before any failure is
//! returned. Deleting a category that still has transactions is rejected with
//! [`Error::Integrity`]; nothing cascades.

use crate::{
    config::{CategoryConfig, DatabaseConfig, create_connection},
    core::session::{begin, close_shared, finish, log_read_failure},
    entities::{Category, Transaction, category, transaction},
    errors::{Error, Result},
};
use sea_orm::{DatabaseTransaction, PaginatorTrait, QueryOrder, Set, prelude::*};
use std::sync::Arc;
use tracing::{info, instrument, warn};

const ENTITY: &str = "category";

/// Repository for [`category::Model`] records.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    db: Arc<DatabaseConnection>,
}

impl CategoryRepository {
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

    /// Retrieves every category, ordered alphabetically by name.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<category::Model>> {
        Category::find()
            .order_by_asc(category::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| log_read_failure("list categories", e.into()))
    }

    /// Finds a category by its unique ID.
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i64) -> Result<Option<category::Model>> {
        Category::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| log_read_failure("get category", e.into()))
    }

    /// Finds a category by exact name.
    #[instrument(skip(self))]
    pub async fn get_by_name(&self, name: &str) -> Result<Option<category::Model>> {
        Category::find()
            .filter(category::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await
            .map_err(|e| log_read_failure("get category by name", e.into()))
    }

    /// Creates a category and returns it with its assigned id.
    ///
    /// # Errors
    /// - [`Error::InvalidName`] if the name is blank
    /// - [`Error::Integrity`] if the name is already taken
    /// - [`Error::Storage`] for any other storage fault
    #[instrument(skip(self))]
    pub async fn create(&self, name: &str) -> Result<category::Model> {
        let name = validate_name(name)?;

        let txn = begin(&self.db, "create category").await?;
        let outcome = category::ActiveModel {
            name: Set(name),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(Into::into);
        let created = finish(txn, outcome, "create category").await?;

        info!(id = created.id, "Category created.");
        Ok(created)
    }

    /// Renames an existing category.
    ///
    /// # Errors
    /// - [`Error::NotFound`] if `id` does not resolve
    /// - [`Error::InvalidName`] if the new name is blank
    /// - [`Error::Integrity`] if another category already uses the name
    #[instrument(skip(self))]
    pub async fn update(&self, id: i64, new_name: &str) -> Result<category::Model> {
        let new_name = validate_name(new_name)?;

        let txn = begin(&self.db, "update category").await?;
        let outcome = rename_in(&txn, id, new_name).await;
        finish(txn, outcome, "update category").await
    }

    /// Deletes a category that no transaction references.
    ///
    /// # Errors
    /// - [`Error::NotFound`] if `id` does not resolve
    /// - [`Error::Integrity`] if transactions still reference the category
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<()> {
        let txn = begin(&self.db, "delete category").await?;
        let outcome = delete_in(&txn, id).await;
        finish(txn, outcome, "delete category").await?;

        info!(id, "Category deleted.");
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(trimmed.to_string())
}

async fn find_existing(txn: &DatabaseTransaction, id: i64) -> Result<category::Model> {
    Category::find_by_id(id)
        .one(txn)
        .await?
        .ok_or(Error::NotFound { entity: ENTITY, id })
}

async fn rename_in(
    txn: &DatabaseTransaction,
    id: i64,
    new_name: String,
) -> Result<category::Model> {
    let existing = find_existing(txn, id).await?;
    if existing.name == new_name {
        return Ok(existing);
    }

    let mut active_model: category::ActiveModel = existing.into();
    active_model.name = Set(new_name);
    active_model.update(txn).await.map_err(Into::into)
}

async fn delete_in(txn: &DatabaseTransaction, id: i64) -> Result<()> {
    let existing = find_existing(txn, id).await?;

    let referencing = Transaction::find()
        .filter(transaction::Column::CategoryId.eq(id))
        .count(txn)
        .await?;
    if referencing > 0 {
        return Err(Error::Integrity {
            message: format!(
                "category '{}' is still used by {referencing} transaction(s)",
                existing.name
            ),
        });
    }

    existing.delete(txn).await?;
    Ok(())
}

/// Creates each configured category whose name is not present yet. Entries with a
/// blank name are skipped.
///
/// Returns how many categories were created.
pub async fn seed_categories(
    repo: &CategoryRepository,
    categories: &[CategoryConfig],
) -> Result<usize> {
    let mut created = 0;
    for config in categories {
        if config.name.trim().is_empty() {
            warn!("Skipping configured category with a blank name.");
            continue;
        }
        if repo.get_by_name(config.name.trim()).await?.is_none() {
            repo.create(&config.name).await?;
            created += 1;
        }
    }
    info!(created, "Seeded categories.");
    Ok(created)
}
