/// Category CRUD
pub mod category;

/// Aggregations and display helpers over loaded transactions
pub mod report;

/// Commit-or-rollback wrapper shared by the repositories
pub(crate) mod session;

/// Transaction CRUD and whole-table reports
pub mod transaction;

pub use category::{CategoryRepository, seed_categories};
pub use report::{MonthlyTotals, Totals};
pub use transaction::{NewTransaction, TransactionPatch, TransactionRepository};
