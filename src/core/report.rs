//! Report generation business logic.
//!
//! Aggregations over transaction rows that are already loaded: totals by type and
//! per-month totals. Everything here is a single linear pass with `Decimal`
//! accumulators. The repository feeds them, the terminal front end formats them.

use crate::entities::{TransactionType, transaction};
use chrono::Datelike;
use rust_decimal::Decimal;
use sea_orm::prelude::Date;
use std::collections::BTreeMap;
use std::ops::AddAssign;

/// Income and expense sums for some set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    /// Sum of all `Income` values
    pub income: Decimal,
    /// Sum of all `Expense` values
    pub expense: Decimal,
}

impl Totals {
    /// Adds one transaction value to the matching side.
    pub fn record(&mut self, kind: TransactionType, value: Decimal) {
        match kind {
            TransactionType::Income => self.income += value,
            TransactionType::Expense => self.expense += value,
        }
    }

    /// Income minus expense.
    #[must_use]
    pub fn balance(&self) -> Decimal {
        self.income - self.expense
    }
}

impl AddAssign for Totals {
    fn add_assign(&mut self, other: Self) {
        self.income += other.income;
        self.expense += other.expense;
    }
}

/// Per-month totals keyed by `YYYY-MM`, in chronological order.
pub type MonthlyTotals = BTreeMap<String, Totals>;

/// The `YYYY-MM` grouping key for a date.
#[must_use]
pub fn month_key(date: Date) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Sums `(type, value)` pairs into a single [`Totals`].
pub fn totals_by_type<I>(entries: I) -> Totals
where
    I: IntoIterator<Item = (TransactionType, Decimal)>,
{
    entries
        .into_iter()
        .fold(Totals::default(), |mut totals, (kind, value)| {
            totals.record(kind, value);
            totals
        })
}

/// Groups `(date, type, value)` triples by month. Months without entries are absent.
pub fn totals_by_month<I>(entries: I) -> MonthlyTotals
where
    I: IntoIterator<Item = (Date, TransactionType, Decimal)>,
{
    let mut months = MonthlyTotals::new();
    for (date, kind, value) in entries {
        months.entry(month_key(date)).or_default().record(kind, value);
    }
    months
}

/// Formats an amount with exactly two decimal places, e.g. `"1234.50"`.
#[must_use]
pub fn format_amount(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

/// One-line summary of a transaction for lists.
#[must_use]
pub fn format_transaction_summary(
    transaction: &transaction::Model,
    category_name: Option<&str>,
) -> String {
    format!(
        "[{}] {} | {} | {} | {} | {}",
        transaction.id,
        transaction.transaction_date.format("%Y-%m-%d"),
        format_amount(transaction.transaction_value),
        transaction.kind,
        category_name.unwrap_or("None"),
        transaction.description.as_deref().unwrap_or(""),
    )
}
