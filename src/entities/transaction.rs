//! Transaction entity - A single dated monetary movement linked to one category.
//!
//! `transaction_value` is always a non-negative magnitude; direction is carried by
//! the `type` column ([`TransactionType`]), never by the sign of the amount.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Direction of a transaction, stored as `"Income"` or `"Expense"`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum TransactionType {
    /// Money coming in
    #[sea_orm(string_value = "Income")]
    Income,
    /// Money going out
    #[sea_orm(string_value = "Expense")]
    Expense,
}

impl TransactionType {
    /// Parses a user-supplied label, case-insensitively.
    ///
    /// Accepts the English labels as well as the Portuguese `receita` / `despesa`
    /// used by older data entry screens.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "income" | "receita" | "i" => Some(Self::Income),
            "expense" | "despesa" | "e" => Some(Self::Expense),
            _ => None,
        }
    }

    /// The label shown in lists and reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Transaction database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Optional free-text description
    pub description: Option<String>,
    /// Calendar date of the movement
    pub transaction_date: Date,
    /// Non-negative amount
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub transaction_value: Decimal,
    /// `Income` or `Expense`
    #[sea_orm(column_name = "type")]
    pub kind: TransactionType,
    /// ID of the category this transaction belongs to
    pub category_id: i64,
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction belongs to one category; a referenced category cannot be deleted
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "Restrict"
    )]
    Category,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
