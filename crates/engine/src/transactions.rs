//! Ledger records.
//!
//! A `Transaction` is a dated, positive amount owned by one user. Its sign is
//! carried by `kind` (income or expense), never by the stored amount.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{EngineError, Money, ResultEngine, categories};

/// Direction of a transaction (and the label type of a category).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Lenient parse used by list filters: unknown values are ignored.
    pub fn parse_filter(value: Option<&str>) -> Option<Self> {
        value.and_then(|v| Self::try_from(v).ok())
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(EngineError::validation(
                "type must be either \"income\" or \"expense\"",
            )),
        }
    }
}

/// A transaction joined with the name and type of its category.
///
/// `category_name`/`category_kind` are `None` when the transaction is
/// uncategorized, including after its category was deleted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i32,
    pub user_id: i32,
    pub category_id: Option<i32>,
    pub amount: Money,
    pub kind: TransactionKind,
    pub description: Option<String>,
    pub transaction_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub category_name: Option<String>,
    pub category_kind: Option<TransactionKind>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub category_id: Option<i32>,
    pub amount_minor: i64,
    #[sea_orm(column_name = "type")]
    pub kind: String,
    pub description: Option<String>,
    pub transaction_date: Date,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Categories,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<(Model, Option<categories::Model>)> for Transaction {
    type Error = EngineError;

    fn try_from((model, category): (Model, Option<categories::Model>)) -> ResultEngine<Self> {
        let category_kind = category
            .as_ref()
            .map(|c| TransactionKind::try_from(c.kind.as_str()))
            .transpose()?;
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            category_id: model.category_id,
            amount: Money::new(model.amount_minor),
            kind: TransactionKind::try_from(model.kind.as_str())?,
            description: model.description,
            transaction_date: model.transaction_date,
            created_at: model.created_at,
            updated_at: model.updated_at,
            category_name: category.map(|c| c.name),
            category_kind,
        })
    }
}
