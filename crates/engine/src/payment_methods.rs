//! Per-user payment methods (cash, card, ...).

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodKind {
    Cash,
    Card,
    Bank,
    Digital,
    Other,
}

impl PaymentMethodKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
            Self::Bank => "bank",
            Self::Digital => "digital",
            Self::Other => "other",
        }
    }
}

impl TryFrom<&str> for PaymentMethodKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "cash" => Ok(Self::Cash),
            "card" => Ok(Self::Card),
            "bank" => Ok(Self::Bank),
            "digital" => Ok(Self::Digital),
            "other" => Ok(Self::Other),
            _ => Err(EngineError::validation(
                "type must be one of: cash, card, bank, digital, other",
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: i32,
    pub user_id: Option<i32>,
    pub name: String,
    pub kind: PaymentMethodKind,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "payment_methods")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: Option<i32>,
    pub name: String,
    #[sea_orm(column_name = "type")]
    pub kind: String,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub is_default: bool,
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
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for PaymentMethod {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            kind: PaymentMethodKind::try_from(model.kind.as_str())?,
            icon: model.icon,
            description: model.description,
            is_default: model.is_default,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
