use chrono::Utc;
use sea_orm::{
    ActiveValue, QueryFilter, QueryOrder, SqlErr, TransactionTrait, prelude::*,
    sea_query::Expr,
};

use crate::{Currency, EngineError, NewCurrencyCmd, ResultEngine, currencies, util::non_empty};

use super::{Engine, with_tx};

impl Engine {
    /// All currencies, the default one first.
    pub async fn list_currencies(&self) -> ResultEngine<Vec<Currency>> {
        let models = currencies::Entity::find()
            .order_by_desc(currencies::Column::IsDefault)
            .order_by_asc(currencies::Column::Code)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Currency::from).collect())
    }

    /// Lookup by code, case-insensitively.
    pub async fn currency_by_code(&self, code: &str) -> ResultEngine<Currency> {
        currencies::Entity::find()
            .filter(currencies::Column::Code.eq(code.trim().to_uppercase()))
            .one(&self.database)
            .await?
            .map(Currency::from)
            .ok_or_else(|| EngineError::not_found("Currency not found"))
    }

    /// Register a currency. A new default replaces the previous one.
    pub async fn create_currency(&self, cmd: NewCurrencyCmd) -> ResultEngine<Currency> {
        let (Some(code), Some(name)) = (
            non_empty(cmd.code.as_deref()),
            non_empty(cmd.name.as_deref()),
        ) else {
            return Err(EngineError::validation("code and name are required"));
        };
        let code = code.to_uppercase();
        let is_default = cmd.is_default.unwrap_or(false);

        with_tx!(self, |db_tx| {
            let now = Utc::now();
            if is_default {
                currencies::Entity::update_many()
                    .col_expr(currencies::Column::IsDefault, Expr::value(false))
                    .col_expr(currencies::Column::UpdatedAt, Expr::value(now))
                    .filter(currencies::Column::IsDefault.eq(true))
                    .exec(&db_tx)
                    .await?;
            }

            let active = currencies::ActiveModel {
                id: ActiveValue::NotSet,
                code: ActiveValue::Set(code),
                name: ActiveValue::Set(name),
                symbol: ActiveValue::Set(non_empty(cmd.symbol.as_deref())),
                is_default: ActiveValue::Set(is_default),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            };
            // Duplicates are rejected by the unique index on `code`.
            let model = active.insert(&db_tx).await.map_err(duplicate_code)?;
            tracing::info!(code = %model.code, is_default, "currency registered");
            Ok(Currency::from(model))
        })
    }
}

fn duplicate_code(err: DbErr) -> EngineError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            EngineError::validation("currency code already exists")
        }
        _ => err.into(),
    }
}
