use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    EngineError, NewTransactionCmd, Patch, ResultEngine, Transaction, TransactionKind,
    TransactionPatch, categories, transactions,
    util::{non_empty, parse_date, parse_positive_amount},
};

use super::{Engine, users::lookup_user_id, with_tx};

/// Filters for [`Engine::list_transactions`]. All present filters must match.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionListFilter {
    pub kind: Option<TransactionKind>,
    /// Inclusive lower bound on `transaction_date`.
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on `transaction_date`.
    pub end_date: Option<NaiveDate>,
    pub category_id: Option<i32>,
}

impl TransactionListFilter {
    /// Build a filter from raw query values.
    ///
    /// Blank values count as absent and an unrecognized `kind` is ignored;
    /// malformed dates are rejected.
    pub fn from_query(
        kind: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
        category_id: Option<i32>,
    ) -> ResultEngine<Self> {
        Ok(Self {
            kind: TransactionKind::parse_filter(kind),
            start_date: non_empty(start_date)
                .map(|d| parse_date(&d, "start_date"))
                .transpose()?,
            end_date: non_empty(end_date)
                .map(|d| parse_date(&d, "end_date"))
                .transpose()?,
            category_id,
        })
    }
}

pub(super) trait ApplyTxFilters {
    fn apply_tx_filters(self, filter: &TransactionListFilter) -> Self;
}

impl<T> ApplyTxFilters for T
where
    T: QueryFilter + Sized,
{
    fn apply_tx_filters(mut self, filter: &TransactionListFilter) -> Self {
        if let Some(kind) = filter.kind {
            self = self.filter(transactions::Column::Kind.eq(kind.as_str()));
        }
        if let Some(start) = filter.start_date {
            self = self.filter(transactions::Column::TransactionDate.gte(start));
        }
        if let Some(end) = filter.end_date {
            self = self.filter(transactions::Column::TransactionDate.lte(end));
        }
        if let Some(category_id) = filter.category_id {
            self = self.filter(transactions::Column::CategoryId.eq(category_id));
        }
        self
    }
}

impl Engine {
    /// Record a new income or expense for the resolved owner.
    ///
    /// Input is checked in a fixed order (presence, type, amount, date) before
    /// the owner and the category are looked up.
    pub async fn create_transaction(&self, cmd: NewTransactionCmd) -> ResultEngine<Transaction> {
        let (Some(amount), Some(kind), Some(date)) = (
            non_empty(cmd.amount.as_deref()),
            non_empty(cmd.kind.as_deref()),
            non_empty(cmd.transaction_date.as_deref()),
        ) else {
            return Err(EngineError::validation(
                "amount, type, and transaction_date are required",
            ));
        };
        let kind = TransactionKind::try_from(kind.as_str())?;
        let amount = parse_positive_amount(&amount)?;
        let transaction_date = parse_date(&date, "transaction_date")?;

        with_tx!(self, |db_tx| {
            let user_id = self
                .require_user_id(&db_tx, cmd.firebase_uid.as_deref())
                .await?;
            if let Some(category_id) = cmd.category_id {
                self.require_visible_category(&db_tx, user_id, category_id)
                    .await?;
            }

            let now = Utc::now();
            let active = transactions::ActiveModel {
                id: ActiveValue::NotSet,
                user_id: ActiveValue::Set(user_id),
                category_id: ActiveValue::Set(cmd.category_id),
                amount_minor: ActiveValue::Set(amount.minor()),
                kind: ActiveValue::Set(kind.as_str().to_string()),
                description: ActiveValue::Set(non_empty(cmd.description.as_deref())),
                transaction_date: ActiveValue::Set(transaction_date),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            };
            let model = active.insert(&db_tx).await?;
            tracing::debug!(transaction_id = model.id, user_id, "transaction created");

            find_owned(&db_tx, model.id, user_id).await
        })
    }

    /// The owner's transactions, newest date first.
    pub async fn list_transactions(
        &self,
        firebase_uid: Option<&str>,
        filter: &TransactionListFilter,
    ) -> ResultEngine<Vec<Transaction>> {
        let user_id = self.require_user_id(&self.database, firebase_uid).await?;

        let rows = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .apply_tx_filters(filter)
            .order_by_desc(transactions::Column::TransactionDate)
            .order_by_desc(transactions::Column::CreatedAt)
            .order_by_desc(transactions::Column::Id)
            .find_also_related(categories::Entity)
            .all(&self.database)
            .await?;

        rows.into_iter().map(Transaction::try_from).collect()
    }

    pub async fn transaction(&self, id: i32, firebase_uid: Option<&str>) -> ResultEngine<Transaction> {
        let user_id = self
            .resolve_user_id(firebase_uid)
            .await?
            .ok_or_else(transaction_not_found)?;
        find_owned(&self.database, id, user_id).await
    }

    /// Merge `patch` into a transaction owned by the caller.
    ///
    /// Ownership is checked before the patch is validated. Blank `amount`,
    /// `kind` and `transaction_date` keep the stored values.
    pub async fn update_transaction(
        &self,
        id: i32,
        firebase_uid: Option<&str>,
        patch: TransactionPatch,
    ) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| {
            let user_id = lookup_user_id(&db_tx, firebase_uid)
                .await?
                .ok_or_else(transaction_not_found)?;
            let model = transactions::Entity::find_by_id(id)
                .filter(transactions::Column::UserId.eq(user_id))
                .one(&db_tx)
                .await?
                .ok_or_else(transaction_not_found)?;

            let amount = match non_empty(patch.amount.as_set().map(String::as_str)) {
                Some(raw) => Patch::Set(parse_positive_amount(&raw)?.minor()),
                None => Patch::Keep,
            };
            let kind = match non_empty(patch.kind.as_set().map(String::as_str)) {
                Some(raw) => {
                    let kind = TransactionKind::try_from(raw.as_str())?;
                    Patch::Set(kind.as_str().to_string())
                }
                None => Patch::Keep,
            };
            let transaction_date =
                match non_empty(patch.transaction_date.as_set().map(String::as_str)) {
                    Some(raw) => Patch::Set(parse_date(&raw, "transaction_date")?),
                    None => Patch::Keep,
                };
            if let Patch::Set(Some(category_id)) = patch.category_id {
                self.require_visible_category(&db_tx, user_id, category_id)
                    .await?;
            }

            let mut active: transactions::ActiveModel = model.clone().into();
            active.category_id = ActiveValue::Set(patch.category_id.apply(model.category_id));
            active.amount_minor = ActiveValue::Set(amount.apply(model.amount_minor));
            active.kind = ActiveValue::Set(kind.apply(model.kind));
            active.description = ActiveValue::Set(patch.description.apply(model.description));
            active.transaction_date =
                ActiveValue::Set(transaction_date.apply(model.transaction_date));
            active.updated_at = ActiveValue::Set(Utc::now());
            active.update(&db_tx).await?;

            find_owned(&db_tx, id, user_id).await
        })
    }

    pub async fn delete_transaction(&self, id: i32, firebase_uid: Option<&str>) -> ResultEngine<()> {
        let user_id = self
            .resolve_user_id(firebase_uid)
            .await?
            .ok_or_else(transaction_not_found)?;
        let result = transactions::Entity::delete_many()
            .filter(transactions::Column::Id.eq(id))
            .filter(transactions::Column::UserId.eq(user_id))
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(transaction_not_found());
        }
        tracing::debug!(transaction_id = id, user_id, "transaction deleted");
        Ok(())
    }
}

/// Load a transaction owned by `user_id`, joined with its category.
async fn find_owned(
    db: &impl ConnectionTrait,
    id: i32,
    user_id: i32,
) -> ResultEngine<Transaction> {
    transactions::Entity::find_by_id(id)
        .filter(transactions::Column::UserId.eq(user_id))
        .find_also_related(categories::Entity)
        .one(db)
        .await?
        .ok_or_else(transaction_not_found)
        .and_then(Transaction::try_from)
}

fn transaction_not_found() -> EngineError {
    EngineError::not_found("Transaction not found")
}
