use sea_orm::{FromQueryResult, QueryFilter, QuerySelect, prelude::*, sea_query::Expr};
use serde::{Deserialize, Serialize};

use crate::{Money, ResultEngine, TransactionKind, transactions};

use super::{Engine, TransactionListFilter, transactions::ApplyTxFilters};

/// Total and count for one transaction type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindTotals {
    pub total: Money,
    pub count: u64,
}

/// Income/expense aggregation for one user over an optional date window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub income: KindTotals,
    pub expense: KindTotals,
    /// `income.total - expense.total`, may be negative.
    pub balance: Money,
}

#[derive(Debug, FromQueryResult)]
struct KindRow {
    kind: String,
    total: Option<i64>,
    count: i64,
}

impl Engine {
    /// Sum the owner's transactions by their own type.
    ///
    /// Types with no rows in the window report zero totals. Only the date
    /// bounds of `filter` are applied.
    pub async fn summary(
        &self,
        firebase_uid: Option<&str>,
        filter: &TransactionListFilter,
    ) -> ResultEngine<Summary> {
        let user_id = self.require_user_id(&self.database, firebase_uid).await?;
        let window = TransactionListFilter {
            start_date: filter.start_date,
            end_date: filter.end_date,
            ..Default::default()
        };

        let rows = transactions::Entity::find()
            .select_only()
            .column_as(transactions::Column::Kind, "kind")
            .column_as(Expr::col(transactions::Column::AmountMinor).sum(), "total")
            .column_as(Expr::col(transactions::Column::Id).count(), "count")
            .filter(transactions::Column::UserId.eq(user_id))
            .apply_tx_filters(&window)
            .group_by(transactions::Column::Kind)
            .into_model::<KindRow>()
            .all(&self.database)
            .await?;

        let mut summary = Summary::default();
        for row in rows {
            let totals = KindTotals {
                total: Money::new(row.total.unwrap_or_default()),
                count: u64::try_from(row.count).unwrap_or_default(),
            };
            match TransactionKind::try_from(row.kind.as_str())? {
                TransactionKind::Income => summary.income = totals,
                TransactionKind::Expense => summary.expense = totals,
            }
        }
        summary.balance = summary.income.total - summary.expense.total;
        Ok(summary)
    }
}
