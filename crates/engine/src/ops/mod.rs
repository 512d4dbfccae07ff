use sea_orm::DatabaseConnection;

use crate::ResultEngine;

mod account_types;
mod categories;
mod currencies;
mod payment_methods;
mod summary;
mod transactions;
mod users;

pub use summary::{KindTotals, Summary};
pub use transactions::TransactionListFilter;
pub use users::SyncOutcome;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Close the underlying connection pool.
    ///
    /// Operations issued after this call fail with a database error.
    pub async fn close(&self) -> ResultEngine<()> {
        self.database.clone().close().await?;
        Ok(())
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
