//! Ledger engine for the personal finance tracker.
//!
//! The [`Engine`] owns the database connection and exposes every domain
//! operation: user sync, categories, transactions with their summary, and
//! the reference data (currencies, payment methods, account types).
//!
//! All ledger operations are scoped by the caller's external identity
//! (`firebase_uid`), resolved to an internal user id before any read or
//! write.

pub use account_types::AccountType;
pub use categories::Category;
pub use commands::{
    CategoryPatch, NewAccountTypeCmd, NewCategoryCmd, NewCurrencyCmd, NewPaymentMethodCmd,
    NewTransactionCmd, PaymentMethodPatch, SyncUserCmd, TransactionPatch,
};
pub use currencies::Currency;
pub use error::EngineError;
pub use money::Money;
pub use ops::{Engine, EngineBuilder, KindTotals, Summary, SyncOutcome, TransactionListFilter};
pub use patch::Patch;
pub use payment_methods::{PaymentMethod, PaymentMethodKind};
pub use transactions::{Transaction, TransactionKind};
pub use users::User;

mod account_types;
mod categories;
mod commands;
mod currencies;
mod error;
mod money;
mod ops;
mod patch;
mod payment_methods;
mod transactions;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
