//! Command structs for engine operations.
//!
//! These types group parameters for write operations, keeping call sites
//! readable and avoiding long argument lists. Request fields arrive here
//! mostly unvalidated (`Option<String>`) because the engine owns the
//! validation order and its messages.

use crate::Patch;

/// Create or refresh a user from the identity provider.
#[derive(Clone, Debug, Default)]
pub struct SyncUserCmd {
    pub firebase_uid: Option<String>,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub email_verified: Option<bool>,
}

impl SyncUserCmd {
    #[must_use]
    pub fn new(firebase_uid: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            firebase_uid: Some(firebase_uid.into()),
            email: Some(email.into()),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }
}

/// Create a category.
///
/// An unresolved `firebase_uid` creates a global category.
#[derive(Clone, Debug, Default)]
pub struct NewCategoryCmd {
    pub firebase_uid: Option<String>,
    pub name: Option<String>,
    pub kind: Option<String>,
    pub description: Option<String>,
    pub is_default: Option<bool>,
}

impl NewCategoryCmd {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            kind: Some(kind.into()),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn owner(mut self, firebase_uid: impl Into<String>) -> Self {
        self.firebase_uid = Some(firebase_uid.into());
        self
    }

    #[must_use]
    pub fn default_flag(mut self, is_default: bool) -> Self {
        self.is_default = Some(is_default);
        self
    }
}

/// Partial update of a category. Empty `name`/`kind` keep the stored value.
#[derive(Clone, Debug, Default)]
pub struct CategoryPatch {
    pub name: Patch<String>,
    pub kind: Patch<String>,
    pub icon: Patch<Option<String>>,
    pub color: Patch<Option<String>>,
    pub description: Patch<Option<String>>,
    pub is_default: Patch<bool>,
}

/// Create a ledger transaction.
#[derive(Clone, Debug, Default)]
pub struct NewTransactionCmd {
    pub firebase_uid: Option<String>,
    pub category_id: Option<i32>,
    /// Decimal text, e.g. `"50.00"`.
    pub amount: Option<String>,
    pub kind: Option<String>,
    pub description: Option<String>,
    /// `YYYY-MM-DD`.
    pub transaction_date: Option<String>,
}

impl NewTransactionCmd {
    #[must_use]
    pub fn new(
        firebase_uid: impl Into<String>,
        amount: impl Into<String>,
        kind: impl Into<String>,
        transaction_date: impl Into<String>,
    ) -> Self {
        Self {
            firebase_uid: Some(firebase_uid.into()),
            amount: Some(amount.into()),
            kind: Some(kind.into()),
            transaction_date: Some(transaction_date.into()),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn category_id(mut self, category_id: i32) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial update of a transaction.
///
/// `category_id: Set(None)` moves the transaction to uncategorized and
/// `description: Set(None)` clears the description.
#[derive(Clone, Debug, Default)]
pub struct TransactionPatch {
    pub category_id: Patch<Option<i32>>,
    pub amount: Patch<String>,
    pub kind: Patch<String>,
    pub description: Patch<Option<String>>,
    pub transaction_date: Patch<String>,
}

/// Create a currency. `code` is stored upper-case.
#[derive(Clone, Debug, Default)]
pub struct NewCurrencyCmd {
    pub code: Option<String>,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub is_default: Option<bool>,
}

/// Create a payment method.
#[derive(Clone, Debug, Default)]
pub struct NewPaymentMethodCmd {
    pub firebase_uid: Option<String>,
    pub name: Option<String>,
    pub kind: Option<String>,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub is_default: Option<bool>,
}

/// Partial update of a payment method. Empty `name`/`kind` keep the stored
/// value.
#[derive(Clone, Debug, Default)]
pub struct PaymentMethodPatch {
    pub name: Patch<String>,
    pub kind: Patch<String>,
    pub icon: Patch<Option<String>>,
    pub description: Patch<Option<String>>,
    pub is_default: Patch<bool>,
}

/// Create an account type.
#[derive(Clone, Debug, Default)]
pub struct NewAccountTypeCmd {
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
}
