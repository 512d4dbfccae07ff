//! JSON bodies exchanged with the finance tracker HTTP API.
//!
//! Every response carries `success`. Failures use [`ErrorBody`]; successful
//! responses wrap one resource (or a list plus its `count`) under a key named
//! after the resource.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Error envelope shared by every failing route.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    /// Underlying error text, only present when the deployment exposes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Success envelope with no payload (deletes).
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// `GET /` banner.
#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub message: String,
    pub version: String,
    pub endpoints: BTreeMap<String, String>,
}

/// Query string carrying only the caller identity.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct OwnerQuery {
    pub firebase_uid: Option<String>,
}

/// Deserialize a field that may be absent, `null` or a value.
///
/// Use with `#[serde(default, deserialize_with = "present")]` on an
/// `Option<Option<T>>`: absent stays `None`, `null` becomes `Some(None)`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Numeric id sent either as a JSON number or as a numeric string.
#[derive(Deserialize)]
#[serde(untagged)]
enum IdInput {
    Number(i64),
    Text(String),
}

fn id_from_input<E: serde::de::Error>(input: Option<IdInput>) -> Result<Option<i32>, E> {
    match input {
        None => Ok(None),
        Some(IdInput::Number(n)) => i32::try_from(n)
            .map(Some)
            .map_err(|_| E::custom("id out of range")),
        Some(IdInput::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(IdInput::Text(s)) => s
            .trim()
            .parse::<i32>()
            .map(Some)
            .map_err(|_| E::custom(format!("invalid id: {s}"))),
    }
}

fn optional_id<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    id_from_input(Option::<IdInput>::deserialize(deserializer)?)
}

fn present_id<'de, D>(deserializer: D) -> Result<Option<Option<i32>>, D::Error>
where
    D: Deserializer<'de>,
{
    optional_id(deserializer).map(Some)
}

pub mod user {
    use super::*;

    /// `POST /api/users/sync` body.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct UserSync {
        pub firebase_uid: Option<String>,
        pub email: Option<String>,
        pub display_name: Option<String>,
        pub photo_url: Option<String>,
        pub email_verified: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: i32,
        pub firebase_uid: String,
        pub email: String,
        pub display_name: Option<String>,
        pub photo_url: Option<String>,
        pub email_verified: bool,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserResponse {
        pub success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub message: Option<String>,
        pub user: UserView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UsersResponse {
        pub success: bool,
        pub count: usize,
        pub users: Vec<UserView>,
    }
}

pub mod category {
    use super::*;

    /// `POST /api/categories` body.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub firebase_uid: Option<String>,
        pub name: Option<String>,
        #[serde(rename = "type")]
        pub kind: Option<String>,
        pub description: Option<String>,
        pub is_default: Option<bool>,
    }

    /// `PUT /api/categories/{id}` body.
    ///
    /// `icon`, `color` and `description` distinguish an absent field (keep)
    /// from an explicit `null` (clear).
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryUpdate {
        pub name: Option<String>,
        #[serde(rename = "type")]
        pub kind: Option<String>,
        #[serde(default, deserialize_with = "present")]
        pub icon: Option<Option<String>>,
        #[serde(default, deserialize_with = "present")]
        pub color: Option<Option<String>>,
        #[serde(default, deserialize_with = "present")]
        pub description: Option<Option<String>>,
        pub is_default: Option<bool>,
    }

    /// `GET /api/categories` query.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryListQuery {
        pub firebase_uid: Option<String>,
        #[serde(rename = "type")]
        pub kind: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: i32,
        pub user_id: Option<i32>,
        pub name: String,
        #[serde(rename = "type")]
        pub kind: String,
        pub icon: Option<String>,
        pub color: Option<String>,
        pub description: Option<String>,
        pub is_default: bool,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryResponse {
        pub success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub message: Option<String>,
        pub category: CategoryView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoriesResponse {
        pub success: bool,
        pub count: usize,
        pub categories: Vec<CategoryView>,
    }
}

pub mod transaction {
    use super::*;

    /// Amount as sent by clients: a JSON number or a decimal string.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(untagged)]
    pub enum AmountInput {
        Number(serde_json::Number),
        Text(String),
    }

    impl AmountInput {
        /// Decimal text handed to the engine for validation.
        pub fn into_text(self) -> String {
            match self {
                Self::Number(n) => n.to_string(),
                Self::Text(s) => s,
            }
        }
    }

    /// `POST /api/transactions` body.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub firebase_uid: Option<String>,
        #[serde(default, deserialize_with = "optional_id")]
        pub category_id: Option<i32>,
        pub amount: Option<AmountInput>,
        #[serde(rename = "type")]
        pub kind: Option<String>,
        pub description: Option<String>,
        pub transaction_date: Option<String>,
    }

    /// `PUT /api/transactions/{id}` body.
    ///
    /// `category_id` and `description` distinguish an absent field (keep)
    /// from an explicit `null` (clear).
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        pub firebase_uid: Option<String>,
        #[serde(default, deserialize_with = "present_id")]
        pub category_id: Option<Option<i32>>,
        pub amount: Option<AmountInput>,
        #[serde(rename = "type")]
        pub kind: Option<String>,
        #[serde(default, deserialize_with = "present")]
        pub description: Option<Option<String>>,
        pub transaction_date: Option<String>,
    }

    /// `GET /api/transactions` query.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionListQuery {
        pub firebase_uid: Option<String>,
        #[serde(rename = "type")]
        pub kind: Option<String>,
        pub start_date: Option<String>,
        pub end_date: Option<String>,
        #[serde(default, deserialize_with = "optional_id")]
        pub category_id: Option<i32>,
    }

    /// `GET /api/transactions/summary` query.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct SummaryQuery {
        pub firebase_uid: Option<String>,
        pub start_date: Option<String>,
        pub end_date: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: i32,
        pub user_id: i32,
        pub category_id: Option<i32>,
        /// Major units, two decimals.
        pub amount: f64,
        #[serde(rename = "type")]
        pub kind: String,
        pub description: Option<String>,
        pub transaction_date: NaiveDate,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
        pub category_name: Option<String>,
        pub category_type: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionResponse {
        pub success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub message: Option<String>,
        pub transaction: TransactionView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionsResponse {
        pub success: bool,
        pub count: usize,
        pub transactions: Vec<TransactionView>,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
    pub struct KindTotalsView {
        pub total: f64,
        pub count: u64,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
    pub struct SummaryView {
        pub income: KindTotalsView,
        pub expense: KindTotalsView,
        pub balance: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SummaryResponse {
        pub success: bool,
        pub summary: SummaryView,
    }
}

pub mod currency {
    use super::*;

    /// `POST /api/currencies` body.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CurrencyNew {
        pub code: Option<String>,
        pub name: Option<String>,
        pub symbol: Option<String>,
        pub is_default: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CurrencyView {
        pub id: i32,
        pub code: String,
        pub name: String,
        pub symbol: Option<String>,
        pub is_default: bool,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CurrencyResponse {
        pub success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub message: Option<String>,
        pub currency: CurrencyView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CurrenciesResponse {
        pub success: bool,
        pub count: usize,
        pub currencies: Vec<CurrencyView>,
    }
}

pub mod payment_method {
    use super::*;

    /// `POST /api/payment-methods` body.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct PaymentMethodNew {
        pub firebase_uid: Option<String>,
        pub name: Option<String>,
        #[serde(rename = "type")]
        pub kind: Option<String>,
        pub icon: Option<String>,
        pub description: Option<String>,
        pub is_default: Option<bool>,
    }

    /// `PUT /api/payment-methods/{id}` body.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct PaymentMethodUpdate {
        pub name: Option<String>,
        #[serde(rename = "type")]
        pub kind: Option<String>,
        #[serde(default, deserialize_with = "present")]
        pub icon: Option<Option<String>>,
        #[serde(default, deserialize_with = "present")]
        pub description: Option<Option<String>>,
        pub is_default: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentMethodView {
        pub id: i32,
        pub user_id: Option<i32>,
        pub name: String,
        #[serde(rename = "type")]
        pub kind: String,
        pub icon: Option<String>,
        pub description: Option<String>,
        pub is_default: bool,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentMethodResponse {
        pub success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub message: Option<String>,
        #[serde(rename = "paymentMethod")]
        pub payment_method: PaymentMethodView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentMethodsResponse {
        pub success: bool,
        pub count: usize,
        #[serde(rename = "paymentMethods")]
        pub payment_methods: Vec<PaymentMethodView>,
    }
}

pub mod account_type {
    use super::*;

    /// `POST /api/account-types` body.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct AccountTypeNew {
        pub name: Option<String>,
        pub description: Option<String>,
        pub icon: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountTypeView {
        pub id: i32,
        pub name: String,
        pub description: Option<String>,
        pub icon: Option<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountTypeResponse {
        pub success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub message: Option<String>,
        #[serde(rename = "accountType")]
        pub account_type: AccountTypeView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountTypesResponse {
        pub success: bool,
        pub count: usize,
        #[serde(rename = "accountTypes")]
        pub account_types: Vec<AccountTypeView>,
    }
}

#[cfg(test)]
mod tests {
    use super::{category::CategoryUpdate, transaction::*};

    #[test]
    fn update_distinguishes_null_from_absent() {
        let body: TransactionUpdate =
            serde_json::from_str(r#"{"category_id": null, "amount": 12.5}"#).unwrap();
        assert_eq!(body.category_id, Some(None));
        assert_eq!(body.description, None);
        assert_eq!(body.amount.map(AmountInput::into_text), Some("12.5".to_string()));

        let body: CategoryUpdate = serde_json::from_str(r#"{"color": null}"#).unwrap();
        assert_eq!(body.color, Some(None));
        assert_eq!(body.icon, None);
    }

    #[test]
    fn ids_accept_numbers_and_numeric_strings() {
        let body: TransactionNew =
            serde_json::from_str(r#"{"category_id": "7", "amount": "50.00"}"#).unwrap();
        assert_eq!(body.category_id, Some(7));
        assert_eq!(body.amount, Some(AmountInput::Text("50.00".to_string())));

        let body: TransactionNew = serde_json::from_str(r#"{"category_id": ""}"#).unwrap();
        assert_eq!(body.category_id, None);

        assert!(serde_json::from_str::<TransactionNew>(r#"{"category_id": "abc"}"#).is_err());
    }
}
