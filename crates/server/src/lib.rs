use api_types::ErrorBody;
use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use engine::EngineError;

pub use server::{ServerOptions, ServerState, router, run, run_with_listener};

mod account_types;
mod categories;
mod currencies;
mod payment_methods;
mod server;
mod transactions;
mod users;

pub mod types {
    pub use api_types::{ErrorBody, MessageResponse, OwnerQuery, ServiceInfo};

    pub mod user {
        pub use api_types::user::{UserResponse, UserSync, UserView, UsersResponse};
    }

    pub mod category {
        pub use api_types::category::{
            CategoriesResponse, CategoryListQuery, CategoryNew, CategoryResponse, CategoryUpdate,
            CategoryView,
        };
    }

    pub mod transaction {
        pub use api_types::transaction::{
            AmountInput, KindTotalsView, SummaryQuery, SummaryResponse, SummaryView,
            TransactionListQuery, TransactionNew, TransactionResponse, TransactionUpdate,
            TransactionView, TransactionsResponse,
        };
    }

    pub mod currency {
        pub use api_types::currency::{
            CurrenciesResponse, CurrencyNew, CurrencyResponse, CurrencyView,
        };
    }

    pub mod payment_method {
        pub use api_types::payment_method::{
            PaymentMethodNew, PaymentMethodResponse, PaymentMethodUpdate, PaymentMethodView,
            PaymentMethodsResponse,
        };
    }

    pub mod account_type {
        pub use api_types::account_type::{
            AccountTypeNew, AccountTypeResponse, AccountTypeView, AccountTypesResponse,
        };
    }
}

pub(crate) const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

pub enum ServerError {
    Engine(EngineError),
    /// Malformed request (body, query string).
    BadRequest(String),
    /// Unknown resource, including path ids that are not integers.
    NotFound(String),
}

/// Storage fault text attached to a 500 response.
///
/// Only surfaced to clients by the layer installed when
/// [`ServerOptions::expose_internal_errors`] is set.
#[derive(Clone, Debug)]
pub(crate) struct InternalErrorDetail(pub(crate) String);

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Validation(_) => StatusCode::BAD_REQUEST,
        EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn error_body(message: impl Into<String>, error: Option<String>) -> ErrorBody {
    ErrorBody {
        success: false,
        message: message.into(),
        error,
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message, detail) = match self {
            ServerError::Engine(EngineError::Database(db_err)) => {
                tracing::error!("database error: {db_err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                    Some(db_err.to_string()),
                )
            }
            ServerError::Engine(err) => (status_for_engine_error(&err), err.to_string(), None),
            ServerError::BadRequest(message) => (StatusCode::BAD_REQUEST, message, None),
            ServerError::NotFound(message) => (StatusCode::NOT_FOUND, message, None),
        };

        let mut response = (status, Json(error_body(message, None))).into_response();
        if let Some(detail) = detail {
            response.extensions_mut().insert(InternalErrorDetail(detail));
        }
        response
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<JsonRejection> for ServerError {
    fn from(value: JsonRejection) -> Self {
        Self::BadRequest(value.body_text())
    }
}

impl From<QueryRejection> for ServerError {
    fn from(value: QueryRejection) -> Self {
        Self::BadRequest(value.body_text())
    }
}

/// Parse a path id; anything but an integer is reported as `not_found`.
pub(crate) fn parse_id(raw: &str, not_found: &str) -> Result<i32, ServerError> {
    raw.trim()
        .parse()
        .map_err(|_| ServerError::NotFound(not_found.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::DbErr;

    #[test]
    fn engine_validation_maps_to_400() {
        let res =
            ServerError::from(EngineError::Validation("bad".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::NotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn database_error_maps_to_500_with_detail_extension() {
        let res = ServerError::from(EngineError::Database(DbErr::Custom("disk full".into())))
            .into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let detail = res.extensions().get::<InternalErrorDetail>().unwrap();
        assert!(detail.0.contains("disk full"));
    }

    #[test]
    fn bad_request_maps_to_400() {
        let res = ServerError::BadRequest("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn non_numeric_id_is_not_found() {
        let err = parse_id("abc", "Category not found").err().unwrap();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(parse_id(" 42", "x").ok(), Some(42));
    }
}
