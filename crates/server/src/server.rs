use std::{collections::BTreeMap, future::Future, sync::Arc};

use api_types::ServiceInfo;
use axum::{
    Json, Router,
    http::{Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    INTERNAL_ERROR_MESSAGE, InternalErrorDetail, account_types, categories, currencies,
    error_body, payment_methods, transactions, users,
};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// Listener and error-reporting options.
#[derive(Clone, Debug)]
pub struct ServerOptions {
    pub bind: String,
    pub port: u16,
    /// Include the underlying storage error text in 500 responses.
    pub expose_internal_errors: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8000,
            expose_internal_errors: false,
        }
    }
}

async fn service_info() -> Json<ServiceInfo> {
    let endpoints = [
        ("users", "/api/users"),
        ("categories", "/api/categories"),
        ("transactions", "/api/transactions"),
        ("currencies", "/api/currencies"),
        ("paymentMethods", "/api/payment-methods"),
        ("accountTypes", "/api/account-types"),
    ]
    .into_iter()
    .map(|(name, path)| (name.to_string(), path.to_string()))
    .collect::<BTreeMap<_, _>>();

    Json(ServiceInfo {
        message: "Finance Tracker API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints,
    })
}

async fn route_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(error_body("Route not found", None)),
    )
        .into_response()
}

/// Rewrite sanitized 500 bodies to carry the storage error text.
async fn expose_internal_error(mut response: Response) -> Response {
    match response.extensions_mut().remove::<InternalErrorDetail>() {
        Some(InternalErrorDetail(detail)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(error_body(INTERNAL_ERROR_MESSAGE, Some(detail))),
        )
            .into_response(),
        None => response,
    }
}

fn api(state: ServerState) -> Router {
    Router::new()
        .route("/users/sync", axum::routing::post(users::sync))
        .route("/users/all", get(users::list))
        .route("/users/firebase/{firebase_uid}", get(users::by_firebase_uid))
        .route("/users/email/{email}", get(users::by_email))
        .route("/categories", get(categories::list).post(categories::create))
        .route(
            "/categories/{id}",
            get(categories::get)
                .put(categories::update)
                .delete(categories::delete),
        )
        .route(
            "/transactions",
            get(transactions::list).post(transactions::create),
        )
        .route("/transactions/summary", get(transactions::summary))
        .route(
            "/transactions/{id}",
            get(transactions::get)
                .put(transactions::update)
                .delete(transactions::delete),
        )
        .route("/currencies", get(currencies::list).post(currencies::create))
        .route("/currencies/code/{code}", get(currencies::by_code))
        .route(
            "/payment-methods",
            get(payment_methods::list).post(payment_methods::create),
        )
        .route(
            "/payment-methods/{id}",
            get(payment_methods::get)
                .put(payment_methods::update)
                .delete(payment_methods::delete),
        )
        .route(
            "/account-types",
            get(account_types::list).post(account_types::create),
        )
        .route("/account-types/{id}", get(account_types::get))
        .with_state(state)
}

/// Build the full application router.
pub fn router(engine: Arc<Engine>, options: &ServerOptions) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/", get(service_info))
        .nest("/api", api(ServerState { engine }))
        .fallback(route_not_found);

    if options.expose_internal_errors {
        router = router.layer(middleware::map_response(expose_internal_error));
    }

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Bind to the configured address and serve until Ctrl+C.
pub async fn run(engine: Arc<Engine>, options: ServerOptions) -> Result<(), std::io::Error> {
    let listener =
        tokio::net::TcpListener::bind((options.bind.as_str(), options.port)).await?;
    run_with_listener(engine, &options, listener, shutdown_signal()).await
}

pub async fn run_with_listener(
    engine: Arc<Engine>,
    options: &ServerOptions,
    listener: tokio::net::TcpListener,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);
    tracing::info!("API available at http://{}/api", addr);

    axum::serve(listener, router(engine, options))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(err) => {
            tracing::error!("failed to listen for shutdown signal: {err}");
            std::future::pending::<()>().await;
        }
    }
}
