//! Currencies API endpoints

use api_types::currency::{CurrenciesResponse, CurrencyNew, CurrencyResponse, CurrencyView};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use engine::{Currency, NewCurrencyCmd};

use crate::{ServerError, server::ServerState};

fn map_currency(currency: Currency) -> CurrencyView {
    CurrencyView {
        id: currency.id,
        code: currency.code,
        name: currency.name,
        symbol: currency.symbol,
        is_default: currency.is_default,
        created_at: currency.created_at,
        updated_at: currency.updated_at,
    }
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<CurrenciesResponse>, ServerError> {
    let currencies: Vec<CurrencyView> = state
        .engine
        .list_currencies()
        .await?
        .into_iter()
        .map(map_currency)
        .collect();
    Ok(Json(CurrenciesResponse {
        success: true,
        count: currencies.len(),
        currencies,
    }))
}

pub async fn by_code(
    State(state): State<ServerState>,
    Path(code): Path<String>,
) -> Result<Json<CurrencyResponse>, ServerError> {
    let currency = state.engine.currency_by_code(&code).await?;
    Ok(Json(CurrencyResponse {
        success: true,
        message: None,
        currency: map_currency(currency),
    }))
}

pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<CurrencyNew>, JsonRejection>,
) -> Result<(StatusCode, Json<CurrencyResponse>), ServerError> {
    let Json(payload) = payload?;
    let currency = state
        .engine
        .create_currency(NewCurrencyCmd {
            code: payload.code,
            name: payload.name,
            symbol: payload.symbol,
            is_default: payload.is_default,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CurrencyResponse {
            success: true,
            message: Some("Currency created successfully".to_string()),
            currency: map_currency(currency),
        }),
    ))
}
