//! Account types API endpoints

use api_types::account_type::{
    AccountTypeNew, AccountTypeResponse, AccountTypeView, AccountTypesResponse,
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use engine::{AccountType, NewAccountTypeCmd};

use crate::{ServerError, parse_id, server::ServerState};

fn map_account_type(account_type: AccountType) -> AccountTypeView {
    AccountTypeView {
        id: account_type.id,
        name: account_type.name,
        description: account_type.description,
        icon: account_type.icon,
        created_at: account_type.created_at,
        updated_at: account_type.updated_at,
    }
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<AccountTypesResponse>, ServerError> {
    let account_types: Vec<AccountTypeView> = state
        .engine
        .list_account_types()
        .await?
        .into_iter()
        .map(map_account_type)
        .collect();
    Ok(Json(AccountTypesResponse {
        success: true,
        count: account_types.len(),
        account_types,
    }))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<AccountTypeResponse>, ServerError> {
    let id = parse_id(&id, "Account type not found")?;
    let account_type = state.engine.account_type(id).await?;
    Ok(Json(AccountTypeResponse {
        success: true,
        message: None,
        account_type: map_account_type(account_type),
    }))
}

pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<AccountTypeNew>, JsonRejection>,
) -> Result<(StatusCode, Json<AccountTypeResponse>), ServerError> {
    let Json(payload) = payload?;
    let account_type = state
        .engine
        .create_account_type(NewAccountTypeCmd {
            name: payload.name,
            description: payload.description,
            icon: payload.icon,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AccountTypeResponse {
            success: true,
            message: Some("Account type created successfully".to_string()),
            account_type: map_account_type(account_type),
        }),
    ))
}
