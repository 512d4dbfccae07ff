//! Payment methods API endpoints

use api_types::{
    MessageResponse, OwnerQuery,
    payment_method::{
        PaymentMethodNew, PaymentMethodResponse, PaymentMethodUpdate, PaymentMethodView,
        PaymentMethodsResponse,
    },
};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use engine::{NewPaymentMethodCmd, Patch, PaymentMethod, PaymentMethodPatch};

use crate::{ServerError, parse_id, server::ServerState};

const NOT_FOUND: &str = "Payment method not found";

fn map_payment_method(method: PaymentMethod) -> PaymentMethodView {
    PaymentMethodView {
        id: method.id,
        user_id: method.user_id,
        name: method.name,
        kind: method.kind.as_str().to_string(),
        icon: method.icon,
        description: method.description,
        is_default: method.is_default,
        created_at: method.created_at,
        updated_at: method.updated_at,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<PaymentMethodNew>, JsonRejection>,
) -> Result<(StatusCode, Json<PaymentMethodResponse>), ServerError> {
    let Json(payload) = payload?;
    let method = state
        .engine
        .create_payment_method(NewPaymentMethodCmd {
            firebase_uid: payload.firebase_uid,
            name: payload.name,
            kind: payload.kind,
            icon: payload.icon,
            description: payload.description,
            is_default: payload.is_default,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(PaymentMethodResponse {
            success: true,
            message: Some("Payment method created successfully".to_string()),
            payment_method: map_payment_method(method),
        }),
    ))
}

pub async fn list(
    State(state): State<ServerState>,
    query: Result<Query<OwnerQuery>, QueryRejection>,
) -> Result<Json<PaymentMethodsResponse>, ServerError> {
    let Query(query) = query?;
    let payment_methods: Vec<PaymentMethodView> = state
        .engine
        .list_payment_methods(query.firebase_uid.as_deref())
        .await?
        .into_iter()
        .map(map_payment_method)
        .collect();

    Ok(Json(PaymentMethodsResponse {
        success: true,
        count: payment_methods.len(),
        payment_methods,
    }))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<PaymentMethodResponse>, ServerError> {
    let id = parse_id(&id, NOT_FOUND)?;
    let method = state.engine.payment_method(id).await?;
    Ok(Json(PaymentMethodResponse {
        success: true,
        message: None,
        payment_method: map_payment_method(method),
    }))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<PaymentMethodUpdate>, JsonRejection>,
) -> Result<Json<PaymentMethodResponse>, ServerError> {
    let id = parse_id(&id, NOT_FOUND)?;
    let Json(payload) = payload?;
    let patch = PaymentMethodPatch {
        name: Patch::from(payload.name),
        kind: Patch::from(payload.kind),
        icon: Patch::from(payload.icon),
        description: Patch::from(payload.description),
        is_default: Patch::from(payload.is_default),
    };
    let method = state.engine.update_payment_method(id, patch).await?;

    Ok(Json(PaymentMethodResponse {
        success: true,
        message: Some("Payment method updated successfully".to_string()),
        payment_method: map_payment_method(method),
    }))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ServerError> {
    let id = parse_id(&id, NOT_FOUND)?;
    state.engine.delete_payment_method(id).await?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Payment method deleted successfully".to_string(),
    }))
}
