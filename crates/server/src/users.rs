//! Users API endpoints

use api_types::user::{UserResponse, UserSync, UserView, UsersResponse};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use engine::{SyncOutcome, SyncUserCmd, User};

use crate::{ServerError, server::ServerState};

fn map_user(user: User) -> UserView {
    UserView {
        id: user.id,
        firebase_uid: user.firebase_uid,
        email: user.email,
        display_name: user.display_name,
        photo_url: user.photo_url,
        email_verified: user.email_verified,
        created_at: user.created_at,
        updated_at: user.updated_at,
    }
}

/// Create or refresh the caller after an identity-provider login.
pub async fn sync(
    State(state): State<ServerState>,
    payload: Result<Json<UserSync>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), ServerError> {
    let Json(payload) = payload?;
    let cmd = SyncUserCmd {
        firebase_uid: payload.firebase_uid,
        email: payload.email,
        display_name: payload.display_name,
        photo_url: payload.photo_url,
        email_verified: payload.email_verified,
    };

    let (status, message, user) = match state.engine.sync_user(cmd).await? {
        SyncOutcome::Created(user) => (StatusCode::CREATED, "User created successfully", user),
        SyncOutcome::Updated(user) => (StatusCode::OK, "User updated successfully", user),
    };

    Ok((
        status,
        Json(UserResponse {
            success: true,
            message: Some(message.to_string()),
            user: map_user(user),
        }),
    ))
}

pub async fn by_firebase_uid(
    State(state): State<ServerState>,
    Path(firebase_uid): Path<String>,
) -> Result<Json<UserResponse>, ServerError> {
    let user = state.engine.user_by_firebase_uid(&firebase_uid).await?;
    Ok(Json(UserResponse {
        success: true,
        message: None,
        user: map_user(user),
    }))
}

pub async fn by_email(
    State(state): State<ServerState>,
    Path(email): Path<String>,
) -> Result<Json<UserResponse>, ServerError> {
    let user = state.engine.user_by_email(&email).await?;
    Ok(Json(UserResponse {
        success: true,
        message: None,
        user: map_user(user),
    }))
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<UsersResponse>, ServerError> {
    let users: Vec<UserView> = state
        .engine
        .list_users()
        .await?
        .into_iter()
        .map(map_user)
        .collect();
    Ok(Json(UsersResponse {
        success: true,
        count: users.len(),
        users,
    }))
}
