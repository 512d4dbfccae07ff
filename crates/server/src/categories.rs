//! Categories API endpoints

use api_types::{
    MessageResponse,
    category::{
        CategoriesResponse, CategoryListQuery, CategoryNew, CategoryResponse, CategoryUpdate,
        CategoryView,
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
use engine::{Category, CategoryPatch, NewCategoryCmd, Patch};

use crate::{ServerError, parse_id, server::ServerState};

const NOT_FOUND: &str = "Category not found";

fn map_category(category: Category) -> CategoryView {
    CategoryView {
        id: category.id,
        user_id: category.user_id,
        name: category.name,
        kind: category.kind.as_str().to_string(),
        icon: category.icon,
        color: category.color,
        description: category.description,
        is_default: category.is_default,
        created_at: category.created_at,
        updated_at: category.updated_at,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<CategoryNew>, JsonRejection>,
) -> Result<(StatusCode, Json<CategoryResponse>), ServerError> {
    let Json(payload) = payload?;
    let cmd = NewCategoryCmd {
        firebase_uid: payload.firebase_uid,
        name: payload.name,
        kind: payload.kind,
        description: payload.description,
        is_default: payload.is_default,
    };
    let category = state.engine.create_category(cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(CategoryResponse {
            success: true,
            message: Some("Category created successfully".to_string()),
            category: map_category(category),
        }),
    ))
}

/// Categories visible to `firebase_uid`, optionally restricted by `type`.
pub async fn list(
    State(state): State<ServerState>,
    query: Result<Query<CategoryListQuery>, QueryRejection>,
) -> Result<Json<CategoriesResponse>, ServerError> {
    let Query(query) = query?;
    let Some(firebase_uid) = query.firebase_uid.filter(|uid| !uid.trim().is_empty()) else {
        return Err(ServerError::BadRequest("firebase_uid is required".to_string()));
    };

    let categories: Vec<CategoryView> = state
        .engine
        .list_categories(&firebase_uid, query.kind.as_deref())
        .await?
        .into_iter()
        .map(map_category)
        .collect();

    Ok(Json(CategoriesResponse {
        success: true,
        count: categories.len(),
        categories,
    }))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<CategoryResponse>, ServerError> {
    let id = parse_id(&id, NOT_FOUND)?;
    let category = state.engine.category(id).await?;
    Ok(Json(CategoryResponse {
        success: true,
        message: None,
        category: map_category(category),
    }))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<CategoryUpdate>, JsonRejection>,
) -> Result<Json<CategoryResponse>, ServerError> {
    let id = parse_id(&id, NOT_FOUND)?;
    let Json(payload) = payload?;
    let patch = CategoryPatch {
        name: Patch::from(payload.name),
        kind: Patch::from(payload.kind),
        icon: Patch::from(payload.icon),
        color: Patch::from(payload.color),
        description: Patch::from(payload.description),
        is_default: Patch::from(payload.is_default),
    };
    let category = state.engine.update_category(id, patch).await?;

    Ok(Json(CategoryResponse {
        success: true,
        message: Some("Category updated successfully".to_string()),
        category: map_category(category),
    }))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ServerError> {
    let id = parse_id(&id, NOT_FOUND)?;
    state.engine.delete_category(id).await?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Category deleted successfully".to_string(),
    }))
}
