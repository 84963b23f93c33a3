// src/handlers/users.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{common::error::AppError, config::AppState, models::user::User};

// GET /api/v1/users
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    responses(
        (status = 200, description = "All active customers", body = Vec<User>)
    )
)]
pub async fn list_users(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let users = app_state.user_service.list(&app_state.db_pool).await?;

    Ok((StatusCode::OK, Json(users)))
}

// GET /api/v1/users/{id}
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "Single customer", body = User),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let user = app_state.user_service.get(&app_state.db_pool, id).await?;

    Ok((StatusCode::OK, Json(user)))
}
