// src/handlers/user.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::user::CreateUserRequest,
    store::{StoreError, UserStore},
};

/// Registers a user profile.
/// Returns 201 Created, or 409 if the username or email is taken.
pub async fn create_user(
    State(users): State<Arc<dyn UserStore>>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let username = payload.username.clone();
    let user = users.insert_user(payload).await.map_err(|e| match e {
        StoreError::Duplicate(_) => {
            AppError::Conflict(format!("Username '{}' or email already exists", username))
        }
        other => {
            tracing::error!("Failed to create user: {:?}", other);
            AppError::from(other)
        }
    })?;

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get_user(
    State(users): State<Arc<dyn UserStore>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user = users
        .find_user(id)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}
