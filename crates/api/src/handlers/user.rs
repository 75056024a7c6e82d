//! Handlers for the `/users` resource.
//!
//! Users are provisioned by the fronting auth layer when it first sees an
//! identity; there is no self-registration flow here.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use omm_core::error::CoreError;
use omm_core::types::DbId;
use omm_db::models::user::{CreateUser, User};
use omm_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/v1/users
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<User>)> {
    if input.display_name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Display name must not be empty".to_string(),
        ));
    }
    let user = UserRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/v1/users/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<User>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    Ok(Json(user))
}
