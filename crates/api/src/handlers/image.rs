//! Handlers for the `/images` resource.
//!
//! An image is created once per map selection and is immutable afterwards
//! apart from soft-delete, so there is no update endpoint.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use omm_core::error::CoreError;
use omm_core::geo;
use omm_core::types::DbId;
use omm_db::models::image::{CreateImage, Image};
use omm_db::repositories::ImageRepo;

use crate::error::{AppError, AppResult};
use crate::identity::CurrentUser;
use crate::state::AppState;

/// POST /api/v1/images
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(mut input): Json<CreateImage>,
) -> AppResult<(StatusCode, Json<Image>)> {
    geo::validate_coordinates(input.lat, input.lng)?;
    geo::validate_address(input.address.as_deref())?;
    if input.url.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Image url must not be empty".to_string(),
        ));
    }

    input.created_by_id = user.id;
    let image = ImageRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(image)))
}

/// GET /api/v1/images
///
/// Lists the caller's own images.
pub async fn list_mine(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Image>>> {
    let images = ImageRepo::list_by_owner(&state.pool, user.id).await?;
    Ok(Json(images))
}

/// GET /api/v1/images/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Image>> {
    let image = ImageRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Image", id }))?;
    Ok(Json(image))
}

/// DELETE /api/v1/images/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let image = ImageRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Image", id }))?;
    if image.created_by_id != user.id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the owner may delete an image".to_string(),
        )));
    }

    ImageRepo::soft_delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
