//! Handlers for shares, likes, and comments.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use omm_core::error::CoreError;
use omm_core::share as share_rules;
use omm_core::types::DbId;
use omm_db::models::share::{Comment, CreateShare, LikeState, Share, Visibility};
use omm_db::repositories::{CommentRepo, LikeRepo, ResponseRepo, ShareRepo, UserRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::chain::{self, ChainView};
use crate::identity::CurrentUser;
use crate::query::PaginationParams;
use crate::state::AppState;

/// Request body for publishing a response.
#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    pub response_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub visibility: Visibility,
    #[serde(default)]
    pub recipient_ids: Vec<DbId>,
}

/// Request body for adding a comment.
#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub body: String,
}

/// POST /api/v1/shares
///
/// Publishes a response. Publishing is the only transition out of the
/// unshared state; the only way back is takedown (soft-delete).
pub async fn publish(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(input): Json<PublishRequest>,
) -> AppResult<(StatusCode, Json<Share>)> {
    share_rules::validate_title(&input.title)?;
    share_rules::validate_description(input.description.as_deref())?;
    share_rules::validate_recipients(input.visibility.is_private(), input.recipient_ids.len())?;

    let response = ResponseRepo::find_by_id(&state.pool, input.response_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Response",
            id: input.response_id,
        }))?;

    let recipient_ids = if input.visibility.is_private() {
        let existing = UserRepo::count_existing(&state.pool, &input.recipient_ids).await?;
        if existing != input.recipient_ids.len() as i64 {
            return Err(AppError::BadRequest(
                "Recipient list contains unknown users".to_string(),
            ));
        }
        input.recipient_ids
    } else {
        Vec::new()
    };

    let share = ShareRepo::create(
        &state.pool,
        &CreateShare {
            response_id: response.id,
            title: input.title,
            description: input.description,
            visibility: input.visibility,
            recipient_ids,
            shared_by_id: user.id,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(share)))
}

/// GET /api/v1/shares
///
/// The community feed: public shares, newest first.
pub async fn feed(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Vec<Share>>> {
    let (limit, offset) = pagination.clamp();
    let shares = ShareRepo::list_public(&state.pool, limit, offset).await?;
    Ok(Json(shares))
}

/// GET /api/v1/shares/{id}
///
/// Returns the share and bumps its view counter in one atomic update.
pub async fn get_by_id(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Share>> {
    let share = find_visible(&state, id, user).await?;
    let share = ShareRepo::record_view(&state.pool, share.id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Share", id }))?;
    Ok(Json(share))
}

/// GET /api/v1/shares/{id}/chain
///
/// Reconstructs the shared chain. Tolerates a terminal response that was
/// soft-deleted after publishing -- the surviving steps still display.
pub async fn get_chain(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ChainView>> {
    let share = find_visible(&state, id, user).await?;

    let terminal = ResponseRepo::find_by_id_include_deleted(&state.pool, share.response_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Response",
            id: share.response_id,
        }))?;

    let view = chain::reconstruct(&state, terminal.chain_id).await?;
    Ok(Json(view))
}

/// DELETE /api/v1/shares/{id}
///
/// Takedown. Terminal: a taken-down share cannot be republished.
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let share = ShareRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Share", id }))?;
    if share.shared_by_id != user.id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the owner may take down a share".to_string(),
        )));
    }

    ShareRepo::soft_delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/shares/{id}/like
///
/// Binary toggle; returns the new state and settled counter.
pub async fn toggle_like(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<LikeState>> {
    let share = find_visible(&state, id, user).await?;
    let like_state = LikeRepo::toggle(&state.pool, share.id, user.id).await?;
    Ok(Json(like_state))
}

/// POST /api/v1/shares/{id}/comments
pub async fn add_comment(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<DbId>,
    Json(input): Json<CommentRequest>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    share_rules::validate_comment_text(&input.body)?;
    let share = find_visible(&state, id, user).await?;
    let comment = CommentRepo::add(&state.pool, share.id, user.id, &input.body).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// GET /api/v1/shares/{id}/comments
pub async fn list_comments(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<DbId>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Vec<Comment>>> {
    let share = find_visible(&state, id, user).await?;
    let (limit, offset) = pagination.clamp();
    let comments = CommentRepo::list_by_share(&state.pool, share.id, limit, offset).await?;
    Ok(Json(comments))
}

/// DELETE /api/v1/comments/{id}
pub async fn delete_comment(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let comment = CommentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Comment",
            id,
        }))?;
    if comment.user_id != user.id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the author may delete a comment".to_string(),
        )));
    }

    CommentRepo::soft_delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Access control
// ---------------------------------------------------------------------------

/// Fetch a share and enforce visibility: public shares are open, private
/// ones are limited to the owner and named recipients.
async fn find_visible(state: &AppState, id: DbId, user: CurrentUser) -> AppResult<Share> {
    let share = ShareRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Share", id }))?;

    if share.visibility.is_private()
        && share.shared_by_id != user.id
        && !ShareRepo::is_recipient(&state.pool, share.id, user.id).await?
    {
        return Err(AppError::Core(CoreError::Forbidden(
            "This share is private".to_string(),
        )));
    }
    Ok(share)
}
