//! Handlers for chains and their responses.
//!
//! Chains are only ever created through `POST /images/{id}/chains` (the
//! first edit) and grown through `POST /responses/{id}/continue`, so the
//! step sequence is fully owned by the repository layer.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use omm_core::chain::{self, ChainItem, ChainSource, ChainStep};
use omm_core::error::CoreError;
use omm_core::types::DbId;
use omm_db::models::chain::{Chain, Response};
use omm_db::repositories::{ChainRepo, ImageRepo, ResponseRepo};
use serde::{Deserialize, Serialize};

use crate::engine::generate;
use crate::error::{AppError, AppResult};
use crate::identity::CurrentUser;
use crate::state::AppState;

/// Request body for creating or continuing a chain.
#[derive(Debug, Deserialize)]
pub struct PromptRequest {
    pub prompt: String,
}

/// A reconstructed chain ready for carousel display.
#[derive(Debug, Serialize)]
pub struct ChainView {
    pub chain_id: DbId,
    pub items: Vec<ChainItem>,
}

/// POST /api/v1/images/{image_id}/chains
///
/// Starts a new branch from the image: creates the chain and its step-1
/// response, then generates the first edit. A generation failure still
/// returns an error but leaves the placeholder response in place.
pub async fn create_for_image(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(image_id): Path<DbId>,
    Json(input): Json<PromptRequest>,
) -> AppResult<(StatusCode, Json<Response>)> {
    chain::validate_prompt(&input.prompt)?;

    let image = ImageRepo::find_by_id(&state.pool, image_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Image",
            id: image_id,
        }))?;

    let (_, response) =
        ChainRepo::create_with_first_response(&state.pool, image.id, &input.prompt, user.id)
            .await?;

    let settled = generate::run(&state, &response, &image.url).await?;
    Ok((StatusCode::CREATED, Json(settled)))
}

/// GET /api/v1/images/{image_id}/chains
///
/// Lists the branches rooted at an image, oldest first.
pub async fn list_for_image(
    State(state): State<AppState>,
    Path(image_id): Path<DbId>,
) -> AppResult<Json<Vec<Chain>>> {
    ImageRepo::find_by_id(&state.pool, image_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Image",
            id: image_id,
        }))?;

    let chains = ChainRepo::list_by_image(&state.pool, image_id).await?;
    Ok(Json(chains))
}

/// POST /api/v1/responses/{id}/continue
///
/// Appends the next step to the chain the response belongs to. The source
/// for the new edit is the referenced response's image; when that
/// generation failed (empty url) the chain's root image is used instead.
pub async fn continue_chain(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<DbId>,
    Json(input): Json<PromptRequest>,
) -> AppResult<(StatusCode, Json<Response>)> {
    chain::validate_prompt(&input.prompt)?;

    let terminal = ResponseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Response",
            id,
        }))?;
    let chain_row = ChainRepo::find_by_id(&state.pool, terminal.chain_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Chain",
            id: terminal.chain_id,
        }))?;

    let source_url = if !terminal.url.is_empty() {
        terminal.url.clone()
    } else {
        root_image_url(&state, &chain_row).await?
    };

    let response =
        ResponseRepo::create_next(&state.pool, terminal.chain_id, &input.prompt, user.id).await?;

    let settled = generate::run(&state, &response, &source_url).await?;
    Ok((StatusCode::CREATED, Json(settled)))
}

/// GET /api/v1/responses/{id}/chain
///
/// Reconstructs the full display sequence from a terminal response id.
pub async fn get_chain(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ChainView>> {
    let terminal = ResponseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Response",
            id,
        }))?;

    let view = reconstruct(&state, terminal.chain_id).await?;
    Ok(Json(view))
}

/// GET /api/v1/chains/{id}
///
/// Reconstructs the display sequence for a whole branch, as opened from
/// the branch list.
pub async fn get_chain_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ChainView>> {
    let view = reconstruct(&state, id).await?;
    Ok(Json(view))
}

/// DELETE /api/v1/responses/{id}
///
/// Soft-deletes one step. Sibling steps keep their numbers; later
/// reconstructions simply skip this one.
pub async fn delete_response(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let response = ResponseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Response",
            id,
        }))?;
    if response.created_by_id != user.id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the owner may delete a response".to_string(),
        )));
    }

    ResponseRepo::soft_delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/chains/{id}
pub async fn delete_chain(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let chain_row = ChainRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Chain", id }))?;
    if chain_row.created_by_id != user.id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the owner may delete a chain".to_string(),
        )));
    }

    ChainRepo::soft_delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Shared reconstruction
// ---------------------------------------------------------------------------

/// Build the display sequence for a chain: optional root image, then every
/// surviving step ascending. Also used by the share proxy endpoint.
pub async fn reconstruct(state: &AppState, chain_id: DbId) -> AppResult<ChainView> {
    let chain_row = ChainRepo::find_by_id(&state.pool, chain_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Chain",
            id: chain_id,
        }))?;

    // A soft-deleted root image degrades to a chain without a source item.
    let source = match chain_row.root_image_id {
        Some(image_id) => ImageRepo::find_by_id(&state.pool, image_id)
            .await?
            .map(|image| ChainSource {
                image_id: image.id,
                url: image.url,
                address: image.address,
            }),
        None => None,
    };

    let steps = ResponseRepo::list_by_chain(&state.pool, chain_id)
        .await?
        .into_iter()
        .map(|r| ChainStep {
            response_id: r.id,
            step: r.step,
            prompt: r.prompt,
            url: r.url,
        })
        .collect();

    let items = chain::assemble_sequence(source, steps)?;
    Ok(ChainView {
        chain_id: chain_row.id,
        items,
    })
}

async fn root_image_url(state: &AppState, chain_row: &Chain) -> AppResult<String> {
    let Some(image_id) = chain_row.root_image_id else {
        return Err(AppError::BadRequest(
            "Chain has no usable source image for this step".to_string(),
        ));
    };
    let image = ImageRepo::find_by_id(&state.pool, image_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Image",
            id: image_id,
        }))?;
    Ok(image.url)
}
