//! Runs one generation for a pending response.
//!
//! The response row already exists with an empty url when this runs. Every
//! failure leaves that placeholder in place; callers surface the error and
//! the UI shows the step as failed. The error variants keep the three
//! failure modes apart: source missing, provider failure, storage failure.

use std::io::Cursor;

use omm_core::error::CoreError;
use omm_db::models::chain::{Response, SettleResponse};
use omm_db::repositories::ResponseRepo;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Generate the image for `response` from the source at `source_url`,
/// store it, and settle the row. Returns the settled response.
pub async fn run(state: &AppState, response: &Response, source_url: &str) -> AppResult<Response> {
    let source = fetch_source(state, source_url).await?;

    let edited = state
        .generator
        .edit_image(&response.prompt, source)
        .await?;

    let key = object_key(response, &edited.content_type);
    let (width, height) = dimensions_of(&edited.bytes);
    let url = state.storage.store(&key, edited.bytes).await?;

    let settled = ResponseRepo::settle(
        &state.pool,
        response.id,
        &SettleResponse { url, width, height },
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "Response",
        id: response.id,
    }))?;

    tracing::info!(
        response_id = settled.id,
        chain_id = settled.chain_id,
        step = settled.step,
        "Generation settled"
    );
    Ok(settled)
}

/// Resolve source bytes: objects we stored come back through the storage
/// provider, anything else (street-view URLs) over plain HTTP.
async fn fetch_source(state: &AppState, source_url: &str) -> AppResult<Vec<u8>> {
    if let Some(key) = state.storage.key_for(source_url) {
        return Ok(state.storage.fetch(key).await?);
    }

    let response = state
        .http
        .get(source_url)
        .send()
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to fetch source image: {e}")))?;
    if !response.status().is_success() {
        return Err(AppError::InternalError(format!(
            "Source image fetch returned {}",
            response.status()
        )));
    }
    let bytes = response
        .bytes()
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to read source image: {e}")))?;
    Ok(bytes.to_vec())
}

/// Object key for a generated image: one flat namespace keyed by a v7 uuid
/// (time-ordered, so bucket listings stay roughly chronological).
fn object_key(response: &Response, content_type: &str) -> String {
    let ext = match content_type {
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        _ => "png",
    };
    format!("responses/{}-s{}.{ext}", Uuid::now_v7(), response.step)
}

/// Header-only dimension extraction; generation does not fail over
/// unreadable metadata.
fn dimensions_of(bytes: &[u8]) -> (Option<i32>, Option<i32>) {
    let reader = match image::ImageReader::new(Cursor::new(bytes)).with_guessed_format() {
        Ok(reader) => reader,
        Err(_) => return (None, None),
    };
    match reader.into_dimensions() {
        Ok((w, h)) => (Some(w as i32), Some(h as i32)),
        Err(e) => {
            tracing::warn!(error = %e, "Could not read generated image dimensions");
            (None, None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_of_valid_png() {
        // Smallest valid 1x1 PNG.
        let png: &[u8] = &[
            0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48,
            0x44, 0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00,
            0x00, 0x1F, 0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78,
            0x9C, 0x62, 0x00, 0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00,
            0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
        ];
        assert_eq!(dimensions_of(png), (Some(1), Some(1)));
    }

    #[test]
    fn dimensions_of_garbage_is_none() {
        assert_eq!(dimensions_of(b"not an image"), (None, None));
    }

    #[test]
    fn object_key_extension_follows_content_type() {
        let response = sample_response();
        assert!(object_key(&response, "image/jpeg").ends_with(".jpg"));
        assert!(object_key(&response, "image/webp").ends_with(".webp"));
        assert!(object_key(&response, "application/octet-stream").ends_with(".png"));
    }

    fn sample_response() -> Response {
        Response {
            id: 1,
            chain_id: 1,
            step: 2,
            prompt: "prompt".to_string(),
            url: String::new(),
            width: None,
            height: None,
            created_by_id: 1,
            deleted_at: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }
}
