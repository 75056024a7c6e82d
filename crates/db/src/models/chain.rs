//! Chain and response entity models and DTOs.
//!
//! A chain is one branch of edits rooted at an image; its responses are
//! keyed by `(chain_id, step)` with `step` starting at 1. The previous
//! response of step N is the row with step N-1 -- derived, never stored.

use omm_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Chain
// ---------------------------------------------------------------------------

/// A row from the `chains` table.
///
/// `root_image_id` is nullable for legacy chains imported without a source
/// image.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Chain {
    pub id: DbId,
    pub root_image_id: Option<DbId>,
    pub created_by_id: DbId,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// A row from the `responses` table.
///
/// `url` is empty until generation completes; an empty url on a settled
/// row means the generation for this step failed.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Response {
    pub id: DbId,
    pub chain_id: DbId,
    pub step: i32,
    pub prompt: String,
    pub url: String,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub created_by_id: DbId,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO carrying the generated output back onto a pending response.
#[derive(Debug, Clone, Deserialize)]
pub struct SettleResponse {
    pub url: String,
    pub width: Option<i32>,
    pub height: Option<i32>,
}
