//! Share, recipient, like, and comment entity models and DTOs.

use omm_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Visibility
// ---------------------------------------------------------------------------

/// Share visibility. Maps to the Postgres `visibility` enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "visibility", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    pub fn is_private(self) -> bool {
        matches!(self, Visibility::Private)
    }
}

// ---------------------------------------------------------------------------
// Share
// ---------------------------------------------------------------------------

/// A row from the `shares` table.
///
/// Counters are denormalized for the feed; the repositories keep them in
/// step with the underlying rows by updating both in one transaction.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Share {
    pub id: DbId,
    pub response_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub visibility: Visibility,
    pub view_count: i64,
    pub like_count: i64,
    pub comment_count: i64,
    pub shared_by_id: DbId,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for publishing a response as a share.
#[derive(Debug, Clone)]
pub struct CreateShare {
    pub response_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub visibility: Visibility,
    pub recipient_ids: Vec<DbId>,
    pub shared_by_id: DbId,
}

// ---------------------------------------------------------------------------
// Recipient
// ---------------------------------------------------------------------------

/// A row from the `share_recipients` table. Grants read access to a
/// PRIVATE share.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ShareRecipient {
    pub id: DbId,
    pub share_id: DbId,
    pub user_id: DbId,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Like
// ---------------------------------------------------------------------------

/// A row from the `likes` table. At most one per (share, user).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Like {
    pub id: DbId,
    pub share_id: DbId,
    pub user_id: DbId,
    pub created_at: Timestamp,
}

/// Result of a like toggle: the new state plus the settled counter.
#[derive(Debug, Clone, Serialize)]
pub struct LikeState {
    pub liked: bool,
    pub like_count: i64,
}

// ---------------------------------------------------------------------------
// Comment
// ---------------------------------------------------------------------------

/// A row from the `comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub share_id: DbId,
    pub user_id: DbId,
    pub body: String,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
