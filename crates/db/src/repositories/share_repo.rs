//! Repository for the `shares` and `share_recipients` tables.

use omm_core::types::DbId;
use sqlx::PgPool;

use crate::models::share::{CreateShare, Share, ShareRecipient};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, response_id, title, description, visibility, view_count, like_count, \
     comment_count, shared_by_id, deleted_at, created_at, updated_at";

/// Provides operations for published shares.
pub struct ShareRepo;

impl ShareRepo {
    /// Publish a response as a share, persisting the recipient list (for
    /// PRIVATE shares) in the same transaction.
    pub async fn create(pool: &PgPool, input: &CreateShare) -> Result<Share, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO shares (response_id, title, description, visibility, shared_by_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let share = sqlx::query_as::<_, Share>(&query)
            .bind(input.response_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.visibility)
            .bind(input.shared_by_id)
            .fetch_one(&mut *tx)
            .await?;

        for user_id in &input.recipient_ids {
            sqlx::query(
                "INSERT INTO share_recipients (share_id, user_id)
                 VALUES ($1, $2)
                 ON CONFLICT ON CONSTRAINT uq_share_recipients_share_user DO NOTHING",
            )
            .bind(share.id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(share)
    }

    /// Find a share by its internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Share>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM shares WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Share>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the public feed, newest first.
    pub async fn list_public(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Share>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM shares
             WHERE visibility = 'PUBLIC' AND deleted_at IS NULL
             ORDER BY created_at DESC, id DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Share>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Bump the view counter in one atomic update, returning the fresh row.
    /// Returns `None` if the share does not exist or is soft-deleted.
    pub async fn record_view(pool: &PgPool, id: DbId) -> Result<Option<Share>, sqlx::Error> {
        let query = format!(
            "UPDATE shares SET view_count = view_count + 1
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Share>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the recipients of a share.
    pub async fn list_recipients(
        pool: &PgPool,
        share_id: DbId,
    ) -> Result<Vec<ShareRecipient>, sqlx::Error> {
        sqlx::query_as::<_, ShareRecipient>(
            "SELECT id, share_id, user_id, created_at FROM share_recipients
             WHERE share_id = $1
             ORDER BY created_at ASC",
        )
        .bind(share_id)
        .fetch_all(pool)
        .await
    }

    /// True when the user is an authorized recipient of the share.
    pub async fn is_recipient(
        pool: &PgPool,
        share_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM share_recipients WHERE share_id = $1 AND user_id = $2)",
        )
        .bind(share_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// Soft-delete (take down) a share. Returns `true` if a row was marked
    /// deleted. Terminal: there is no republish.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE shares SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
