//! Repository for the `comments` table.
//!
//! Comments are append-only; removal is soft-delete. The denormalized
//! `comment_count` on the share is adjusted inside the same transaction as
//! each comment write, so it always equals the number of non-deleted rows.

use omm_core::types::DbId;
use sqlx::PgPool;

use crate::models::share::Comment;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, share_id, user_id, body, deleted_at, created_at, updated_at";

/// Provides operations for share comments.
pub struct CommentRepo;

impl CommentRepo {
    /// Append a comment to a share and bump its counter, in one
    /// transaction.
    pub async fn add(
        pool: &PgPool,
        share_id: DbId,
        user_id: DbId,
        body: &str,
    ) -> Result<Comment, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO comments (share_id, user_id, body)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let comment = sqlx::query_as::<_, Comment>(&query)
            .bind(share_id)
            .bind(user_id)
            .bind(body)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("UPDATE shares SET comment_count = comment_count + 1 WHERE id = $1")
            .bind(share_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(comment)
    }

    /// Find a comment by its internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM comments WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the surviving comments of a share, oldest first.
    pub async fn list_by_share(
        pool: &PgPool,
        share_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Comment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM comments
             WHERE share_id = $1 AND deleted_at IS NULL
             ORDER BY created_at ASC, id ASC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(share_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Soft-delete a comment and decrement the share counter, in one
    /// transaction. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let share_id: Option<(DbId,)> = sqlx::query_as(
            "UPDATE comments SET deleted_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING share_id",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((share_id,)) = share_id else {
            tx.commit().await?;
            return Ok(false);
        };

        sqlx::query(
            "UPDATE shares SET comment_count = GREATEST(comment_count - 1, 0) WHERE id = $1",
        )
        .bind(share_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }
}
