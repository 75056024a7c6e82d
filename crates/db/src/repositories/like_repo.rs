//! Repository for the `likes` table.

use omm_core::types::DbId;
use sqlx::PgPool;

use crate::models::share::LikeState;

/// Provides the like toggle for shares.
pub struct LikeRepo;

impl LikeRepo {
    /// Toggle the (user, share) like and adjust the denormalized counter,
    /// both inside one transaction so the counter can never drift from the
    /// join table.
    ///
    /// Returns the new state and the settled counter value.
    pub async fn toggle(
        pool: &PgPool,
        share_id: DbId,
        user_id: DbId,
    ) -> Result<LikeState, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let removed = sqlx::query("DELETE FROM likes WHERE share_id = $1 AND user_id = $2")
            .bind(share_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        // ON CONFLICT covers a like that landed between our delete and
        // insert; counting affected rows keeps the delta exact either way.
        let inserted = if removed == 0 {
            sqlx::query(
                "INSERT INTO likes (share_id, user_id)
                 VALUES ($1, $2)
                 ON CONFLICT ON CONSTRAINT uq_likes_share_user DO NOTHING",
            )
            .bind(share_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected()
        } else {
            0
        };

        let delta = inserted as i64 - removed as i64;
        let (like_count,): (i64,) = sqlx::query_as(
            "UPDATE shares SET like_count = GREATEST(like_count + $2, 0)
             WHERE id = $1
             RETURNING like_count",
        )
        .bind(share_id)
        .bind(delta)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(LikeState {
            liked: inserted > 0,
            like_count,
        })
    }

    /// Count the like rows for a share straight from the join table.
    /// Test/reconciliation aid for the denormalized counter.
    pub async fn count_for_share(pool: &PgPool, share_id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM likes WHERE share_id = $1")
            .bind(share_id)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// True when the user currently likes the share.
    pub async fn is_liked(
        pool: &PgPool,
        share_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM likes WHERE share_id = $1 AND user_id = $2)",
        )
        .bind(share_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }
}
