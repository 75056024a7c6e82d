//! Repository for the `chains` table.

use omm_core::chain::FIRST_STEP;
use omm_core::types::DbId;
use sqlx::PgPool;

use crate::models::chain::{Chain, Response};
use crate::repositories::response_repo::RESPONSE_COLUMNS;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, root_image_id, created_by_id, deleted_at, created_at, updated_at";

/// Provides CRUD operations for chains.
pub struct ChainRepo;

impl ChainRepo {
    /// Create a new chain rooted at an image together with its step-1
    /// response, in one transaction.
    ///
    /// The caller has already verified the image exists; a second chain for
    /// the same image is a new branch, not an error.
    pub async fn create_with_first_response(
        pool: &PgPool,
        root_image_id: DbId,
        prompt: &str,
        created_by_id: DbId,
    ) -> Result<(Chain, Response), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let chain_query = format!(
            "INSERT INTO chains (root_image_id, created_by_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        let chain = sqlx::query_as::<_, Chain>(&chain_query)
            .bind(root_image_id)
            .bind(created_by_id)
            .fetch_one(&mut *tx)
            .await?;

        let response_query = format!(
            "INSERT INTO responses (chain_id, step, prompt, created_by_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {RESPONSE_COLUMNS}"
        );
        let response = sqlx::query_as::<_, Response>(&response_query)
            .bind(chain.id)
            .bind(FIRST_STEP)
            .bind(prompt)
            .bind(created_by_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok((chain, response))
    }

    /// Find a chain by its internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Chain>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM chains WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Chain>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the chains branching from an image, oldest branch first.
    /// Excludes soft-deleted rows.
    pub async fn list_by_image(pool: &PgPool, image_id: DbId) -> Result<Vec<Chain>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM chains
             WHERE root_image_id = $1 AND deleted_at IS NULL
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Chain>(&query)
            .bind(image_id)
            .fetch_all(pool)
            .await
    }

    /// Soft-delete a chain by ID. Returns `true` if a row was marked deleted.
    ///
    /// Responses keep their rows; they become unreachable because every
    /// reconstruction starts from a non-deleted chain.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE chains SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
