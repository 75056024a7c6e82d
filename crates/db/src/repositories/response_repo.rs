//! Repository for the `responses` table.
//!
//! Step assignment is the one genuinely racy operation in the schema: two
//! requests continuing the same chain can both compute the same next step.
//! `create_next` computes `MAX(step) + 1` inside a transaction and leans on
//! the `uq_responses_chain_step` unique constraint, retrying a bounded
//! number of times when the constraint fires.

use omm_core::types::DbId;
use sqlx::PgPool;

use crate::models::chain::{Response, SettleResponse};

/// Column list shared across queries (and with `ChainRepo`).
pub(crate) const RESPONSE_COLUMNS: &str = "id, chain_id, step, prompt, url, width, height, \
     created_by_id, deleted_at, created_at, updated_at";

/// How many times `create_next` retries after a step collision.
const STEP_ASSIGN_ATTEMPTS: u32 = 3;

/// Provides CRUD operations for chain responses.
pub struct ResponseRepo;

impl ResponseRepo {
    /// Find a response by its internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Response>, sqlx::Error> {
        let query =
            format!("SELECT {RESPONSE_COLUMNS} FROM responses WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Response>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a response by ID, including soft-deleted rows. Used by the
    /// share proxy, which must still locate the chain when its terminal
    /// response was deleted after publishing.
    pub async fn find_by_id_include_deleted(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Response>, sqlx::Error> {
        let query = format!("SELECT {RESPONSE_COLUMNS} FROM responses WHERE id = $1");
        sqlx::query_as::<_, Response>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the surviving responses of a chain ordered by step ascending.
    ///
    /// Soft-deleted steps are excluded; the gaps they leave are intentional
    /// and surviving steps are never renumbered.
    pub async fn list_by_chain(pool: &PgPool, chain_id: DbId) -> Result<Vec<Response>, sqlx::Error> {
        let query = format!(
            "SELECT {RESPONSE_COLUMNS} FROM responses
             WHERE chain_id = $1 AND deleted_at IS NULL
             ORDER BY step ASC"
        );
        sqlx::query_as::<_, Response>(&query)
            .bind(chain_id)
            .fetch_all(pool)
            .await
    }

    /// Append a new pending response to a chain, assigning the next step
    /// number.
    ///
    /// The max runs over all rows including soft-deleted ones, so a deleted
    /// step's number is never reused. Retries up to [`STEP_ASSIGN_ATTEMPTS`]
    /// times when a concurrent continuation wins the same step number.
    pub async fn create_next(
        pool: &PgPool,
        chain_id: DbId,
        prompt: &str,
        created_by_id: DbId,
    ) -> Result<Response, sqlx::Error> {
        let mut attempt = 1;
        loop {
            match Self::try_insert_next(pool, chain_id, prompt, created_by_id).await {
                Err(err) if is_step_conflict(&err) && attempt < STEP_ASSIGN_ATTEMPTS => {
                    tracing::warn!(chain_id, attempt, "step assignment conflict, retrying");
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    async fn try_insert_next(
        pool: &PgPool,
        chain_id: DbId,
        prompt: &str,
        created_by_id: DbId,
    ) -> Result<Response, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let (max_step,): (i32,) =
            sqlx::query_as("SELECT COALESCE(MAX(step), 0) FROM responses WHERE chain_id = $1")
                .bind(chain_id)
                .fetch_one(&mut *tx)
                .await?;

        let query = format!(
            "INSERT INTO responses (chain_id, step, prompt, created_by_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {RESPONSE_COLUMNS}"
        );
        let response = sqlx::query_as::<_, Response>(&query)
            .bind(chain_id)
            .bind(max_step + 1)
            .bind(prompt)
            .bind(created_by_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(response)
    }

    /// Record the generated output on a pending response.
    ///
    /// Returns `None` if the response no longer exists (soft-deleted while
    /// generation was in flight).
    pub async fn settle(
        pool: &PgPool,
        id: DbId,
        output: &SettleResponse,
    ) -> Result<Option<Response>, sqlx::Error> {
        let query = format!(
            "UPDATE responses SET url = $2, width = $3, height = $4
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {RESPONSE_COLUMNS}"
        );
        sqlx::query_as::<_, Response>(&query)
            .bind(id)
            .bind(&output.url)
            .bind(output.width)
            .bind(output.height)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a response by ID. Returns `true` if a row was marked
    /// deleted. Sibling steps keep their numbers.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE responses SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// True when the error is the `(chain_id, step)` unique constraint firing.
fn is_step_conflict(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505")
                && db_err.constraint() == Some("uq_responses_chain_step")
        }
        _ => false,
    }
}
