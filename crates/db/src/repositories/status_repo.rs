//! Repository for the `statuses` table.

use issueflow_core::types::DbId;
use sqlx::PgPool;

use crate::models::status::{CreateStatus, Status, UpdateStatus};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, color, sort_order, created_at, updated_at";

/// Provides CRUD operations for the status catalog.
pub struct StatusRepo;

impl StatusRepo {
    /// Insert a new status, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateStatus) -> Result<Status, sqlx::Error> {
        let query = format!(
            "INSERT INTO statuses (name, description, color, sort_order) \
             VALUES ($1, $2, $3, COALESCE($4, 0)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Status>(&query)
            .bind(input.name.trim())
            .bind(&input.description)
            .bind(&input.color)
            .bind(input.sort_order)
            .fetch_one(pool)
            .await
    }

    /// Find a status by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Status>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM statuses WHERE id = $1");
        sqlx::query_as::<_, Status>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch every status whose id is in `ids`. Missing ids are skipped.
    pub async fn find_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Status>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM statuses WHERE id = ANY($1) ORDER BY id");
        sqlx::query_as::<_, Status>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// List all statuses ordered by sort_order, then name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Status>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM statuses ORDER BY sort_order, name");
        sqlx::query_as::<_, Status>(&query).fetch_all(pool).await
    }

    /// Update a status. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateStatus,
    ) -> Result<Option<Status>, sqlx::Error> {
        let query = format!(
            "UPDATE statuses SET \
                name = COALESCE($2, name), \
                description = COALESCE($3, description), \
                color = COALESCE($4, color), \
                sort_order = COALESCE($5, sort_order) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Status>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.description)
            .bind(&input.color)
            .bind(input.sort_order)
            .fetch_optional(pool)
            .await
    }

    /// Count workflow edges that reference a status from either end.
    pub async fn count_transition_references(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM workflow_transitions \
             WHERE from_status_id = $1 OR to_status_id = $1",
        )
        .bind(id)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// Delete a status by ID. Returns `true` if a row was removed.
    ///
    /// Referenced statuses are rejected by the `ON DELETE RESTRICT` foreign
    /// keys; callers check [`Self::count_transition_references`] first to
    /// report a friendlier error.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM statuses WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
