//! Repository for the `issue_types` table.

use issueflow_core::types::DbId;
use sqlx::PgPool;

use crate::models::issue_type::{CreateIssueType, IssueType, UpdateIssueType};

const COLUMNS: &str = "id, name, color, icon, created_at, updated_at";

/// Provides CRUD operations for issue types.
pub struct IssueTypeRepo;

impl IssueTypeRepo {
    /// Insert a new issue type, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateIssueType) -> Result<IssueType, sqlx::Error> {
        let query = format!(
            "INSERT INTO issue_types (name, color, icon) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, IssueType>(&query)
            .bind(input.name.trim())
            .bind(&input.color)
            .bind(&input.icon)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<IssueType>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM issue_types WHERE id = $1");
        sqlx::query_as::<_, IssueType>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<IssueType>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM issue_types ORDER BY name");
        sqlx::query_as::<_, IssueType>(&query).fetch_all(pool).await
    }

    /// Update an issue type. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateIssueType,
    ) -> Result<Option<IssueType>, sqlx::Error> {
        let query = format!(
            "UPDATE issue_types SET \
                name = COALESCE($2, name), \
                color = COALESCE($3, color), \
                icon = COALESCE($4, icon) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, IssueType>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.color)
            .bind(&input.icon)
            .fetch_optional(pool)
            .await
    }

    /// Delete an issue type. Its workflow associations are removed by
    /// cascade. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM issue_types WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
