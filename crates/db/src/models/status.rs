//! Status catalog model and DTOs.

use issueflow_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `statuses` table.
///
/// `sort_order` is only a catalog-wide default. The order of a status inside
/// a workflow comes from the workflow's edges.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Status {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new status.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStatus {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub sort_order: Option<i32>,
}

/// DTO for updating an existing status. All fields optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatus {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub sort_order: Option<i32>,
}
