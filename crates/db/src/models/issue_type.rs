//! Issue type model and DTOs.

use issueflow_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `issue_types` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct IssueType {
    pub id: DbId,
    pub name: String,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new issue type.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateIssueType {
    pub name: String,
    pub color: Option<String>,
    pub icon: Option<String>,
}

/// DTO for updating an existing issue type. All fields optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateIssueType {
    pub name: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
}
