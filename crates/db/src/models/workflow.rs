//! Workflow transition model and DTOs.
//!
//! A workflow has no row of its own: it is the set of `workflow_transitions`
//! rows sharing a `name`. Any edge id of the set identifies the workflow.
//! Issue types attach to each edge through the `workflow_issue_types`
//! junction table, and every edge of a workflow carries the same set.

use issueflow_core::status_order::StatusPosition;
use issueflow_core::types::{DbId, Timestamp};
use issueflow_core::workflow_chain::Edge;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::issue_type::IssueType;
use super::status::Status;

/// A row from the `workflow_transitions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkflowTransition {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub from_status_id: DbId,
    pub to_status_id: DbId,
    /// Legacy single issue-type link, superseded by `workflow_issue_types`.
    pub issue_type_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl WorkflowTransition {
    pub fn edge(&self) -> Edge {
        Edge::new(self.from_status_id, self.to_status_id)
    }
}

/// A transition enriched with its resolved statuses and the issue types of
/// the workflow it belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowTransitionDetail {
    #[serde(flatten)]
    pub transition: WorkflowTransition,
    pub from_status: Status,
    pub to_status: Status,
    pub issue_types: Vec<IssueType>,
}

/// One status of a workflow's reconstructed pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct OrderedStatus {
    pub status_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub order: i32,
}

/// A transition detail together with the ordered pipeline of its workflow.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowWithStatuses {
    #[serde(flatten)]
    pub detail: WorkflowTransitionDetail,
    pub statuses: Vec<OrderedStatus>,
}

/// DTO for creating a single transition.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTransition {
    pub name: String,
    pub description: Option<String>,
    pub from_status_id: DbId,
    pub to_status_id: DbId,
    pub issue_type_id: Option<DbId>,
    /// Issue types to associate with the new edge.
    #[serde(default)]
    pub issue_type_ids: Vec<DbId>,
}

/// DTO for creating a workflow from an ordered status list.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWorkflowChain {
    pub name: String,
    pub description: Option<String>,
    /// Statuses in pipeline order; one edge is created per adjacent pair.
    pub status_ids: Vec<DbId>,
    /// Issue types to associate with every created edge.
    #[serde(default)]
    pub issue_type_ids: Vec<DbId>,
}

/// DTO for replacing the core fields of one edge.
///
/// `issue_type_ids` always replaces the edge's associations; an empty list
/// clears them.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTransition {
    /// Optional echo of the path id. A mismatch is rejected.
    pub id: Option<DbId>,
    pub name: String,
    pub description: Option<String>,
    pub from_status_id: DbId,
    pub to_status_id: DbId,
    #[serde(default)]
    pub issue_type_ids: Vec<DbId>,
}

/// DTO for rebuilding a workflow from a new status order.
#[derive(Debug, Clone, Deserialize)]
pub struct ReorderWorkflowStatuses {
    pub statuses: Vec<StatusPosition>,
}

/// DTO for replacing a workflow's issue types.
#[derive(Debug, Clone, Deserialize)]
pub struct SetWorkflowIssueTypes {
    pub issue_type_ids: Vec<DbId>,
}
