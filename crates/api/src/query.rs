//! Query parameter types for workflow endpoints.

use issueflow_core::types::DbId;
use serde::Deserialize;

/// `?workflow_id=&from_status_id=&to_status_id=` for deleting one edge of a
/// workflow by its endpoints. The camelCase names used by the board client
/// are accepted as aliases.
#[derive(Debug, Deserialize)]
pub struct TransitionTripleParams {
    #[serde(alias = "workflowId")]
    pub workflow_id: DbId,
    #[serde(alias = "fromStatusId")]
    pub from_status_id: DbId,
    #[serde(alias = "toStatusId")]
    pub to_status_id: DbId,
}

/// `?from_status_id=&to_status_id=` for the transition legality check.
#[derive(Debug, Deserialize)]
pub struct TransitionCheckParams {
    #[serde(alias = "fromStatusId")]
    pub from_status_id: DbId,
    #[serde(alias = "toStatusId")]
    pub to_status_id: DbId,
}
