//! Status ordering rules for building and rebuilding workflow chains.
//!
//! Shared by the repository layer (which turns an ordered status list into
//! edges) and the API layer (which validates request bodies before any
//! write is attempted).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// A chain needs at least one edge, i.e. two statuses.
pub const MIN_CHAIN_STATUSES: usize = 2;

/// A `statuses` list on workflow creation only triggers chain creation
/// when it holds at least this many entries.
pub const MIN_CREATE_CHAIN_STATUSES: usize = 3;

/// Maximum length accepted for a workflow name.
pub const MAX_WORKFLOW_NAME_LEN: usize = 200;

/// A status together with its requested position in a workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusPosition {
    pub status_id: DbId,
    pub order: i32,
}

/// Sort positions by `order` and return the status ids.
///
/// The sort is stable, so entries sharing an `order` keep their input order.
pub fn sorted_status_ids(positions: &[StatusPosition]) -> Vec<DbId> {
    let mut sorted = positions.to_vec();
    sorted.sort_by_key(|p| p.order);
    sorted.into_iter().map(|p| p.status_id).collect()
}

/// Validate an ordered status list about to become a chain.
pub fn validate_chain_statuses(status_ids: &[DbId]) -> Result<(), CoreError> {
    if status_ids.len() < MIN_CHAIN_STATUSES {
        return Err(CoreError::Validation(format!(
            "A workflow needs at least {MIN_CHAIN_STATUSES} statuses, got {}",
            status_ids.len()
        )));
    }

    let mut seen = HashSet::with_capacity(status_ids.len());
    for id in status_ids {
        if !seen.insert(*id) {
            return Err(CoreError::Validation(format!(
                "Status {id} appears more than once in the workflow"
            )));
        }
    }

    Ok(())
}

/// Adjacent `(from, to)` pairs of an ordered status list.
pub fn chain_pairs(status_ids: &[DbId]) -> Vec<(DbId, DbId)> {
    status_ids.windows(2).map(|w| (w[0], w[1])).collect()
}

/// Validate a workflow name: non-blank and within the length limit.
pub fn validate_workflow_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Workflow name must not be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_WORKFLOW_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Workflow name must be at most {MAX_WORKFLOW_NAME_LEN} characters"
        )));
    }
    Ok(())
}
