//! Handlers for the `/workflows` resource.
//!
//! A workflow is addressed by the id of any of its edges. Requests are
//! validated through `issueflow_core` before any row is written, so a
//! rejected request never leaves a partial change behind.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use issueflow_core::error::CoreError;
use issueflow_core::status_order::{
    sorted_status_ids, validate_chain_statuses, validate_workflow_name, StatusPosition,
    MIN_CREATE_CHAIN_STATUSES,
};
use issueflow_core::transition_check::{direct_targets, is_transition_allowed};
use issueflow_core::types::DbId;
use issueflow_core::workflow_chain::Edge;
use issueflow_db::models::workflow::{
    CreateTransition, CreateWorkflowChain, OrderedStatus, ReorderWorkflowStatuses,
    SetWorkflowIssueTypes, UpdateTransition, WorkflowTransition,
};
use issueflow_db::repositories::WorkflowRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::query::{TransitionCheckParams, TransitionTripleParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /workflows`.
///
/// A `statuses` list with at least three entries replaces the single
/// `from -> to` edge with a full chain in the given order.
#[derive(Debug, Deserialize)]
pub struct CreateWorkflowRequest {
    #[serde(flatten)]
    pub transition: CreateTransition,
    #[serde(default)]
    pub statuses: Vec<StatusPosition>,
}

/// Response body for a reorder: the new workflow id and its pipeline.
#[derive(Debug, Serialize)]
pub struct ReorderResponse {
    /// Id of the first rebuilt edge. Previous edge ids are no longer valid.
    pub workflow_id: DbId,
    pub statuses: Vec<OrderedStatus>,
}

/// Response body for the transition legality check.
#[derive(Debug, Serialize)]
pub struct TransitionCheckResponse {
    pub allowed: bool,
    pub reachable: Vec<DbId>,
}

fn workflow_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Workflow",
        id,
    })
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// GET /api/v1/workflows
///
/// List every edge with its statuses and its workflow's issue types.
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let transitions = WorkflowRepo::list(&state.pool).await?;
    let details = WorkflowRepo::with_details(&state.pool, transitions).await?;
    Ok(Json(DataResponse { data: details }))
}

/// GET /api/v1/workflows/{id}
///
/// One edge with its details and the ordered pipeline of its workflow.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let workflow = WorkflowRepo::find_with_statuses(&state.pool, id)
        .await?
        .ok_or_else(|| workflow_not_found(id))?;
    Ok(Json(DataResponse { data: workflow }))
}

/// GET /api/v1/workflows/{id}/statuses
///
/// The ordered pipeline of the workflow alone.
pub async fn statuses(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let transition = WorkflowRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| workflow_not_found(id))?;
    let statuses = WorkflowRepo::ordered_statuses(&state.pool, &transition).await?;
    Ok(Json(DataResponse { data: statuses }))
}

/// GET /api/v1/workflows/by-issue-type/{issue_type_id}
///
/// Every edge of every workflow associated with the issue type.
pub async fn by_issue_type(
    State(state): State<AppState>,
    Path(issue_type_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let transitions = WorkflowRepo::list_by_issue_type(&state.pool, issue_type_id).await?;
    let details = WorkflowRepo::with_details(&state.pool, transitions).await?;
    Ok(Json(DataResponse { data: details }))
}

/// GET /api/v1/workflows/by-issue-type/{issue_type_id}/check?from_status_id=&to_status_id=
///
/// Whether an issue of this type may move between the two statuses.
pub async fn check_transition(
    State(state): State<AppState>,
    Path(issue_type_id): Path<DbId>,
    Query(params): Query<TransitionCheckParams>,
) -> AppResult<impl IntoResponse> {
    let edges: Vec<Edge> = WorkflowRepo::list_by_issue_type(&state.pool, issue_type_id)
        .await?
        .iter()
        .map(WorkflowTransition::edge)
        .collect();

    let response = TransitionCheckResponse {
        allowed: is_transition_allowed(&edges, params.from_status_id, params.to_status_id),
        reachable: direct_targets(&edges, params.from_status_id),
    };
    Ok(Json(DataResponse { data: response }))
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// POST /api/v1/workflows
///
/// Create a single edge, or a whole chain when `statuses` holds three or
/// more entries.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateWorkflowRequest>,
) -> AppResult<impl IntoResponse> {
    validate_workflow_name(&body.transition.name)?;

    let id = if body.statuses.len() >= MIN_CREATE_CHAIN_STATUSES {
        let status_ids = sorted_status_ids(&body.statuses);
        validate_chain_statuses(&status_ids)?;

        let edges =
            WorkflowRepo::create_with_statuses(&state.pool, &body.transition, &status_ids).await?;
        let first = edges.first().ok_or_else(|| {
            AppError::InternalError("Chain creation produced no edges".to_string())
        })?;
        first.id
    } else {
        WorkflowRepo::create(&state.pool, &body.transition).await?.id
    };

    tracing::info!(workflow_id = id, name = %body.transition.name, "Workflow created");

    let workflow = WorkflowRepo::find_with_statuses(&state.pool, id)
        .await?
        .ok_or_else(|| workflow_not_found(id))?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: workflow })))
}

/// POST /api/v1/workflows/chain
///
/// Create a new workflow from an ordered status list. The name must not
/// already be in use.
pub async fn create_chain(
    State(state): State<AppState>,
    Json(input): Json<CreateWorkflowChain>,
) -> AppResult<impl IntoResponse> {
    validate_workflow_name(&input.name)?;
    validate_chain_statuses(&input.status_ids)?;

    if WorkflowRepo::name_exists(&state.pool, &input.name).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "A workflow named '{}' already exists",
            input.name.trim()
        ))));
    }

    let edges = WorkflowRepo::create_chain(&state.pool, &input).await?;
    let first = edges
        .first()
        .ok_or_else(|| AppError::InternalError("Chain creation produced no edges".to_string()))?;

    tracing::info!(
        workflow_id = first.id,
        name = %first.name,
        edges = edges.len(),
        "Workflow chain created"
    );

    let workflow = WorkflowRepo::find_with_statuses(&state.pool, first.id)
        .await?
        .ok_or_else(|| workflow_not_found(first.id))?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: workflow })))
}

/// PUT /api/v1/workflows/{id}
///
/// Replace one edge's endpoints and description, and all of its issue
/// type associations. A changed name renames the whole workflow and must
/// not collide with another workflow.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTransition>,
) -> AppResult<impl IntoResponse> {
    if let Some(body_id) = input.id {
        if body_id != id {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Workflow id {body_id} in body does not match id {id} in path"
            ))));
        }
    }
    validate_workflow_name(&input.name)?;

    let current = WorkflowRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| workflow_not_found(id))?;
    let name = input.name.trim();
    if current.name != name && WorkflowRepo::name_exists(&state.pool, name).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "A workflow named '{name}' already exists"
        ))));
    }

    WorkflowRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| workflow_not_found(id))?;

    let detail = WorkflowRepo::find_detail_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| workflow_not_found(id))?;
    Ok(Json(DataResponse { data: detail }))
}

/// PUT /api/v1/workflows/{id}/statuses/order
///
/// Rebuild the workflow's edges from a new status order. The response
/// carries the new workflow id.
pub async fn reorder_statuses(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ReorderWorkflowStatuses>,
) -> AppResult<impl IntoResponse> {
    let status_ids = sorted_status_ids(&input.statuses);
    validate_chain_statuses(&status_ids)?;

    let edges = WorkflowRepo::rebuild(&state.pool, id, &status_ids)
        .await?
        .ok_or_else(|| workflow_not_found(id))?;
    let first = edges
        .first()
        .ok_or_else(|| AppError::InternalError("Rebuild produced no edges".to_string()))?;

    let statuses = WorkflowRepo::ordered_statuses(&state.pool, first).await?;
    Ok(Json(DataResponse {
        data: ReorderResponse {
            workflow_id: first.id,
            statuses,
        },
    }))
}

/// PUT /api/v1/workflows/{id}/issue-types
///
/// Replace the issue types of every edge in the workflow.
pub async fn set_issue_types(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetWorkflowIssueTypes>,
) -> AppResult<impl IntoResponse> {
    let found = WorkflowRepo::set_issue_types(&state.pool, id, &input.issue_type_ids).await?;
    if !found {
        return Err(workflow_not_found(id));
    }

    let detail = WorkflowRepo::find_detail_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| workflow_not_found(id))?;
    Ok(Json(DataResponse { data: detail }))
}

/// DELETE /api/v1/workflows/{id}
///
/// Delete a single edge.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = WorkflowRepo::delete(&state.pool, id).await?;
    if deleted {
        tracing::info!(workflow_id = id, "Workflow edge deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(workflow_not_found(id))
    }
}

/// DELETE /api/v1/workflows/transition?workflow_id=&from_status_id=&to_status_id=
///
/// Delete the one edge of a workflow that runs between the two statuses.
pub async fn delete_transition(
    State(state): State<AppState>,
    Query(params): Query<TransitionTripleParams>,
) -> AppResult<StatusCode> {
    WorkflowRepo::find_by_id(&state.pool, params.workflow_id)
        .await?
        .ok_or_else(|| workflow_not_found(params.workflow_id))?;

    let deleted = WorkflowRepo::delete_by_triple(
        &state.pool,
        params.workflow_id,
        params.from_status_id,
        params.to_status_id,
    )
    .await?;

    if deleted {
        tracing::info!(
            workflow_id = params.workflow_id,
            from_status_id = params.from_status_id,
            to_status_id = params.to_status_id,
            "Workflow transition deleted"
        );
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!(
            "Workflow {} has no transition from status {} to status {}",
            params.workflow_id, params.from_status_id, params.to_status_id
        )))
    }
}
