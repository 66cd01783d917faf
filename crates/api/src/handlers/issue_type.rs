//! Handlers for the `/issue-types` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use issueflow_core::error::CoreError;
use issueflow_core::types::DbId;
use issueflow_db::models::issue_type::{CreateIssueType, UpdateIssueType};
use issueflow_db::repositories::IssueTypeRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

fn issue_type_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "IssueType",
        id,
    })
}

/// GET /api/v1/issue-types
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let issue_types = IssueTypeRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: issue_types }))
}

/// GET /api/v1/issue-types/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let issue_type = IssueTypeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| issue_type_not_found(id))?;
    Ok(Json(DataResponse { data: issue_type }))
}

/// POST /api/v1/issue-types
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateIssueType>,
) -> AppResult<impl IntoResponse> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Issue type name must not be empty".to_string(),
        )));
    }
    let issue_type = IssueTypeRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: issue_type })))
}

/// PUT /api/v1/issue-types/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateIssueType>,
) -> AppResult<impl IntoResponse> {
    let issue_type = IssueTypeRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| issue_type_not_found(id))?;
    Ok(Json(DataResponse { data: issue_type }))
}

/// DELETE /api/v1/issue-types/{id}
///
/// Workflow associations of the issue type are removed with it.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if IssueTypeRepo::delete(&state.pool, id).await? {
        tracing::info!(issue_type_id = id, "Issue type deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(issue_type_not_found(id))
    }
}
