//! Handlers for the `/statuses` resource.
//!
//! A status referenced by any workflow edge cannot be deleted.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use issueflow_core::error::CoreError;
use issueflow_core::types::DbId;
use issueflow_db::models::status::{CreateStatus, UpdateStatus};
use issueflow_db::repositories::StatusRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

fn status_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Status",
        id,
    })
}

fn validate_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Status name must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// GET /api/v1/statuses
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let statuses = StatusRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: statuses }))
}

/// GET /api/v1/statuses/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let status = StatusRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| status_not_found(id))?;
    Ok(Json(DataResponse { data: status }))
}

/// POST /api/v1/statuses
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateStatus>,
) -> AppResult<impl IntoResponse> {
    validate_name(&input.name)?;
    let status = StatusRepo::create(&state.pool, &input).await?;
    tracing::info!(status_id = status.id, name = %status.name, "Status created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: status })))
}

/// PUT /api/v1/statuses/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStatus>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.name {
        validate_name(name)?;
    }
    let status = StatusRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| status_not_found(id))?;
    Ok(Json(DataResponse { data: status }))
}

/// DELETE /api/v1/statuses/{id}
///
/// Rejected with 409 while any workflow edge starts or ends at the status.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let references = StatusRepo::count_transition_references(&state.pool, id).await?;
    if references > 0 {
        tracing::warn!(status_id = id, references, "Refused to delete referenced status");
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Status {id} is used by {references} workflow transition(s)"
        ))));
    }

    if StatusRepo::delete(&state.pool, id).await? {
        tracing::info!(status_id = id, "Status deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(status_not_found(id))
    }
}
