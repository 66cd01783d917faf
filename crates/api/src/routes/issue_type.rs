//! Route definitions for the issue type catalog.

use axum::routing::get;
use axum::Router;

use crate::handlers::issue_type;
use crate::state::AppState;

/// Routes mounted at `/issue-types`.
///
/// ```text
/// GET    /        -> list
/// POST   /        -> create
/// GET    /{id}    -> get_by_id
/// PUT    /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(issue_type::list).post(issue_type::create))
        .route(
            "/{id}",
            get(issue_type::get_by_id)
                .put(issue_type::update)
                .delete(issue_type::delete),
        )
}
