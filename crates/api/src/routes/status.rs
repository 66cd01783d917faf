//! Route definitions for the status catalog.

use axum::routing::get;
use axum::Router;

use crate::handlers::status;
use crate::state::AppState;

/// Routes mounted at `/statuses`.
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
        .route("/", get(status::list).post(status::create))
        .route(
            "/{id}",
            get(status::get_by_id)
                .put(status::update)
                .delete(status::delete),
        )
}
