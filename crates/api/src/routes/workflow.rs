//! Route definitions for workflows and their transitions.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::workflow;
use crate::state::AppState;

/// Routes mounted at `/workflows`.
///
/// Static segments (`chain`, `transition`, `by-issue-type`) take precedence
/// over the `{id}` capture.
///
/// ```text
/// GET    /                                     -> list
/// POST   /                                     -> create
/// POST   /chain                                -> create_chain
/// DELETE /transition                           -> delete_transition
/// GET    /by-issue-type/{issue_type_id}        -> by_issue_type
/// GET    /by-issue-type/{issue_type_id}/check  -> check_transition
/// GET    /{id}                                 -> get_by_id
/// PUT    /{id}                                 -> update
/// DELETE /{id}                                 -> delete
/// GET    /{id}/statuses                        -> statuses
/// PUT    /{id}/statuses/order                  -> reorder_statuses
/// PUT    /{id}/issue-types                     -> set_issue_types
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(workflow::list).post(workflow::create))
        .route("/chain", post(workflow::create_chain))
        .route("/transition", delete(workflow::delete_transition))
        .route(
            "/by-issue-type/{issue_type_id}",
            get(workflow::by_issue_type),
        )
        .route(
            "/by-issue-type/{issue_type_id}/check",
            get(workflow::check_transition),
        )
        .route(
            "/{id}",
            get(workflow::get_by_id)
                .put(workflow::update)
                .delete(workflow::delete),
        )
        .route("/{id}/statuses", get(workflow::statuses))
        .route("/{id}/statuses/order", put(workflow::reorder_statuses))
        .route("/{id}/issue-types", put(workflow::set_issue_types))
}
