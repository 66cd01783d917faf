pub mod health;
pub mod issue_type;
pub mod status;
pub mod workflow;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /statuses                                         list, create
/// /statuses/{id}                                    get, update, delete
///
/// /issue-types                                      list, create
/// /issue-types/{id}                                 get, update, delete
///
/// /workflows                                        list, create
/// /workflows/chain                                  create from status list (POST)
/// /workflows/transition                             delete by triple (DELETE)
/// /workflows/by-issue-type/{issue_type_id}          list by issue type
/// /workflows/by-issue-type/{issue_type_id}/check    transition legality
/// /workflows/{id}                                   get, update, delete
/// /workflows/{id}/statuses                          ordered pipeline
/// /workflows/{id}/statuses/order                    rebuild (PUT)
/// /workflows/{id}/issue-types                       replace issue types (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/statuses", status::router())
        .nest("/issue-types", issue_type::router())
        .nest("/workflows", workflow::router())
}
