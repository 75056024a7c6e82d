//! Route definitions for the `/organizations` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::organization;
use crate::state::AppState;

/// Routes mounted at `/organizations`.
///
/// ```text
/// GET    /                          -> list
/// POST   /                          -> create (creator becomes OWNER)
/// GET    /{id}                      -> get_by_id
/// PUT    /{id}                      -> update (owner/admin)
/// DELETE /{id}                      -> delete (owner)
/// GET    /{id}/members              -> list_members
/// POST   /{id}/members              -> join
/// DELETE /{id}/members              -> leave
/// PUT    /{id}/members/{user_id}    -> set_role (owner/admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(organization::list).post(organization::create))
        .route(
            "/{id}",
            get(organization::get_by_id)
                .put(organization::update)
                .delete(organization::delete),
        )
        .route(
            "/{id}/members",
            get(organization::list_members)
                .post(organization::join)
                .delete(organization::leave),
        )
        .route("/{id}/members/{user_id}", put(organization::set_role))
}
