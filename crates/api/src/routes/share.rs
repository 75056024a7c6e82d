//! Route definitions for shares, likes, and comments.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::share;
use crate::state::AppState;

/// Routes mounted at the API root.
///
/// ```text
/// GET    /shares                  -> feed (public, paginated)
/// POST   /shares                  -> publish
/// GET    /shares/{id}             -> get_by_id (bumps view count)
/// DELETE /shares/{id}             -> delete (takedown)
/// GET    /shares/{id}/chain       -> get_chain
/// POST   /shares/{id}/like        -> toggle_like
/// GET    /shares/{id}/comments    -> list_comments
/// POST   /shares/{id}/comments    -> add_comment
/// DELETE /comments/{id}           -> delete_comment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/shares", get(share::feed).post(share::publish))
        .route(
            "/shares/{id}",
            get(share::get_by_id).delete(share::delete),
        )
        .route("/shares/{id}/chain", get(share::get_chain))
        .route("/shares/{id}/like", post(share::toggle_like))
        .route(
            "/shares/{id}/comments",
            get(share::list_comments).post(share::add_comment),
        )
        .route("/comments/{id}", delete(share::delete_comment))
}
