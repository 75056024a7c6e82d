//! Route definitions for the `/images` resource and its chain branches.

use axum::routing::get;
use axum::Router;

use crate::handlers::{chain, image};
use crate::state::AppState;

/// Routes mounted at `/images`.
///
/// ```text
/// GET    /                 -> list_mine
/// POST   /                 -> create
/// GET    /{id}             -> get_by_id
/// DELETE /{id}             -> delete
/// GET    /{id}/chains      -> list branches
/// POST   /{id}/chains      -> create branch + step-1 response
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(image::list_mine).post(image::create))
        .route("/{id}", get(image::get_by_id).delete(image::delete))
        .route(
            "/{id}/chains",
            get(chain::list_for_image).post(chain::create_for_image),
        )
}
