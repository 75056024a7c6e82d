//! Route definitions for chain continuation, reconstruction, and takedown.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::chain;
use crate::state::AppState;

/// Routes mounted at the API root (they span two resources).
///
/// ```text
/// POST   /responses/{id}/continue  -> continue_chain
/// GET    /responses/{id}/chain     -> get_chain
/// DELETE /responses/{id}           -> delete_response
/// GET    /chains/{id}              -> get_chain_by_id
/// DELETE /chains/{id}              -> delete_chain
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/responses/{id}/continue", post(chain::continue_chain))
        .route("/responses/{id}/chain", get(chain::get_chain))
        .route("/responses/{id}", delete(chain::delete_response))
        .route(
            "/chains/{id}",
            get(chain::get_chain_by_id).delete(chain::delete_chain),
        )
}
