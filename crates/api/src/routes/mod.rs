pub mod chain;
pub mod health;
pub mod image;
pub mod organization;
pub mod share;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /users                                    create (provisioned by auth proxy)
/// /users/{id}                               get
///
/// /images                                   list own, create (map selection)
/// /images/{id}                              get, delete (soft)
/// /images/{id}/chains                       list branches, create branch + step 1
///
/// /responses/{id}/continue                  append next step (POST)
/// /responses/{id}/chain                     reconstruct display sequence (GET)
/// /responses/{id}                           delete step (soft)
/// /chains/{id}                              branch view (GET), delete (soft)
///
/// /shares                                   public feed (GET), publish (POST)
/// /shares/{id}                              get + view bump, takedown (DELETE)
/// /shares/{id}/chain                        reconstruct shared chain (GET)
/// /shares/{id}/like                         toggle like (POST)
/// /shares/{id}/comments                     list, add
/// /comments/{id}                            delete (author, soft)
///
/// /organizations                            list, create
/// /organizations/{id}                       get, update, delete
/// /organizations/{id}/members               list, join (POST), leave (DELETE)
/// /organizations/{id}/members/{user_id}     set role (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/users", user::router())
        .nest("/images", image::router())
        .merge(chain::router())
        .merge(share::router())
        .nest("/organizations", organization::router())
}
