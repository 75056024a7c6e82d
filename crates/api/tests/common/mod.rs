use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use omm_api::config::{GenerationConfig, ServerConfig, StorageConfig, StorageMode};
use omm_api::routes;
use omm_api::state::AppState;
use omm_generation::ImageEditApi;
use omm_storage::LocalStorage;

/// Build a test `ServerConfig` with safe defaults.
///
/// The generation API points at an unroutable local port so endpoints that
/// trigger generation fail fast with a connection error -- which is exactly
/// the upstream-failure path the tests assert on.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        generation: GenerationConfig {
            api_url: "http://127.0.0.1:9".to_string(),
            api_key: "test-key".to_string(),
            timeout_secs: 2,
        },
        storage: StorageConfig {
            mode: StorageMode::Local,
            local_root: std::env::temp_dir()
                .join("omm-api-tests")
                .to_string_lossy()
                .into_owned(),
            s3_bucket: String::new(),
            public_base_url: "http://localhost:3000/media".to_string(),
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();

    let storage = Arc::new(LocalStorage::new(
        config.storage.local_root.clone(),
        config.storage.public_base_url.clone(),
    ));
    let generator = Arc::new(ImageEditApi::new(
        config.generation.api_url.clone(),
        config.generation.api_key.clone(),
        config.generation.timeout(),
    ));

    let state = AppState {
        pool,
        config: Arc::new(config),
        storage,
        generator,
        http: reqwest::Client::new(),
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a request with an optional identity header and optional JSON body.
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    user_id: Option<i64>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user_id) = user_id {
        builder = builder.header("x-user-id", user_id.to_string());
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_as(app: Router, uri: &str, user_id: i64) -> Response {
    send(app, Method::GET, uri, Some(user_id), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_as(
    app: Router,
    uri: &str,
    user_id: i64,
    body: serde_json::Value,
) -> Response {
    send(app, Method::POST, uri, Some(user_id), Some(body)).await
}

pub async fn post_as(app: Router, uri: &str, user_id: i64) -> Response {
    send(app, Method::POST, uri, Some(user_id), None).await
}

pub async fn put_json_as(
    app: Router,
    uri: &str,
    user_id: i64,
    body: serde_json::Value,
) -> Response {
    send(app, Method::PUT, uri, Some(user_id), Some(body)).await
}

pub async fn delete_as(app: Router, uri: &str, user_id: i64) -> Response {
    send(app, Method::DELETE, uri, Some(user_id), None).await
}

/// Read the response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Provision a user through the API, returning its id.
pub async fn seed_user(app: Router, name: &str) -> i64 {
    let response = post_json(
        app,
        "/api/v1/users",
        serde_json::json!({"display_name": name}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

/// The shared local-storage root the test config points at.
pub fn media_root() -> std::path::PathBuf {
    std::env::temp_dir().join("omm-api-tests")
}

/// Place an object into the test media store so source fetches resolve.
pub fn write_media_object(key: &str, bytes: &[u8]) {
    let path = media_root().join(key);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, bytes).unwrap();
}

/// Record a map selection through the API, returning the image id.
///
/// The image url points into the test media store and the backing object
/// is written, so chain creation deterministically reaches the (dead)
/// generation endpoint instead of failing on the source fetch.
pub async fn seed_image(app: Router, user_id: i64) -> i64 {
    write_media_object("sources/original.jpg", b"jpeg-source-bytes");
    seed_image_with_url(
        app,
        user_id,
        "http://localhost:3000/media/sources/original.jpg",
    )
    .await
}

pub async fn seed_image_with_url(app: Router, user_id: i64, url: &str) -> i64 {
    let response = post_json_as(
        app,
        "/api/v1/images",
        user_id,
        serde_json::json!({
            "url": url,
            "address": "123 Example St",
            "lat": 45.4215,
            "lng": -75.6972,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}
