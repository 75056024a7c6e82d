//! HTTP-level integration tests for chain creation, continuation, and
//! reconstruction.
//!
//! The test generation endpoint is unreachable, so every generation fails
//! upstream with GENERATION_FAILED -- which is the interesting path: the
//! placeholder response must survive with an empty url, steps must keep
//! advancing, and reconstruction must reflect exactly the surviving rows.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_as, get, post_json_as, seed_image, seed_image_with_url, seed_user};
use sqlx::PgPool;

/// Create a branch from the image (generation fails upstream in tests),
/// then return the new chain's id via the branch list.
async fn start_branch(app: axum::Router, user: i64, image_id: i64, prompt: &str) -> i64 {
    let response = post_json_as(
        app.clone(),
        &format!("/api/v1/images/{image_id}/chains"),
        user,
        serde_json::json!({"prompt": prompt}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["code"], "GENERATION_FAILED");

    let response = get(app, &format!("/api/v1/images/{image_id}/chains")).await;
    let branches = body_json(response).await;
    branches.as_array().unwrap().last().unwrap()["id"]
        .as_i64()
        .unwrap()
}

/// The response id of the step at `index` within a chain's display items.
async fn step_response_id(app: axum::Router, chain_id: i64, index: usize) -> i64 {
    let response = get(app, &format!("/api/v1/chains/{chain_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let items = json["items"].as_array().unwrap();
    let steps: Vec<_> = items.iter().filter(|i| i["kind"] == "step").collect();
    steps[index]["response_id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failed_generation_leaves_placeholder_step(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let user = seed_user(app.clone(), "Builder").await;
    let image_id = seed_image(app.clone(), user).await;

    let chain_id = start_branch(app.clone(), user, image_id, "add a duplex").await;

    let response = get(app, &format!("/api/v1/chains/{chain_id}")).await;
    let json = body_json(response).await;
    let items = json["items"].as_array().unwrap();
    assert_eq!(items.len(), 2, "source item plus the stranded step");
    assert_eq!(items[0]["kind"], "source");
    assert_eq!(items[1]["kind"], "step");
    assert_eq!(items[1]["step"], 1);
    assert_eq!(items[1]["url"], "", "failed generation leaves an empty url");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_chain_on_missing_image_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let user = seed_user(app.clone(), "Builder").await;

    let response = post_json_as(
        app,
        "/api/v1/images/999999/chains",
        user,
        serde_json::json!({"prompt": "add a duplex"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_chain_rejects_blank_prompt(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let user = seed_user(app.clone(), "Builder").await;
    let image_id = seed_image(app.clone(), user).await;

    let response = post_json_as(
        app,
        &format!("/api/v1/images/{image_id}/chains"),
        user,
        serde_json::json!({"prompt": "   "}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_source_object_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let user = seed_user(app.clone(), "Builder").await;
    let image_id = seed_image_with_url(
        app.clone(),
        user,
        "http://localhost:3000/media/sources/definitely-missing.jpg",
    )
    .await;

    let response = post_json_as(
        app,
        &format!("/api/v1/images/{image_id}/chains"),
        user,
        serde_json::json!({"prompt": "add a duplex"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_branching_lists_multiple_chains(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let user = seed_user(app.clone(), "Builder").await;
    let image_id = seed_image(app.clone(), user).await;

    let a = start_branch(app.clone(), user, image_id, "add a duplex").await;
    let b = start_branch(app.clone(), user, image_id, "add a fourplex").await;
    assert_ne!(a, b);

    let response = get(app, &format!("/api/v1/images/{image_id}/chains")).await;
    let branches = body_json(response).await;
    assert_eq!(branches.as_array().unwrap().len(), 2);
}

// ---------------------------------------------------------------------------
// Continuation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_continue_appends_next_step(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let user = seed_user(app.clone(), "Builder").await;
    let image_id = seed_image(app.clone(), user).await;
    let chain_id = start_branch(app.clone(), user, image_id, "step one").await;
    let first = step_response_id(app.clone(), chain_id, 0).await;

    let response = post_json_as(
        app.clone(),
        &format!("/api/v1/responses/{first}/continue"),
        user,
        serde_json::json!({"prompt": "step two"}),
    )
    .await;
    // Generation fails upstream, but the step row was appended first.
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let response = get(app, &format!("/api/v1/chains/{chain_id}")).await;
    let json = body_json(response).await;
    let items = json["items"].as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[2]["step"], 2);
    assert_eq!(items[2]["prompt"], "step two");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_continue_deleted_response_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let user = seed_user(app.clone(), "Builder").await;
    let image_id = seed_image(app.clone(), user).await;
    let chain_id = start_branch(app.clone(), user, image_id, "step one").await;
    let first = step_response_id(app.clone(), chain_id, 0).await;

    let response = delete_as(app.clone(), &format!("/api/v1/responses/{first}"), user).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = post_json_as(
        app,
        &format!("/api/v1/responses/{first}/continue"),
        user,
        serde_json::json!({"prompt": "after the fact"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleted_step_leaves_gap_without_renumbering(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let user = seed_user(app.clone(), "Builder").await;
    let image_id = seed_image(app.clone(), user).await;
    let chain_id = start_branch(app.clone(), user, image_id, "step one").await;

    // Grow the chain to three steps.
    for (index, prompt) in [(0, "step two"), (1, "step three")] {
        let terminal = step_response_id(app.clone(), chain_id, index).await;
        post_json_as(
            app.clone(),
            &format!("/api/v1/responses/{terminal}/continue"),
            user,
            serde_json::json!({"prompt": prompt}),
        )
        .await;
    }

    // Delete the middle step.
    let middle = step_response_id(app.clone(), chain_id, 1).await;
    let response = delete_as(app.clone(), &format!("/api/v1/responses/{middle}"), user).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app, &format!("/api/v1/chains/{chain_id}")).await;
    let json = body_json(response).await;
    let steps: Vec<i64> = json["items"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|i| i["kind"] == "step")
        .map(|i| i["step"].as_i64().unwrap())
        .collect();
    assert_eq!(steps, vec![1, 3], "gap preserved, siblings not renumbered");
}

// ---------------------------------------------------------------------------
// Reconstruction from a terminal response
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reconstruction_ends_at_terminal_response(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let user = seed_user(app.clone(), "Builder").await;
    let image_id = seed_image(app.clone(), user).await;
    let chain_id = start_branch(app.clone(), user, image_id, "step one").await;
    let first = step_response_id(app.clone(), chain_id, 0).await;
    post_json_as(
        app.clone(),
        &format!("/api/v1/responses/{first}/continue"),
        user,
        serde_json::json!({"prompt": "step two"}),
    )
    .await;
    let terminal = step_response_id(app.clone(), chain_id, 1).await;

    let response = get(app, &format!("/api/v1/responses/{terminal}/chain")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["chain_id"].as_i64().unwrap(), chain_id);
    let items = json["items"].as_array().unwrap();
    assert_eq!(items[0]["kind"], "source");
    assert_eq!(
        items.last().unwrap()["response_id"].as_i64().unwrap(),
        terminal
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reconstruction_of_deleted_terminal_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let user = seed_user(app.clone(), "Builder").await;
    let image_id = seed_image(app.clone(), user).await;
    let chain_id = start_branch(app.clone(), user, image_id, "step one").await;
    let first = step_response_id(app.clone(), chain_id, 0).await;

    delete_as(app.clone(), &format!("/api/v1/responses/{first}"), user).await;

    let response = get(app, &format!("/api/v1/responses/{first}/chain")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
