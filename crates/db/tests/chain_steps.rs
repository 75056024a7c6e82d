//! Integration tests for chain creation, step assignment, and
//! reconstruction inputs.
//!
//! Exercises the repository layer against a real database to verify that:
//! - A new chain starts at step 1
//! - Continuation assigns strictly increasing steps
//! - Soft-deleted steps leave gaps and their numbers are never reused
//! - Branching creates independent chains over one root image

use omm_db::models::chain::SettleResponse;
use omm_db::models::image::CreateImage;
use omm_db::models::user::CreateUser;
use omm_db::repositories::{ChainRepo, ImageRepo, ResponseRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_user(pool: &PgPool) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            display_name: "Chain Tester".to_string(),
            email: None,
        },
    )
    .await
    .unwrap()
    .id
}

async fn seed_image(pool: &PgPool, user_id: i64) -> i64 {
    ImageRepo::create(
        pool,
        &CreateImage {
            url: "https://streetview.test/original.jpg".to_string(),
            address: Some("123 Example St".to_string()),
            lat: 45.4215,
            lng: -75.6972,
            boundary: None,
            created_by_id: user_id,
        },
    )
    .await
    .unwrap()
    .id
}

// ---------------------------------------------------------------------------
// Chain creation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_new_chain_starts_at_step_one(pool: PgPool) {
    let user_id = seed_user(&pool).await;
    let image_id = seed_image(&pool, user_id).await;

    let (chain, response) =
        ChainRepo::create_with_first_response(&pool, image_id, "add a duplex", user_id)
            .await
            .unwrap();

    assert_eq!(chain.root_image_id, Some(image_id));
    assert_eq!(response.chain_id, chain.id);
    assert_eq!(response.step, 1);
    assert_eq!(response.url, "", "url must be empty until generation settles");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_branching_creates_distinct_chains(pool: PgPool) {
    let user_id = seed_user(&pool).await;
    let image_id = seed_image(&pool, user_id).await;

    let (a, _) = ChainRepo::create_with_first_response(&pool, image_id, "add a duplex", user_id)
        .await
        .unwrap();
    let (b, _) = ChainRepo::create_with_first_response(&pool, image_id, "add a fourplex", user_id)
        .await
        .unwrap();

    assert_ne!(a.id, b.id);
    assert_eq!(a.root_image_id, Some(image_id));
    assert_eq!(b.root_image_id, Some(image_id));

    let branches = ChainRepo::list_by_image(&pool, image_id).await.unwrap();
    assert_eq!(branches.len(), 2);
    // Oldest branch first.
    assert_eq!(branches[0].id, a.id);
}

// ---------------------------------------------------------------------------
// Continuation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_continuation_increments_step(pool: PgPool) {
    let user_id = seed_user(&pool).await;
    let image_id = seed_image(&pool, user_id).await;
    let (chain, _) = ChainRepo::create_with_first_response(&pool, image_id, "first", user_id)
        .await
        .unwrap();

    let second = ResponseRepo::create_next(&pool, chain.id, "second", user_id)
        .await
        .unwrap();
    let third = ResponseRepo::create_next(&pool, chain.id, "third", user_id)
        .await
        .unwrap();

    assert_eq!(second.step, 2);
    assert_eq!(third.step, 3);
    assert_eq!(third.chain_id, chain.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleted_step_number_is_never_reused(pool: PgPool) {
    let user_id = seed_user(&pool).await;
    let image_id = seed_image(&pool, user_id).await;
    let (chain, _) = ChainRepo::create_with_first_response(&pool, image_id, "first", user_id)
        .await
        .unwrap();
    ResponseRepo::create_next(&pool, chain.id, "second", user_id)
        .await
        .unwrap();
    let third = ResponseRepo::create_next(&pool, chain.id, "third", user_id)
        .await
        .unwrap();

    // Delete the terminal step, then continue: the next step must be 4,
    // not a reissued 3.
    assert!(ResponseRepo::soft_delete(&pool, third.id).await.unwrap());
    let fourth = ResponseRepo::create_next(&pool, chain.id, "fourth", user_id)
        .await
        .unwrap();
    assert_eq!(fourth.step, 4);

    // Reconstruction input: surviving steps ascending, gap preserved.
    let steps = ResponseRepo::list_by_chain(&pool, chain.id).await.unwrap();
    let numbers: Vec<i32> = steps.iter().map(|r| r.step).collect();
    assert_eq!(numbers, vec![1, 2, 4]);
    assert!(steps.iter().all(|r| r.id != third.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_by_id_excludes_deleted_response(pool: PgPool) {
    let user_id = seed_user(&pool).await;
    let image_id = seed_image(&pool, user_id).await;
    let (_, response) = ChainRepo::create_with_first_response(&pool, image_id, "first", user_id)
        .await
        .unwrap();

    assert!(ResponseRepo::soft_delete(&pool, response.id).await.unwrap());

    let found = ResponseRepo::find_by_id(&pool, response.id).await.unwrap();
    assert!(found.is_none(), "deleted response must not resolve");

    let found = ResponseRepo::find_by_id_include_deleted(&pool, response.id)
        .await
        .unwrap();
    assert!(found.is_some(), "include_deleted lookup must still resolve");
}

// ---------------------------------------------------------------------------
// Settling
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_settle_records_generated_output(pool: PgPool) {
    let user_id = seed_user(&pool).await;
    let image_id = seed_image(&pool, user_id).await;
    let (_, response) = ChainRepo::create_with_first_response(&pool, image_id, "first", user_id)
        .await
        .unwrap();

    let settled = ResponseRepo::settle(
        &pool,
        response.id,
        &SettleResponse {
            url: "http://localhost:3000/media/responses/abc.png".to_string(),
            width: Some(1024),
            height: Some(768),
        },
    )
    .await
    .unwrap()
    .expect("response should settle");

    assert_eq!(settled.url, "http://localhost:3000/media/responses/abc.png");
    assert_eq!(settled.width, Some(1024));
    assert_eq!(settled.height, Some(768));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_settle_after_delete_returns_none(pool: PgPool) {
    let user_id = seed_user(&pool).await;
    let image_id = seed_image(&pool, user_id).await;
    let (_, response) = ChainRepo::create_with_first_response(&pool, image_id, "first", user_id)
        .await
        .unwrap();

    ResponseRepo::soft_delete(&pool, response.id).await.unwrap();

    let settled = ResponseRepo::settle(
        &pool,
        response.id,
        &SettleResponse {
            url: "http://localhost:3000/media/responses/late.png".to_string(),
            width: None,
            height: None,
        },
    )
    .await
    .unwrap();
    assert!(settled.is_none());
}
