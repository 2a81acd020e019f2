//! End-to-end tests of the HTTP surface.
//!
//! Each test boots a fresh application over its own temp-dir store and
//! drives the router in-process.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use axum::http::StatusCode;
use common::spawn_app;
use serde_json::json;

#[tokio::test]
async fn test_healthz() {
    let app = spawn_app();
    let (status, body) = app.get("/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

// --- login ---

#[tokio::test]
async fn test_login_happy_path() {
    let app = spawn_app();
    let (status, body) =
        app.post("/login", json!({ "username": "admin", "password": "admin" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "admin");
    assert_eq!(body["user_type"], "admin");
    assert!(body["id"].is_u64());
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let app = spawn_app();
    for (user, pass) in [("admin", "wrong"), ("nobody", "admin")] {
        let (status, body) =
            app.post("/login", json!({ "username": user, "password": pass })).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], 3001);
    }
}

#[tokio::test]
async fn test_login_rejects_missing_fields() {
    let app = spawn_app();
    let (status, body) = app.post("/login", json!({ "username": "admin" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 3000);
}

// --- lottery creation ---

#[tokio::test]
async fn test_create_lottery_rejects_bad_draw_shape() {
    let app = spawn_app();
    let admin = app.user_id("admin").value();

    // number_of_winners >= max_participants must be rejected at creation.
    for (max, winners) in [(10, 10), (10, 12), (1, 1), (5, 0)] {
        let (status, body) = app
            .post(
                "/lotteries",
                json!({
                    "name": "Bad shape",
                    "max_participants": max,
                    "number_of_winners": winners,
                    "created_by": admin,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "({max},{winners}) must be rejected");
        assert_eq!(body["code"], 3000);
    }
}

#[tokio::test]
async fn test_create_lottery_requires_admin_creator() {
    let app = spawn_app();
    let participant = app.user_id("participant1").value();

    let (status, body) = app
        .post(
            "/lotteries",
            json!({
                "name": "Not allowed",
                "max_participants": 5,
                "number_of_winners": 1,
                "created_by": participant,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let (status, _) = app
        .post(
            "/lotteries",
            json!({
                "name": "Ghost creator",
                "max_participants": 5,
                "number_of_winners": 1,
                "created_by": 424242,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_then_list_with_nested_participants() {
    let app = spawn_app();
    let lottery_id = app.create_lottery(5, 2).await;

    let (status, _) = app.join(&lottery_id, "participant1").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get("/lotteries").await;
    assert_eq!(status, StatusCode::OK);
    let listing = body.as_array().expect("array of lotteries");
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0]["id"], lottery_id);
    assert_eq!(listing[0]["status"], "active");
    assert_eq!(listing[0]["max_participants"], 5);

    let participants = listing[0]["participants"].as_array().expect("nested participants");
    assert_eq!(participants.len(), 1);
    assert_eq!(participants[0]["is_winner"], false);
    assert_eq!(participants[0]["user"]["username"], "participant1");

    // Second read is served from the cache and must agree.
    let (_, cached) = app.get("/lotteries").await;
    assert_eq!(cached, body);
}

#[tokio::test]
async fn test_create_lottery_with_prize_product() {
    let app = spawn_app();
    let admin = app.user_id("admin").value();

    let (status, body) = app
        .post(
            "/lotteries",
            json!({
                "name": "Prize draw",
                "max_participants": 5,
                "number_of_winners": 1,
                "created_by": admin,
                "prize": {
                    "id": "perfume-01",
                    "name": "Demo perfume-01",
                    "sku": "SKU-perfume-01",
                    "price": { "currency_code": "EUR", "cent_amount": 4999 },
                },
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["prize"]["id"], "perfume-01");
    assert_eq!(body["prize"]["price"]["cent_amount"], 4999);

    let (_, listing) = app.get("/lotteries").await;
    assert_eq!(listing[0]["prize"]["sku"], "SKU-perfume-01");
}

#[tokio::test]
async fn test_listing_is_newest_first() {
    let app = spawn_app();
    let first = app.create_lottery(5, 1).await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = app.create_lottery(5, 1).await;

    let (_, body) = app.get("/lotteries").await;
    let listing = body.as_array().unwrap();
    assert_eq!(listing[0]["id"], second);
    assert_eq!(listing[1]["id"], first);
}

// --- joining ---

#[tokio::test]
async fn test_join_rejects_missing_fields_and_unknown_ids() {
    let app = spawn_app();

    let (status, body) = app.post("/lottery/join", json!({ "userId": 1 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 3000);

    let user = app.user_id("participant1").value();
    let (status, body) =
        app.post("/lottery/join", json!({ "lotteryId": 424242, "userId": user })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 3100);

    let lottery_id = app.create_lottery(5, 1).await;
    let (status, body) =
        app.post("/lottery/join", json!({ "lotteryId": lottery_id, "userId": 424242 })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 3101);
}

#[tokio::test]
async fn test_duplicate_join_is_a_conflict() {
    let app = spawn_app();
    let lottery_id = app.create_lottery(5, 1).await;

    let (status, body) = app.join(&lottery_id, "participant1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, body) = app.join(&lottery_id, "participant1").await;
    assert_eq!(status, StatusCode::CONFLICT, "duplicate join is 409, not 404");
    assert_eq!(body["code"], 2003);
}

#[tokio::test]
async fn test_fill_completes_lottery_end_to_end() {
    // Create {max=2, winners=1}; join A; join B; the lottery completes with
    // exactly one winner; a third join is rejected with a conflict.
    let app = spawn_app();
    let lottery_id = app.create_lottery(2, 1).await;

    let (status, _) = app.join(&lottery_id, "participant1").await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = app.join(&lottery_id, "participant2").await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (_, body) = app.get("/lotteries").await;
    let listing = body.as_array().unwrap();
    assert_eq!(listing[0]["status"], "completed");
    let winners: Vec<_> = listing[0]["participants"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|p| p["is_winner"] == true)
        .collect();
    assert_eq!(winners.len(), 1, "exactly one of the two participants wins");

    let (status, body) = app.join(&lottery_id, "participant3").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 2000, "completed lottery rejects joins as not active");
}

// --- winner selection ---

#[tokio::test]
async fn test_select_winner_response_shape() {
    let app = spawn_app();
    let lottery_id = app.create_lottery(10, 2).await;
    app.join(&lottery_id, "participant1").await;
    app.join(&lottery_id, "participant2").await;
    app.join(&lottery_id, "participant3").await;

    let (status, body) = app
        .post(
            "/lottery/select-winner",
            json!({ "lotteryId": lottery_id, "numberOfWinners": 2 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["success"], true);

    let winners = body["winners"].as_array().expect("winners array");
    assert_eq!(winners.len(), 2);
    for winner in winners {
        assert!(winner["id"].is_u64());
        assert!(winner["user_id"].is_u64());
        assert!(winner["user"]["username"].is_string());
    }
}

#[tokio::test]
async fn test_select_winner_caps_at_participant_count() {
    let app = spawn_app();
    let lottery_id = app.create_lottery(10, 1).await;
    app.join(&lottery_id, "participant1").await;
    app.join(&lottery_id, "participant2").await;

    // Requesting more winners than participants awards everyone.
    let (status, body) = app
        .post(
            "/lottery/select-winner",
            json!({ "lotteryId": lottery_id, "numberOfWinners": 9 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["winners"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_select_winner_refuses_redraw_and_empty_lottery() {
    let app = spawn_app();
    let lottery_id = app.create_lottery(10, 1).await;

    // No participants yet.
    let (status, body) =
        app.post("/lottery/select-winner", json!({ "lotteryId": lottery_id })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2004);

    app.join(&lottery_id, "participant1").await;
    let (status, _) =
        app.post("/lottery/select-winner", json!({ "lotteryId": lottery_id })).await;
    assert_eq!(status, StatusCode::OK);

    // Draws fire exactly once; both retries fail identically.
    for _ in 0..2 {
        let (status, body) =
            app.post("/lottery/select-winner", json!({ "lotteryId": lottery_id })).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], 2002);
    }

    // And no additional winners were marked.
    let (_, body) = app.get("/lotteries").await;
    let winners: Vec<_> = body[0]["participants"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|p| p["is_winner"] == true)
        .collect();
    assert_eq!(winners.len(), 1);
}

#[tokio::test]
async fn test_select_winner_validates_input() {
    let app = spawn_app();

    let (status, body) = app.post("/lottery/select-winner", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 3000);

    let lottery_id = app.create_lottery(5, 1).await;
    let (status, _) = app
        .post(
            "/lottery/select-winner",
            json!({ "lotteryId": lottery_id, "numberOfWinners": 0 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) =
        app.post("/lottery/select-winner", json!({ "lotteryId": 424242 })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 3100);
}

// --- cache revalidation ---

#[tokio::test]
async fn test_revalidate_hook() {
    let app = spawn_app();
    app.create_lottery(5, 1).await;

    // Warm the cache, then invalidate through the hook.
    let (_, first) = app.get("/lotteries").await;
    let (status, body) = app.get("/lotteries/revalidate").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["revalidated"], true);

    // The next read rebuilds from the store and agrees with the first.
    let (_, rebuilt) = app.get("/lotteries").await;
    assert_eq!(rebuilt, first);
}

#[tokio::test]
async fn test_mutations_invalidate_cached_listing() {
    let app = spawn_app();
    let lottery_id = app.create_lottery(5, 1).await;

    let (_, before) = app.get("/lotteries").await;
    assert_eq!(before[0]["participants"].as_array().unwrap().len(), 0);

    app.join(&lottery_id, "participant1").await;

    let (_, after) = app.get("/lotteries").await;
    assert_eq!(
        after[0]["participants"].as_array().unwrap().len(),
        1,
        "a join must drop the cached listing"
    );
}

// --- products ---

#[tokio::test]
async fn test_products_pagination() {
    let app = spawn_app();

    let (status, body) = app.get("/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert_eq!(body["products"].as_array().unwrap().len(), 3);

    let (_, body) = app.get("/products?limit=2&offset=2").await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["products"][0]["id"], "shampoo-03");
}
