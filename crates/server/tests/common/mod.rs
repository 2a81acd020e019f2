//! Shared test harness.
//!
//! Boots the full router over a fresh temp-dir store with the demo
//! accounts seeded and a small static product catalog, and provides JSON
//! request helpers that drive the router in-process.

#![allow(dead_code, clippy::expect_used)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tombola_server::catalog::{ProductCatalog, StaticCatalog};
use tombola_server::{app, seed, AppState, SharedState};
use tombola_store::Store;
use tombola_types::{PrizeProduct, UserId};
use tower::ServiceExt;

/// A booted application over an ephemeral store.
pub struct TestApp {
    pub router: Router,
    pub state: SharedState,
    _dir: tempfile::TempDir,
}

/// Boots a fresh application with seeded demo users and three catalog
/// products.
pub fn spawn_app() -> TestApp {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = Arc::new(Store::open(dir.path().join("tombola.redb")).expect("open store"));
    store.seed_users(&seed::demo_users()).expect("seed users");

    let catalog: Arc<dyn ProductCatalog> =
        Arc::new(StaticCatalog::with_products(sample_products()));
    let state = AppState::new(store, catalog);
    TestApp { router: app(state.clone()), state, _dir: dir }
}

fn sample_products() -> Vec<PrizeProduct> {
    ["perfume-01", "lipstick-02", "shampoo-03"]
        .iter()
        .map(|id| PrizeProduct {
            id: (*id).to_string(),
            name: format!("Demo {id}"),
            sku: Some(format!("SKU-{id}")),
            image: None,
            price: None,
            url: None,
        })
        .collect()
}

impl TestApp {
    /// Sends a GET request and returns status plus parsed JSON body.
    pub async fn get(&self, path: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .expect("build request");
        self.send(request).await
    }

    /// Sends a POST request with a JSON body and returns status plus
    /// parsed JSON body.
    pub async fn post(&self, path: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("build request");
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self.router.clone().oneshot(request).await.expect("route request");
        let status = response.status();
        let bytes = response.into_body().collect().await.expect("read body").to_bytes();
        let value = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("parse JSON body")
        };
        (status, value)
    }

    /// Looks up a seeded user's id by username.
    pub fn user_id(&self, username: &str) -> UserId {
        self.state
            .store()
            .find_user_by_username(username)
            .expect("store read")
            .expect("seeded user exists")
            .id
    }

    /// Creates a lottery through the API and returns its id as JSON value.
    pub async fn create_lottery(&self, max: u32, winners: u32) -> serde_json::Value {
        let admin = self.user_id("admin");
        let (status, body) = self
            .post(
                "/lotteries",
                serde_json::json!({
                    "name": "Integration draw",
                    "max_participants": max,
                    "number_of_winners": winners,
                    "created_by": admin.value(),
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "lottery creation failed: {body}");
        body["id"].clone()
    }

    /// Joins a seeded user into a lottery through the API.
    pub async fn join(
        &self,
        lottery_id: &serde_json::Value,
        username: &str,
    ) -> (StatusCode, serde_json::Value) {
        let user = self.user_id(username);
        self.post(
            "/lottery/join",
            serde_json::json!({ "lotteryId": lottery_id, "userId": user.value() }),
        )
        .await
    }
}
