//! Registration, login, and role enforcement over HTTP.

use canteen_integration_tests::TestContext;
use serde_json::{Value, json};

#[tokio::test]
async fn test_register_then_use_token() {
    let ctx = TestContext::spawn().await;

    let resp = ctx
        .client
        .post(ctx.url("/auth/register"))
        .json(&json!({ "name": "Ravi", "phone": "9000000001", "password": "hunter2" }))
        .send()
        .await
        .expect("register request failed");
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.expect("register response is not JSON");
    let token = body["token"].as_str().expect("no token");
    assert_eq!(body["user"]["role"], "user");
    assert!(body["user"].get("password_hash").is_none());

    // The fresh token works on an authenticated route
    let resp = ctx
        .client
        .get(ctx.url("/orders/mine"))
        .bearer_auth(token)
        .send()
        .await
        .expect("mine request failed");
    assert_eq!(resp.status(), 200);
    let orders: Value = resp.json().await.expect("mine response is not JSON");
    assert_eq!(orders.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_register_duplicate_phone_conflicts() {
    let ctx = TestContext::spawn().await;

    let register = |password: &'static str| {
        ctx.client
            .post(ctx.url("/auth/register"))
            .json(&json!({ "name": "Ravi", "phone": "9000000002", "password": password }))
            .send()
    };

    assert_eq!(register("first").await.expect("request failed").status(), 200);
    assert_eq!(register("second").await.expect("request failed").status(), 409);
}

#[tokio::test]
async fn test_concurrent_registrations_same_phone_create_one_account() {
    let ctx = TestContext::spawn().await;

    let mut requests = Vec::new();
    for i in 0..4 {
        let client = ctx.client.clone();
        let url = ctx.url("/auth/register");
        requests.push(tokio::spawn(async move {
            client
                .post(url)
                .json(&json!({
                    "name": "Ravi",
                    "phone": "9000000009",
                    "password": format!("hunter{i}"),
                }))
                .send()
                .await
                .expect("register request failed")
                .status()
        }));
    }

    let mut created = 0;
    for request in requests {
        match request.await.expect("request task panicked").as_u16() {
            200 => created += 1,
            409 => {}
            other => panic!("unexpected status {other}"),
        }
    }
    assert_eq!(created, 1, "exactly one registration must win");
}

#[tokio::test]
async fn test_register_rejects_bad_phone() {
    let ctx = TestContext::spawn().await;

    let resp = ctx
        .client
        .post(ctx.url("/auth/register"))
        .json(&json!({ "name": "Ravi", "phone": "not-a-phone", "password": "hunter2" }))
        .send()
        .await
        .expect("register request failed");
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let ctx = TestContext::spawn().await;

    let resp = ctx
        .client
        .post(ctx.url("/auth/login"))
        .json(&json!({ "phone": "0000000000", "password": "wrong" }))
        .send()
        .await
        .expect("login request failed");
    assert_eq!(resp.status(), 401);

    let resp = ctx
        .client
        .post(ctx.url("/auth/login"))
        .json(&json!({ "phone": "9999999999", "password": "whatever" }))
        .send()
        .await
        .expect("login request failed");
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_admin_routes_require_admin_role() {
    let ctx = TestContext::spawn().await;

    // No token at all
    let resp = ctx
        .client
        .get(ctx.url("/orders"))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), 401);

    // Garbage token
    let resp = ctx
        .client
        .get(ctx.url("/orders"))
        .bearer_auth("not-a-token")
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), 401);

    // Valid token, wrong role
    let resp = ctx
        .client
        .post(ctx.url("/auth/register"))
        .json(&json!({ "name": "Ravi", "phone": "9000000003", "password": "hunter2" }))
        .send()
        .await
        .expect("register request failed");
    let body: Value = resp.json().await.expect("register response is not JSON");
    let user_token = body["token"].as_str().expect("no token").to_owned();

    let resp = ctx
        .client
        .get(ctx.url("/orders"))
        .bearer_auth(&user_token)
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), 403);

    // Admin token passes
    let admin = ctx.admin_token().await;
    let resp = ctx
        .client
        .get(ctx.url("/orders"))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn test_registered_user_sees_recent_orders() {
    let ctx = TestContext::spawn().await;

    // Guest orders are keyed by contact, not account, so they never show
    // up under /orders/mine
    ctx.place_guest_order("Ravi", "9000000004", json!([{ "id": 4, "qty": 1 }]))
        .await;

    let resp = ctx
        .client
        .post(ctx.url("/auth/register"))
        .json(&json!({ "name": "Ravi", "phone": "9000000004", "password": "hunter2" }))
        .send()
        .await
        .expect("register request failed");
    let body: Value = resp.json().await.expect("register response is not JSON");
    let token = body["token"].as_str().expect("no token").to_owned();

    let orders: Value = ctx
        .client
        .get(ctx.url("/orders/mine"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("mine request failed")
        .json()
        .await
        .expect("mine response is not JSON");
    assert_eq!(orders.as_array().map(Vec::len), Some(0));
}
