//! End-to-end tests: the full router over an in-memory `SQLite` database,
//! driven through `tower::ServiceExt::oneshot`.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use pawhub_adapter_auth::{Config as AuthConfig, JwtAuthenticator};
use pawhub_adapter_http_axum::AppState;
use pawhub_adapter_storage_sqlite_sqlx::Config;
use pawhub_app::services::user_service::NewUser;
use pawhub_domain::id::UserId;
use pawhub_domain::permission::Actor;
use pawhub_domain::user::UserRole;
use serde_json::{Value, json};
use tower::ServiceExt;

const DEVICE_KEY: &str = "feeder-key";

/// Build the application with an administrator `root` / `rootpass`.
async fn app() -> Router {
    let db = Config {
        database_url: "sqlite::memory:".to_string(),
    }
    .build()
    .await
    .unwrap();
    let state = AppState::new(
        db.repositories(),
        JwtAuthenticator::new(&AuthConfig::with_secret("integration")),
        DEVICE_KEY,
    );
    state.role_service.ensure_defaults().await.unwrap();

    let bootstrap = Actor::new(UserId::new(), UserRole::Admin);
    state
        .user_service
        .register(
            Some(&bootstrap),
            NewUser {
                username: "root".to_string(),
                email: "root@pawhub.test".to_string(),
                password: "rootpass".to_string(),
                first_name: String::new(),
                last_name: String::new(),
                role: Some(UserRole::Admin),
                status: None,
            },
        )
        .await
        .unwrap();

    pawhub_adapter_http_axum::build(state)
}

async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| json!(String::from_utf8_lossy(&bytes)))
    };
    (status, body)
}

async fn login(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = call(
        app,
        "POST",
        "/api/token",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["access"].as_str().unwrap().to_string()
}

/// Sign up a user with `role` and return `(id, access token)`.
async fn signup(app: &Router, username: &str, role: &str) -> (String, String) {
    let (status, body) = call(
        app,
        "POST",
        "/api/signup",
        None,
        Some(json!({
            "username": username,
            "email": format!("{username}@pawhub.test"),
            "password": "secret",
            "role": role,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");
    let id = body["id"].as_str().unwrap().to_string();
    (id, login(app, username, "secret").await)
}

async fn create_animal(app: &Router, token: &str, name: &str) -> String {
    let (status, body) = call(
        app,
        "POST",
        "/api/animals",
        Some(token),
        Some(json!({
            "name": name,
            "age": 3,
            "breed": "Beagle",
            "animal_type": "DOG",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "animal create failed: {body}");
    assert_eq!(body["status"], "AVAILABLE");
    body["id"].as_str().unwrap().to_string()
}

async fn animal_status(app: &Router, token: &str, id: &str) -> String {
    let (status, body) = call(app, "GET", &format!("/api/animals/{id}"), Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    body["status"].as_str().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// Health and authentication
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_on_health_check() {
    let app = app().await;
    let (status, body) = call(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("OK"));
}

#[tokio::test]
async fn should_sign_up_log_in_and_show_profile() {
    let app = app().await;
    let (id, token) = signup(&app, "alice", "ADOPTER").await;

    let (status, me) = call(&app, "GET", "/api/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], id.as_str());
    assert_eq!(me["role"], "ADOPTER");
    assert!(me.get("password").is_none());
    assert!(me.get("password_hash").is_none());
}

#[tokio::test]
async fn should_refuse_anonymous_admin_signup() {
    let app = app().await;
    let (status, _) = call(
        &app,
        "POST",
        "/api/signup",
        None,
        Some(json!({
            "username": "mallory",
            "email": "mallory@pawhub.test",
            "password": "secret",
            "role": "ADMIN",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let admin = login(&app, "root", "rootpass").await;
    let (status, body) = call(
        &app,
        "POST",
        "/api/users",
        Some(&admin),
        Some(json!({
            "username": "second-admin",
            "email": "second@pawhub.test",
            "password": "secret",
            "role": "ADMIN",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], "ADMIN");
}

#[tokio::test]
async fn should_reject_duplicate_username() {
    let app = app().await;
    signup(&app, "alice", "ADOPTER").await;
    let (status, body) = call(
        &app,
        "POST",
        "/api/signup",
        None,
        Some(json!({
            "username": "alice",
            "email": "other@pawhub.test",
            "password": "secret",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("username"));
}

#[tokio::test]
async fn should_issue_new_access_token_from_refresh_token() {
    let app = app().await;
    signup(&app, "alice", "ADOPTER").await;
    let (_, pair) = call(
        &app,
        "POST",
        "/api/token",
        None,
        Some(json!({ "username": "alice", "password": "secret" })),
    )
    .await;

    let (status, body) = call(
        &app,
        "POST",
        "/api/token/refresh",
        None,
        Some(json!({ "refresh": pair["refresh"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let access = body["access"].as_str().unwrap();
    let (status, _) = call(&app, "GET", "/api/users/me", Some(access), None).await;
    assert_eq!(status, StatusCode::OK);

    // an access token is not a refresh token
    let (status, _) = call(
        &app,
        "POST",
        "/api/token/refresh",
        None,
        Some(json!({ "refresh": pair["access"] })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_require_authentication() {
    let app = app().await;
    for uri in ["/api/animals", "/api/devices", "/api/users/me", "/api/payments"] {
        let (status, _) = call(&app, "GET", uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
    }
    let (status, _) = call(&app, "GET", "/api/animals", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Animals
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_let_staff_manage_animals_and_adopters_read() {
    let app = app().await;
    let (_, volunteer) = signup(&app, "vera", "VOLUNTEER").await;
    let (_, adopter) = signup(&app, "alice", "ADOPTER").await;

    let id = create_animal(&app, &volunteer, "Rex").await;

    let (status, _) = call(
        &app,
        "POST",
        "/api/animals",
        Some(&adopter),
        Some(json!({ "name": "Tom", "age": 1, "breed": "Tabby", "animal_type": "CAT" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call(&app, "GET", "/api/pets", Some(&adopter), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["id"], id.as_str());

    let (status, body) = call(
        &app,
        "PATCH",
        &format!("/api/animals/{id}"),
        Some(&volunteer),
        Some(json!({ "age": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["age"], 4);
    assert_eq!(body["name"], "Rex");
}

#[tokio::test]
async fn should_return_404_for_unknown_animal_and_400_for_bad_id() {
    let app = app().await;
    let admin = login(&app, "root", "rootpass").await;

    let unknown = UserId::new().to_string();
    let (status, body) = call(
        &app,
        "GET",
        &format!("/api/animals/{unknown}"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    let (status, _) = call(&app, "GET", "/api/animals/not-a-uuid", Some(&admin), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn should_open_single_adoption_when_marked_pending() {
    let app = app().await;
    let (_, volunteer) = signup(&app, "vera", "VOLUNTEER").await;
    let id = create_animal(&app, &volunteer, "Rex").await;

    for uri in [format!("/api/animals/{id}"), format!("/api/pets/{id}")] {
        let (status, body) = call(
            &app,
            "PATCH",
            &uri,
            Some(&volunteer),
            Some(json!({ "status": "PENDING" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "PENDING");
    }

    let (_, adoptions) = call(&app, "GET", "/api/adoptions", Some(&volunteer), None).await;
    assert_eq!(adoptions["count"], 1);
    assert_eq!(adoptions["results"][0]["status"], "PENDING");
}

#[tokio::test]
async fn should_change_status_without_touching_adoptions() {
    let app = app().await;
    let (_, volunteer) = signup(&app, "vera", "VOLUNTEER").await;
    let id = create_animal(&app, &volunteer, "Rex").await;
    let uri = format!("/api/animals/{id}/change_status");

    let (status, body) = call(
        &app,
        "POST",
        &uri,
        Some(&volunteer),
        Some(json!({ "status": "LOST" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "invalid status");

    let (status, body) = call(
        &app,
        "POST",
        &uri,
        Some(&volunteer),
        Some(json!({ "status": "ADOPTED" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "animal status updated");
    assert_eq!(animal_status(&app, &volunteer, &id).await, "ADOPTED");

    let (_, adoptions) = call(&app, "GET", "/api/adoptions", Some(&volunteer), None).await;
    assert_eq!(adoptions["count"], 0);
}

#[tokio::test]
async fn should_check_role_and_animal_before_status_value() {
    let app = app().await;
    let (_, volunteer) = signup(&app, "vera", "VOLUNTEER").await;
    let (_, adopter) = signup(&app, "alice", "ADOPTER").await;
    let id = create_animal(&app, &volunteer, "Rex").await;
    let bogus = json!({ "status": "BOGUS" });

    let (status, _) = call(
        &app,
        "POST",
        &format!("/api/animals/{id}/change_status"),
        Some(&adopter),
        Some(bogus.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let unknown = UserId::new().to_string();
    let (status, _) = call(
        &app,
        "POST",
        &format!("/api/animals/{unknown}/change_status"),
        Some(&volunteer),
        Some(bogus),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_reject_references_to_missing_rows() {
    let app = app().await;
    let (_, volunteer) = signup(&app, "vera", "VOLUNTEER").await;
    let animal = create_animal(&app, &volunteer, "Rex").await;
    let unknown = UserId::new().to_string();

    let (status, body) = call(
        &app,
        "POST",
        "/api/devices",
        Some(&volunteer),
        Some(json!({
            "serial_number": "SN-404",
            "name": "Ghost feeder",
            "animal": unknown,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let (status, body) = call(
        &app,
        "POST",
        "/api/habits",
        Some(&volunteer),
        Some(json!({
            "animal": animal,
            "device": unknown,
            "activity": "EATING",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let (status, body) = call(
        &app,
        "POST",
        "/api/habits",
        Some(&volunteer),
        Some(json!({ "animal": animal, "activity": "EATING" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
}

#[tokio::test]
async fn should_paginate_listings() {
    let app = app().await;
    let admin = login(&app, "root", "rootpass").await;
    for name in ["Rex", "Fido", "Bella"] {
        create_animal(&app, &admin, name).await;
    }

    let (status, body) = call(
        &app,
        "GET",
        "/api/animals?limit=2&offset=0",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);
    assert_eq!(body["results"].as_array().unwrap().len(), 2);

    let (_, body) = call(&app, "GET", "/api/animals?limit=2&offset=2", Some(&admin), None).await;
    assert_eq!(body["count"], 3);
    assert_eq!(body["results"].as_array().unwrap().len(), 1);
    assert_eq!(body["results"][0]["name"], "Bella");

    let (status, _) = call(&app, "GET", "/api/animals?offset=-1", Some(&admin), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(&app, "GET", "/api/animals?limit=many", Some(&admin), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Adoptions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_run_adoption_flow() {
    let app = app().await;
    let admin = login(&app, "root", "rootpass").await;
    let (_, volunteer) = signup(&app, "vera", "VOLUNTEER").await;
    let (_, alice) = signup(&app, "alice", "ADOPTER").await;
    let (_, bob) = signup(&app, "bob", "ADOPTER").await;
    let animal = create_animal(&app, &volunteer, "Rex").await;

    // staff cannot request an adoption
    let (status, _) = call(
        &app,
        "POST",
        "/api/adoptions",
        Some(&volunteer),
        Some(json!({ "animal": animal })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, adoption) = call(
        &app,
        "POST",
        "/api/adoptions",
        Some(&alice),
        Some(json!({ "animal": animal })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(adoption["status"], "PENDING");
    assert_eq!(animal_status(&app, &alice, &animal).await, "PENDING");

    // no longer available to anyone else
    let (status, body) = call(
        &app,
        "POST",
        "/api/adoptions",
        Some(&bob),
        Some(json!({ "animal_id": animal })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Animal is not available.");

    // adopters cannot see the queue
    let (status, _) = call(&app, "GET", "/api/adoptions", Some(&alice), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let adoption_uri = format!("/api/adoptions/{}", adoption["id"].as_str().unwrap());

    // full replacement is reserved for administrators
    let (status, _) = call(
        &app,
        "PUT",
        &adoption_uri,
        Some(&volunteer),
        Some(json!({ "status": "COMPLETED" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call(
        &app,
        "PATCH",
        &adoption_uri,
        Some(&volunteer),
        Some(json!({ "status": "COMPLETED" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "COMPLETED");
    assert_eq!(animal_status(&app, &volunteer, &animal).await, "ADOPTED");

    let (status, _) = call(&app, "DELETE", &adoption_uri, Some(&volunteer), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = call(&app, "DELETE", &adoption_uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(animal_status(&app, &admin, &animal).await, "AVAILABLE");
}

#[tokio::test]
async fn should_reject_adoption_of_unknown_animal() {
    let app = app().await;
    let (_, alice) = signup(&app, "alice", "ADOPTER").await;
    let (status, body) = call(
        &app,
        "POST",
        "/api/adoptions",
        Some(&alice),
        Some(json!({ "animal": UserId::new().to_string() })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid animal ID.");
}

// ---------------------------------------------------------------------------
// Devices and usage logs
// ---------------------------------------------------------------------------

async fn quantity(app: &Router, key: Option<&str>, body: &Value) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/update-device-quantity")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(key) = key {
        builder = builder.header("x-api-key", key);
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn should_clamp_device_quantities_and_log_usage() {
    let app = app().await;
    let (_, alice) = signup(&app, "alice", "ADOPTER").await;
    let (_, bob) = signup(&app, "bob", "ADOPTER").await;

    let (status, device) = call(
        &app,
        "POST",
        "/api/devices",
        Some(&alice),
        Some(json!({
            "serial_number": "SN-001",
            "name": "Kitchen feeder",
            "food_limit": 100,
            "water_limit": 50,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{device}");
    assert_eq!(device["food_quantity"], 0);

    let add = json!({
        "serial_number": "SN-001",
        "resource": "FOOD",
        "action": "ADD",
        "amount": 150,
    });
    let (status, _) = quantity(&app, None, &add).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = quantity(&app, Some("wrong"), &add).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = quantity(&app, Some(DEVICE_KEY), &add).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["food_quantity"], 100);

    let subtract = json!({
        "serial_number": "SN-001",
        "resource": "FOOD",
        "action": "SUBTRACT",
        "amount": 500,
    });
    let (_, body) = quantity(&app, Some(DEVICE_KEY), &subtract).await;
    assert_eq!(body["food_quantity"], 0);

    let (status, _) = quantity(
        &app,
        Some(DEVICE_KEY),
        &json!({ "serial_number": "SN-404", "resource": "WATER", "action": "ADD", "amount": 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let device_id = device["id"].as_str().unwrap();
    let (status, logs) = call(
        &app,
        "GET",
        &format!("/api/usage-logs?device={device_id}"),
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(logs["count"], 2);

    // another adopter sees neither the device nor its history
    let (status, _) = call(
        &app,
        "GET",
        &format!("/api/devices/{device_id}"),
        Some(&bob),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, logs) = call(&app, "GET", "/api/usage-logs", Some(&bob), None).await;
    assert_eq!(logs["count"], 0);
}

#[tokio::test]
async fn should_reject_duplicate_serial_number() {
    let app = app().await;
    let (_, alice) = signup(&app, "alice", "ADOPTER").await;
    let device = json!({ "serial_number": "SN-1", "name": "Feeder", "food_limit": 10, "water_limit": 10 });
    let (status, _) = call(&app, "POST", "/api/devices", Some(&alice), Some(device.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = call(&app, "POST", "/api/devices", Some(&alice), Some(device)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Notifications, subscriptions and payments
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_deliver_and_mark_notifications() {
    let app = app().await;
    let (_, volunteer) = signup(&app, "vera", "VOLUNTEER").await;
    let (alice_id, alice) = signup(&app, "alice", "ADOPTER").await;

    let (status, sent) = call(
        &app,
        "POST",
        "/api/notifications",
        Some(&volunteer),
        Some(json!({ "user": alice_id, "title": "Visit", "message": "Rex is waiting" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(sent["read"], false);

    let (_, inbox) = call(&app, "GET", "/api/notifications", Some(&alice), None).await;
    assert_eq!(inbox["count"], 1);

    let id = sent["id"].as_str().unwrap();
    let (status, read) = call(
        &app,
        "POST",
        &format!("/api/notifications/{id}/read"),
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(read["read"], true);
}

#[tokio::test]
async fn should_subscribe_pay_and_settle() {
    let app = app().await;
    let admin = login(&app, "root", "rootpass").await;
    let (_, alice) = signup(&app, "alice", "ADOPTER").await;
    let (_, bob) = signup(&app, "bob", "ADOPTER").await;

    let (status, subscription) = call(
        &app,
        "POST",
        "/api/subscriptions",
        Some(&alice),
        Some(json!({ "plan": "PREMIUM" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(subscription["status"], "ACTIVE");

    let (status, payment) = call(
        &app,
        "POST",
        "/api/payments",
        Some(&alice),
        Some(json!({ "subscription": subscription["id"], "amount_cents": 999 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(payment["currency"], "EUR");
    assert_eq!(payment["status"], "PENDING");

    let payment_uri = format!("/api/payments/{}", payment["id"].as_str().unwrap());
    let (status, _) = call(&app, "GET", &payment_uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let settle = json!({ "status": "COMPLETED" });
    let (status, _) = call(&app, "PATCH", &payment_uri, Some(&alice), Some(settle.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = call(&app, "PATCH", &payment_uri, Some(&admin), Some(settle)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "COMPLETED");

    let cancel_uri = format!(
        "/api/subscriptions/{}/cancel",
        subscription["id"].as_str().unwrap()
    );
    let (status, body) = call(&app, "POST", &cancel_uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "CANCELLED");
    assert_eq!(body["auto_renew"], false);
}

#[tokio::test]
async fn should_return_400_for_malformed_json() {
    let app = app().await;
    let admin = login(&app, "root", "rootpass").await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/animals")
        .header(header::AUTHORIZATION, format!("Bearer {admin}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
