//! Shared helpers for the HTTP integration tests.
//!
//! Every test gets its own in-memory store, so tests never share records.
//! The router is built with [`build_app_router`], the same function the
//! binary uses, so the full middleware stack is exercised.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;
use westeros_api::auth::jwt::{generate_access_token, JwtConfig};
use westeros_api::auth::password::hash_password;
use westeros_api::auth::users::{UserDirectory, UserRecord};
use westeros_api::config::ServerConfig;
use westeros_api::router::build_app_router;
use westeros_api::state::AppState;
use westeros_core::character::CharacterSeed;
use westeros_core::memory::MemoryStore;
use westeros_core::roles::{ROLE_ADMIN, ROLE_USER};

pub const ADMIN_USERNAME: &str = "maester";
pub const USER_USERNAME: &str = "steward";
pub const PASSWORD: &str = "winter-is-coming";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(characters_file: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".parse().unwrap()],
        request_timeout_secs: 30,
        database_url: None,
        characters_file,
        users_file: PathBuf::from("unused-users.json"),
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 30,
        },
    }
}

/// One admin and one regular account, both with [`PASSWORD`]. Hashed once
/// per test binary.
fn test_users() -> Arc<UserDirectory> {
    static USERS: OnceLock<Arc<UserDirectory>> = OnceLock::new();
    USERS
        .get_or_init(|| {
            let hash = hash_password(PASSWORD).expect("hashing should succeed");
            Arc::new(UserDirectory::new([
                UserRecord {
                    username: ADMIN_USERNAME.to_string(),
                    password_hash: hash.clone(),
                    role: ROLE_ADMIN.to_string(),
                },
                UserRecord {
                    username: USER_USERNAME.to_string(),
                    password_hash: hash,
                    role: ROLE_USER.to_string(),
                },
            ]))
        })
        .clone()
}

fn seed(id: i64, name: &str, house: &str, role: &str, age: Option<i64>) -> CharacterSeed {
    CharacterSeed {
        id: Some(id),
        name: Some(name.to_string()),
        house: Some(house.to_string()),
        role: Some(role.to_string()),
        age,
        ..Default::default()
    }
}

/// The records every default test app starts with.
pub fn fixture_seeds() -> Vec<CharacterSeed> {
    vec![
        seed(1, "Jon Snow", "Stark", "King in the North", Some(20)),
        seed(2, "Tyrion", "Lannister", "Hand of the Queen", Some(30)),
        seed(3, "Cersei", "Lannister", "Queen", Some(35)),
        seed(4, "Arya", "Stark", "Assassin", Some(11)),
        seed(5, "Daenerys", "Targaryen", "Queen", Some(16)),
        seed(6, "Hodor", "Stark", "Servant", None),
    ]
}

/// Build the application around a store seeded with [`fixture_seeds`].
pub fn build_test_app() -> Router {
    build_test_app_with(
        MemoryStore::from_seeds(fixture_seeds()),
        PathBuf::from("missing-dataset.json"),
    )
}

/// Build the application around `store`, with `characters_file` as the
/// bulk-load source.
pub fn build_test_app_with(store: MemoryStore, characters_file: PathBuf) -> Router {
    let config = test_config(characters_file);
    let state = AppState {
        store: Arc::new(store),
        users: test_users(),
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

fn token_for(username: &str, role: &str) -> String {
    let config = test_config(PathBuf::new());
    generate_access_token(username, role, &config.jwt).expect("token generation should succeed")
}

pub fn admin_token() -> String {
    token_for(ADMIN_USERNAME, ROLE_ADMIN)
}

pub fn user_token() -> String {
    token_for(USER_USERNAME, ROLE_USER)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Send a request with an optional bearer token and optional JSON body.
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// POST an `application/x-www-form-urlencoded` body.
pub async fn post_form(app: Router, uri: &str, body: &str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Names of the characters in a JSON array response, in order.
pub fn names(json: &serde_json::Value) -> Vec<String> {
    json.as_array()
        .expect("response should be an array")
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect()
}
