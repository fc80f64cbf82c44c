//! HTTP-level integration tests for the `/characters` resource.

mod common;

use axum::http::{header, StatusCode};
use common::{
    body_json, delete_auth, get, names, patch_json_auth, post_json, post_json_auth, user_token,
};
use serde_json::json;

fn new_character_body(name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "house": "Tarly",
        "role": "Maester",
        "age": 22,
        "nickname": "Slayer",
    })
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_filters_sorts_and_paginates() {
    let app = common::build_test_app();
    let response = get(
        app,
        "/api/v1/characters?house=lannister&sort_asc=age&limit=10&skip=0",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(names(&json), ["Tyrion", "Cersei"]);
    assert_eq!(json[0]["age"], 30);
    assert_eq!(json[1]["age"], 35);
}

#[tokio::test]
async fn list_window_skips_and_limits() {
    let app = common::build_test_app();
    let response = get(app, "/api/v1/characters?sort_asc=id&limit=2&skip=1").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(names(&json), ["Tyrion", "Cersei"]);
}

#[tokio::test]
async fn list_skip_past_end_is_empty() {
    let app = common::build_test_app();
    let response = get(app, "/api/v1/characters?limit=5&skip=50").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json, json!([]));
}

#[tokio::test]
async fn list_age_bounds_exclude_unknown_age() {
    let app = common::build_test_app();
    let response = get(
        app,
        "/api/v1/characters?house=stark&age_more_than=0&sort_desc=age&limit=10",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(names(&json), ["Jon Snow", "Arya"]);
}

#[tokio::test]
async fn list_without_limit_returns_whole_small_set_as_sample() {
    let app = common::build_test_app();
    let response = get(app, "/api/v1/characters").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let mut got = names(&json);
    got.sort();
    assert_eq!(
        got,
        ["Arya", "Cersei", "Daenerys", "Hodor", "Jon Snow", "Tyrion"]
    );
}

#[tokio::test]
async fn list_zero_limit_sample_keeps_requested_order() {
    let app = common::build_test_app();
    let response = get(app, "/api/v1/characters?limit=0&skip=3&sort_asc=name").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(
        names(&json),
        ["Arya", "Cersei", "Daenerys", "Hodor", "Jon Snow", "Tyrion"]
    );
}

#[tokio::test]
async fn list_rejects_unknown_sort_field() {
    let app = common::build_test_app();
    let response = get(app, "/api/v1/characters?sort_asc=height").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_QUERY");
    assert!(json["error"].as_str().unwrap().contains("height"));
}

#[tokio::test]
async fn list_rejects_negative_limit() {
    let app = common::build_test_app();
    let response = get(app, "/api/v1/characters?limit=-1").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

// ---------------------------------------------------------------------------
// Get
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_by_id_returns_record() {
    let app = common::build_test_app();
    let response = get(app, "/api/v1/characters/2").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["id"], 2);
    assert_eq!(json["name"], "Tyrion");
    assert_eq!(json["house"], "Lannister");
    assert!(json["nickname"].is_null());
}

#[tokio::test]
async fn get_unknown_id_returns_404() {
    let app = common::build_test_app();
    let response = get(app, "/api/v1/characters/999").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Character with id 999 not found");
}

#[tokio::test]
async fn get_non_numeric_id_returns_400() {
    let app = common::build_test_app();
    let response = get(app, "/api/v1/characters/jon").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_returns_201_with_fresh_id() {
    let app = common::build_test_app();
    let token = user_token();

    let response = post_json_auth(
        app.clone(),
        "/api/v1/characters",
        &token,
        new_character_body("Samwell"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["id"], 7);
    assert_eq!(json["name"], "Samwell");
    assert_eq!(json["nickname"], "Slayer");
    assert!(json["death"].is_null());

    let fetched = body_json(get(app, "/api/v1/characters/7").await).await;
    assert_eq!(fetched, json);
}

#[tokio::test]
async fn create_without_token_returns_401() {
    let app = common::build_test_app();
    let response = post_json(app, "/api/v1/characters", new_character_body("Samwell")).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "Bearer"
    );
}

#[tokio::test]
async fn create_with_garbage_token_returns_401() {
    let app = common::build_test_app();
    let response = post_json_auth(
        app,
        "/api/v1/characters",
        "not-a-jwt",
        new_character_body("Samwell"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn create_duplicate_name_returns_400() {
    let app = common::build_test_app();
    let response = post_json_auth(
        app.clone(),
        "/api/v1/characters",
        &user_token(),
        new_character_body("JON SNOW"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "DUPLICATE_NAME");

    let list = body_json(get(app, "/api/v1/characters?limit=100").await).await;
    assert_eq!(list.as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn create_with_blank_name_returns_422() {
    let app = common::build_test_app();
    let body = json!({ "name": "   ", "house": "Tarly", "role": "Maester" });
    let response = post_json_auth(app, "/api/v1/characters", &user_token(), body).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["details"].to_string().contains("name"));
}

#[tokio::test]
async fn create_missing_required_field_returns_422() {
    let app = common::build_test_app();
    let body = json!({ "name": "Samwell", "house": "Tarly" });
    let response = post_json_auth(app, "/api/v1/characters", &user_token(), body).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn create_negative_age_returns_422() {
    let app = common::build_test_app();
    let body = json!({ "name": "Samwell", "house": "Tarly", "role": "Maester", "age": -3 });
    let response = post_json_auth(app, "/api/v1/characters", &user_token(), body).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn create_accepts_negative_death_marker() {
    let app = common::build_test_app();
    let body = json!({ "name": "Aegon", "house": "Targaryen", "role": "King", "death": -2 });
    let response = post_json_auth(app, "/api/v1/characters", &user_token(), body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["death"], -2);
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn patch_changes_only_supplied_fields() {
    let app = common::build_test_app();
    let body = json!({ "age": 31, "nickname": "The Imp", "id": 500 });
    let response =
        patch_json_auth(app.clone(), "/api/v1/characters/2", &user_token(), body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["id"], 2);
    assert_eq!(json["name"], "Tyrion");
    assert_eq!(json["house"], "Lannister");
    assert_eq!(json["age"], 31);
    assert_eq!(json["nickname"], "The Imp");

    let fetched = body_json(get(app, "/api/v1/characters/2").await).await;
    assert_eq!(fetched, json);
}

#[tokio::test]
async fn patch_with_null_clears_optional_field() {
    let app = common::build_test_app();
    let response = patch_json_auth(
        app,
        "/api/v1/characters/1",
        &user_token(),
        json!({ "age": null }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["age"].is_null());
    assert_eq!(json["name"], "Jon Snow");
}

#[tokio::test]
async fn patch_rename_onto_existing_name_returns_400() {
    let app = common::build_test_app();
    let response = patch_json_auth(
        app,
        "/api/v1/characters/2",
        &user_token(),
        json!({ "name": "cersei" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "DUPLICATE_NAME");
}

#[tokio::test]
async fn patch_unknown_id_returns_404() {
    let app = common::build_test_app();
    let response = patch_json_auth(
        app,
        "/api/v1/characters/999",
        &user_token(),
        json!({ "age": 1 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_returns_204_then_404() {
    let app = common::build_test_app();
    let token = user_token();

    let response = delete_auth(app.clone(), "/api/v1/characters/4", &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app.clone(), "/api/v1/characters/4").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(app, "/api/v1/characters/4", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleted_id_is_not_reused() {
    let app = common::build_test_app();
    let token = user_token();

    let response = delete_auth(app.clone(), "/api/v1/characters/6", &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = post_json_auth(
        app,
        "/api/v1/characters",
        &token,
        new_character_body("Samwell"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["id"], 7);
}
