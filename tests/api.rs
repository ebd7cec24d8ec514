use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use holodex::db::Database;
use holodex::handler::AppState;
use holodex::routes;
use serde_json::Value;
use tower::ServiceExt;

async fn test_app() -> Router {
    let db = Database::in_memory().await.unwrap();
    seed(&db).await;
    routes::routes().with_state(AppState { db: Arc::new(db) })
}

async fn seed(db: &Database) {
    let conn = db.connection();
    let statements = [
        "INSERT INTO users (email, password, is_active) VALUES ('luke@rebellion.org', 'secret', 1)",
        "INSERT INTO users (email, password, is_active) VALUES ('leia@rebellion.org', 'alderaan', 1)",
        "INSERT INTO people (name, gender) VALUES ('Luke Skywalker', 'male')",
        "INSERT INTO people (name, gender) VALUES ('Leia Organa', 'female')",
        "INSERT INTO planets (name, population) VALUES ('Tatooine', 200000)",
        "INSERT INTO planets (name, population) VALUES ('Alderaan', 2000000000)",
    ];
    for statement in statements {
        conn.execute(statement, ()).await.unwrap();
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn sitemap_lists_every_route() {
    let app = test_app().await;

    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);

    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 11);
    assert!(entries.iter().any(|e| e["method"] == "GET" && e["path"] == "/users"));
    assert!(
        entries
            .iter()
            .any(|e| e["method"] == "DELETE" && e["path"] == "/favorite/people/:people_id")
    );
}

#[tokio::test]
async fn users_listing_omits_credentials() {
    let app = test_app().await;

    let (status, body) = get(&app, "/users").await;
    assert_eq!(status, StatusCode::OK);

    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["email"], "luke@rebellion.org");
    assert!(users[0].get("password").is_none());
    assert!(users[0].get("is_active").is_none());
}

#[tokio::test]
async fn planet_lookup_returns_stored_fields() {
    let app = test_app().await;

    let (status, body) = get(&app, "/planets/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    assert_eq!(body["name"], "Tatooine");
    assert_eq!(body["population"], 200000);

    let (status, body) = get(&app, "/planets").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn unknown_planet_returns_404_body() {
    let app = test_app().await;

    let (status, body) = get(&app, "/planets/99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Planet not found");
}

#[tokio::test]
async fn person_lookup_and_404() {
    let app = test_app().await;

    let (status, body) = get(&app, "/people/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Leia Organa");
    assert_eq!(body["gender"], "female");

    let (status, body) = get(&app, "/people/99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Person not found");

    let (status, body) = get(&app, "/people").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn favorite_planet_lifecycle() {
    let app = test_app().await;

    // create
    let (status, body) = send(&app, json_request("POST", "/favorite/planet/2", r#"{"user_id": 1}"#)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], "Planet added to favorites");

    // exactly one row, planet side set
    let (status, body) = get(&app, "/users/favorites?user_id=1").await;
    assert_eq!(status, StatusCode::OK);
    let favorites = body.as_array().unwrap();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0]["user_id"], 1);
    assert_eq!(favorites[0]["planet_id"], 2);
    assert!(favorites[0]["people_id"].is_null());

    // duplicate rejected, no extra row
    let (status, body) = send(&app, json_request("POST", "/favorite/planet/2", r#"{"user_id": 1}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Planet already in favorites");

    let (_, body) = get(&app, "/users/favorites?user_id=1").await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    // delete, then delete again
    let (status, body) = send(&app, json_request("DELETE", "/favorite/planet/2", r#"{"user_id": 1}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], "Favorite deleted");

    let (status, body) = send(&app, json_request("DELETE", "/favorite/planet/2", r#"{"user_id": 1}"#)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Favorite not found");
}

#[tokio::test]
async fn favorite_person_lifecycle() {
    let app = test_app().await;

    let (status, body) = send(&app, json_request("POST", "/favorite/people/1", r#"{"user_id": 2}"#)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], "Person added to favorites");

    let (status, body) = send(&app, json_request("POST", "/favorite/people/1", r#"{"user_id": 2}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Person already in favorites");

    let (status, body) = send(&app, json_request("POST", "/favorite/people/42", r#"{"user_id": 2}"#)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Person not found");

    let (status, body) = send(&app, json_request("DELETE", "/favorite/people/1", r#"{"user_id": 2}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], "Favorite deleted");
}

#[tokio::test]
async fn favorite_unknown_planet_is_404() {
    let app = test_app().await;

    let (status, body) = send(&app, json_request("POST", "/favorite/planet/42", r#"{"user_id": 1}"#)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Planet not found");
}

#[tokio::test]
async fn missing_body_is_rejected_without_mutating() {
    let app = test_app().await;

    for request in [
        empty_request("POST", "/favorite/planet/1"),
        empty_request("POST", "/favorite/people/1"),
        empty_request("DELETE", "/favorite/planet/1"),
        empty_request("DELETE", "/favorite/people/1"),
    ] {
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Request body must be JSON");
    }

    let (_, body) = get(&app, "/users/favorites?user_id=1").await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn post_without_user_id_is_400() {
    let app = test_app().await;

    let (status, body) = send(&app, json_request("POST", "/favorite/planet/1", "{}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "User ID not provided");
}

#[tokio::test]
async fn delete_without_user_id_matches_no_favorite() {
    let app = test_app().await;

    let (status, body) = send(&app, json_request("DELETE", "/favorite/planet/1", "{}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Favorite not found");
}

#[tokio::test]
async fn favorites_listing_tolerates_empty_and_non_numeric_user_id() {
    let app = test_app().await;

    send(&app, json_request("POST", "/favorite/planet/1", r#"{"user_id": 1}"#)).await;

    // An empty value behaves like an absent param: 200 with no rows.
    let (status, body) = get(&app, "/users/favorites?user_id=").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());

    let (status, body) = get(&app, "/users/favorites?user_id=luke").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn favorites_listing_without_user_id_is_empty() {
    let app = test_app().await;

    send(&app, json_request("POST", "/favorite/planet/1", r#"{"user_id": 1}"#)).await;

    let (status, body) = get(&app, "/users/favorites").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());

    let (_, body) = get(&app, "/users/favorites?user_id=2").await;
    assert!(body.as_array().unwrap().is_empty());

    let (_, body) = get(&app, "/users/favorites?user_id=1").await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}
