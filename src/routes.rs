use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::api::RouteEntry;
use crate::handler::{self, AppState};

// Kept in step with routes() below; serialized by the sitemap handler.
const ROUTE_TABLE: &[(&str, &str)] = &[
    ("GET", "/"),
    ("GET", "/users"),
    ("GET", "/users/favorites"),
    ("GET", "/people"),
    ("GET", "/people/:people_id"),
    ("GET", "/planets"),
    ("GET", "/planets/:planet_id"),
    ("POST", "/favorite/planet/:planet_id"),
    ("DELETE", "/favorite/planet/:planet_id"),
    ("POST", "/favorite/people/:people_id"),
    ("DELETE", "/favorite/people/:people_id"),
];

pub fn route_table() -> Vec<RouteEntry> {
    ROUTE_TABLE
        .iter()
        .map(|&(method, path)| RouteEntry { method, path })
        .collect()
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::sitemap))
        .route("/users", get(handler::get_users))
        .route("/users/favorites", get(handler::get_user_favorites))
        .route("/people", get(handler::get_people))
        .route("/people/:people_id", get(handler::get_person))
        .route("/planets", get(handler::get_planets))
        .route("/planets/:planet_id", get(handler::get_planet))
        .route("/favorite/planet/:planet_id", post(handler::add_planet_favorite))
        .route("/favorite/planet/:planet_id", delete(handler::delete_planet_favorite))
        .route("/favorite/people/:people_id", post(handler::add_person_favorite))
        .route("/favorite/people/:people_id", delete(handler::delete_person_favorite))
}
