use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::api::{FavoriteRequest, FavoritesQuery, SuccessBody};
use crate::db::Database;
use crate::error::ApiError;
use crate::model::FavoriteTarget;
use crate::routes;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
}

fn ok<T: serde::Serialize>(body: T) -> Response {
    (StatusCode::OK, Json(body)).into_response()
}

fn created(success: &'static str) -> Response {
    (StatusCode::CREATED, Json(SuccessBody { success })).into_response()
}

/// Missing or non-JSON body and missing `user_id` are reported separately.
fn require_user_id(body: Option<Json<FavoriteRequest>>) -> Result<i64, ApiError> {
    let Json(body) = body.ok_or(ApiError::MissingBody)?;
    body.user_id.ok_or(ApiError::MissingUserId)
}

pub async fn sitemap() -> impl IntoResponse {
    Json(routes::route_table())
}

pub async fn get_users(State(state): State<AppState>) -> Result<Response, ApiError> {
    let users = state.db.list_users().await?;
    Ok(ok(users))
}

pub async fn get_user_favorites(
    State(state): State<AppState>,
    Query(params): Query<FavoritesQuery>,
) -> Result<Response, ApiError> {
    let favorites = state.db.list_favorites_for_user(params.user_id()).await?;
    Ok(ok(favorites))
}

pub async fn get_people(State(state): State<AppState>) -> Result<Response, ApiError> {
    let people = state.db.list_people().await?;
    Ok(ok(people))
}

pub async fn get_person(
    State(state): State<AppState>,
    Path(people_id): Path<i64>,
) -> Result<Response, ApiError> {
    let person = state
        .db
        .get_person(people_id)
        .await?
        .ok_or(ApiError::NotFound("Person"))?;
    Ok(ok(person))
}

pub async fn get_planets(State(state): State<AppState>) -> Result<Response, ApiError> {
    let planets = state.db.list_planets().await?;
    Ok(ok(planets))
}

pub async fn get_planet(
    State(state): State<AppState>,
    Path(planet_id): Path<i64>,
) -> Result<Response, ApiError> {
    let planet = state
        .db
        .get_planet(planet_id)
        .await?
        .ok_or(ApiError::NotFound("Planet"))?;
    Ok(ok(planet))
}

pub async fn add_planet_favorite(
    State(state): State<AppState>,
    Path(planet_id): Path<i64>,
    body: Option<Json<FavoriteRequest>>,
) -> Result<Response, ApiError> {
    let user_id = require_user_id(body)?;

    if state.db.get_planet(planet_id).await?.is_none() {
        return Err(ApiError::NotFound("Planet"));
    }

    match state.db.add_favorite(user_id, FavoriteTarget::Planet(planet_id)).await? {
        Some(_) => Ok(created("Planet added to favorites")),
        None => Err(ApiError::DuplicateFavorite("Planet")),
    }
}

pub async fn add_person_favorite(
    State(state): State<AppState>,
    Path(people_id): Path<i64>,
    body: Option<Json<FavoriteRequest>>,
) -> Result<Response, ApiError> {
    let user_id = require_user_id(body)?;

    if state.db.get_person(people_id).await?.is_none() {
        return Err(ApiError::NotFound("Person"));
    }

    match state.db.add_favorite(user_id, FavoriteTarget::Person(people_id)).await? {
        Some(_) => Ok(created("Person added to favorites")),
        None => Err(ApiError::DuplicateFavorite("Person")),
    }
}

pub async fn delete_planet_favorite(
    State(state): State<AppState>,
    Path(planet_id): Path<i64>,
    body: Option<Json<FavoriteRequest>>,
) -> Result<Response, ApiError> {
    let Json(body) = body.ok_or(ApiError::MissingBody)?;

    // An absent user_id matches no rows, same as an unknown one.
    let Some(user_id) = body.user_id else {
        return Err(ApiError::NotFound("Favorite"));
    };

    if state.db.remove_favorite(user_id, FavoriteTarget::Planet(planet_id)).await? {
        Ok(ok(SuccessBody { success: "Favorite deleted" }))
    } else {
        Err(ApiError::NotFound("Favorite"))
    }
}

pub async fn delete_person_favorite(
    State(state): State<AppState>,
    Path(people_id): Path<i64>,
    body: Option<Json<FavoriteRequest>>,
) -> Result<Response, ApiError> {
    let Json(body) = body.ok_or(ApiError::MissingBody)?;

    let Some(user_id) = body.user_id else {
        return Err(ApiError::NotFound("Favorite"));
    };

    if state.db.remove_favorite(user_id, FavoriteTarget::Person(people_id)).await? {
        Ok(ok(SuccessBody { success: "Favorite deleted" }))
    } else {
        Err(ApiError::NotFound("Favorite"))
    }
}
