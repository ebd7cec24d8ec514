use serde::{Deserialize, Serialize};

/// Body for `POST`/`DELETE /favorite/...` requests. `user_id` is optional at
/// the wire level so its absence can be reported separately from a missing
/// body.
#[derive(Debug, Deserialize)]
pub struct FavoriteRequest {
    pub user_id: Option<i64>,
}

/// Query string for `GET /users/favorites`. `user_id` stays a raw string so
/// an empty or non-numeric value matches no rows instead of failing query
/// deserialization.
#[derive(Debug, Deserialize)]
pub struct FavoritesQuery {
    pub user_id: Option<String>,
}

impl FavoritesQuery {
    pub fn user_id(&self) -> Option<i64> {
        self.user_id.as_deref().and_then(|raw| raw.parse().ok())
    }
}

#[derive(Debug, Serialize)]
pub struct SuccessBody {
    pub success: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// One sitemap entry, as returned by `GET /`.
#[derive(Debug, Serialize)]
pub struct RouteEntry {
    pub method: &'static str,
    pub path: &'static str,
}
