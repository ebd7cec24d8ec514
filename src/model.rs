use serde::{Deserialize, Serialize};

/// Account record. Credentials never leave the service: `password` and
/// `is_active` are stored but skipped on serialization.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(skip_serializing)]
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: i64,
    pub name: String,
    pub gender: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Planet {
    pub id: i64,
    pub name: String,
    pub population: i64,
}

/// A user's saved association to either a person or a planet. Storage keeps
/// two nullable columns; writes go through [`FavoriteTarget`] so exactly one
/// of `people_id`/`planet_id` is ever set by this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Favorite {
    pub id: i64,
    pub user_id: i64,
    pub people_id: Option<i64>,
    pub planet_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteTarget {
    Person(i64),
    Planet(i64),
}

impl FavoriteTarget {
    pub fn column(&self) -> &'static str {
        match self {
            FavoriteTarget::Person(_) => "people_id",
            FavoriteTarget::Planet(_) => "planet_id",
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            FavoriteTarget::Person(id) | FavoriteTarget::Planet(id) => *id,
        }
    }
}
