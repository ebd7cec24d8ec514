use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::api::ErrorBody;

/// Application error carrying its own HTTP status. Handlers return
/// `Result<Response, ApiError>` and let the `IntoResponse` impl render the
/// JSON error body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request body must be JSON")]
    MissingBody,
    #[error("User ID not provided")]
    MissingUserId,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0} already in favorites")]
    DuplicateFavorite(&'static str),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingBody | ApiError::MissingUserId | ApiError::DuplicateFavorite(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = match &self {
            ApiError::Internal(e) => {
                tracing::error!(error = %e, "request failed");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorBody { error })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_match_taxonomy() {
        assert_eq!(ApiError::MissingBody.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::MissingUserId.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound("Planet").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::DuplicateFavorite("Person").status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn messages_name_the_entity() {
        assert_eq!(ApiError::NotFound("Person").to_string(), "Person not found");
        assert_eq!(
            ApiError::DuplicateFavorite("Planet").to_string(),
            "Planet already in favorites"
        );
    }
}
