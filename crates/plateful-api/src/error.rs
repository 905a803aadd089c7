use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use plateful_db::queries::CreateUserError;
use plateful_db::reservations::ReserveError;
use thiserror::Error;
use tracing::error;

/// Domain errors surfaced at the API boundary. Every variant maps to a status
/// code and a short human-readable message; storage faults are logged
/// server-side and never leak detail to the client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("email already registered")]
    DuplicateEmail,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("missing bearer token")]
    MissingToken,
    #[error("invalid or expired token")]
    InvalidToken,
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("meal not found")]
    MealNotFound,
    #[error("a reservation was made within the last 3 days")]
    CooldownActive,
    #[error("no portions left")]
    SoldOut,
    #[error("internal server error")]
    Storage(#[source] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_)
            | ApiError::DuplicateEmail
            | ApiError::InvalidCredentials
            | ApiError::CooldownActive
            | ApiError::SoldOut => StatusCode::BAD_REQUEST,
            ApiError::MissingToken => StatusCode::UNAUTHORIZED,
            ApiError::InvalidToken | ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::MealNotFound => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub(crate) fn from_join(e: tokio::task::JoinError) -> Self {
        ApiError::Storage(anyhow::anyhow!("task join error: {}", e))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Storage(ref cause) = self {
            error!("storage fault: {:#}", cause);
        }

        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Storage(e)
    }
}

impl From<CreateUserError> for ApiError {
    fn from(e: CreateUserError) -> Self {
        match e {
            CreateUserError::DuplicateEmail => ApiError::DuplicateEmail,
            CreateUserError::Storage(e) => ApiError::Storage(e),
        }
    }
}

impl From<ReserveError> for ApiError {
    fn from(e: ReserveError) -> Self {
        match e {
            ReserveError::CooldownActive => ApiError::CooldownActive,
            ReserveError::MealNotFound => ApiError::MealNotFound,
            ReserveError::SoldOut => ApiError::SoldOut,
            ReserveError::Storage(e) => ApiError::Storage(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            ApiError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::DuplicateEmail.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::MissingToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::InvalidToken.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::Forbidden("nope").status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(ApiError::MealNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::CooldownActive.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::SoldOut.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Storage(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn storage_message_is_generic() {
        let e = ApiError::Storage(anyhow::anyhow!("table users is on fire"));
        assert_eq!(e.to_string(), "internal server error");
    }
}
