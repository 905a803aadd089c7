use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use jsonwebtoken::{DecodingKey, Validation, decode};

use plateful_types::api::Claims;
use plateful_types::models::Role;

use crate::auth::AppState;
use crate::error::ApiError;

/// Authenticated identity, extracted and validated from the
/// `Authorization: Bearer <token>` header. Use as a handler parameter to
/// require authentication; call [`AuthUser::require_role`] for role-gated
/// endpoints.
pub struct AuthUser(pub Claims);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::MissingToken)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::MissingToken)?;

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| ApiError::InvalidToken)?;

        Ok(AuthUser(token_data.claims))
    }
}

impl AuthUser {
    pub fn require_role(&self, role: Role) -> Result<(), ApiError> {
        if self.0.role == role {
            Ok(())
        } else {
            match role {
                Role::User => Err(ApiError::Forbidden("only users may reserve meals")),
                Role::Merchant => Err(ApiError::Forbidden("only merchants may publish meals")),
            }
        }
    }
}
