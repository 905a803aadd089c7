use std::sync::Arc;

use anyhow::anyhow;
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};

use plateful_db::Database;
use plateful_types::api::{Claims, LoginRequest, LoginResponse, RegisterRequest};
use plateful_types::models::Role;

use crate::error::ApiError;
use crate::views::user_view;

/// Bearer tokens are valid for a fixed 7 days; there is no renewal and no
/// revocation before expiry.
const TOKEN_TTL_DAYS: i64 = 7;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = req.name.trim().to_string();
    let email = req.email.trim().to_string();
    if name.is_empty() || email.is_empty() || req.password.is_empty() {
        return Err(ApiError::Validation(
            "name, email and password are required".into(),
        ));
    }

    // Role defaults to `user` unless the caller asked for `merchant`.
    let role = req.role.unwrap_or(Role::User);
    let password = req.password;

    // Argon2 hashing is deliberately slow; run it and the insert off the
    // async runtime.
    let db = state.clone();
    let row = tokio::task::spawn_blocking(move || {
        let hash = hash_password(&password)?;
        db.db
            .create_user(&name, &email, &hash, role.as_str(), Utc::now())
            .map_err(ApiError::from)
    })
    .await
    .map_err(ApiError::from_join)??;

    Ok((StatusCode::CREATED, Json(user_view(row)?)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let email = req.email.trim().to_string();
    let password = req.password;

    let row = tokio::task::spawn_blocking(move || {
        let row = db
            .db
            .find_user_by_email(&email)
            .map_err(ApiError::from)?
            .ok_or(ApiError::InvalidCredentials)?;

        verify_password(&row.password_hash, &password)?;
        Ok::<_, ApiError>(row)
    })
    .await
    .map_err(ApiError::from_join)??;

    let user = user_view(row)?;
    let token = create_token(&state.jwt_secret, user.id, &user.email, user.role)?;

    Ok(Json(LoginResponse { token, user }))
}

pub(crate) fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::Storage(anyhow!("password hashing failed: {}", e)))?;
    Ok(hash.to_string())
}

pub(crate) fn verify_password(stored_hash: &str, password: &str) -> Result<(), ApiError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| ApiError::Storage(anyhow!("corrupt password hash: {}", e)))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| ApiError::InvalidCredentials)
}

pub(crate) fn create_token(
    secret: &str,
    user_id: i64,
    email: &str,
    role: Role,
) -> Result<String, ApiError> {
    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        role,
        exp: (Utc::now() + chrono::Duration::days(TOKEN_TTL_DAYS)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Storage(anyhow!("token signing failed: {}", e)))
}
