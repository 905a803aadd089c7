use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Role;

// -- JWT Claims --

/// JWT claims attached to authenticated requests. Canonical definition lives
/// here in plateful-types so the REST middleware and handlers share one shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id (surrogate key in the users table).
    pub sub: i64,
    pub email: String,
    pub role: Role,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Defaults to `user` when omitted.
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Public user view — never carries the password hash.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

// -- Meals --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateMealRequest {
    pub title: String,
    /// Defaults to the empty string when omitted.
    pub description: Option<String>,
    pub portions_available: i64,
    pub pickup_time: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MealResponse {
    pub id: i64,
    pub merchant_id: i64,
    pub merchant_name: String,
    pub title: String,
    pub description: String,
    pub portions_available: i64,
    pub pickup_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

// -- Reservations --

#[derive(Debug, Serialize, Deserialize)]
pub struct ReservationResponse {
    pub id: i64,
    pub user_id: i64,
    pub meal_id: i64,
    pub created_at: DateTime<Utc>,
}
