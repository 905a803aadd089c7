use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use plateful_types::models::Role;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::views::reservation_view;

/// POST /meals/{id}/reserve — admit or reject a reservation.
///
/// The role check happens here at the boundary; the cooldown, existence and
/// availability checks plus the commit run atomically inside the storage
/// layer (`Database::reserve_meal`), so concurrent requests can neither
/// oversell a meal nor double-book a user.
pub async fn reserve_meal(
    State(state): State<AppState>,
    Path(meal_id): Path<i64>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_role(Role::User)?;

    let user_id = auth.0.sub;
    let db = state.clone();
    let row = tokio::task::spawn_blocking(move || db.db.reserve_meal(user_id, meal_id, Utc::now()))
        .await
        .map_err(ApiError::from_join)?
        .map_err(ApiError::from)?;

    Ok((StatusCode::CREATED, Json(reservation_view(row)?)))
}
