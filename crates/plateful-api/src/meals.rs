use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;

use plateful_types::api::{CreateMealRequest, MealResponse};
use plateful_types::models::Role;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::views::meal_view;

pub async fn create_meal(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateMealRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_role(Role::Merchant)?;

    let title = req.title.trim().to_string();
    if title.is_empty() {
        return Err(ApiError::Validation("title is required".into()));
    }
    if req.portions_available < 0 {
        return Err(ApiError::Validation(
            "portions_available must not be negative".into(),
        ));
    }

    let description = req.description.unwrap_or_default();
    let merchant_id = auth.0.sub;

    let db = state.clone();
    let row = tokio::task::spawn_blocking(move || {
        db.db.create_meal(
            merchant_id,
            &title,
            &description,
            req.portions_available,
            req.pickup_time,
            Utc::now(),
        )
    })
    .await
    .map_err(ApiError::from_join)??;

    Ok((StatusCode::CREATED, Json(meal_view(row)?)))
}

/// Public listing: newest first, each meal annotated with its merchant's name.
pub async fn list_meals(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.list_meals())
        .await
        .map_err(ApiError::from_join)??;

    let meals: Vec<MealResponse> = rows
        .into_iter()
        .map(meal_view)
        .collect::<Result<_, _>>()?;

    Ok(Json(meals))
}
