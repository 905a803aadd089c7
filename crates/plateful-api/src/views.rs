use anyhow::anyhow;
use chrono::{DateTime, Utc};

use plateful_db::models::{MealRow, ReservationRow, UserRow};
use plateful_types::api::{MealResponse, ReservationResponse, UserResponse};
use plateful_types::models::Role;

use crate::error::ApiError;

/// Row-to-response conversions. Rows carry RFC 3339 text timestamps and
/// lowercase role strings; anything that fails to parse here is corrupt
/// storage and surfaces as a 500.

pub(crate) fn user_view(row: UserRow) -> Result<UserResponse, ApiError> {
    let role: Role = row
        .role
        .parse()
        .map_err(|e| ApiError::Storage(anyhow!("corrupt role on user {}: {}", row.id, e)))?;

    Ok(UserResponse {
        id: row.id,
        name: row.name,
        email: row.email,
        role,
        created_at: parse_timestamp(&row.created_at)?,
    })
}

pub(crate) fn meal_view(row: MealRow) -> Result<MealResponse, ApiError> {
    Ok(MealResponse {
        id: row.id,
        merchant_id: row.merchant_id,
        merchant_name: row.merchant_name,
        title: row.title,
        description: row.description,
        portions_available: row.portions_available,
        pickup_time: parse_timestamp(&row.pickup_time)?,
        created_at: parse_timestamp(&row.created_at)?,
    })
}

pub(crate) fn reservation_view(row: ReservationRow) -> Result<ReservationResponse, ApiError> {
    Ok(ReservationResponse {
        id: row.id,
        user_id: row.user_id,
        meal_id: row.meal_id,
        created_at: parse_timestamp(&row.created_at)?,
    })
}

fn parse_timestamp(ts: &str) -> Result<DateTime<Utc>, ApiError> {
    DateTime::parse_from_rfc3339(ts)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ApiError::Storage(anyhow!("corrupt timestamp '{}': {}", ts, e)))
}
