/// Database row types — these map directly to SQLite rows.
/// Distinct from the plateful-types API models to keep the DB layer independent.
/// Timestamps are RFC 3339 UTC text; the API layer parses them.

#[derive(Debug)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: String,
}

pub struct MealRow {
    pub id: i64,
    pub merchant_id: i64,
    pub merchant_name: String,
    pub title: String,
    pub description: String,
    pub portions_available: i64,
    pub pickup_time: String,
    pub created_at: String,
}

#[derive(Debug)]
pub struct ReservationRow {
    pub id: i64,
    pub user_id: i64,
    pub meal_id: i64,
    pub created_at: String,
}
