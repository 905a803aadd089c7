use crate::Database;
use crate::models::ReservationRow;
use crate::queries::OptionalExt;
use anyhow::{Result, anyhow};
use chrono::{DateTime, Duration, Utc};
use rusqlite::TransactionBehavior;
use thiserror::Error;

/// A user may hold at most one reservation per rolling window of this length.
pub fn cooldown_window() -> Duration {
    Duration::days(3)
}

#[derive(Debug, Error)]
pub enum ReserveError {
    #[error("a reservation was made within the last 3 days")]
    CooldownActive,
    #[error("meal not found")]
    MealNotFound,
    #[error("no portions left")]
    SoldOut,
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl Database {
    /// Admit or reject a reservation and, if admitted, apply its effects
    /// exactly once: insert the reservation row and decrement the meal's
    /// portion count, as one unit.
    ///
    /// The whole check-and-commit runs inside a BEGIN IMMEDIATE transaction,
    /// which takes the SQLite write lock up front. The cooldown read, the
    /// conditional decrement and the insert are therefore serialized against
    /// every other writer — including other server processes sharing the
    /// database file. Any failure rolls back both effects.
    pub fn reserve_meal(
        &self,
        user_id: i64,
        meal_id: i64,
        now: DateTime<Utc>,
    ) -> Result<ReservationRow, ReserveError> {
        let outcome = self.with_conn_mut(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            // Only the single most recent reservation matters for the cooldown.
            let latest: Option<String> = tx
                .query_row(
                    "SELECT created_at FROM reservations
                     WHERE user_id = ?1
                     ORDER BY created_at DESC, id DESC
                     LIMIT 1",
                    [user_id],
                    |row| row.get(0),
                )
                .optional()?;

            if let Some(ts) = latest {
                let last = parse_timestamp(&ts)?;
                // Exclusive boundary: a reservation exactly three days old no
                // longer blocks.
                if now - last < cooldown_window() {
                    return Ok(Err(ReserveError::CooldownActive));
                }
            }

            let meal_exists: Option<i64> = tx
                .query_row("SELECT id FROM meals WHERE id = ?1", [meal_id], |row| {
                    row.get(0)
                })
                .optional()?;
            if meal_exists.is_none() {
                return Ok(Err(ReserveError::MealNotFound));
            }

            // Atomic conditional decrement: the affected-row count decides
            // availability, so two contenders can never both take the last
            // portion.
            let decremented = tx.execute(
                "UPDATE meals
                 SET portions_available = portions_available - 1
                 WHERE id = ?1 AND portions_available > 0",
                [meal_id],
            )?;
            if decremented == 0 {
                return Ok(Err(ReserveError::SoldOut));
            }

            let created_at = now.to_rfc3339();
            tx.execute(
                "INSERT INTO reservations (user_id, meal_id, created_at) VALUES (?1, ?2, ?3)",
                rusqlite::params![user_id, meal_id, created_at],
            )?;
            let id = tx.last_insert_rowid();

            tx.commit()?;

            Ok(Ok(ReservationRow {
                id,
                user_id,
                meal_id,
                created_at,
            }))
        })?;

        outcome
    }
}

fn parse_timestamp(ts: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(ts)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| anyhow!("Corrupt reservation timestamp '{}': {}", ts, e))
}
