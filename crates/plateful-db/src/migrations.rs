use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

/// Idempotent schema creation — safe to re-run on an existing database.
pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            name            TEXT NOT NULL,
            email           TEXT NOT NULL UNIQUE,
            password_hash   TEXT NOT NULL,
            role            TEXT NOT NULL CHECK (role IN ('user', 'merchant')),
            created_at      TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS meals (
            id                  INTEGER PRIMARY KEY AUTOINCREMENT,
            merchant_id         INTEGER NOT NULL REFERENCES users(id),
            title               TEXT NOT NULL,
            description         TEXT NOT NULL DEFAULT '',
            portions_available  INTEGER NOT NULL CHECK (portions_available >= 0),
            pickup_time         TEXT NOT NULL,
            created_at          TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_meals_created
            ON meals(created_at);

        CREATE TABLE IF NOT EXISTS reservations (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id     INTEGER NOT NULL REFERENCES users(id),
            meal_id     INTEGER NOT NULL REFERENCES meals(id),
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_reservations_user
            ON reservations(user_id, created_at);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
