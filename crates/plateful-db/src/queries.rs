use crate::Database;
use crate::models::{MealRow, UserRow};
use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CreateUserError {
    #[error("email already registered")]
    DuplicateEmail,
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl Database {
    // -- Users --

    pub fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: &str,
        now: DateTime<Utc>,
    ) -> Result<UserRow, CreateUserError> {
        let created_at = now.to_rfc3339();

        let id = self.with_conn_mut(|conn| {
            let inserted = conn.execute(
                "INSERT INTO users (name, email, password_hash, role, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![name, email, password_hash, role, created_at],
            );
            match inserted {
                Ok(_) => Ok(Ok(conn.last_insert_rowid())),
                // Only a UNIQUE violation is a duplicate email; other
                // constraint failures (CHECK, foreign key) are storage faults.
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
                {
                    Ok(Err(CreateUserError::DuplicateEmail))
                }
                Err(e) => Err(e.into()),
            }
        })??;

        Ok(UserRow {
            id,
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            role: role.to_string(),
            created_at,
        })
    }

    pub fn find_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_email(conn, email))
    }

    // -- Meals --

    pub fn create_meal(
        &self,
        merchant_id: i64,
        title: &str,
        description: &str,
        portions_available: i64,
        pickup_time: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<MealRow> {
        let created_at = now.to_rfc3339();
        let pickup = pickup_time.to_rfc3339();

        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO meals (merchant_id, title, description, portions_available, pickup_time, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![merchant_id, title, description, portions_available, pickup, created_at],
            )?;
            let id = conn.last_insert_rowid();

            let merchant_name: String = conn.query_row(
                "SELECT name FROM users WHERE id = ?1",
                [merchant_id],
                |row| row.get(0),
            )?;

            Ok(MealRow {
                id,
                merchant_id,
                merchant_name,
                title: title.to_string(),
                description: description.to_string(),
                portions_available,
                pickup_time: pickup,
                created_at,
            })
        })
    }

    /// All meals joined with their merchant's name, newest first.
    pub fn list_meals(&self) -> Result<Vec<MealRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT m.id, m.merchant_id, u.name, m.title, m.description,
                        m.portions_available, m.pickup_time, m.created_at
                 FROM meals m
                 JOIN users u ON m.merchant_id = u.id
                 ORDER BY m.created_at DESC, m.id DESC",
            )?;

            let rows = stmt
                .query_map([], meal_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    pub fn get_meal(&self, id: i64) -> Result<Option<MealRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT m.id, m.merchant_id, u.name, m.title, m.description,
                        m.portions_available, m.pickup_time, m.created_at
                 FROM meals m
                 JOIN users u ON m.merchant_id = u.id
                 WHERE m.id = ?1",
            )?;

            let row = stmt.query_row([id], meal_from_row).optional()?;
            Ok(row)
        })
    }
}

fn query_user_by_email(conn: &Connection, email: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, email, password_hash, role, created_at FROM users WHERE email = ?1",
    )?;

    let row = stmt
        .query_row([email], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
                password_hash: row.get(3)?,
                role: row.get(4)?,
                created_at: row.get(5)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn meal_from_row(row: &rusqlite::Row<'_>) -> std::result::Result<MealRow, rusqlite::Error> {
    Ok(MealRow {
        id: row.get(0)?,
        merchant_id: row.get(1)?,
        merchant_name: row.get(2)?,
        title: row.get(3)?,
        description: row.get(4)?,
        portions_available: row.get(5)?,
        pickup_time: row.get(6)?,
        created_at: row.get(7)?,
    })
}

/// Extension trait for optional query results
pub(crate) trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;
    use chrono::Duration;
    use std::path::PathBuf;

    fn temp_db_path() -> PathBuf {
        std::env::temp_dir().join(format!("plateful-test-{}.sqlite", uuid::Uuid::new_v4()))
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let path = temp_db_path();
        let db = Database::open(&path).unwrap();

        db.create_user("Ann", "ann@example.com", "hash-a", "user", Utc::now())
            .unwrap();
        let err = db
            .create_user("Ann Again", "ann@example.com", "hash-b", "user", Utc::now())
            .unwrap_err();
        assert!(matches!(err, CreateUserError::DuplicateEmail));
    }

    #[test]
    fn non_unique_constraint_failures_are_storage_faults() {
        let path = temp_db_path();
        let db = Database::open(&path).unwrap();

        // Violates CHECK(role IN ('user', 'merchant')), not the email UNIQUE
        // index, so it must not be reported as a duplicate registration.
        let err = db
            .create_user("Ann", "ann@example.com", "hash-a", "admin", Utc::now())
            .unwrap_err();
        assert!(matches!(err, CreateUserError::Storage(_)));
    }

    #[test]
    fn find_user_by_email_roundtrip() {
        let path = temp_db_path();
        let db = Database::open(&path).unwrap();

        let created = db
            .create_user("Ann", "ann@example.com", "hash-a", "merchant", Utc::now())
            .unwrap();

        let found = db.find_user_by_email("ann@example.com").unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.role, "merchant");
        assert_eq!(found.password_hash, "hash-a");

        assert!(db.find_user_by_email("nobody@example.com").unwrap().is_none());
    }

    #[test]
    fn schema_creation_is_idempotent() {
        let path = temp_db_path();
        {
            let db = Database::open(&path).unwrap();
            db.create_user("Ann", "ann@example.com", "hash-a", "user", Utc::now())
                .unwrap();
        }

        // Re-opening re-runs migrations against the existing file.
        let db = Database::open(&path).unwrap();
        assert!(db.find_user_by_email("ann@example.com").unwrap().is_some());
    }

    #[test]
    fn list_meals_newest_first_with_merchant_name() {
        let path = temp_db_path();
        let db = Database::open(&path).unwrap();
        let merchant = db
            .create_user("Corner Bakery", "bakery@example.com", "hash", "merchant", Utc::now())
            .unwrap()
            .id;

        let base = Utc::now();
        let pickup = base + Duration::hours(6);
        db.create_meal(merchant, "Day-old bread", "", 4, pickup, base)
            .unwrap();
        db.create_meal(merchant, "Soup of the day", "Leek and potato", 2, pickup, base + Duration::minutes(5))
            .unwrap();

        let meals = db.list_meals().unwrap();
        assert_eq!(meals.len(), 2);
        assert_eq!(meals[0].title, "Soup of the day");
        assert_eq!(meals[1].title, "Day-old bread");
        assert!(meals.iter().all(|m| m.merchant_name == "Corner Bakery"));
    }

    #[test]
    fn get_meal_returns_none_for_unknown_id() {
        let path = temp_db_path();
        let db = Database::open(&path).unwrap();
        assert!(db.get_meal(123).unwrap().is_none());
    }
}
