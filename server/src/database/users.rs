use tokio_rusqlite::{Connection, OptionalExtension, Result, params};
use tracing::info;

use crate::database::utils::get_timestamp;

#[derive(Debug, Clone)]
pub struct NewUser {
    /// Already normalized by the caller.
    pub email: String,
    pub password_hash: String,
}

/// Minimal data needed to verify a user's credentials.
#[derive(Debug, Clone)]
pub struct UserAuth {
    pub id: i64,
    pub password_hash: String,
}

/// Insert a new user and return its id.
///
/// A duplicate email surfaces as a `ConstraintViolation` from SQLite; the
/// store layer maps that to a conflict.
pub async fn create_user(conn: &Connection, new_user: NewUser) -> Result<i64> {
    let created_at = get_timestamp();

    conn.call(move |conn: &mut rusqlite::Connection| {
        conn.execute(
            "INSERT INTO users (email, password_hash, created_at)
             VALUES (?1, ?2, ?3)",
            params![new_user.email, new_user.password_hash, created_at],
        )?;
        let id = conn.last_insert_rowid();
        info!("New user made! id={}", id);

        Ok(id)
    })
    .await
}

/// Check if email exists
pub async fn email_exists(conn: &Connection, email: String) -> Result<bool> {
    conn.call(move |conn: &mut rusqlite::Connection| {
        let mut stmt = conn.prepare("SELECT COUNT(*) FROM users WHERE email = ?1")?;
        let count: i64 = stmt.query_row(params![email], |row: &rusqlite::Row| row.get(0))?;
        Ok(count > 0)
    })
    .await
}

/// Get user authentication data by (normalized) email
pub async fn get_user_auth(conn: &Connection, email: String) -> Result<Option<UserAuth>> {
    conn.call(move |conn: &mut rusqlite::Connection| {
        let mut stmt =
            conn.prepare("SELECT id, password_hash FROM users WHERE email = ?1")?;

        let user = stmt
            .query_row(params![email], |row: &rusqlite::Row| {
                Ok(UserAuth {
                    id: row.get(0)?,
                    password_hash: row.get(1)?,
                })
            })
            .optional()?;

        Ok(user)
    })
    .await
}
