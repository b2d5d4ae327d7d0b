use tokio_rusqlite::{Connection, Result};
use tracing::info;

/// Current schema version, stored in `PRAGMA user_version`.
const SCHEMA_VERSION: u32 = 1;

/// Initialize the database schema.  Safe to run against an existing file.
pub async fn create_tables(conn: &Connection) -> Result<()> {
    conn.call(|conn: &mut rusqlite::Connection| {
        conn.pragma_update(None, "foreign_keys", "ON")?;

        // Users: email is stored normalized (trimmed, lower-cased) so the
        // UNIQUE constraint is effectively case-insensitive.
        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id            INTEGER PRIMARY KEY AUTOINCREMENT,
                email         TEXT    NOT NULL UNIQUE,
                password_hash TEXT    NOT NULL,
                created_at    INTEGER NOT NULL
            )",
            [],
        )?;

        // Scans: append-only audit trail, one row per completed analysis.
        conn.execute(
            "CREATE TABLE IF NOT EXISTS scans (
                id               INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id          INTEGER NOT NULL,
                url              TEXT    NOT NULL,
                is_spoof         INTEGER NOT NULL,
                confidence_score REAL    NOT NULL,
                threat_level     TEXT    NOT NULL,
                timestamp        INTEGER NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(id)
            )",
            [],
        )?;

        // --- Indexes --------------------------------------------------------
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_users_email       ON users(email)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_scans_user_time   ON scans(user_id, timestamp DESC)",
            [],
        )?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;

        Ok(())
    })
    .await?;

    info!("Database schema ready (version {})", SCHEMA_VERSION);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_tables_is_idempotent() {
        let conn = Connection::open_in_memory().await.unwrap();
        create_tables(&conn).await.unwrap();
        create_tables(&conn).await.unwrap();

        let version: u32 = conn
            .call(|conn| Ok(conn.query_row("PRAGMA user_version", [], |r| r.get(0))?))
            .await
            .unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }
}
