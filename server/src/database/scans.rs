use tokio_rusqlite::{Connection, Result, params};

use shared::types::ScanRecord;

/// Data required to INSERT a scan row.  `id` is assigned by SQLite.
#[derive(Debug, Clone)]
pub struct NewScan {
    pub user_id: i64,
    pub url: String,
    pub is_spoof: bool,
    pub confidence_score: f64,
    pub threat_level: String,
    pub timestamp: i64,
}

/// Append one scan record.  Single-row write, no transaction needed.
pub async fn insert_scan(conn: &Connection, scan: NewScan) -> Result<i64> {
    conn.call(move |conn: &mut rusqlite::Connection| {
        conn.execute(
            "INSERT INTO scans (user_id, url, is_spoof, confidence_score, threat_level, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                scan.user_id,
                scan.url,
                scan.is_spoof as i64,
                scan.confidence_score,
                scan.threat_level,
                scan.timestamp,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    })
    .await
}

/// Scans owned by `user_id`, newest first.  `limit = None` returns all.
pub async fn list_scans(
    conn: &Connection,
    user_id: i64,
    limit: Option<u32>,
) -> Result<Vec<ScanRecord>> {
    // SQLite treats a negative LIMIT as "no limit".
    let limit = limit.map(i64::from).unwrap_or(-1);

    conn.call(move |conn: &mut rusqlite::Connection| {
        let mut stmt = conn.prepare(
            "SELECT id, user_id, url, is_spoof, confidence_score, threat_level, timestamp
             FROM   scans
             WHERE  user_id = ?1
             ORDER  BY timestamp DESC, id DESC
             LIMIT  ?2",
        )?;

        let scans = stmt
            .query_map(params![user_id, limit], |row| {
                Ok(ScanRecord {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    url: row.get(2)?,
                    is_spoof: row.get::<_, i64>(3)? != 0,
                    confidence_score: row.get(4)?,
                    threat_level: row.get(5)?,
                    timestamp: row.get(6)?,
                })
            })?
            .collect::<std::result::Result<Vec<ScanRecord>, rusqlite::Error>>()?;

        Ok(scans)
    })
    .await
}

/// Number of scans owned by `user_id`.
pub async fn count_scans(conn: &Connection, user_id: i64) -> Result<i64> {
    conn.call(move |conn: &mut rusqlite::Connection| {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM scans WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    })
    .await
}

/// Number of scans owned by `user_id` that were flagged as spoofs.
pub async fn count_blocked(conn: &Connection, user_id: i64) -> Result<i64> {
    conn.call(move |conn: &mut rusqlite::Connection| {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM scans WHERE user_id = ?1 AND is_spoof = 1",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    })
    .await
}
