use async_trait::async_trait;
use thiserror::Error;
use tokio_rusqlite::Connection;
use tracing::info;

use shared::types::ScanRecord;

use crate::database::create::create_tables;
use crate::database::scans::{self, NewScan};
use crate::database::users::{self, NewUser, UserAuth};

#[derive(Debug, Error)]
pub enum StoreError {
    /// A UNIQUE constraint rejected the write (duplicate email).
    #[error("record already exists")]
    Conflict,

    #[error("database error: {0}")]
    Database(String),
}

impl From<tokio_rusqlite::Error> for StoreError {
    fn from(err: tokio_rusqlite::Error) -> Self {
        match &err {
            tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(code, _))
                if code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                StoreError::Conflict
            }
            _ => StoreError::Database(err.to_string()),
        }
    }
}

/// Everything the gateway needs from persistence.
///
/// Components receive an `Arc<dyn CredentialStore>` at construction; every
/// method is a single read or a single-row write.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn create_user(&self, user: NewUser) -> Result<i64, StoreError>;

    async fn email_exists(&self, email: &str) -> Result<bool, StoreError>;

    async fn get_user_auth(&self, email: &str) -> Result<Option<UserAuth>, StoreError>;

    async fn insert_scan(&self, scan: NewScan) -> Result<i64, StoreError>;

    async fn list_scans(
        &self,
        user_id: i64,
        limit: Option<u32>,
    ) -> Result<Vec<ScanRecord>, StoreError>;

    async fn count_scans(&self, user_id: i64) -> Result<i64, StoreError>;

    async fn count_blocked(&self, user_id: i64) -> Result<i64, StoreError>;
}

/// SQLite-backed store.  `Connection` is a cheap handle to a dedicated
/// background thread, so clones share one database.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and ensure the schema exists.
    /// `":memory:"` gives a private in-memory database.
    pub async fn open(path: &str) -> Result<Self, StoreError> {
        let conn = if path == ":memory:" {
            Connection::open_in_memory().await?
        } else {
            Connection::open(path).await?
        };
        create_tables(&conn).await?;
        info!("Credential store opened at {}", path);
        Ok(Self { conn })
    }

    pub async fn in_memory() -> Result<Self, StoreError> {
        Self::open(":memory:").await
    }
}

#[async_trait]
impl CredentialStore for SqliteStore {
    async fn create_user(&self, user: NewUser) -> Result<i64, StoreError> {
        Ok(users::create_user(&self.conn, user).await?)
    }

    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        Ok(users::email_exists(&self.conn, email.to_string()).await?)
    }

    async fn get_user_auth(&self, email: &str) -> Result<Option<UserAuth>, StoreError> {
        Ok(users::get_user_auth(&self.conn, email.to_string()).await?)
    }

    async fn insert_scan(&self, scan: NewScan) -> Result<i64, StoreError> {
        Ok(scans::insert_scan(&self.conn, scan).await?)
    }

    async fn list_scans(
        &self,
        user_id: i64,
        limit: Option<u32>,
    ) -> Result<Vec<ScanRecord>, StoreError> {
        Ok(scans::list_scans(&self.conn, user_id, limit).await?)
    }

    async fn count_scans(&self, user_id: i64) -> Result<i64, StoreError> {
        Ok(scans::count_scans(&self.conn, user_id).await?)
    }

    async fn count_blocked(&self, user_id: i64) -> Result<i64, StoreError> {
        Ok(scans::count_blocked(&self.conn, user_id).await?)
    }
}
