//! libsql backend — async `ContactStore` implementation.
//!
//! Supports local file and in-memory databases. The connection is opened
//! once and reused for the process lifetime; `libsql::Connection` is
//! `Send + Sync` and safe for concurrent async use.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::{Connection, Database, params};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::StoreError;
use crate::store::migrations;
use crate::store::traits::{ContactStore, NewSubmission, StoredSubmission};

/// Column list shared by all `SELECT`s over `contacts`.
const CONTACT_COLUMNS: &str = "id, name, email, message, created_at";

/// libsql store for contact submissions.
pub struct LibSqlStore {
    #[allow(dead_code)]
    db: Arc<Database>,
    conn: Connection,
}

impl LibSqlStore {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Connection(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| StoreError::Connection(format!("Failed to open database: {e}")))?;

        let conn = db
            .connect()
            .map_err(|e| StoreError::Connection(format!("Failed to create connection: {e}")))?;

        let store = Self {
            db: Arc::new(db),
            conn,
        };
        migrations::run_migrations(&store.conn).await?;
        info!(path = %path.display(), "Database opened");
        Ok(store)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, StoreError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| StoreError::Connection(format!("Failed to create in-memory database: {e}")))?;

        let conn = db
            .connect()
            .map_err(|e| StoreError::Connection(format!("Failed to create connection: {e}")))?;

        let store = Self {
            db: Arc::new(db),
            conn,
        };
        migrations::run_migrations(&store.conn).await?;
        Ok(store)
    }

    fn conn(&self) -> &Connection {
        &self.conn
    }
}

/// Parse an RFC 3339 datetime string written by this backend.
fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Map a libsql row to a `StoredSubmission`. Column order matches
/// `CONTACT_COLUMNS`.
fn row_to_submission(row: &libsql::Row) -> Result<StoredSubmission, libsql::Error> {
    let id: String = row.get(0)?;
    let name: String = row.get(1)?;
    let email: String = row.get(2)?;
    let message: String = row.get(3)?;
    let created_str: String = row.get(4)?;

    Ok(StoredSubmission {
        id,
        name,
        email,
        message,
        created_at: parse_datetime(&created_str),
    })
}

#[async_trait]
impl ContactStore for LibSqlStore {
    async fn insert(&self, submission: &NewSubmission) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        self.conn()
            .execute(
                "INSERT INTO contacts (id, name, email, message, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    id.clone(),
                    submission.name.as_str(),
                    submission.email.as_str(),
                    submission.message.as_str(),
                    now,
                ],
            )
            .await
            .map_err(|e| StoreError::Query(format!("insert: {e}")))?;

        debug!(id = %id, "Submission inserted into DB");
        Ok(id)
    }

    async fn get(&self, id: &str) -> Result<Option<StoredSubmission>, StoreError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = ?1"),
                params![id],
            )
            .await
            .map_err(|e| StoreError::Query(format!("get: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let submission = row_to_submission(&row)
                    .map_err(|e| StoreError::Query(format!("row parse: {e}")))?;
                Ok(Some(submission))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(StoreError::Query(format!("get: {e}"))),
        }
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let mut rows = self
            .conn()
            .query("SELECT COUNT(*) FROM contacts", ())
            .await
            .map_err(|e| StoreError::Query(format!("count: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let count: i64 = row
                    .get(0)
                    .map_err(|e| StoreError::Query(format!("count parse: {e}")))?;
                Ok(count.max(0) as u64)
            }
            Ok(None) => Ok(0),
            Err(e) => Err(StoreError::Query(format!("count: {e}"))),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.conn()
            .query("SELECT 1", ())
            .await
            .map_err(|e| StoreError::Query(format!("ping: {e}")))?;
        Ok(())
    }
}
