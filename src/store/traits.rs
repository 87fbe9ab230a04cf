//! `ContactStore` trait — async interface of the persistence gateway.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StoreError;

/// A contact-form submission about to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// A persisted contact-form submission.
///
/// Rows are immutable once written — the service never updates or deletes
/// them, and there is no uniqueness constraint beyond the primary key.
#[derive(Debug, Clone)]
pub struct StoredSubmission {
    /// Store-assigned UUID, never reused.
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    /// Set by the store at insert time.
    pub created_at: DateTime<Utc>,
}

/// Append-only store for contact submissions.
///
/// The pipeline only ever calls `insert`; `get`, `count`, and `ping` exist
/// for the health endpoint and tests.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Insert one submission as a single atomic row write.
    /// Returns the store-assigned id.
    async fn insert(&self, submission: &NewSubmission) -> Result<String, StoreError>;

    /// Fetch a submission by id.
    async fn get(&self, id: &str) -> Result<Option<StoredSubmission>, StoreError>;

    /// Number of persisted submissions.
    async fn count(&self) -> Result<u64, StoreError>;

    /// Cheap liveness probe against the underlying store.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Null-object store used when the database could not be opened at startup.
///
/// Keeps the process serving traffic in degraded mode: every insert fails
/// at the persist stage and the health endpoint reports it.
pub struct UnavailableStore;

#[async_trait]
impl ContactStore for UnavailableStore {
    async fn insert(&self, _submission: &NewSubmission) -> Result<String, StoreError> {
        Err(StoreError::Unavailable)
    }

    async fn get(&self, _id: &str) -> Result<Option<StoredSubmission>, StoreError> {
        Err(StoreError::Unavailable)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Err(StoreError::Unavailable)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::Unavailable)
    }
}
