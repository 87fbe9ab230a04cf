//! Persistence gateway — append-only libsql storage for submissions.

pub mod libsql_backend;
pub mod migrations;
pub mod traits;

pub use libsql_backend::LibSqlStore;
pub use traits::{ContactStore, NewSubmission, StoredSubmission, UnavailableStore};
