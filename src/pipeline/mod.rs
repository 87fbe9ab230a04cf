//! Contact-submission pipeline.
//!
//! Every inbound submission flows through:
//! 1. presence validation (no side effects on failure)
//! 2. disposable-email screening (policy-controlled, never blocks on
//!    classifier trouble)
//! 3. one atomic row insert
//! 4. operator notification (failure after a persist is a partial success)

pub mod processor;
pub mod types;

pub use processor::{SubmissionPipeline, notification_email};
pub use types::{RejectReason, ScreeningPolicy, SubmissionOutcome, SubmissionRequest};
