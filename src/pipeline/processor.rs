//! Submission pipeline — validate → screen → persist → notify.
//!
//! Each stage runs exactly once and reports definitively; there are no
//! retries. Validation and persistence failures abort the run, a
//! notification failure after a successful persist is a partial success,
//! and classifier trouble never surfaces at all (the fallback decorator
//! absorbs it).

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::classifier::Classifier;
use crate::notify::Notifier;
use crate::pipeline::types::{
    RejectReason, ScreeningPolicy, SubmissionOutcome, SubmissionRequest,
};
use crate::store::{ContactStore, NewSubmission};

/// Orchestrates one contact submission end to end.
///
/// All collaborators are injected at startup so the pipeline stays
/// testable with substitute implementations.
pub struct SubmissionPipeline {
    store: Arc<dyn ContactStore>,
    notifier: Arc<dyn Notifier>,
    classifier: Arc<dyn Classifier>,
    policy: ScreeningPolicy,
}

impl SubmissionPipeline {
    pub fn new(
        store: Arc<dyn ContactStore>,
        notifier: Arc<dyn Notifier>,
        classifier: Arc<dyn Classifier>,
        policy: ScreeningPolicy,
    ) -> Self {
        Self {
            store,
            notifier,
            classifier,
            policy,
        }
    }

    /// Run one submission through the full pipeline.
    pub async fn handle(&self, request: SubmissionRequest) -> SubmissionOutcome {
        // Stage 1: presence validation — no side effects on failure.
        if !request.is_complete() {
            info!("Submission rejected: missing required fields");
            return SubmissionOutcome::Rejected {
                reason: RejectReason::MissingFields,
            };
        }

        // Stage 2: disposable-email screening. The classifier is
        // time-bounded internally and never fails outward.
        if self.policy != ScreeningPolicy::Off {
            let verdict = self.classifier.classify(request.email.trim()).await;
            info!(
                is_disposable = verdict.is_disposable,
                degraded = verdict.is_degraded(),
                "Sender email screened"
            );
            if verdict.is_disposable && self.policy == ScreeningPolicy::Block {
                warn!(email = %request.email, "Submission blocked: disposable sender address");
                return SubmissionOutcome::Rejected {
                    reason: RejectReason::DisposableEmail,
                };
            }
        }

        // Stage 3: persist one atomic row.
        let submission = NewSubmission {
            name: request.name.trim().to_string(),
            email: request.email.trim().to_string(),
            message: request.message.trim().to_string(),
        };
        let id = match self.store.insert(&submission).await {
            Ok(id) => id,
            Err(e) => {
                error!(error = %e, "Failed to save submission");
                return SubmissionOutcome::SaveFailed;
            }
        };

        // Stage 4: notify the operator. Failure here is a partial
        // success — the row is already written and stays written.
        let (subject, body) = notification_email(&submission);
        match self.notifier.send(&subject, &body).await {
            Ok(()) => {
                info!(id = %id, "Submission delivered");
                SubmissionOutcome::Delivered { id }
            }
            Err(e) => {
                error!(id = %id, error = %e, "Submission saved but notification failed");
                SubmissionOutcome::NotifyFailed { id }
            }
        }
    }
}

/// Compose the operator notification for one submission.
pub fn notification_email(submission: &NewSubmission) -> (String, String) {
    let subject = format!("New message from {}", submission.name);
    let body = format!(
        "Name: {}\nEmail: {}\n\nMessage:\n{}",
        submission.name, submission.email, submission.message
    );
    (subject, body)
}
