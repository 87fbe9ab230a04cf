//! Shared types for the submission pipeline.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ── Inbound submission ──────────────────────────────────────────────

/// One contact-form payload as received over the API.
///
/// Missing fields deserialize to empty strings so that validation owns
/// the "all fields are required" response instead of the JSON extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmissionRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

impl SubmissionRequest {
    /// True when every required field is present and non-blank.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.email.trim().is_empty()
            && !self.message.trim().is_empty()
    }
}

// ── Screening policy ────────────────────────────────────────────────

/// Where disposable-email screening bites in the pipeline.
///
/// `Advisory` classifies and logs but never blocks; `Block` rejects
/// disposable senders before any side effect; `Off` skips the classifier
/// call entirely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScreeningPolicy {
    Off,
    #[default]
    Advisory,
    Block,
}

impl FromStr for ScreeningPolicy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "advisory" => Ok(Self::Advisory),
            "block" => Ok(Self::Block),
            _ => Err(()),
        }
    }
}

// ── Outcome ─────────────────────────────────────────────────────────

/// Why a submission was rejected before any side effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// One or more required fields missing or blank.
    MissingFields,
    /// Sender address judged disposable under the `Block` policy.
    DisposableEmail,
}

/// Result of one pipeline run. Each variant maps to a fixed user-facing
/// message and an HTTP status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Stored and the operator was notified.
    Delivered { id: String },
    /// Invalid request — nothing was persisted.
    Rejected { reason: RejectReason },
    /// The row write failed — notification was never attempted.
    SaveFailed,
    /// Stored, but the notification email could not be sent.
    NotifyFailed { id: String },
}

impl SubmissionOutcome {
    /// The message returned to the browser.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Delivered { .. } => "Message sent and email delivered successfully!",
            Self::Rejected {
                reason: RejectReason::MissingFields,
            } => "All fields are required.",
            Self::Rejected {
                reason: RejectReason::DisposableEmail,
            } => "Please use a valid, non-disposable email.",
            Self::SaveFailed => "Failed to save the message.",
            Self::NotifyFailed { .. } => "Message saved, but failed to send email notification.",
        }
    }

    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Delivered { .. } => "delivered",
            Self::Rejected { .. } => "rejected",
            Self::SaveFailed => "save_failed",
            Self::NotifyFailed { .. } => "notify_failed",
        }
    }
}
