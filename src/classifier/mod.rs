//! Disposable-email classification.
//!
//! The pipeline sees one capability: [`Classifier::classify`], which never
//! fails. Behind it, [`FallbackClassifier`] tries the remote detector
//! ([`RemoteClassifier`]) and degrades to the static domain denylist
//! ([`DenylistClassifier`]) on any error.

pub mod denylist;
pub mod fallback;
pub mod remote;

use async_trait::async_trait;

pub use denylist::DenylistClassifier;
pub use fallback::FallbackClassifier;
pub use remote::{ClassifierConfig, RemoteClassifier};

/// Confidence marker reported when classification degraded to the fallback.
pub const CONFIDENCE_UNAVAILABLE: &str = "N/A (fallback)";

/// Where a classification verdict came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationSource {
    /// The remote detector answered.
    RemoteClassifier,
    /// The remote detector was unreachable; verdict from the local denylist.
    LocalFallback,
}

/// Verdict on one email address. Constructed per request, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub is_disposable: bool,
    /// The remote classifier's confidence, carried opaquely, or the
    /// `"N/A (fallback)"` marker when degraded.
    pub confidence: serde_json::Value,
    pub source: ClassificationSource,
    /// Explanatory note, present only on degraded verdicts.
    pub note: Option<String>,
}

impl Classification {
    /// Verdict reported by the remote detector.
    pub fn remote(is_disposable: bool, confidence: serde_json::Value) -> Self {
        Self {
            is_disposable,
            confidence,
            source: ClassificationSource::RemoteClassifier,
            note: None,
        }
    }

    /// Degraded verdict from the local denylist.
    pub fn fallback(is_disposable: bool, note: impl Into<String>) -> Self {
        Self {
            is_disposable,
            confidence: serde_json::Value::String(CONFIDENCE_UNAVAILABLE.into()),
            source: ClassificationSource::LocalFallback,
            note: Some(note.into()),
        }
    }

    /// True when this verdict came from the fallback path.
    pub fn is_degraded(&self) -> bool {
        self.source == ClassificationSource::LocalFallback
    }
}

/// Capability interface the pipeline depends on.
///
/// `classify` never fails outward — implementations absorb transport
/// errors internally, so callers need no error branch for classifier
/// unavailability.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, email: &str) -> Classification;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_verdict_carries_confidence_verbatim() {
        let c = Classification::remote(true, serde_json::json!(0.97));
        assert!(c.is_disposable);
        assert_eq!(c.confidence, serde_json::json!(0.97));
        assert_eq!(c.source, ClassificationSource::RemoteClassifier);
        assert!(c.note.is_none());
        assert!(!c.is_degraded());
    }

    #[test]
    fn fallback_verdict_is_marked_degraded() {
        let c = Classification::fallback(false, "remote unreachable");
        assert!(!c.is_disposable);
        assert_eq!(c.confidence, serde_json::json!(CONFIDENCE_UNAVAILABLE));
        assert_eq!(c.source, ClassificationSource::LocalFallback);
        assert!(c.is_degraded());
        assert_eq!(c.note.as_deref(), Some("remote unreachable"));
    }
}
