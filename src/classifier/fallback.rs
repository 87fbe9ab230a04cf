//! Fallback decorator — remote classifier with denylist degradation.

use async_trait::async_trait;
use tracing::warn;

use crate::classifier::denylist::DenylistClassifier;
use crate::classifier::remote::RemoteClassifier;
use crate::classifier::{Classification, Classifier};

/// Note attached to degraded verdicts.
const FALLBACK_NOTE: &str = "Remote classifier unavailable; result based on local denylist.";

/// Total classifier: remote first, static denylist on any failure.
///
/// This is the only [`Classifier`] the rest of the service sees. Timeout,
/// non-2xx, network, and decode errors all degrade here — callers never
/// observe a classifier failure.
pub struct FallbackClassifier {
    remote: RemoteClassifier,
    denylist: DenylistClassifier,
}

impl FallbackClassifier {
    pub fn new(remote: RemoteClassifier, denylist: DenylistClassifier) -> Self {
        Self { remote, denylist }
    }
}

#[async_trait]
impl Classifier for FallbackClassifier {
    async fn classify(&self, email: &str) -> Classification {
        match self.remote.check(email).await {
            Ok(verdict) => verdict,
            Err(e) => {
                warn!(error = %e, "Remote classifier failed, degrading to denylist");
                Classification::fallback(self.denylist.is_disposable(email), FALLBACK_NOTE)
            }
        }
    }
}
