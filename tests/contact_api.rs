//! Integration tests for the contact JSON API.
//!
//! Each test spins up the real Axum router on a random port and exercises
//! the HTTP contract end to end, with an in-memory store and substitute
//! notifier/classifier where the test calls for it.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{Json, Router, routing::post};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::time::timeout;

use portfolio_contact::classifier::{
    CONFIDENCE_UNAVAILABLE, Classifier, ClassifierConfig, DenylistClassifier, FallbackClassifier,
    RemoteClassifier,
};
use portfolio_contact::error::NotifyError;
use portfolio_contact::http::{AppState, api_routes};
use portfolio_contact::notify::Notifier;
use portfolio_contact::pipeline::{ScreeningPolicy, SubmissionPipeline};
use portfolio_contact::store::{ContactStore, LibSqlStore, UnavailableStore};

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Notifier stub — records sends, optionally failing every one.
#[derive(Default)]
struct StubNotifier {
    fail: bool,
    sent: Mutex<Vec<(String, String)>>,
}

impl StubNotifier {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Notifier for StubNotifier {
    async fn send(&self, subject: &str, body: &str) -> Result<(), NotifyError> {
        if self.fail {
            return Err(NotifyError::Transport("stub transport down".into()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((subject.to_string(), body.to_string()));
        Ok(())
    }
}

/// Classifier whose remote leg can never connect — every verdict degrades
/// to the local denylist.
fn offline_classifier() -> Arc<dyn Classifier> {
    let config = ClassifierConfig {
        url: "http://127.0.0.1:1/api/check".into(),
        timeout: Duration::from_secs(1),
    };
    Arc::new(FallbackClassifier::new(
        RemoteClassifier::new(&config).unwrap(),
        DenylistClassifier::new(),
    ))
}

/// Classifier pointed at a live stub detector answering on `port`.
fn remote_classifier(port: u16) -> Arc<dyn Classifier> {
    let config = ClassifierConfig {
        url: format!("http://127.0.0.1:{port}/api/check"),
        timeout: Duration::from_secs(2),
    };
    Arc::new(FallbackClassifier::new(
        RemoteClassifier::new(&config).unwrap(),
        DenylistClassifier::new(),
    ))
}

/// Start the API on a random port with the given collaborators.
async fn start_server(
    store: Arc<dyn ContactStore>,
    notifier: Arc<dyn Notifier>,
    classifier: Arc<dyn Classifier>,
    policy: ScreeningPolicy,
) -> u16 {
    let pipeline = Arc::new(SubmissionPipeline::new(
        Arc::clone(&store),
        notifier,
        Arc::clone(&classifier),
        policy,
    ));
    let app = api_routes(AppState {
        pipeline,
        classifier,
        store,
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give the server a moment to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;

    port
}

/// Start a stub remote detector that always answers with a fixed verdict.
async fn start_stub_detector(is_disposable: bool, confidence: f64) -> u16 {
    let app = Router::new().route(
        "/api/check",
        post(move |Json(_body): Json<Value>| async move {
            Json(serde_json::json!({
                "is_disposable": is_disposable,
                "confidence": confidence,
            }))
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    port
}

fn submission_body() -> Value {
    serde_json::json!({
        "name": "Alice",
        "email": "alice@example.com",
        "message": "Hi, I'd love to chat about a project.",
    })
}

async fn post_json(port: u16, path: &str, body: &Value) -> (u16, Value) {
    let response = reqwest::Client::new()
        .post(format!("http://127.0.0.1:{port}{path}"))
        .json(body)
        .send()
        .await
        .expect("request failed");
    let status = response.status().as_u16();
    let json: Value = response.json().await.expect("invalid JSON response");
    (status, json)
}

// ── /api/contact ────────────────────────────────────────────────────

#[tokio::test]
async fn contact_happy_path_persists_and_notifies() {
    timeout(TEST_TIMEOUT, async {
        let store = Arc::new(LibSqlStore::new_memory().await.unwrap());
        let notifier = Arc::new(StubNotifier::default());
        let port = start_server(
            Arc::clone(&store) as Arc<dyn ContactStore>,
            Arc::clone(&notifier) as Arc<dyn Notifier>,
            offline_classifier(),
            ScreeningPolicy::Advisory,
        )
        .await;

        let (status, json) = post_json(port, "/api/contact", &submission_body()).await;

        assert_eq!(status, 200);
        assert_eq!(json["message"], "Message sent and email delivered successfully!");
        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(notifier.sent_count(), 1);
        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent[0].0, "New message from Alice");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn contact_missing_field_is_rejected_without_side_effects() {
    timeout(TEST_TIMEOUT, async {
        let store = Arc::new(LibSqlStore::new_memory().await.unwrap());
        let notifier = Arc::new(StubNotifier::default());
        let port = start_server(
            Arc::clone(&store) as Arc<dyn ContactStore>,
            Arc::clone(&notifier) as Arc<dyn Notifier>,
            offline_classifier(),
            ScreeningPolicy::Advisory,
        )
        .await;

        let body = serde_json::json!({ "name": "Alice", "email": "alice@example.com" });
        let (status, json) = post_json(port, "/api/contact", &body).await;

        assert_eq!(status, 400);
        assert_eq!(json["message"], "All fields are required.");
        assert_eq!(store.count().await.unwrap(), 0);
        assert_eq!(notifier.sent_count(), 0);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn contact_notify_failure_is_a_qualified_500_with_row_kept() {
    timeout(TEST_TIMEOUT, async {
        let store = Arc::new(LibSqlStore::new_memory().await.unwrap());
        let port = start_server(
            Arc::clone(&store) as Arc<dyn ContactStore>,
            Arc::new(StubNotifier::failing()),
            offline_classifier(),
            ScreeningPolicy::Advisory,
        )
        .await;

        let (status, json) = post_json(port, "/api/contact", &submission_body()).await;

        assert_eq!(status, 500);
        assert_eq!(
            json["message"],
            "Message saved, but failed to send email notification."
        );
        // Partial success: the row survives the failed notification.
        assert_eq!(store.count().await.unwrap(), 1);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn contact_store_failure_skips_notification() {
    timeout(TEST_TIMEOUT, async {
        let notifier = Arc::new(StubNotifier::default());
        let port = start_server(
            Arc::new(UnavailableStore),
            Arc::clone(&notifier) as Arc<dyn Notifier>,
            offline_classifier(),
            ScreeningPolicy::Advisory,
        )
        .await;

        let (status, json) = post_json(port, "/api/contact", &submission_body()).await;

        assert_eq!(status, 500);
        assert_eq!(json["message"], "Failed to save the message.");
        assert_eq!(notifier.sent_count(), 0);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn identical_submissions_create_two_rows() {
    timeout(TEST_TIMEOUT, async {
        let store = Arc::new(LibSqlStore::new_memory().await.unwrap());
        let port = start_server(
            Arc::clone(&store) as Arc<dyn ContactStore>,
            Arc::new(StubNotifier::default()),
            offline_classifier(),
            ScreeningPolicy::Advisory,
        )
        .await;

        let (first, _) = post_json(port, "/api/contact", &submission_body()).await;
        let (second, _) = post_json(port, "/api/contact", &submission_body()).await;

        assert_eq!(first, 200);
        assert_eq!(second, 200);
        assert_eq!(store.count().await.unwrap(), 2);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn block_policy_rejects_disposable_sender_before_persisting() {
    timeout(TEST_TIMEOUT, async {
        let store = Arc::new(LibSqlStore::new_memory().await.unwrap());
        let port = start_server(
            Arc::clone(&store) as Arc<dyn ContactStore>,
            Arc::new(StubNotifier::default()),
            offline_classifier(),
            ScreeningPolicy::Block,
        )
        .await;

        let body = serde_json::json!({
            "name": "Eve",
            "email": "eve@mailinator.com",
            "message": "hello",
        });
        let (status, json) = post_json(port, "/api/contact", &body).await;

        assert_eq!(status, 400);
        assert_eq!(json["message"], "Please use a valid, non-disposable email.");
        assert_eq!(store.count().await.unwrap(), 0);
    })
    .await
    .expect("test timed out");
}

// ── /api/check-disposable ───────────────────────────────────────────

#[tokio::test]
async fn check_disposable_requires_an_email() {
    timeout(TEST_TIMEOUT, async {
        let port = start_server(
            Arc::new(LibSqlStore::new_memory().await.unwrap()),
            Arc::new(StubNotifier::default()),
            offline_classifier(),
            ScreeningPolicy::Advisory,
        )
        .await;

        let (status, json) = post_json(port, "/api/check-disposable", &serde_json::json!({})).await;

        assert_eq!(status, 400);
        assert_eq!(json["is_disposable"], false);
        assert_eq!(json["message"], "Email is required.");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn check_disposable_fallback_flags_denylisted_domain() {
    timeout(TEST_TIMEOUT, async {
        let port = start_server(
            Arc::new(LibSqlStore::new_memory().await.unwrap()),
            Arc::new(StubNotifier::default()),
            offline_classifier(),
            ScreeningPolicy::Advisory,
        )
        .await;

        let body = serde_json::json!({ "email": "bob@yopmail.com" });
        let (status, json) = post_json(port, "/api/check-disposable", &body).await;

        assert_eq!(status, 200);
        assert_eq!(json["is_disposable"], true);
        assert_eq!(json["confidence"], CONFIDENCE_UNAVAILABLE);
        assert!(json["note"].as_str().unwrap().contains("denylist"));
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn check_disposable_fallback_passes_unknown_domain() {
    timeout(TEST_TIMEOUT, async {
        let port = start_server(
            Arc::new(LibSqlStore::new_memory().await.unwrap()),
            Arc::new(StubNotifier::default()),
            offline_classifier(),
            ScreeningPolicy::Advisory,
        )
        .await;

        let body = serde_json::json!({ "email": "carol@example.org" });
        let (status, json) = post_json(port, "/api/check-disposable", &body).await;

        assert_eq!(status, 200);
        assert_eq!(json["is_disposable"], false);
        assert_eq!(json["confidence"], CONFIDENCE_UNAVAILABLE);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn check_disposable_uses_remote_verdict_when_available() {
    timeout(TEST_TIMEOUT, async {
        let detector_port = start_stub_detector(true, 0.97).await;
        let port = start_server(
            Arc::new(LibSqlStore::new_memory().await.unwrap()),
            Arc::new(StubNotifier::default()),
            remote_classifier(detector_port),
            ScreeningPolicy::Advisory,
        )
        .await;

        let body = serde_json::json!({ "email": "bob@example.com" });
        let (status, json) = post_json(port, "/api/check-disposable", &body).await;

        assert_eq!(status, 200);
        assert_eq!(json["is_disposable"], true);
        assert_eq!(json["confidence"], 0.97);
        // Remote verdicts carry no degradation note.
        assert!(json.get("note").is_none());
    })
    .await
    .expect("test timed out");
}

// ── /health ─────────────────────────────────────────────────────────

#[tokio::test]
async fn health_reports_ok_with_live_store() {
    timeout(TEST_TIMEOUT, async {
        let port = start_server(
            Arc::new(LibSqlStore::new_memory().await.unwrap()),
            Arc::new(StubNotifier::default()),
            offline_classifier(),
            ScreeningPolicy::Advisory,
        )
        .await;

        let response = reqwest::get(format!("http://127.0.0.1:{port}/health"))
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);
        let json: Value = response.json().await.unwrap();
        assert_eq!(json["status"], "ok");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn health_reports_degraded_with_dead_store() {
    timeout(TEST_TIMEOUT, async {
        let port = start_server(
            Arc::new(UnavailableStore),
            Arc::new(StubNotifier::default()),
            offline_classifier(),
            ScreeningPolicy::Advisory,
        )
        .await;

        let response = reqwest::get(format!("http://127.0.0.1:{port}/health"))
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 503);
        let json: Value = response.json().await.unwrap();
        assert_eq!(json["status"], "degraded");
        assert_eq!(json["database"], "unavailable");
    })
    .await
    .expect("test timed out");
}
