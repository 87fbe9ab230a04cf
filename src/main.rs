use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use portfolio_contact::classifier::{
    Classifier, ClassifierConfig, DenylistClassifier, FallbackClassifier, RemoteClassifier,
};
use portfolio_contact::config::ServerConfig;
use portfolio_contact::http::{AppState, api_routes};
use portfolio_contact::notify::{DisabledNotifier, MailConfig, Notifier, SmtpNotifier};
use portfolio_contact::pipeline::SubmissionPipeline;
use portfolio_contact::store::{ContactStore, LibSqlStore, UnavailableStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider before any TLS usage
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = ServerConfig::from_env();

    eprintln!("📬 Portfolio Contact v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   API: http://0.0.0.0:{}/api/contact", config.http_port);
    eprintln!("   Static: {}", config.static_dir.display());
    eprintln!("   Screening: {:?}", config.screening);

    // ── Persistence Gateway ─────────────────────────────────────────────
    // A dead database at startup is logged, not fatal: the process keeps
    // serving and /health reports degraded until the store comes back.
    let store: Arc<dyn ContactStore> = match LibSqlStore::new_local(&config.db_path).await {
        Ok(store) => {
            eprintln!("   Database: {}", config.db_path.display());
            Arc::new(store)
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                path = %config.db_path.display(),
                "Database connection failed — running degraded, submissions will not be saved"
            );
            Arc::new(UnavailableStore)
        }
    };

    // ── Notification Gateway ────────────────────────────────────────────
    let notifier: Arc<dyn Notifier> = match MailConfig::from_env() {
        Some(mail_config) => {
            eprintln!(
                "   SMTP: {}:{} (notify: {})",
                mail_config.smtp_host, mail_config.smtp_port, mail_config.notify_address
            );
            match SmtpNotifier::new(&mail_config) {
                Ok(notifier) => {
                    match notifier.verify().await {
                        Ok(true) => tracing::info!("SMTP transport ready"),
                        Ok(false) => tracing::warn!("SMTP connection test was refused"),
                        Err(e) => tracing::warn!(error = %e, "SMTP connection test failed"),
                    }
                    Arc::new(notifier)
                }
                Err(e) => {
                    tracing::error!(error = %e, "SMTP transport setup failed — notifications disabled");
                    Arc::new(DisabledNotifier)
                }
            }
        }
        None => {
            tracing::warn!("EMAIL_SMTP_HOST not set — notifications disabled");
            Arc::new(DisabledNotifier)
        }
    };

    // ── Classifier ──────────────────────────────────────────────────────
    let classifier_config = ClassifierConfig::from_env();
    eprintln!("   Classifier: {}", classifier_config.url);
    let classifier: Arc<dyn Classifier> = Arc::new(FallbackClassifier::new(
        RemoteClassifier::new(&classifier_config)?,
        DenylistClassifier::new(),
    ));

    // ── Pipeline + HTTP server ──────────────────────────────────────────
    let pipeline = Arc::new(SubmissionPipeline::new(
        Arc::clone(&store),
        notifier,
        Arc::clone(&classifier),
        config.screening,
    ));

    let state = AppState {
        pipeline,
        classifier,
        store,
    };

    let app = api_routes(state)
        .layer(CorsLayer::permissive())
        .fallback_service(ServeDir::new(&config.static_dir));

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.http_port)).await?;
    tracing::info!(port = config.http_port, "HTTP server started");
    axum::serve(listener, app).await?;

    Ok(())
}
