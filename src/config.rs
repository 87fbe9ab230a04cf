//! Server configuration, built from environment variables.

use std::path::PathBuf;

use crate::pipeline::ScreeningPolicy;

/// Top-level server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port the HTTP server binds on.
    pub http_port: u16,
    /// Directory served verbatim at the process root.
    pub static_dir: PathBuf,
    /// Path of the libsql database file.
    pub db_path: PathBuf,
    /// Where disposable-email screening applies in the submission pipeline.
    pub screening: ScreeningPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: 8080,
            static_dir: PathBuf::from("./public"),
            db_path: PathBuf::from("./data/portfolio.db"),
            screening: ScreeningPolicy::default(),
        }
    }
}

impl ServerConfig {
    /// Build config from environment variables, falling back to defaults.
    ///
    /// Recognized variables: `PORTFOLIO_HTTP_PORT`, `PORTFOLIO_STATIC_DIR`,
    /// `PORTFOLIO_DB_PATH`, `PORTFOLIO_SCREENING` (`off`/`advisory`/`block`).
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let http_port: u16 = std::env::var("PORTFOLIO_HTTP_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.http_port);

        let static_dir = std::env::var("PORTFOLIO_STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.static_dir);

        let db_path = std::env::var("PORTFOLIO_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        let screening = std::env::var("PORTFOLIO_SCREENING")
            .ok()
            .and_then(|s| match s.parse::<ScreeningPolicy>() {
                Ok(policy) => Some(policy),
                Err(()) => {
                    tracing::warn!(
                        value = %s,
                        "Unrecognized PORTFOLIO_SCREENING value, using default"
                    );
                    None
                }
            })
            .unwrap_or(defaults.screening);

        Self {
            http_port,
            static_dir,
            db_path,
            screening,
        }
    }
}
