//! Process-wide logging and `.env` setup shared by the binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "hackbox=info,tower_http=info";

/// Install the tracing subscriber. Logs go to stderr; stdout is for results.
///
/// `RUST_LOG` overrides the default filter.
pub fn init() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Load `.env` into the process environment (if present) and start logging.
pub fn init_with_dotenv() {
    let dotenv = dotenvy::dotenv();
    init();
    match dotenv {
        Ok(path) => tracing::info!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => tracing::debug!("No .env file found"),
        Err(e) => tracing::warn!("Could not load .env file: {}", e),
    }
}
