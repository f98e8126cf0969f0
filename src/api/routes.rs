//! HTTP route handlers.

use std::sync::Arc;

use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::crew::{LlmTaskExecutor, TaskExecutor};
use crate::llm::{Llm, LlmRef};
use crate::mock_ui::MockUiClient;
use crate::pipelines::{self, Pipeline, PipelineRun};

use super::page;
use super::types::{ErrorResponse, HealthResponse, RunOutcome, RunRequest, RunResponse};

pub const MISSING_IDEA_WARNING: &str = "Please enter a startup idea first.";

/// Shared application state.
pub struct AppState {
    pub config: Config,
    /// Model handle shared by every agent of every run
    pub llm: LlmRef,
    /// Runs the crew's tasks
    pub executor: Arc<dyn TaskExecutor>,
    pub mock_ui: MockUiClient,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let llm = Llm::from_config(&config, Pipeline::Hackathon.default_model());
        Self::with_executor(config, llm, Arc::new(LlmTaskExecutor))
    }

    pub fn with_executor(config: Config, llm: LlmRef, executor: Arc<dyn TaskExecutor>) -> Self {
        let mock_ui = MockUiClient::new(&config.mock_ui);
        Self {
            config,
            llm,
            executor,
            mock_ui,
        }
    }

    /// Run the hackathon crew for `idea`, then the wireframe side call.
    ///
    /// Crew errors are reported in the outcome rather than returned.
    pub async fn run(&self, idea: &str) -> RunOutcome {
        let idea = idea.trim();
        if idea.is_empty() {
            tracing::warn!("Run requested without a startup idea");
            return RunOutcome::MissingIdea;
        }

        let result = match pipelines::hackathon_crew(&self.llm, idea) {
            Ok(crew) => {
                let crew = crew.with_verbose(self.config.verbose_or(false));
                Pipeline::Hackathon
                    .run_with_mock_ui(&crew, self.executor.as_ref(), &self.mock_ui, idea)
                    .await
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(PipelineRun { output, mock_ui }) => RunOutcome::Completed {
                idea: idea.to_string(),
                output,
                mock_ui,
            },
            Err(e) => {
                tracing::error!("Crew run failed: {}", e);
                RunOutcome::Failed {
                    idea: idea.to_string(),
                    error: e.to_string(),
                }
            }
        }
    }
}

/// Build the router.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/run", post(run_form))
        .route("/api/run", post(run_json))
        .route("/api/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

async fn index() -> Html<String> {
    Html(page::render("", None))
}

async fn run_form(State(state): State<Arc<AppState>>, Form(req): Form<RunRequest>) -> Html<String> {
    let outcome = state.run(&req.idea).await;
    Html(page::render(&req.idea, Some(&outcome)))
}

async fn run_json(State(state): State<Arc<AppState>>, Json(req): Json<RunRequest>) -> Response {
    match state.run(&req.idea).await {
        RunOutcome::MissingIdea => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: MISSING_IDEA_WARNING.to_string(),
            }),
        )
            .into_response(),
        RunOutcome::Failed { error, .. } => {
            (StatusCode::BAD_GATEWAY, Json(ErrorResponse { error })).into_response()
        }
        RunOutcome::Completed {
            idea,
            output,
            mock_ui,
        } => Json(RunResponse {
            idea: &idea,
            output: output.raw(),
            crew: &output,
            mock_ui: &mock_ui,
        })
        .into_response(),
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
