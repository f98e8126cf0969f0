//! Best-effort wireframe generation via an external mock-UI service.
//!
//! The call never fails from the caller's point of view: a missing endpoint
//! degrades to [`MockUiOutcome::Skipped`] and any transport, status or
//! decoding problem becomes [`MockUiOutcome::Error`].

use std::time::Duration;

use reqwest::Client;
use serde::{Serialize, Serializer};
use serde_json::{json, Value};

use crate::config::MockUiConfig;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
pub const FORMATS: [&str; 2] = ["mobile", "desktop"];

/// Outcome of one side call.
#[derive(Debug, Clone, PartialEq)]
pub enum MockUiOutcome {
    /// No endpoint configured; carries the prompt that would have been sent.
    Skipped { prompt: String },
    /// The service's JSON response, untouched.
    Generated(Value),
    Error { error: String },
}

impl MockUiOutcome {
    pub fn status(&self) -> &str {
        match self {
            MockUiOutcome::Skipped { .. } => "skipped",
            MockUiOutcome::Generated(value) => value
                .get("status")
                .and_then(Value::as_str)
                .unwrap_or("ok"),
            MockUiOutcome::Error { .. } => "error",
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            MockUiOutcome::Skipped { prompt } => json!({ "status": "skipped", "prompt": prompt }),
            MockUiOutcome::Generated(value) => value.clone(),
            MockUiOutcome::Error { error } => json!({ "status": "error", "error": error }),
        }
    }
}

impl Serialize for MockUiOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

#[derive(Debug, Serialize)]
struct MockUiRequest<'a> {
    idea: &'a str,
    product_spec: &'a str,
    formats: [&'static str; 2],
}

#[derive(Debug, Clone)]
struct Endpoint {
    url: String,
    api_key: String,
}

#[derive(Debug, Clone)]
pub struct MockUiClient {
    client: Client,
    endpoint: Option<Endpoint>,
}

impl MockUiClient {
    pub fn new(config: &MockUiConfig) -> Self {
        let endpoint = match (&config.api_url, &config.api_key) {
            (Some(url), Some(api_key)) => Some(Endpoint {
                url: url.clone(),
                api_key: api_key.clone(),
            }),
            _ => None,
        };
        Self {
            client: Client::new(),
            endpoint,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.endpoint.is_some()
    }

    /// Prompt reported when the service is not configured.
    pub fn fallback_prompt(idea: &str) -> String {
        format!("Create mobile & desktop wireframes for: {}", idea)
    }

    pub async fn generate(&self, idea: &str, product_spec: &str) -> MockUiOutcome {
        let Some(endpoint) = &self.endpoint else {
            tracing::debug!("Mock UI endpoint not configured, skipping wireframe generation");
            return MockUiOutcome::Skipped {
                prompt: Self::fallback_prompt(idea),
            };
        };

        match self.post(endpoint, idea, product_spec).await {
            Ok(value) => {
                tracing::info!("Mock UI service responded");
                MockUiOutcome::Generated(value)
            }
            Err(e) => {
                let error = format!("{:#}", e);
                tracing::warn!("Mock UI generation failed: {}", error);
                MockUiOutcome::Error { error }
            }
        }
    }

    async fn post(
        &self,
        endpoint: &Endpoint,
        idea: &str,
        product_spec: &str,
    ) -> anyhow::Result<Value> {
        let request = MockUiRequest {
            idea,
            product_spec,
            formats: FORMATS,
        };
        let response = self
            .client
            .post(&endpoint.url)
            .bearer_auth(&endpoint.api_key)
            .timeout(REQUEST_TIMEOUT)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<Value>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::spawn_server;
    use axum::{http::HeaderMap, http::StatusCode, routing::post, Json, Router};
    use std::sync::{Arc, Mutex};

    fn configured(url: String) -> MockUiClient {
        MockUiClient::new(&MockUiConfig {
            api_url: Some(url),
            api_key: Some("design-key".to_string()),
        })
    }

    #[tokio::test]
    async fn skipped_without_configuration() {
        for idea in ["pet-sitting marketplace app", "x"] {
            let outcome = MockUiClient::new(&MockUiConfig::default())
                .generate(idea, "spec")
                .await;
            assert_eq!(
                outcome.to_value(),
                json!({
                    "status": "skipped",
                    "prompt": format!("Create mobile & desktop wireframes for: {}", idea)
                })
            );
        }

        let half = MockUiClient::new(&MockUiConfig {
            api_url: Some("http://127.0.0.1:9/never".to_string()),
            api_key: None,
        });
        assert!(!half.is_enabled());
        assert_eq!(half.generate("idea", "").await.status(), "skipped");
    }

    #[tokio::test]
    async fn server_error_becomes_error_status() {
        let router = Router::new().route(
            "/mock",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let base = spawn_server(router).await;

        let outcome = configured(format!("{}/mock", base))
            .generate("pet-sitting marketplace app", "spec")
            .await;

        let value = outcome.to_value();
        assert_eq!(value["status"], "error");
        let error = value["error"].as_str().unwrap();
        assert!(!error.is_empty());
        assert!(error.contains("500"));
    }

    #[tokio::test]
    async fn unreachable_endpoint_becomes_error_status() {
        let outcome = configured("http://127.0.0.1:9/mock".to_string())
            .generate("idea", "spec")
            .await;
        assert!(matches!(outcome, MockUiOutcome::Error { ref error } if !error.is_empty()));
    }

    #[tokio::test]
    async fn non_json_body_becomes_error_status() {
        let router = Router::new().route("/mock", post(|| async { "not json" }));
        let base = spawn_server(router).await;
        let outcome = configured(format!("{}/mock", base)).generate("idea", "spec").await;
        assert_eq!(outcome.status(), "error");
    }

    #[tokio::test]
    async fn posts_idea_spec_and_formats() {
        let seen: Arc<Mutex<Option<(Option<String>, Value)>>> = Arc::default();
        let captured = Arc::clone(&seen);
        let router = Router::new().route(
            "/mock",
            post(move |headers: HeaderMap, Json(body): Json<Value>| {
                let captured = Arc::clone(&captured);
                async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    *captured.lock().unwrap() = Some((auth, body));
                    Json(json!({ "status": "ok", "mobile_url": "https://mock.example/m/1" }))
                }
            }),
        );
        let base = spawn_server(router).await;

        let outcome = configured(format!("{}/mock", base))
            .generate("pet-sitting marketplace app", "screens: home, search")
            .await;

        assert_eq!(outcome.status(), "ok");
        assert_eq!(outcome.to_value()["mobile_url"], "https://mock.example/m/1");

        let (auth, body) = seen.lock().unwrap().take().unwrap();
        assert_eq!(auth.as_deref(), Some("Bearer design-key"));
        assert_eq!(
            body,
            json!({
                "idea": "pet-sitting marketplace app",
                "product_spec": "screens: home, search",
                "formats": ["mobile", "desktop"]
            })
        );
    }
}
