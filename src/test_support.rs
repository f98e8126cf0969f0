//! Shared test doubles.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;

use crate::crew::{AgentReply, Task, TaskExecutor, TaskOutput};
use crate::llm::{ChatMessage, ChatOptions, ChatResponse, Llm, LlmClient, LlmRef};

/// LLM client that refuses every call.
pub struct OfflineClient;

#[async_trait]
impl LlmClient for OfflineClient {
    async fn chat_completion(
        &self,
        _model: &str,
        _messages: &[ChatMessage],
        _options: ChatOptions,
    ) -> anyhow::Result<ChatResponse> {
        anyhow::bail!("offline client must not be called")
    }
}

pub fn offline_llm() -> LlmRef {
    Llm::new("groq/llama-3.1-8b-instant", Arc::new(OfflineClient)).shared()
}

/// Executor double that records call order and the context each task saw.
#[derive(Default)]
pub struct RecordingExecutor {
    replies: HashMap<String, String>,
    fail_on: Option<String>,
    calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, key: &str, text: &str) -> Self {
        self.replies.insert(key.to_string(), text.to_string());
        self
    }

    pub fn fail_on(mut self, key: &str) -> Self {
        self.fail_on = Some(key.to_string());
        self
    }

    /// Task keys in the order they were executed.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Keys of the context outputs handed to `key`.
    pub fn context_of(&self, key: &str) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, ctx)| ctx.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TaskExecutor for RecordingExecutor {
    async fn execute(&self, task: &Task, context: &[TaskOutput]) -> anyhow::Result<AgentReply> {
        self.calls.lock().unwrap().push((
            task.key().to_string(),
            context.iter().map(|o| o.key.clone()).collect(),
        ));

        if self.fail_on.as_deref() == Some(task.key()) {
            anyhow::bail!("model provider unavailable");
        }

        let raw = self
            .replies
            .get(task.key())
            .cloned()
            .unwrap_or_else(|| format!("{} output", task.key()));
        Ok(AgentReply::text(raw))
    }
}

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}
