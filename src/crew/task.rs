//! Task declarations and their outputs.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Agent, CrewError};
use crate::llm::TokenUsage;

/// A unit of work assigned to one agent.
///
/// Dependencies name other tasks of the same crew by key, in declared order.
/// Their outputs are handed to the agent as context when the task runs.
#[derive(Debug, Clone)]
pub struct Task {
    key: String,
    description: String,
    expected_output: String,
    agent: Arc<Agent>,
    dependencies: Vec<String>,
}

impl Task {
    /// # Errors
    /// Returns `CrewError::EmptyField` if the key, description or expected
    /// output is blank.
    pub fn new(
        key: impl Into<String>,
        description: impl Into<String>,
        expected_output: impl Into<String>,
        agent: Arc<Agent>,
    ) -> Result<Self, CrewError> {
        let key = key.into().trim().to_string();
        let description = description.into();
        let expected_output = expected_output.into();

        for (value, field) in [
            (key.as_str(), "key"),
            (description.as_str(), "description"),
            (expected_output.as_str(), "expected_output"),
        ] {
            if value.trim().is_empty() {
                return Err(CrewError::EmptyField {
                    entity: "Task",
                    field,
                });
            }
        }

        Ok(Self {
            key,
            description,
            expected_output,
            agent,
            dependencies: Vec::new(),
        })
    }

    /// Declare that this task runs after `key`.
    pub fn with_dependency(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        if !self.dependencies.contains(&key) {
            self.dependencies.push(key);
        }
        self
    }

    pub fn with_dependencies<I, S>(self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        keys.into_iter().fold(self, |task, key| task.with_dependency(key))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn expected_output(&self) -> &str {
        &self.expected_output
    }

    pub fn agent(&self) -> &Arc<Agent> {
        &self.agent
    }

    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// User prompt for this task, including the outputs it depends on.
    pub fn prompt(&self, context: &[TaskOutput]) -> String {
        let mut prompt = format!(
            "Current task: {}\n\nExpected final answer: {}\n\
             Return the complete content of the answer, not a description of it.",
            self.description, self.expected_output
        );

        if !context.is_empty() {
            prompt.push_str("\n\nContext from earlier tasks:");
            for output in context {
                prompt.push_str(&format!(
                    "\n\n### {} ({})\n{}",
                    output.key, output.agent_role, output.raw
                ));
            }
        }

        prompt
    }
}

/// Output produced by one executed task.
#[derive(Debug, Clone, Serialize)]
pub struct TaskOutput {
    pub key: String,
    pub agent_role: String,
    pub description: String,
    pub raw: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}
