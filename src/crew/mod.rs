//! Crews: agents, tasks and the sequential coordinator that runs them.
//!
//! A [`Crew`] owns a validated [`TaskGraph`]. [`Crew::kickoff`] walks it in
//! dependency order and hands each task to a [`TaskExecutor`], feeding it the
//! outputs of the tasks it depends on. Executors are the seam between the
//! coordinator and the model: [`LlmTaskExecutor`] talks to the agent's LLM,
//! tests substitute a recording double.

mod agent;
pub mod definition;
mod error;
mod graph;
mod task;

pub use agent::Agent;
pub use definition::{interpolate, CrewDefinition};
pub use error::CrewError;
pub use graph::TaskGraph;
pub use task::{Task, TaskOutput};

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use tracing::Instrument;
use uuid::Uuid;

use crate::llm::{ChatMessage, TokenUsage};
use crate::util::truncate_chars;

/// What an executor produced for one task.
#[derive(Debug, Clone)]
pub struct AgentReply {
    pub raw: String,
    pub usage: Option<TokenUsage>,
    pub model: Option<String>,
}

impl AgentReply {
    pub fn text(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            usage: None,
            model: None,
        }
    }
}

/// Runs a single task on behalf of the coordinator.
///
/// `context` holds the outputs of `task.dependencies()`, in declared order.
#[async_trait]
pub trait TaskExecutor: Send + Sync {
    async fn execute(&self, task: &Task, context: &[TaskOutput]) -> anyhow::Result<AgentReply>;
}

/// Executes tasks by prompting the assigned agent's model.
#[derive(Debug, Clone, Copy, Default)]
pub struct LlmTaskExecutor;

#[async_trait]
impl TaskExecutor for LlmTaskExecutor {
    async fn execute(&self, task: &Task, context: &[TaskOutput]) -> anyhow::Result<AgentReply> {
        let agent = task.agent();
        let messages = [
            ChatMessage::system(agent.system_prompt()),
            ChatMessage::user(task.prompt(context)),
        ];

        let response = agent.llm().chat(&messages).await?;
        let raw = response
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("model returned an empty answer"))?;

        Ok(AgentReply {
            raw,
            usage: response.usage,
            model: response.model,
        })
    }
}

/// Aggregated result of one crew run.
#[derive(Debug, Clone, Serialize)]
pub struct CrewOutput {
    pub run_id: Uuid,
    /// Outputs in execution order
    pub tasks_output: Vec<TaskOutput>,
    pub token_usage: TokenUsage,
}

impl CrewOutput {
    /// Output of the last executed task.
    pub fn raw(&self) -> &str {
        self.tasks_output.last().map_or("", |o| o.raw.as_str())
    }

    pub fn task_output(&self, key: &str) -> Option<&TaskOutput> {
        self.tasks_output.iter().find(|o| o.key == key)
    }
}

impl std::fmt::Display for CrewOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.raw())
    }
}

/// A set of agents and the task graph they work through.
#[derive(Debug)]
pub struct Crew {
    name: String,
    agents: Vec<Arc<Agent>>,
    graph: TaskGraph,
    verbose: bool,
}

impl Crew {
    /// # Errors
    /// Returns `CrewError::UnknownAgent` if a task is assigned to an agent
    /// missing from `agents`, plus any error from [`TaskGraph::new`].
    pub fn new(
        name: impl Into<String>,
        agents: Vec<Arc<Agent>>,
        tasks: Vec<Task>,
    ) -> Result<Self, CrewError> {
        for task in &tasks {
            if !agents.iter().any(|a| Arc::ptr_eq(a, task.agent())) {
                return Err(CrewError::UnknownAgent {
                    task: task.key().to_string(),
                    agent: task.agent().role().to_string(),
                });
            }
        }

        Ok(Self {
            name: name.into(),
            agents,
            graph: TaskGraph::new(tasks)?,
            verbose: false,
        })
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn agents(&self) -> &[Arc<Agent>] {
        &self.agents
    }

    pub fn graph(&self) -> &TaskGraph {
        &self.graph
    }

    /// Run every task once, sequentially, in dependency order.
    ///
    /// # Errors
    /// The first executor failure aborts the run with `CrewError::TaskFailed`;
    /// later tasks are not started.
    pub async fn kickoff(&self, executor: &dyn TaskExecutor) -> Result<CrewOutput, CrewError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("crew", name = %self.name, %run_id);
        self.run(run_id, executor).instrument(span).await
    }

    async fn run(
        &self,
        run_id: Uuid,
        executor: &dyn TaskExecutor,
    ) -> Result<CrewOutput, CrewError> {
        tracing::info!(
            "Kicking off crew with {} agents and {} tasks",
            self.agents.len(),
            self.graph.len()
        );

        let mut tasks_output: Vec<TaskOutput> = Vec::with_capacity(self.graph.len());
        let mut finished: HashMap<String, usize> = HashMap::with_capacity(self.graph.len());
        let mut token_usage = TokenUsage::default();

        for task in self.graph.ordered() {
            let context: Vec<TaskOutput> = task
                .dependencies()
                .iter()
                .filter_map(|dep| finished.get(dep).map(|&i| tasks_output[i].clone()))
                .collect();

            tracing::info!(
                task = task.key(),
                agent = task.agent().role(),
                "Starting task ({} context outputs)",
                context.len()
            );

            let started_at = Utc::now();
            let reply = executor.execute(task, &context).await.map_err(|e| {
                tracing::error!(task = task.key(), "Task failed: {:#}", e);
                CrewError::TaskFailed {
                    task: task.key().to_string(),
                    agent: task.agent().role().to_string(),
                    message: format!("{:#}", e),
                }
            })?;
            let finished_at = Utc::now();

            if let Some(usage) = &reply.usage {
                token_usage = token_usage.add(usage);
            }

            if self.verbose {
                tracing::info!(task = task.key(), "Task output:\n{}", reply.raw);
            } else {
                tracing::debug!(
                    task = task.key(),
                    "Task output: {}",
                    truncate_chars(&reply.raw, 200)
                );
            }

            finished.insert(task.key().to_string(), tasks_output.len());
            tasks_output.push(TaskOutput {
                key: task.key().to_string(),
                agent_role: task.agent().role().to_string(),
                description: task.description().to_string(),
                raw: reply.raw,
                usage: reply.usage,
                started_at,
                finished_at,
            });
        }

        tracing::info!(
            "Crew finished: {} tasks, {} total tokens",
            tasks_output.len(),
            token_usage.total_tokens
        );

        Ok(CrewOutput {
            run_id,
            tasks_output,
            token_usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ChatOptions, ChatResponse, Llm, LlmClient};
    use crate::test_support::{offline_llm, RecordingExecutor};
    use std::sync::Mutex;

    fn persona(role: &str) -> Arc<Agent> {
        Arc::new(
            Agent::new(
                role,
                format!("{} goal", role),
                format!("{} backstory", role),
                offline_llm(),
            )
            .unwrap(),
        )
    }

    fn docs_crew() -> Crew {
        let summarizer = persona("Documentation Summarizer");
        let translator = persona("Technical Translator");
        let summary = Task::new(
            "summary",
            "give a detailed summary about the react hook useEffect",
            "A clear, concise summary of the hook's functionality",
            Arc::clone(&summarizer),
        )
        .unwrap();
        let translation = Task::new(
            "translation",
            "Translate the summary to Turkish",
            "Turkish translation of the hook documentation",
            Arc::clone(&translator),
        )
        .unwrap()
        .with_dependency("summary");
        // Declared out of order on purpose.
        Crew::new("docs", vec![summarizer, translator], vec![translation, summary]).unwrap()
    }

    #[tokio::test]
    async fn dependencies_run_first_and_feed_context() {
        let crew = docs_crew();
        let executor = RecordingExecutor::new()
            .reply("summary", "useEffect synchronizes a component with an external system.")
            .reply("translation", "useEffect, bir bileşeni harici bir sistemle senkronize eder.");

        let output = crew.kickoff(&executor).await.unwrap();

        assert_eq!(executor.calls(), ["summary", "translation"]);
        assert_eq!(executor.context_of("summary"), Vec::<String>::new());
        assert_eq!(executor.context_of("translation"), ["summary"]);
        assert_eq!(output.tasks_output.len(), 2);
        assert!(output.raw().starts_with("useEffect, bir"));
        assert_eq!(output.to_string(), output.raw());
        assert!(output.task_output("summary").is_some());
    }

    #[tokio::test]
    async fn failure_stops_the_run() {
        let crew = docs_crew();
        let executor = RecordingExecutor::new().fail_on("summary");

        let err = crew.kickoff(&executor).await.unwrap_err();

        assert!(matches!(err, CrewError::TaskFailed { ref task, .. } if task == "summary"));
        assert!(!err.is_declaration_error());
        assert_eq!(executor.calls(), ["summary"]);
    }

    #[test]
    fn task_agent_must_belong_to_crew() {
        let insider = persona("Pitch Writer");
        let outsider = persona("Marketing Lead");
        let task = Task::new("pitch", "Write 1-min pitch", "Pitch script.", outsider).unwrap();
        let err = Crew::new("startup", vec![insider], vec![task]).unwrap_err();
        assert!(
            matches!(err, CrewError::UnknownAgent { ref agent, .. } if agent == "Marketing Lead")
        );
    }

    /// Answers every prompt with its own message count and records the prompts.
    #[derive(Default)]
    struct EchoClient {
        seen: Mutex<Vec<(String, Vec<ChatMessage>)>>,
    }

    #[async_trait]
    impl LlmClient for EchoClient {
        async fn chat_completion(
            &self,
            model: &str,
            messages: &[ChatMessage],
            _options: ChatOptions,
        ) -> anyhow::Result<ChatResponse> {
            self.seen
                .lock()
                .unwrap()
                .push((model.to_string(), messages.to_vec()));
            Ok(ChatResponse {
                content: Some(format!("answer to {} messages", messages.len())),
                finish_reason: Some("stop".to_string()),
                usage: Some(TokenUsage::new(10, 5)),
                model: Some(model.to_string()),
            })
        }
    }

    #[tokio::test]
    async fn llm_executor_prompts_with_persona_and_context() {
        let client = Arc::new(EchoClient::default());
        let llm = Llm::new("groq/llama-3.1-8b-instant", client.clone()).shared();
        let summarizer = Arc::new(
            Agent::new(
                "Documentation Summarizer",
                "Create concise summaries of technical documentation",
                "Technical writer who excels at simplifying complex concepts",
                Arc::clone(&llm),
            )
            .unwrap(),
        );
        let translator = Arc::new(
            Agent::new(
                "Technical Translator",
                "Translate technical documentation to other languages",
                "Technical translator specializing in software documentation",
                llm,
            )
            .unwrap(),
        );
        let crew = Crew::new(
            "docs",
            vec![Arc::clone(&summarizer), Arc::clone(&translator)],
            vec![
                Task::new("summary", "Summarize useEffect", "A summary", summarizer).unwrap(),
                Task::new("translation", "Translate the summary", "A translation", translator)
                    .unwrap()
                    .with_dependency("summary"),
            ],
        )
        .unwrap();

        let output = crew.kickoff(&LlmTaskExecutor).await.unwrap();

        assert_eq!(output.token_usage, TokenUsage::new(20, 10));
        let seen = client.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].0, "groq/llama-3.1-8b-instant");
        assert!(seen[0].1[0].content.contains("You are Documentation Summarizer."));
        assert!(seen[1].1[0].content.contains("You are Technical Translator."));
        assert!(seen[1].1[1].content.contains("answer to 2 messages"));
    }

    #[tokio::test]
    async fn empty_model_answer_fails_the_task() {
        struct Silent;

        #[async_trait]
        impl LlmClient for Silent {
            async fn chat_completion(
                &self,
                _model: &str,
                _messages: &[ChatMessage],
                _options: ChatOptions,
            ) -> anyhow::Result<ChatResponse> {
                Ok(ChatResponse {
                    content: Some("   ".to_string()),
                    finish_reason: None,
                    usage: None,
                    model: None,
                })
            }
        }

        let llm = Llm::new("m", Arc::new(Silent)).shared();
        let agent =
            Arc::new(Agent::new("Pitch Writer", "Write a pitch", "Investor hooks", llm).unwrap());
        let crew = Crew::new(
            "pitch",
            vec![Arc::clone(&agent)],
            vec![Task::new("pitch", "Write it", "Pitch script.", agent).unwrap()],
        )
        .unwrap();

        let err = crew.kickoff(&LlmTaskExecutor).await.unwrap_err();
        assert!(err.to_string().contains("empty answer"));
    }
}
