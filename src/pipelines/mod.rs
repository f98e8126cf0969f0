//! Built-in crews.
//!
//! - `docs`: summarize a topic, then translate the summary
//! - `startup`: branding, roadmap, UI spec, marketing and pitch for an idea
//! - `hackathon`: the condensed three-agent crew behind the web form

use std::collections::HashMap;

use crate::crew::{Crew, CrewDefinition, CrewError, CrewOutput, TaskExecutor};
use crate::llm::LlmRef;
use crate::mock_ui::{MockUiClient, MockUiOutcome};

const DOCS_YAML: &str = include_str!("docs.yaml");
const STARTUP_YAML: &str = include_str!("startup.yaml");
const HACKATHON_YAML: &str = include_str!("hackathon.yaml");

/// Product spec handed to the wireframe service when no UI task output exists.
pub const FALLBACK_PRODUCT_SPEC: &str = "Use ui_spec JSON from UI task.";

/// A finished crew run plus the wireframe call made after it.
#[derive(Debug)]
pub struct PipelineRun {
    pub output: CrewOutput,
    pub mock_ui: MockUiOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pipeline {
    Docs,
    Startup,
    Hackathon,
}

impl Pipeline {
    pub fn default_model(&self) -> &'static str {
        match self {
            Pipeline::Startup => "groq/openai/gpt-oss-20b",
            Pipeline::Docs | Pipeline::Hackathon => "groq/llama-3.1-8b-instant",
        }
    }

    pub fn definition(&self) -> Result<CrewDefinition, CrewError> {
        CrewDefinition::from_yaml(match self {
            Pipeline::Docs => DOCS_YAML,
            Pipeline::Startup => STARTUP_YAML,
            Pipeline::Hackathon => HACKATHON_YAML,
        })
    }

    /// Key of the task whose output describes the UI, if the crew has one.
    pub fn ui_task(&self) -> Option<&'static str> {
        match self {
            Pipeline::Docs => None,
            Pipeline::Startup => Some("mock_ui"),
            Pipeline::Hackathon => Some("roadmap"),
        }
    }

    pub fn build(&self, llm: &LlmRef, inputs: &HashMap<String, String>) -> Result<Crew, CrewError> {
        self.definition()?.build(llm, inputs)
    }

    /// Output of the UI task, or [`FALLBACK_PRODUCT_SPEC`].
    pub fn product_spec<'a>(&self, output: &'a CrewOutput) -> &'a str {
        self.ui_task()
            .and_then(|key| output.task_output(key))
            .map_or(FALLBACK_PRODUCT_SPEC, |o| o.raw.as_str())
    }

    /// Run `crew` to completion, then send the product spec to the
    /// wireframe service. A failed crew never reaches the service.
    pub async fn run_with_mock_ui(
        &self,
        crew: &Crew,
        executor: &dyn TaskExecutor,
        mock_ui: &MockUiClient,
        idea: &str,
    ) -> Result<PipelineRun, CrewError> {
        let output = crew.kickoff(executor).await?;
        let mock_ui = mock_ui.generate(idea.trim(), self.product_spec(&output)).await;
        Ok(PipelineRun { output, mock_ui })
    }
}

fn idea_inputs(idea: &str) -> HashMap<String, String> {
    HashMap::from([("idea".to_string(), idea.trim().to_string())])
}

pub fn startup_crew(llm: &LlmRef, idea: &str) -> Result<Crew, CrewError> {
    Pipeline::Startup.build(llm, &idea_inputs(idea))
}

pub fn hackathon_crew(llm: &LlmRef, idea: &str) -> Result<Crew, CrewError> {
    Pipeline::Hackathon.build(llm, &idea_inputs(idea))
}

pub fn docs_crew(llm: &LlmRef, topic: &str, language: &str) -> Result<Crew, CrewError> {
    let inputs = HashMap::from([
        ("topic".to_string(), topic.to_string()),
        ("language".to_string(), language.to_string()),
    ]);
    Pipeline::Docs.build(llm, &inputs)
}
