//! YAML crew definitions with `{placeholder}` inputs.
//!
//! ```yaml
//! name: docs
//! agents:
//!   - key: summarizer
//!     role: Documentation Summarizer
//!     goal: Create concise summaries of technical documentation
//!     backstory: Technical writer who excels at simplifying complex concepts
//! tasks:
//!   - key: summary
//!     description: give a detailed summary about {topic}
//!     expected_output: A clear, concise summary
//!     agent: summarizer
//!     dependencies: []
//! ```

use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde::Deserialize;

use super::{Agent, Crew, CrewError, Task};
use crate::llm::LlmRef;

#[derive(Debug, Clone, Deserialize)]
pub struct AgentDefinition {
    pub key: String,
    pub role: String,
    pub goal: String,
    pub backstory: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaskDefinition {
    pub key: String,
    pub description: String,
    pub expected_output: String,
    /// Key of the agent in `agents`
    pub agent: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrewDefinition {
    #[serde(default = "default_name")]
    pub name: String,
    pub agents: Vec<AgentDefinition>,
    pub tasks: Vec<TaskDefinition>,
}

fn default_name() -> String {
    "crew".to_string()
}

impl CrewDefinition {
    pub fn from_yaml(source: &str) -> Result<Self, CrewError> {
        serde_yaml::from_str(source).map_err(|e| CrewError::InvalidDefinition(e.to_string()))
    }

    pub fn from_file(path: &Path) -> Result<Self, CrewError> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            CrewError::InvalidDefinition(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&source)
    }

    /// Every placeholder name used in agent or task text.
    pub fn placeholders(&self) -> BTreeSet<String> {
        let agent_text = self
            .agents
            .iter()
            .flat_map(|a| [a.role.as_str(), a.goal.as_str(), a.backstory.as_str()]);
        let task_text = self
            .tasks
            .iter()
            .flat_map(|t| [t.description.as_str(), t.expected_output.as_str()]);

        agent_text
            .chain(task_text)
            .flat_map(|text| placeholder_re().captures_iter(text))
            .map(|caps| caps[1].to_string())
            .collect()
    }

    /// Interpolate `inputs` and build a validated crew on the shared `llm`.
    pub fn build(&self, llm: &LlmRef, inputs: &HashMap<String, String>) -> Result<Crew, CrewError> {
        let mut agents: Vec<Arc<Agent>> = Vec::with_capacity(self.agents.len());
        let mut by_key: HashMap<&str, Arc<Agent>> = HashMap::with_capacity(self.agents.len());

        for def in &self.agents {
            let agent = Arc::new(Agent::new(
                interpolate(&def.role, inputs)?,
                interpolate(&def.goal, inputs)?,
                interpolate(&def.backstory, inputs)?,
                Arc::clone(llm),
            )?);
            if by_key.insert(def.key.as_str(), Arc::clone(&agent)).is_some() {
                return Err(CrewError::DuplicateAgent(def.key.clone()));
            }
            agents.push(agent);
        }

        let tasks = self
            .tasks
            .iter()
            .map(|def| -> Result<Task, CrewError> {
                let agent = by_key.get(def.agent.as_str()).ok_or_else(|| CrewError::UnknownAgent {
                    task: def.key.clone(),
                    agent: def.agent.clone(),
                })?;
                Ok(Task::new(
                    def.key.as_str(),
                    interpolate(&def.description, inputs)?,
                    interpolate(&def.expected_output, inputs)?,
                    Arc::clone(agent),
                )?
                .with_dependencies(def.dependencies.iter().cloned()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Crew::new(self.name.as_str(), agents, tasks)
    }
}

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder regex"))
}

/// Replace every `{name}` in `text` with `inputs[name]`.
///
/// Braces that do not enclose an identifier are left untouched.
///
/// # Errors
/// `CrewError::MissingInput` for the first placeholder without an input.
pub fn interpolate(text: &str, inputs: &HashMap<String, String>) -> Result<String, CrewError> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in placeholder_re().captures_iter(text) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let name = name.as_str();
        let value = inputs.get(name).ok_or_else(|| CrewError::MissingInput {
            placeholder: name.to_string(),
        })?;
        out.push_str(&text[last..whole.start()]);
        out.push_str(value);
        last = whole.end();
    }
    out.push_str(&text[last..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{offline_llm, RecordingExecutor};
    use std::io::Write;

    const DOCS: &str = r#"
name: docs
agents:
  - key: summarizer
    role: Documentation Summarizer
    goal: Create concise summaries of technical documentation
    backstory: Technical writer who excels at simplifying complex concepts
  - key: translator
    role: Technical Translator
    goal: Translate technical documentation to other languages
    backstory: Technical translator specializing in software documentation
tasks:
  - key: summary
    description: give a detailed summary about {topic}
    expected_output: A clear, concise summary of the hook's functionality
    agent: summarizer
  - key: translation
    description: Translate the summary to {language}
    expected_output: "{language} translation of the hook documentation"
    agent: translator
    dependencies: [summary]
"#;

    fn inputs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn interpolate_replaces_identifiers_only() {
        let text = "Idea: {idea}\nReturn JSON like {\"screens\": []} for {idea}";
        let out = interpolate(text, &inputs(&[("idea", "pet-sitting marketplace app")])).unwrap();
        assert_eq!(
            out,
            concat!(
                "Idea: pet-sitting marketplace app\n",
                "Return JSON like {\"screens\": []} for pet-sitting marketplace app"
            )
        );
    }

    #[test]
    fn interpolate_reports_missing_input() {
        let err = interpolate("Idea: {idea}", &HashMap::new()).unwrap_err();
        assert!(
            matches!(err, CrewError::MissingInput { ref placeholder } if placeholder == "idea")
        );
        assert_eq!(err.to_string(), "No input provided for placeholder '{idea}'");
    }

    #[tokio::test]
    async fn builds_and_runs_definition() {
        let def = CrewDefinition::from_yaml(DOCS).unwrap();
        assert_eq!(
            def.placeholders().into_iter().collect::<Vec<_>>(),
            ["language", "topic"]
        );

        let crew = def
            .build(
                &offline_llm(),
                &inputs(&[("topic", "the react hook useEffect"), ("language", "Turkish")]),
            )
            .unwrap();
        assert_eq!(crew.name(), "docs");
        assert_eq!(crew.agents().len(), 2);
        let translation = crew.graph().get("translation").unwrap();
        assert_eq!(translation.description(), "Translate the summary to Turkish");
        assert_eq!(translation.agent().role(), "Technical Translator");

        let executor = RecordingExecutor::new();
        crew.kickoff(&executor).await.unwrap();
        assert_eq!(executor.calls(), ["summary", "translation"]);
    }

    #[test]
    fn unknown_agent_key_is_rejected() {
        let def = CrewDefinition::from_yaml(
            r#"
agents:
  - key: writer
    role: Pitch Writer
    goal: Write a 1-min verbal pitch.
    backstory: Turns ideas into investor-friendly hooks.
tasks:
  - key: pitch
    description: Write 1-min pitch
    expected_output: Pitch script.
    agent: marketer
"#,
        )
        .unwrap();
        assert_eq!(def.name, "crew");
        let err = def.build(&offline_llm(), &HashMap::new()).unwrap_err();
        assert!(matches!(err, CrewError::UnknownAgent { ref agent, .. } if agent == "marketer"));
    }

    #[test]
    fn cyclic_definition_fails_fast() {
        let def = CrewDefinition::from_yaml(
            r#"
agents:
  - key: designer
    role: Product Designer
    goal: Make a fast-to-build roadmap.
    backstory: Scopes MVPs & milestones quickly.
tasks:
  - key: roadmap
    description: Plan the MVP
    expected_output: Product plan.
    agent: designer
    dependencies: [ui]
  - key: ui
    description: List the screens
    expected_output: UI spec JSON.
    agent: designer
    dependencies: [roadmap]
"#,
        )
        .unwrap();
        let err = def.build(&offline_llm(), &HashMap::new()).unwrap_err();
        assert!(matches!(err, CrewError::Cycle { .. }));
    }

    #[test]
    fn malformed_yaml_is_an_invalid_definition() {
        let err = CrewDefinition::from_yaml("agents: [unterminated").unwrap_err();
        assert!(matches!(err, CrewError::InvalidDefinition(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DOCS.as_bytes()).unwrap();
        let def = CrewDefinition::from_file(file.path()).unwrap();
        assert_eq!(def.tasks.len(), 2);

        let missing = CrewDefinition::from_file(Path::new("/nonexistent/crew.yaml")).unwrap_err();
        assert!(missing.to_string().contains("cannot read"));
    }
}
