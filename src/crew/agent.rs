//! Agent personas.

use crate::llm::LlmRef;

use super::CrewError;

/// A persona in a crew: role, goal, backstory and the shared model handle.
///
/// # Invariants
/// - `role`, `goal` and `backstory` are non-blank
/// - Immutable after construction
#[derive(Debug)]
pub struct Agent {
    role: String,
    goal: String,
    backstory: String,
    llm: LlmRef,
}

impl Agent {
    /// # Errors
    /// Returns `CrewError::EmptyField` if any text field is blank.
    pub fn new(
        role: impl Into<String>,
        goal: impl Into<String>,
        backstory: impl Into<String>,
        llm: LlmRef,
    ) -> Result<Self, CrewError> {
        let role = non_blank(role.into(), "role")?;
        let goal = non_blank(goal.into(), "goal")?;
        let backstory = non_blank(backstory.into(), "backstory")?;
        Ok(Self {
            role,
            goal,
            backstory,
            llm,
        })
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn goal(&self) -> &str {
        &self.goal
    }

    pub fn backstory(&self) -> &str {
        &self.backstory
    }

    pub fn llm(&self) -> &LlmRef {
        &self.llm
    }

    /// System prompt describing this persona to the model.
    pub fn system_prompt(&self) -> String {
        format!(
            "You are {}. {}\nYour personal goal is: {}\n\
             Answer as this persona, directly and in full.",
            self.role, self.backstory, self.goal
        )
    }
}

fn non_blank(value: String, field: &'static str) -> Result<String, CrewError> {
    if value.trim().is_empty() {
        return Err(CrewError::EmptyField {
            entity: "Agent",
            field,
        });
    }
    Ok(value)
}
