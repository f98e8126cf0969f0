//! Errors raised while declaring or running a crew.

/// Errors that can occur while declaring or running a crew.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CrewError {
    #[error("{entity} {field} cannot be empty")]
    EmptyField {
        entity: &'static str,
        field: &'static str,
    },

    #[error("A crew needs at least one task")]
    NoTasks,

    #[error("Duplicate task key '{0}'")]
    DuplicateTask(String),

    #[error("Duplicate agent key '{0}'")]
    DuplicateAgent(String),

    #[error("Task '{task}' depends on unknown task '{dependency}'")]
    UnknownDependency { task: String, dependency: String },

    #[error("Task '{0}' depends on itself")]
    SelfDependency(String),

    #[error("Task dependencies form a cycle through task '{task}'")]
    Cycle { task: String },

    #[error("Task '{task}' is assigned to agent '{agent}', which is not part of the crew")]
    UnknownAgent { task: String, agent: String },

    #[error("No input provided for placeholder '{{{placeholder}}}'")]
    MissingInput { placeholder: String },

    #[error("Invalid crew definition: {0}")]
    InvalidDefinition(String),

    #[error("Task '{task}' ({agent}) failed: {message}")]
    TaskFailed {
        task: String,
        agent: String,
        message: String,
    },
}

impl CrewError {
    /// True for errors detected before any task ran.
    pub fn is_declaration_error(&self) -> bool {
        !matches!(self, CrewError::TaskFailed { .. })
    }
}
