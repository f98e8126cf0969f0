//! API request and response types.

use serde::{Deserialize, Serialize};

use crate::crew::CrewOutput;
use crate::mock_ui::MockUiOutcome;

/// Body of `POST /run` (urlencoded) and `POST /api/run` (JSON).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunRequest {
    #[serde(default)]
    pub idea: String,
}

/// Result of one form submission.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// Blank idea; the crew was not started.
    MissingIdea,
    Completed {
        idea: String,
        output: CrewOutput,
        mock_ui: MockUiOutcome,
    },
    Failed {
        idea: String,
        error: String,
    },
}

#[derive(Debug, Serialize)]
pub struct RunResponse<'a> {
    pub idea: &'a str,
    pub output: &'a str,
    pub crew: &'a CrewOutput,
    pub mock_ui: &'a MockUiOutcome,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}
