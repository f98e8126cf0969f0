//! # Hackathon-in-a-Box
//!
//! Small crews of LLM agents that turn a startup idea (or a documentation
//! topic) into text, plus a best-effort call to a wireframe service.
//!
//! ## Flow
//! ```text
//!   Config::from_env ──► Llm (shared handle) ──► Agents
//!                                                  │
//!   Tasks + dependencies ──► TaskGraph (validated) ─┤
//!                                                  ▼
//!                         Crew::kickoff ──► TaskExecutor ──► model
//!                                                  │
//!                                                  ▼
//!                         CrewOutput ──► MockUiClient (optional) ──► stdout / form
//! ```
//!
//! ## Modules
//! - `config`: environment configuration
//! - `llm`: chat completion client and the shared model handle
//! - `crew`: agents, tasks, the task graph and the sequential coordinator
//! - `pipelines`: the built-in docs, startup and hackathon crews
//! - `mock_ui`: wireframe side call
//! - `api`: the web form

pub mod api;
pub mod config;
pub mod crew;
pub mod llm;
pub mod logging;
pub mod mock_ui;
pub mod pipelines;
pub mod util;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use crew::{Crew, CrewError, CrewOutput};
pub use mock_ui::{MockUiClient, MockUiOutcome};
