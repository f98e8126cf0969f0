//! HTTP API for the Hackathon-in-a-Box form.
//!
//! ## Endpoints
//! - `GET /` - Form page
//! - `POST /run` - Run the hackathon crew from the form
//! - `POST /api/run` - Same run, JSON in and out
//! - `GET /api/health` - Health check

mod page;
mod routes;
mod types;

pub use routes::{app, serve, AppState};
pub use types::{RunOutcome, RunRequest};
