//! HTTP API for the coaching pipeline
//!
//! - POST /api/v1/upload - Create a job and mint an upload URL
//! - PUT /uploads/:token - Write audio bytes through an upload slot
//! - POST /api/v1/start/:job_id - Claim a pending job and run the pipeline
//! - GET /api/v1/status/:job_id - Poll job status/transcript/report
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
