// src/lib.rs
// Public library surface for the server binary, the CLI and integration tests.

pub mod analyze;
pub mod api;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod history;
pub mod logging;
pub mod metrics;

pub use crate::analyze::{AnalysisRequest, AnalysisResult, CredibilityService};
pub use crate::api::{router, AppState};

/// Build the full router from file/env configuration with an in-memory store.
/// No metrics recorder is installed here; the server binary does that.
pub async fn app() -> anyhow::Result<axum::Router> {
    let runtime = bootstrap::AppRuntime::load()?;
    Ok(api::router(AppState::new(runtime.service)))
}
