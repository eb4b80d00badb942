// src/lib.rs
// Public library surface for the service, the collect binary and integration tests.

pub mod api;
pub mod config;
pub mod evaluate;
pub mod ingest;
pub mod item;
pub mod metrics;
pub mod pipeline;
pub mod present;
pub mod rank;

// ---- Re-exports for stable public API ----
pub use crate::api::router;
pub use crate::evaluate::{EvaluationResult, Evaluator, Persona};
pub use crate::item::{Item, SourceTier};
pub use crate::rank::{rank, EvaluatedItem, RankConfig, RankedItem};

use shuttle_axum::axum::Router;

/// Full in-process app: API routes plus `/metrics`.
pub async fn app() -> anyhow::Result<Router> {
    let cfg = config::NewsConfig::load_default()?;
    let metrics = metrics::Metrics::init()?;
    Ok(api::router(api::AppState::from_config(&cfg)).merge(metrics.router()))
}
