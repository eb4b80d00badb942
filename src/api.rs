// src/api.rs
use std::sync::Arc;

use shuttle_axum::axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::config::NewsConfig;
use crate::evaluate::{EvaluationResult, Evaluator, Persona};
use crate::ingest::evaluate_pool;
use crate::item::Item;
use crate::present::{present, PresentedItem};
use crate::rank::{rank, RankConfig};

/// Upper bound on `minimum_size` a client may ask for.
pub const MAX_REQUESTED_MINIMUM: usize = 500;
/// Id prefix for items submitted without one.
pub const API_ID_PREFIX: &str = "api";

#[derive(Clone)]
pub struct AppState {
    rank: Arc<RankConfig>,
}

impl AppState {
    pub fn new(rank: RankConfig) -> Self {
        Self {
            rank: Arc::new(rank),
        }
    }

    pub fn from_config(cfg: &NewsConfig) -> Self {
        Self::new(cfg.rank_config())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(RankConfig::default())
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/evaluate", post(evaluate_one))
        .route("/rank", post(rank_items))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Deserialize)]
struct EvaluateReq {
    item: Item,
    #[serde(default = "default_persona")]
    persona: Persona,
}

fn default_persona() -> Persona {
    Persona::Engineer
}

async fn evaluate_one(Json(mut body): Json<EvaluateReq>) -> Json<EvaluationResult> {
    body.item.ensure_id(API_ID_PREFIX);
    let result = Evaluator::now().evaluate(&body.item, body.persona);
    tracing::debug!(
        target: "api",
        id = %body.item.id,
        persona = body.persona.as_str(),
        total = result.total_score,
        "evaluated"
    );
    Json(result)
}

#[derive(serde::Deserialize)]
struct RankReq {
    items: Vec<Item>,
    #[serde(default)]
    minimum_size: Option<usize>,
}

async fn rank_items(
    State(state): State<AppState>,
    Json(body): Json<RankReq>,
) -> Result<Json<Vec<PresentedItem>>, (StatusCode, String)> {
    let minimum_size = body.minimum_size.unwrap_or(state.rank.minimum_size);
    if minimum_size > MAX_REQUESTED_MINIMUM {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("minimum_size must be at most {MAX_REQUESTED_MINIMUM}"),
        ));
    }

    let items: Vec<Item> = body
        .items
        .into_iter()
        .map(|mut it| {
            it.ensure_id(API_ID_PREFIX);
            it
        })
        .collect();
    let count = items.len();

    let pool = evaluate_pool(items, &Evaluator::now());
    let ranked = rank(pool, &RankConfig { minimum_size });
    tracing::info!(target: "api", items = count, out = ranked.len(), "ranked");
    Ok(Json(present(&ranked)))
}
