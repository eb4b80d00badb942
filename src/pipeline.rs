// src/pipeline.rs
//! One daily run: providers -> clean -> evaluate -> rank -> present.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use metrics::{counter, gauge};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::NewsConfig;
use crate::evaluate::Evaluator;
use crate::ingest::{self, types::SourceProvider, IngestReport};
use crate::present::{self, PresentedItem};
use crate::rank::{self, RankedItem};

#[derive(Debug, Clone)]
pub struct DailyRun {
    pub generated_at: DateTime<Utc>,
    pub ingest: IngestReport,
    pub ranked: Vec<RankedItem>,
    pub presented: Vec<PresentedItem>,
}

/// Evaluation and freshness both use `now`, so a run is reproducible for a
/// fixed clock and fixed provider output.
pub async fn run_daily(
    cfg: &NewsConfig,
    providers: &[Box<dyn SourceProvider>],
    now: DateTime<Utc>,
) -> DailyRun {
    let report = ingest::run_once(providers, now, cfg.max_age()).await;
    let evaluator = Evaluator::at(now);
    let pool = ingest::evaluate_pool(report.items.clone(), &evaluator);

    let ranked = rank::rank(pool, &cfg.rank_config());
    record(&ranked, now);

    let presented = present::present(&ranked);
    DailyRun {
        generated_at: now,
        ingest: report,
        ranked,
        presented,
    }
}

fn record(ranked: &[RankedItem], now: DateTime<Utc>) {
    let real = ranked.iter().filter(|r| !r.placeholder).count();
    let placeholders = ranked.len() - real;
    let promotions = ranked
        .iter()
        .filter(|r| r.label_reason.is_promotion())
        .count();

    gauge!("rank_pool_size").set(real as f64);
    counter!("rank_placeholders_total").increment(placeholders as u64);
    counter!("rank_promotions_total").increment(promotions as u64);
    gauge!("pipeline_last_run_ts").set(now.timestamp() as f64);

    info!(
        target: "pipeline",
        real,
        placeholders,
        promotions,
        "daily run ranked"
    );
}

pub const HTML_FILE: &str = "index.html";
pub const JSON_FILE: &str = "news.json";

/// Write `index.html` and `news.json` into `dir`, creating it if needed.
/// Returns the two paths written.
pub fn write_site(dir: &Path, run: &DailyRun) -> Result<(PathBuf, PathBuf)> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let html_path = dir.join(HTML_FILE);
    let html = present::render_html(&run.presented, run.generated_at);
    fs::write(&html_path, html).with_context(|| format!("writing {}", html_path.display()))?;

    let json_path = dir.join(JSON_FILE);
    let json = present::to_json(&run.presented).context("serializing news.json")?;
    fs::write(&json_path, json).with_context(|| format!("writing {}", json_path.display()))?;

    Ok((html_path, json_path))
}
