//! One-shot daily build: fetch every configured source, rank, and write
//! `index.html` + `news.json` into the output directory.

use anyhow::Result;
use chrono::Utc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use daily_ai_news::config::NewsConfig;
use daily_ai_news::ingest::providers;
use daily_ai_news::pipeline;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("daily_ai_news=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_target(false))
        .init();

    let cfg = NewsConfig::load_default()?;
    let sources = providers::from_config(&cfg)?;
    tracing::info!(
        feeds = cfg.feeds.len(),
        spreadsheet = cfg.spreadsheet.is_some(),
        minimum = cfg.ranking.minimum_size,
        "collecting"
    );

    let run = pipeline::run_daily(&cfg, &sources, Utc::now()).await;
    let (html, json) = pipeline::write_site(&cfg.output.dir, &run)?;

    tracing::info!(
        html = %html.display(),
        json = %json.display(),
        items = run.presented.len(),
        "site written"
    );
    Ok(())
}
