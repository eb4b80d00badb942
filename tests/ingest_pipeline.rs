// tests/ingest_pipeline.rs
use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use daily_ai_news::config::{FeedSource, NewsConfig};
use daily_ai_news::ingest::providers::{FeedProvider, SpreadsheetProvider};
use daily_ai_news::ingest::types::SourceProvider;
use daily_ai_news::item::{Item, SourceTier};
use daily_ai_news::rank::Label;
use daily_ai_news::{ingest, pipeline};

const RSS_XML: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tests/fixtures/feed_rss.xml"
));
const ATOM_XML: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/atom.xml"));
const CSV: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/x_posts.csv"));

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 8, 20, 12, 0, 0).unwrap()
}

struct MockProvider;

#[async_trait]
impl SourceProvider for MockProvider {
    async fn fetch_latest(&self) -> Result<Vec<Item>> {
        Ok(vec![Item::new(
            "rss",
            "Mock",
            "<b>AI&nbsp;update</b>",
            "&ldquo;ok&rdquo; <i>model</i> notes",
        )])
    }
    fn name(&self) -> &str {
        "MockProvider"
    }
}

struct BrokenProvider;

#[async_trait]
impl SourceProvider for BrokenProvider {
    async fn fetch_latest(&self) -> Result<Vec<Item>> {
        bail!("connection refused")
    }
    fn name(&self) -> &str {
        "BrokenProvider"
    }
}

fn fixture_providers() -> Vec<Box<dyn SourceProvider>> {
    let feed = |name: &str, tier| FeedSource {
        name: name.into(),
        url: "https://example.invalid/feed".into(),
        tier,
        max_items: 10,
    };
    vec![
        Box::new(SpreadsheetProvider::from_fixture_str(CSV, 30)),
        Box::new(FeedProvider::from_fixture_str(feed("Lab Notes", SourceTier::Primary), RSS_XML)),
        Box::new(FeedProvider::from_fixture_str(feed("Example AI Blog", SourceTier::General), ATOM_XML)),
        Box::new(BrokenProvider),
    ]
}

#[tokio::test]
async fn smoke_pipeline_normalizes_text() {
    let providers: Vec<Box<dyn SourceProvider>> = vec![Box::new(MockProvider)];
    let out = ingest::run_once(&providers, now(), Duration::days(7)).await;
    assert_eq!(out.items.len(), 1);
    assert_eq!(out.items[0].title, "AI update");
    assert_eq!(out.items[0].content, r#""ok" model notes"#);
}

#[tokio::test]
async fn failing_provider_contributes_nothing() {
    let providers: Vec<Box<dyn SourceProvider>> = vec![Box::new(BrokenProvider), Box::new(MockProvider)];
    let out = ingest::run_once(&providers, now(), Duration::days(7)).await;
    assert_eq!(out.items.len(), 1);
}

#[tokio::test]
async fn fixtures_filter_stale_off_topic_and_duplicates() {
    let out = ingest::run_once(&fixture_providers(), now(), Duration::days(7)).await;
    // rss: bike lanes off-topic, 2024 retrospective stale
    // csv: travelbug off-topic, oldnews stale, one repeated post
    assert_eq!(out.filtered, 2);
    assert_eq!(out.stale, 2);
    assert_eq!(out.dedup, 1);
    assert_eq!(out.items.len(), 6);

    let mut ids: Vec<_> = out.items.iter().map(|i| i.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 6);
}

#[tokio::test]
async fn daily_run_pads_and_labels() {
    let cfg = NewsConfig::default_seed();
    let run = pipeline::run_daily(&cfg, &fixture_providers(), now()).await;

    assert_eq!(run.ranked.len(), 20);
    assert_eq!(run.presented.len(), 20);
    assert_eq!(run.ranked.iter().filter(|r| !r.placeholder).count(), 6);
    assert!(run.ranked[..6].iter().all(|r| !r.placeholder));
    assert!(run.ranked.iter().any(|r| r.label == Label::MustRead));
    assert!(run.ranked.iter().any(|r| r.label == Label::Recommended));
    for w in run.ranked[..6].windows(2) {
        assert!(w[0].value_score >= w[1].value_score);
    }
    // the GitHub-hosted primary feed entry leads the page
    assert_eq!(run.ranked[0].item.url, "https://github.com/lab-example/fast-infer");
}
