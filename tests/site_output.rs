// tests/site_output.rs
use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use daily_ai_news::config::NewsConfig;
use daily_ai_news::ingest::types::SourceProvider;
use daily_ai_news::item::{Item, SourceTier};
use daily_ai_news::pipeline;
use daily_ai_news::present::PresentedItem;

struct OneItem;

#[async_trait]
impl SourceProvider for OneItem {
    async fn fetch_latest(&self) -> anyhow::Result<Vec<Item>> {
        Ok(vec![Item::new("rss", "Lab Blog", "Model release & notes for v1 < v2", "new AI model weights")
            .with_tier(SourceTier::Primary)
            .with_url("https://example.org/post")])
    }
    fn name(&self) -> &str {
        "OneItem"
    }
}

#[tokio::test]
async fn collect_writes_html_and_json() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = NewsConfig::default_seed();
    cfg.ranking.minimum_size = 4;
    cfg.output.dir = dir.path().join("site");

    let providers: Vec<Box<dyn SourceProvider>> = vec![Box::new(OneItem)];
    let now = Utc.with_ymd_and_hms(2025, 8, 20, 12, 0, 0).unwrap();
    let run = pipeline::run_daily(&cfg, &providers, now).await;
    let (html, json) = pipeline::write_site(&cfg.output.dir, &run).unwrap();

    let page = std::fs::read_to_string(html).unwrap();
    assert!(page.contains("Model release &amp; notes for v1 &lt; v2"));
    assert!(page.contains("2025-08-20T12:00:00Z"));

    let items: Vec<PresentedItem> =
        serde_json::from_str(&std::fs::read_to_string(json).unwrap()).unwrap();
    assert_eq!(items.len(), 4);
    assert_eq!(items[0].title, "Model release & notes for v1 < v2");
    assert!(items[0].published_at.is_none());
}
