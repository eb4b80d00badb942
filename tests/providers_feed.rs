// tests/providers_feed.rs
use daily_ai_news::config::FeedSource;
use daily_ai_news::ingest::providers::FeedProvider;
use daily_ai_news::ingest::types::SourceProvider;
use daily_ai_news::item::SourceTier;

const RSS_XML: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tests/fixtures/feed_rss.xml"
));
const ATOM_XML: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/atom.xml"));

fn source(name: &str, tier: SourceTier) -> FeedSource {
    FeedSource {
        name: name.into(),
        url: "https://example.invalid/feed".into(),
        tier,
        max_items: 10,
    }
}

#[tokio::test]
async fn rss_fixture_parses_all_entries() {
    let p = FeedProvider::from_fixture_str(source("Lab Notes", SourceTier::Primary), RSS_XML);
    let items = p.fetch_latest().await.expect("rss fixture should parse");
    assert_eq!(items.len(), 4);
    assert_eq!(p.name(), "Lab Notes");

    let first = &items[0];
    assert_eq!(first.title, "Open-source LLM inference server reaches 2x throughput");
    assert_eq!(first.url, "https://github.com/lab-example/fast-infer");
    assert!(first.content.starts_with("The new release of our open-source LLM"));
    assert!(!first.content.contains('<'));
    assert_eq!(
        first.published_at.map(|d| d.to_rfc3339()),
        Some("2025-08-20T08:00:00+00:00".to_string())
    );
    assert!(items.iter().all(|i| i.source_tier == SourceTier::Primary));
    assert!(items.iter().all(|i| !i.is_social()));

    // &nbsp; scrubbed before XML parsing
    assert_eq!(items[2].content, "Traffic changes start next month downtown.");
}

#[tokio::test]
async fn atom_fixture_uses_alternate_link_and_published_date() {
    let p = FeedProvider::from_fixture_str(source("Example AI Blog", SourceTier::General), ATOM_XML);
    let items = p.fetch_latest().await.expect("atom fixture should parse");
    assert_eq!(items.len(), 2);

    assert_eq!(items[0].title, "Fine-tuning a small model & shipping it");
    assert_eq!(items[0].url, "https://blog.example.com/posts/fine-tuning");
    assert_eq!(
        items[0].content,
        "How we used fine-tuning and an open model to build an AI assistant."
    );
    assert_eq!(
        items[0].published_at.map(|d| d.to_rfc3339()),
        Some("2025-08-20T04:00:00+00:00".to_string())
    );

    // no <published>: falls back to <updated>; <content> when no <summary>
    assert_eq!(items[1].url, "https://blog.example.com/posts/embeddings");
    assert_eq!(items[1].content, "Vector search with embedding models, explained.");
    assert!(items[1].published_at.is_some());
}

#[tokio::test]
async fn ids_are_stable_across_runs() {
    let a = FeedProvider::from_fixture_str(source("Lab Notes", SourceTier::Primary), RSS_XML)
        .fetch_latest()
        .await
        .unwrap();
    let b = FeedProvider::from_fixture_str(source("Lab Notes", SourceTier::Primary), RSS_XML)
        .fetch_latest()
        .await
        .unwrap();
    let ids_a: Vec<_> = a.iter().map(|i| i.id.clone()).collect();
    let ids_b: Vec<_> = b.iter().map(|i| i.id.clone()).collect();
    assert_eq!(ids_a, ids_b);
}
