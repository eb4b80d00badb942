// tests/metrics.rs
use axum::body::{self, Body};
use chrono::{DateTime, TimeZone, Utc};
use http::{Request, StatusCode};
use tower::ServiceExt;

use daily_ai_news::config::{FeedSource, NewsConfig};
use daily_ai_news::ingest::providers::FeedProvider;
use daily_ai_news::ingest::types::SourceProvider;
use daily_ai_news::item::SourceTier;
use daily_ai_news::metrics::Metrics;
use daily_ai_news::pipeline;

const RSS_XML: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tests/fixtures/feed_rss.xml"
));

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 8, 20, 12, 0, 0).unwrap()
}

/// Value of an unlabeled series in the exposition text.
fn sample(text: &str, name: &str) -> Option<f64> {
    text.lines()
        .filter(|l| !l.starts_with('#'))
        .find_map(|l| {
            let (series, value) = l.split_once(' ')?;
            (series == name).then(|| value.trim().parse().ok())?
        })
}

#[tokio::test]
async fn metrics_endpoint_reports_pipeline_series() {
    let metrics = Metrics::init().expect("recorder installs once per process");
    // a second init reuses the same recorder
    let again = Metrics::init().expect("reuse");

    let source = FeedSource {
        name: "Lab Notes".into(),
        url: "https://lab.example.org/feed".into(),
        tier: SourceTier::Primary,
        max_items: 10,
    };
    let providers: Vec<Box<dyn SourceProvider>> =
        vec![Box::new(FeedProvider::from_fixture_str(source, RSS_XML))];
    let run = pipeline::run_daily(&NewsConfig::default(), &providers, now()).await;
    assert_eq!(run.ingest.items.len(), 2);

    let req = Request::builder()
        .method("GET")
        .uri("/metrics")
        .body(Body::empty())
        .unwrap();
    let resp = again.router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let text = String::from_utf8(
        body::to_bytes(resp.into_body(), 1024 * 1024)
            .await
            .unwrap()
            .to_vec(),
    )
    .unwrap();

    let kept = sample(&text, "ingest_kept_total").unwrap_or_default();
    assert!(kept >= 2.0, "ingest_kept_total = {kept}\n{text}");
    let parsed = sample(&text, "ingest_events_total").unwrap_or_default();
    assert!(parsed >= 4.0, "ingest_events_total = {parsed}\n{text}");
    assert_eq!(sample(&text, "rank_pool_size"), Some(2.0), "{text}");
    assert_eq!(
        sample(&text, "pipeline_last_run_ts"),
        Some(now().timestamp() as f64),
        "{text}"
    );
    drop(metrics);
}
