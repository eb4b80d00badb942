// src/ingest/mod.rs
pub mod providers;
pub mod types;

use crate::evaluate::Evaluator;
use crate::ingest::types::SourceProvider;
use crate::item::Item;
use crate::rank::EvaluatedItem;
use chrono::{DateTime, Duration, Utc};
use metrics::{counter, describe_counter, describe_histogram};
use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;
use std::collections::HashSet;

pub const MAX_TEXT_CHARS: usize = 1500;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("ingest_events_total", "Total items parsed from providers.");
        describe_counter!(
            "ingest_kept_total",
            "Items kept after normalization, AI filter, freshness and dedup."
        );
        describe_counter!(
            "ingest_filtered_total",
            "Items dropped as empty or not AI related."
        );
        describe_counter!("ingest_stale_total", "Items older than the freshness ceiling.");
        describe_counter!("ingest_dedup_total", "Items removed as duplicate ids within a run.");
        describe_counter!(
            "ingest_provider_errors_total",
            "Provider fetch/parse errors."
        );
        describe_histogram!("ingest_parse_ms", "Provider parse time in milliseconds.");
    });
}

static RE_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)</?[^>]+>").expect("tag regex"));
static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// HTML entity decode, tag strip, quote folding, whitespace collapse, length cap.
pub fn normalize_text(s: &str) -> String {
    let decoded = html_escape::decode_html_entities(s);
    let stripped = RE_TAGS.replace_all(&decoded, " ");

    // “ ” « » -> "   ‘ ’ -> '
    let folded = stripped
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    let out = RE_WS.replace_all(&folded, " ");
    let out = out.trim();

    if out.chars().count() > MAX_TEXT_CHARS {
        out.chars().take(MAX_TEXT_CHARS).collect()
    } else {
        out.to_string()
    }
}

/// Multi-word or non-ASCII terms, matched as lower-cased substrings.
const AI_TERMS: &[&str] = &[
    "artificial intelligence",
    "machine learning",
    "deep learning",
    "neural network",
    "chatgpt",
    "gpt-4",
    "gpt-5",
    "claude",
    "gemini",
    "openai",
    "anthropic",
    "transformer",
    "diffusion",
    "embedding",
    "pytorch",
    "tensorflow",
    "hugging face",
    "langchain",
    "vector database",
    "fine-tuning",
    "prompt engineering",
    "multimodal",
    "computer vision",
    "人工知能",
    "機械学習",
    "ディープラーニング",
    "生成ai",
    "チャットgpt",
];

/// Short tokens need word boundaries ("ai" must not match "said").
static RE_AI_TOKENS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(ai|ml|llms?|rag|gpt)\b").expect("ai token regex"));

pub fn is_ai_related(text: &str) -> bool {
    let lower = text.to_lowercase();
    AI_TERMS.iter().any(|t| lower.contains(t)) || RE_AI_TOKENS.is_match(text)
}

/// Outcome of one ingest pass.
#[derive(Debug, Default, Clone)]
pub struct IngestReport {
    pub items: Vec<Item>,
    pub filtered: usize,
    pub stale: usize,
    pub dedup: usize,
}

/// Normalize, AI-filter, drop stale items and in-run duplicate ids.
/// Items without `published_at` are never stale.
pub fn normalize_filter_dedup(
    now: DateTime<Utc>,
    raw: Vec<Item>,
    max_age: Duration,
) -> IngestReport {
    let cutoff = now - max_age;
    let mut report = IngestReport::default();
    let mut seen: HashSet<String> = HashSet::new();

    for mut item in raw {
        item.title = normalize_text(&item.title);
        item.content = normalize_text(&item.content);
        if (item.title.is_empty() && item.content.is_empty()) || !is_ai_related(&item.full_text()) {
            report.filtered += 1;
            continue;
        }
        if item.published_at.is_some_and(|p| p < cutoff) {
            report.stale += 1;
            continue;
        }
        if !seen.insert(item.id.clone()) {
            report.dedup += 1;
            continue;
        }
        report.items.push(item);
    }
    report
}

/// Fetch every provider once and clean the combined result.
/// A failing provider is logged and contributes nothing.
pub async fn run_once(
    providers: &[Box<dyn SourceProvider>],
    now: DateTime<Utc>,
    max_age: Duration,
) -> IngestReport {
    ensure_metrics_described();

    let mut raw = Vec::new();
    for p in providers {
        match p.fetch_latest().await {
            Ok(mut v) => {
                tracing::debug!(target: "ingest", provider = p.name(), count = v.len(), "fetched");
                raw.append(&mut v);
            }
            Err(e) => {
                tracing::warn!(error = ?e, provider = p.name(), "provider error");
                counter!("ingest_provider_errors_total").increment(1);
            }
        }
    }

    let report = normalize_filter_dedup(now, raw, max_age);

    counter!("ingest_kept_total").increment(report.items.len() as u64);
    counter!("ingest_filtered_total").increment(report.filtered as u64);
    counter!("ingest_stale_total").increment(report.stale as u64);
    counter!("ingest_dedup_total").increment(report.dedup as u64);
    tracing::info!(
        target: "ingest",
        kept = report.items.len(),
        filtered = report.filtered,
        stale = report.stale,
        dedup = report.dedup,
        "ingest pass done"
    );

    report
}

/// Attach an evaluation for every persona to every item.
pub fn evaluate_pool(items: Vec<Item>, evaluator: &Evaluator) -> Vec<EvaluatedItem> {
    items
        .into_iter()
        .map(|item| {
            let evaluations = evaluator.evaluate_all(&item);
            EvaluatedItem::new(item, evaluations)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluate::Persona;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 20, 12, 0, 0).unwrap()
    }

    #[test]
    fn normalize_text_decodes_and_collapses() {
        let s = "  <p>OpenAI&nbsp;&nbsp;ships   <b>“new”</b> model.</p>  ";
        assert_eq!(normalize_text(s), "OpenAI ships \"new\" model.");
    }

    #[test]
    fn normalize_text_caps_length() {
        let long = "a".repeat(MAX_TEXT_CHARS + 50);
        assert_eq!(normalize_text(&long).chars().count(), MAX_TEXT_CHARS);
    }

    #[test]
    fn ai_filter_uses_word_boundaries_for_short_tokens() {
        assert!(is_ai_related("New AI chip announced"));
        assert!(is_ai_related("Scaling LLMs on a budget"));
        assert!(is_ai_related("生成AIの活用事例"));
        assert!(is_ai_related("A primer on machine learning"));
        assert!(!is_ai_related("He said the weather was fine"));
        assert!(!is_ai_related("HTML email templates"));
    }

    #[test]
    fn filters_stale_keeps_undated_and_dedups() {
        let fresh = Item::new("rss", "S", "AI news", "fresh AI story").published(now() - Duration::hours(2));
        let dup = fresh.clone();
        let old = Item::new("rss", "S", "AI news", "old AI story").published(now() - Duration::days(9));
        let undated = Item::new("rss", "S", "AI news", "undated AI story");
        let off_topic = Item::new("rss", "S", "Gardening", "tomatoes in July");

        let r = normalize_filter_dedup(now(), vec![fresh, dup, old, undated, off_topic], Duration::days(7));
        assert_eq!(r.items.len(), 2);
        assert_eq!(r.stale, 1);
        assert_eq!(r.dedup, 1);
        assert_eq!(r.filtered, 1);
    }

    #[test]
    fn evaluate_pool_covers_every_persona() {
        let items = vec![Item::new("rss", "S", "AI model", "a new machine learning model")];
        let pool = evaluate_pool(items, &Evaluator::at(now()));
        assert_eq!(pool.len(), 1);
        for p in Persona::ALL {
            assert!(pool[0].evaluations.contains_key(&p));
        }
        assert!(pool[0].label.is_none());
    }
}
