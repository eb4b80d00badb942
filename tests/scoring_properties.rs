// tests/scoring_properties.rs
//
// Seeded randomized checks over the evaluator: bounds, determinism,
// keyword monotonicity and temporal decay.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use daily_ai_news::evaluate::{Axis, Evaluator, Persona};
use daily_ai_news::item::{Item, SourceTier};

const VOCAB: &[&str] = &[
    "model", "github", "benchmark", "the", "weather", "market", "startup", "research", "paper",
    "tutorial", "breaking", "today", "revolutionary", "guaranteed", "arxiv", "strategy", "roi",
    "fundamentals", "gpu", "inference", "coffee", "and", "of", "学習", "モデル", "AI", "LLM",
];

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 8, 20, 12, 0, 0).unwrap()
}

fn random_text(rng: &mut StdRng, words: usize) -> String {
    (0..words)
        .map(|_| VOCAB[rng.random_range(0..VOCAB.len())])
        .collect::<Vec<_>>()
        .join(" ")
}

fn random_item(rng: &mut StdRng) -> Item {
    let title_words = rng.random_range(0..8);
    let title = random_text(rng, title_words);
    let content_words = rng.random_range(0..120);
    let content = random_text(rng, content_words);
    let source = if rng.random_bool(0.3) { "X(@someone)" } else { "Lab Blog" };
    let mut item = Item::new("rss", source, title, content);
    if rng.random_bool(0.5) {
        item = item.with_tier(SourceTier::Primary);
    }
    if rng.random_bool(0.5) {
        item = item.with_url("https://github.com/example/repo");
    }
    if rng.random_bool(0.8) {
        // includes future instants
        let hours = rng.random_range(-48..24 * 30);
        item = item.published(now() - Duration::hours(hours));
    }
    item
}

#[test]
fn scores_stay_in_unit_interval() {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let ev = Evaluator::at(now());
    for _ in 0..500 {
        let item = random_item(&mut rng);
        for p in Persona::ALL {
            let r = ev.evaluate(&item, p);
            assert!((0.0..=1.0).contains(&r.total_score), "total {}", r.total_score);
            for a in Axis::ALL {
                let v = r.breakdown.get(a);
                assert!((0.0..=1.0).contains(&v), "{a:?} = {v}");
            }
        }
    }
}

#[test]
fn evaluation_is_deterministic() {
    let mut rng = StdRng::seed_from_u64(7);
    let ev = Evaluator::at(now());
    for _ in 0..100 {
        let item = random_item(&mut rng);
        assert_eq!(ev.evaluate_all(&item), ev.evaluate_all(&item.clone()));
    }
}

#[test]
fn extra_high_value_keyword_never_lowers_relevance() {
    let mut rng = StdRng::seed_from_u64(42);
    let ev = Evaluator::at(now());
    for _ in 0..300 {
        let item = random_item(&mut rng);
        let before = ev.evaluate(&item, Persona::Engineer).breakdown.relevance;
        let mut richer = item.clone();
        richer.content.push_str(" implementation");
        let after = ev.evaluate(&richer, Persona::Engineer).breakdown.relevance;
        assert!(after >= before, "{after} < {before}");
    }
}

#[test]
fn older_items_never_gain_temporal_score() {
    let mut rng = StdRng::seed_from_u64(99);
    let ev = Evaluator::at(now());
    for _ in 0..200 {
        let base = random_item(&mut rng);
        let h1 = rng.random_range(0..24 * 14);
        let h2 = h1 + rng.random_range(1..24 * 7);
        let newer = base.clone().published(now() - Duration::hours(h1));
        let older = base.published(now() - Duration::hours(h2));
        for p in Persona::ALL {
            let tn = ev.evaluate(&newer, p).breakdown.temporal;
            let to = ev.evaluate(&older, p).breakdown.temporal;
            assert!(to <= tn, "older {to} > newer {tn}");
        }
    }
}
