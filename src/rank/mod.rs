// src/rank/mod.rs
//! # Ranking & Labeling
//! Pure, single pass over a whole pool of evaluated items:
//!
//! 1. value score per item (engineer score, trust rank, actionability)
//! 2. dynamic thresholds from the pool's 90th / 70th percentile
//! 3. labels for items that do not carry one yet
//! 4. guaranteed `must_read` / `recommended` slots, preferring non-social items
//! 5. placeholder padding up to the minimum output size
//! 6. stable sort by value score, placeholders last
//!
//! The freshness filter runs before this, in the ingest layer.

pub mod label;
pub mod thresholds;
pub mod trust;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::evaluate::{Evaluations, Persona};
use crate::item::{Item, SourceTier};

pub use label::{Label, LabelReason};
pub use thresholds::Thresholds;
pub use trust::{trust_rank, TrustRank};

pub const DEFAULT_MINIMUM_SIZE: usize = 20;

pub const PLACEHOLDER_TAG: &str = "placeholder";
pub const PLACEHOLDER_VALUE_SCORE: f32 = 0.0;
pub const PLACEHOLDER_SOURCE: &str = "Daily AI News";

const W_ENGINEER: f32 = 0.72;
const W_TRUST: f32 = 0.10;
const W_ACTIONABILITY: f32 = 0.18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankConfig {
    pub minimum_size: usize,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            minimum_size: DEFAULT_MINIMUM_SIZE,
        }
    }
}

/// An item with its persona evaluations, optionally already labeled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluatedItem {
    pub item: Item,
    #[serde(default)]
    pub evaluations: Evaluations,
    #[serde(default)]
    pub label: Option<Label>,
    #[serde(default)]
    pub label_reason: Option<LabelReason>,
}

impl EvaluatedItem {
    pub fn new(item: Item, evaluations: Evaluations) -> Self {
        Self {
            item,
            evaluations,
            label: None,
            label_reason: None,
        }
    }

    /// Pre-set a label; ranking keeps it.
    pub fn with_label(mut self, label: Label) -> Self {
        self.label = Some(label);
        self.label_reason = Some(LabelReason::Preserved);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedItem {
    pub item: Item,
    pub evaluations: Evaluations,
    #[serde(rename = "_valueScore")]
    pub value_score: f32,
    pub trust_rank: TrustRank,
    pub label: Label,
    pub label_reason: LabelReason,
    pub placeholder: bool,
}

impl RankedItem {
    /// Canonical engineer `totalScore`, if evaluated.
    pub fn engineer_score(&self) -> Option<f32> {
        self.evaluations
            .get(&Persona::Engineer)
            .map(|e| e.total_score)
    }
}

impl From<RankedItem> for EvaluatedItem {
    fn from(r: RankedItem) -> Self {
        Self {
            item: r.item,
            evaluations: r.evaluations,
            label: Some(r.label),
            label_reason: Some(r.label_reason),
        }
    }
}

/// `0.72·engineerTotal + 0.10·[trust is high] + 0.18·engineerActionability`.
/// Items without an engineer evaluation contribute 0 for both persona terms.
pub fn value_score(item: &Item, evaluations: &Evaluations) -> f32 {
    let (total, action) = evaluations
        .get(&Persona::Engineer)
        .map(|e| (e.total_score, e.breakdown.actionability))
        .unwrap_or((0.0, 0.0));
    let trust = match trust_rank(item) {
        TrustRank::High => 1.0,
        TrustRank::Normal => 0.0,
    };
    (W_ENGINEER * total + W_TRUST * trust + W_ACTIONABILITY * action).clamp(0.0, 1.0)
}

pub fn is_placeholder(item: &Item) -> bool {
    item.tags.contains(PLACEHOLDER_TAG)
}

struct Slot {
    item: Item,
    evaluations: Evaluations,
    value_score: f32,
    trust_rank: TrustRank,
    label: Option<Label>,
    reason: Option<LabelReason>,
    /// Arrived labeled; never relabeled or promoted.
    fixed: bool,
}

/// Rank and label a pool. Total: any pool, including an empty one, yields a
/// sequence of at least `cfg.minimum_size` items.
pub fn rank(pool: Vec<EvaluatedItem>, cfg: &RankConfig) -> Vec<RankedItem> {
    // Placeholders from an earlier pass are regenerated, never re-ranked.
    let mut slots: Vec<Slot> = pool
        .into_iter()
        .filter(|e| !is_placeholder(&e.item))
        .map(|e| {
            let value_score = value_score(&e.item, &e.evaluations);
            let trust_rank = trust_rank(&e.item);
            let reason = e.label.map(|_| e.label_reason.unwrap_or(LabelReason::Preserved));
            Slot {
                item: e.item,
                evaluations: e.evaluations,
                value_score,
                trust_rank,
                fixed: e.label.is_some(),
                label: e.label,
                reason,
            }
        })
        .collect();

    let scores: Vec<f32> = slots.iter().map(|s| s.value_score).collect();
    let th = Thresholds::from_scores(&scores);
    debug!(
        target: "rank",
        pool = slots.len(),
        must_read = th.must_read,
        recommended = th.recommended,
        "thresholds"
    );

    assign_labels(&mut slots, &th);
    guarantee_diversity(&mut slots);

    let real = slots.len();
    let mut out: Vec<RankedItem> = slots
        .into_iter()
        .map(|s| RankedItem {
            item: s.item,
            evaluations: s.evaluations,
            value_score: s.value_score,
            trust_rank: s.trust_rank,
            label: s.label.unwrap_or(Label::Consider),
            label_reason: s.reason.unwrap_or(LabelReason::DefaultConsider),
            placeholder: false,
        })
        .collect();

    let missing = cfg.minimum_size.saturating_sub(real);
    if missing > 0 {
        debug!(target: "rank", real, missing, "padding with placeholders");
    }
    out.extend((0..missing).map(|n| placeholder(real + n + 1)));

    // Stable: equal scores keep input order; placeholders always trail.
    out.sort_by(|a, b| {
        a.placeholder
            .cmp(&b.placeholder)
            .then_with(|| b.value_score.total_cmp(&a.value_score))
    });
    out
}

fn assign_labels(slots: &mut [Slot], th: &Thresholds) {
    for s in slots.iter_mut().filter(|s| s.label.is_none()) {
        let (label, reason) = if s.value_score >= th.must_read {
            (Label::MustRead, LabelReason::MustReadThreshold)
        } else if s.value_score >= th.recommended {
            (Label::Recommended, LabelReason::RecommendedThreshold)
        } else if let Some(e) = s.evaluations.get(&Persona::Engineer) {
            (e.recommendation, LabelReason::PersonaRecommendation)
        } else {
            (Label::Consider, LabelReason::DefaultConsider)
        };
        s.label = Some(label);
        s.reason = Some(reason);
    }
}

fn guarantee_diversity(slots: &mut [Slot]) {
    if !slots.iter().any(|s| s.label == Some(Label::MustRead)) {
        let open = |s: &Slot| !s.fixed;
        let pick = best(slots, |s| open(s) && !s.item.is_social())
            .map(|i| (i, LabelReason::GuaranteedMustRead))
            .or_else(|| best(slots, open).map(|i| (i, LabelReason::GuaranteedMustReadFallback)));
        if let Some((i, reason)) = pick {
            promote(&mut slots[i], Label::MustRead, reason);
        }
    }

    if !slots.iter().any(|s| s.label == Some(Label::Recommended)) {
        let not_headline = |s: &Slot| !s.fixed && s.label != Some(Label::MustRead);
        let pick = best(slots, |s| not_headline(s) && !s.item.is_social())
            .map(|i| (i, LabelReason::GuaranteedRecommended))
            .or_else(|| {
                best(slots, not_headline).map(|i| (i, LabelReason::GuaranteedRecommendedFallback))
            });
        if let Some((i, reason)) = pick {
            promote(&mut slots[i], Label::Recommended, reason);
        }
    }
}

fn promote(slot: &mut Slot, label: Label, reason: LabelReason) {
    debug!(target: "rank", id = %slot.item.id, label = label.as_str(), ?reason, "promoted");
    slot.label = Some(label);
    slot.reason = Some(reason);
}

/// Index of the highest value score among slots matching `pred`; the first
/// one wins on ties.
fn best<F>(slots: &[Slot], pred: F) -> Option<usize>
where
    F: Fn(&Slot) -> bool,
{
    let mut found: Option<(usize, f32)> = None;
    for (i, s) in slots.iter().enumerate().filter(|(_, s)| pred(s)) {
        match found {
            Some((_, v)) if s.value_score <= v => {}
            _ => found = Some((i, s.value_score)),
        }
    }
    found.map(|(i, _)| i)
}

fn placeholder(n: usize) -> RankedItem {
    let title = format!("More AI news is on the way (#{n})");
    let item = Item::new(PLACEHOLDER_TAG, PLACEHOLDER_SOURCE, title, "")
        .with_tier(SourceTier::General)
        .tagged([PLACEHOLDER_TAG]);
    RankedItem {
        item,
        evaluations: Evaluations::new(),
        value_score: PLACEHOLDER_VALUE_SCORE,
        trust_rank: TrustRank::Normal,
        label: Label::Consider,
        label_reason: LabelReason::Placeholder,
        placeholder: true,
    }
}
