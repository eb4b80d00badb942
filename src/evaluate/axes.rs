//! The five scoring axes. Each scorer is a pure function returning a value
//! in `[0, 1]`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::persona::PersonaStrategy;
use super::rules::{
    ScanText, CODE_HOSTING_DOMAINS, EVERGREEN_KEYWORDS, EXPERTISE_INDICATORS, RESEARCH_DOMAINS,
    RESEARCH_SOURCES, TECH_KEYWORDS, TIME_SENSITIVE_KEYWORDS,
};
use crate::item::Item;

/// Freshness half-life parameter in hours (`exp(-h / 72)`).
pub const FRESHNESS_DECAY_HOURS: f64 = 72.0;

/// Temporal score used when the publish instant is unknown.
pub const UNKNOWN_DATE_TEMPORAL: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Quality,
    Relevance,
    Temporal,
    Trust,
    Actionability,
}

impl Axis {
    pub const ALL: [Axis; 5] = [
        Axis::Quality,
        Axis::Relevance,
        Axis::Temporal,
        Axis::Trust,
        Axis::Actionability,
    ];

    /// Fixed policy weight of the axis in `totalScore`. Weights sum to 1.
    pub fn weight(self) -> f32 {
        match self {
            Axis::Quality => 0.25,
            Axis::Relevance => 0.30,
            Axis::Temporal => 0.20,
            Axis::Trust => 0.15,
            Axis::Actionability => 0.10,
        }
    }
}

/// Text length, technical density and source authority.
pub fn quality(item: &Item, text: &ScanText) -> f32 {
    let length_score = (text.char_len() as f32 / 500.0).min(1.0) * 0.30;
    let keyword_score = (TECH_KEYWORDS.hits(text) as f32 / 10.0).min(1.0) * 0.40;

    let source_score = if item.source_tier.is_primary() {
        0.30
    } else if item.source.contains("MIT") || item.source.contains("arXiv") {
        0.25
    } else if item.source.contains("Reddit") {
        0.15
    } else {
        0.10
    };

    clamp01(length_score + keyword_score + source_score)
}

/// Persona keyword tiers with a floor once any core term is present.
pub fn relevance(strategy: &dyn PersonaStrategy, text: &ScanText) -> f32 {
    let mut score = strategy.relevance_rules().weighted_hits(text);
    if strategy.floor_triggers().any(text) {
        score = score.max(strategy.relevance_floor());
    }
    clamp01(score)
}

/// `0.6 * freshness + 0.4 * evergreen`; 0.5 when the publish instant is unknown.
pub fn temporal(item: &Item, text: &ScanText, now: DateTime<Utc>) -> f32 {
    let Some(published) = item.published_at else {
        return UNKNOWN_DATE_TEMPORAL;
    };
    let f = freshness(published, now);
    let e = evergreen(text);
    clamp01(0.6 * f + 0.4 * e)
}

/// `exp(-hours / 72)`. Future timestamps count as brand new.
pub fn freshness(published: DateTime<Utc>, now: DateTime<Utc>) -> f32 {
    let secs = (now - published).num_seconds().max(0) as f64;
    let hours = secs / 3600.0;
    (-hours / FRESHNESS_DECAY_HOURS).exp() as f32
}

/// `0.5 + 0.2 * evergreen_hits - 0.1 * time_sensitive_hits` with the bonus
/// capped at 0.8 and the penalty at 0.4. Floored at 0 but may exceed 1;
/// only the blended temporal score is clamped.
pub fn evergreen(text: &ScanText) -> f32 {
    let boost = (EVERGREEN_KEYWORDS.hits(text) as f32 * 0.2).min(0.8);
    let penalty = (TIME_SENSITIVE_KEYWORDS.hits(text) as f32 * 0.1).min(0.4);
    (0.5 + boost - penalty).max(0.0)
}

/// Source authority, expertise indicators and authoritative domains.
pub fn trust(item: &Item, text: &ScanText) -> f32 {
    let mut score = if RESEARCH_SOURCES.iter().any(|s| item.source.contains(s)) {
        0.30
    } else if item.source_tier.is_primary() {
        0.20
    } else {
        0.10
    };

    score += (EXPERTISE_INDICATORS.hits(text) as f32 * 0.05).min(0.30);

    let url = item.url.to_ascii_lowercase();
    if CODE_HOSTING_DOMAINS.iter().any(|d| url.contains(d)) {
        score += 0.20;
    }
    if RESEARCH_DOMAINS.iter().any(|d| url.contains(d)) {
        score += 0.20;
    }

    clamp01(score)
}

/// Persona action keywords plus a bonus when the item links somewhere.
pub fn actionability(strategy: &dyn PersonaStrategy, item: &Item, text: &ScanText) -> f32 {
    let density = (strategy.action_rules().hits(text) as f32 * 0.10).min(0.80);
    let url_bonus = if item.has_url() { 0.20 } else { 0.0 };
    clamp01(density + url_bonus)
}

pub(crate) fn clamp01(x: f32) -> f32 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}
