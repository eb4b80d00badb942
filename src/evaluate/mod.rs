// src/evaluate/mod.rs
//! # Evaluation Engine
//! Pure, deterministic mapping `(Item, Persona) → EvaluationResult`.
//! No I/O and no hidden clock: the reference instant is fixed when the
//! [`Evaluator`] is built, so tests can pin it.
//!
//! `totalScore` is a fixed weighted sum of five axes (see [`Axis::weight`]),
//! each kept in `breakdown` so a ranking decision can be explained. Missing
//! fields degrade to documented defaults; evaluation never fails.

pub mod analyzers;
pub mod axes;
pub mod persona;
pub mod rules;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::item::Item;

pub use analyzers::{
    Analyzer, BiasAnalysis, BiasAnalyzer, BiasFamily, DifficultyAnalysis, DifficultyAnalyzer,
    DifficultyLevel, RoiAnalysis, RoiAnalyzer,
};
pub use axes::Axis;
pub use persona::{Persona, PersonaStrategy};
use rules::ScanText;

/// Discrete recommendation bucket. Also used as the final display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    MustRead,
    Recommended,
    Consider,
    Skip,
}

impl Recommendation {
    /// Fixed step function: `≥0.8`, `≥0.6`, `≥0.4`, else skip.
    pub fn from_score(total: f32) -> Self {
        if total >= 0.8 {
            Recommendation::MustRead
        } else if total >= 0.6 {
            Recommendation::Recommended
        } else if total >= 0.4 {
            Recommendation::Consider
        } else {
            Recommendation::Skip
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Recommendation::MustRead => "must_read",
            Recommendation::Recommended => "recommended",
            Recommendation::Consider => "consider",
            Recommendation::Skip => "skip",
        }
    }
}

/// Per-axis scores, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Breakdown {
    pub quality: f32,
    pub relevance: f32,
    pub temporal: f32,
    pub trust: f32,
    pub actionability: f32,
}

impl Breakdown {
    pub fn get(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Quality => self.quality,
            Axis::Relevance => self.relevance,
            Axis::Temporal => self.temporal,
            Axis::Trust => self.trust,
            Axis::Actionability => self.actionability,
        }
    }

    /// Weighted sum of the axes, clamped to `[0, 1]`.
    pub fn weighted_total(&self) -> f32 {
        let raw: f32 = Axis::ALL.iter().map(|a| self.get(*a) * a.weight()).sum();
        axes::clamp01(raw)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub persona: Persona,
    pub total_score: f32,
    pub breakdown: Breakdown,
    pub recommendation: Recommendation,
    pub difficulty_analysis: DifficultyAnalysis,
    pub roi_analysis: RoiAnalysis,
    pub bias_analysis: BiasAnalysis,
}

/// All persona results for one item.
pub type Evaluations = BTreeMap<Persona, EvaluationResult>;

/// Evaluates items against a fixed reference instant.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator {
    now: DateTime<Utc>,
    difficulty: DifficultyAnalyzer,
    roi: RoiAnalyzer,
    bias: BiasAnalyzer,
}

impl Evaluator {
    /// Evaluator whose freshness decay is measured from `now`.
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now,
            difficulty: DifficultyAnalyzer,
            roi: RoiAnalyzer,
            bias: BiasAnalyzer,
        }
    }

    /// Evaluator pinned to the current wall-clock instant.
    pub fn now() -> Self {
        Self::at(Utc::now())
    }

    pub fn reference_time(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn evaluate(&self, item: &Item, persona: Persona) -> EvaluationResult {
        let strategy = persona.strategy();
        let text = ScanText::new(&item.full_text());

        let breakdown = Breakdown {
            quality: axes::quality(item, &text),
            relevance: axes::relevance(strategy, &text),
            temporal: axes::temporal(item, &text, self.now),
            trust: axes::trust(item, &text),
            actionability: axes::actionability(strategy, item, &text),
        };
        let total_score = breakdown.weighted_total();

        EvaluationResult {
            persona,
            total_score,
            breakdown,
            recommendation: Recommendation::from_score(total_score),
            difficulty_analysis: self.difficulty.analyze(&text, strategy),
            roi_analysis: self.roi.analyze(&text, strategy),
            bias_analysis: self.bias.analyze(&text, strategy),
        }
    }

    /// One result per supported persona.
    pub fn evaluate_all(&self, item: &Item) -> Evaluations {
        Persona::ALL
            .iter()
            .map(|p| (*p, self.evaluate(item, *p)))
            .collect()
    }
}

/// Free-function form of [`Evaluator::evaluate`].
pub fn evaluate(item: &Item, persona: Persona, now: DateTime<Utc>) -> EvaluationResult {
    Evaluator::at(now).evaluate(item, persona)
}
