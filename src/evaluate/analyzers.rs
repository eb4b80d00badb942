//! Informational analyzers: difficulty, ROI and bias.
//!
//! None of these feed `totalScore`. They share no state with each other or
//! with the axis scorers, so each one is an independent [`Analyzer`].

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::axes::clamp01;
use super::persona::PersonaStrategy;
use super::rules::{RuleTable, ScanText};

pub trait Analyzer {
    type Output;

    fn analyze(&self, text: &ScanText, persona: &dyn PersonaStrategy) -> Self::Output;
}

/* ----------------------------
Difficulty
---------------------------- */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyLevel {
    Beginner,
    Intermediate,
    Advanced,
    Research,
}

impl DifficultyLevel {
    /// Enumeration order; also the tie-break order.
    pub const ALL: [DifficultyLevel; 4] = [
        DifficultyLevel::Beginner,
        DifficultyLevel::Intermediate,
        DifficultyLevel::Advanced,
        DifficultyLevel::Research,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyAnalysis {
    pub difficulty_level: DifficultyLevel,
    pub implementation_ready: bool,
    pub has_repo_link: bool,
}

static DIFFICULTY_TABLES: Lazy<[RuleTable; 4]> = Lazy::new(|| {
    [
        RuleTable::uniform(
            &["tutorial", "introduction", "getting started", "basic"],
            1.0,
        ),
        RuleTable::uniform(&["implementation", "example", "guide", "how to"], 1.0),
        RuleTable::uniform(&["optimization", "advanced", "research", "novel"], 1.0),
        RuleTable::uniform(&["paper", "arxiv", "research", "sota", "breakthrough"], 1.0),
    ]
});

static IMPLEMENTATION_MARKERS: Lazy<RuleTable> =
    Lazy::new(|| RuleTable::uniform(&["github", "code", "implementation"], 1.0));

#[derive(Debug, Clone, Copy, Default)]
pub struct DifficultyAnalyzer;

impl Analyzer for DifficultyAnalyzer {
    type Output = DifficultyAnalysis;

    fn analyze(&self, text: &ScanText, _persona: &dyn PersonaStrategy) -> DifficultyAnalysis {
        let mut best = DifficultyLevel::Beginner;
        let mut best_hits = 0usize;
        for (level, table) in DifficultyLevel::ALL.iter().zip(DIFFICULTY_TABLES.iter()) {
            let hits = table.hits(text);
            // Strict comparison: the first level at the max count wins.
            if hits > best_hits {
                best = *level;
                best_hits = hits;
            }
        }

        DifficultyAnalysis {
            difficulty_level: best,
            implementation_ready: IMPLEMENTATION_MARKERS.any(text),
            has_repo_link: text.contains("github"),
        }
    }
}

/* ----------------------------
ROI
---------------------------- */

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiAnalysis {
    pub confidence: f32,
    pub payback_months: u32,
    pub roi_percentage: u32,
}

static HIGH_ROI: Lazy<RuleTable> = Lazy::new(|| {
    RuleTable::uniform(
        &[
            "efficiency",
            "productivity",
            "automation",
            "scale",
            "cost reduction",
        ],
        1.0,
    )
});

static MEDIUM_ROI: Lazy<RuleTable> = Lazy::new(|| {
    RuleTable::uniform(
        &["improvement", "optimization", "enhancement", "upgrade"],
        1.0,
    )
});

#[derive(Debug, Clone, Copy, Default)]
pub struct RoiAnalyzer;

impl Analyzer for RoiAnalyzer {
    type Output = RoiAnalysis;

    fn analyze(&self, text: &ScanText, persona: &dyn PersonaStrategy) -> RoiAnalysis {
        let high = HIGH_ROI.hits(text);
        let medium = MEDIUM_ROI.hits(text);
        let curve = persona.roi_curve();

        RoiAnalysis {
            confidence: clamp01(0.3 * high as f32 + 0.1 * medium as f32),
            payback_months: curve.payback_months(high),
            roi_percentage: curve.roi_percentage(high),
        }
    }
}

/* ----------------------------
Bias
---------------------------- */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiasFamily {
    Promotional,
    Sensational,
    Absolute,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiasAnalysis {
    pub neutrality: f32,
    pub detected: Vec<BiasFamily>,
    pub quality_indicator_score: f32,
}

static BIAS_FAMILIES: Lazy<Vec<(BiasFamily, RuleTable)>> = Lazy::new(|| {
    vec![
        (
            BiasFamily::Promotional,
            RuleTable::uniform(
                &["best", "revolutionary", "breakthrough", "amazing", "incredible"],
                1.0,
            ),
        ),
        (
            BiasFamily::Sensational,
            RuleTable::uniform(
                &["shocking", "unbelievable", "game-changing", "驚くべき", "革命的"],
                1.0,
            ),
        ),
        (
            BiasFamily::Absolute,
            RuleTable::uniform(
                &["always", "never", "all", "none", "every", "すべて", "絶対"],
                1.0,
            ),
        ),
    ]
});

static QUALITY_INDICATORS: Lazy<RuleTable> = Lazy::new(|| {
    RuleTable::uniform(
        &["analysis", "evaluation", "comparison", "methodology"],
        1.0,
    )
});

#[derive(Debug, Clone, Copy, Default)]
pub struct BiasAnalyzer;

impl Analyzer for BiasAnalyzer {
    type Output = BiasAnalysis;

    fn analyze(&self, text: &ScanText, _persona: &dyn PersonaStrategy) -> BiasAnalysis {
        let detected: Vec<BiasFamily> = BIAS_FAMILIES
            .iter()
            .filter(|(_, table)| table.any(text))
            .map(|(family, _)| *family)
            .collect();

        let neutrality = (1.0 - 0.2 * detected.len() as f32).max(0.2);
        let quality_indicator_score =
            clamp01(0.5 + 0.125 * QUALITY_INDICATORS.hits(text) as f32);

        BiasAnalysis {
            neutrality,
            detected,
            quality_indicator_score,
        }
    }
}
