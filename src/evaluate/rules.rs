//! Keyword rule tables.
//!
//! Every keyword-driven score is expressed as data: a [`RuleTable`] is an
//! ordered list of `(pattern, weight)` pairs. Matching is case-insensitive
//! substring membership over the item's title + body; each pattern counts at
//! most once per text, so repeating a keyword never lowers a score.

use once_cell::sync::Lazy;

/// One `(pattern, weight)` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordRule {
    pub pattern: String,
    pub weight: f32,
}

/// Ordered list of keyword rules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleTable {
    pub rules: Vec<KeywordRule>,
}

impl RuleTable {
    /// Table where every pattern carries the same weight.
    pub fn uniform(patterns: &[&str], weight: f32) -> Self {
        Self::tiered(&[(patterns, weight)])
    }

    /// Table built from weight tiers, e.g. high / medium / low value keywords.
    pub fn tiered(tiers: &[(&[&str], f32)]) -> Self {
        let mut rules = Vec::new();
        for (patterns, weight) in tiers {
            for p in patterns.iter() {
                rules.push(KeywordRule {
                    pattern: p.to_lowercase(),
                    weight: *weight,
                });
            }
        }
        Self { rules }
    }

    /// Number of distinct patterns present in `text`.
    pub fn hits(&self, text: &ScanText) -> usize {
        self.rules
            .iter()
            .filter(|r| text.contains(&r.pattern))
            .count()
    }

    /// Sum of weights of the patterns present in `text` (unclamped).
    pub fn weighted_hits(&self, text: &ScanText) -> f32 {
        self.rules
            .iter()
            .filter(|r| text.contains(&r.pattern))
            .map(|r| r.weight)
            .sum()
    }

    /// Patterns present in `text`, in table order.
    pub fn matched<'a>(&'a self, text: &ScanText) -> Vec<&'a str> {
        self.rules
            .iter()
            .filter(|r| text.contains(&r.pattern))
            .map(|r| r.pattern.as_str())
            .collect()
    }

    pub fn any(&self, text: &ScanText) -> bool {
        self.rules.iter().any(|r| text.contains(&r.pattern))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Lower-cased title + body, prepared once per evaluation.
#[derive(Debug, Clone)]
pub struct ScanText {
    lower: String,
    char_len: usize,
}

impl ScanText {
    pub fn new(raw: &str) -> Self {
        Self {
            lower: raw.to_lowercase(),
            char_len: raw.chars().count(),
        }
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.lower.contains(pattern)
    }

    pub fn char_len(&self) -> usize {
        self.char_len
    }
}

/* ----------------------------
Persona-independent tables
---------------------------- */

/// Technical vocabulary for the quality axis.
pub static TECH_KEYWORDS: Lazy<RuleTable> = Lazy::new(|| {
    RuleTable::uniform(
        &[
            "algorithm",
            "model",
            "neural",
            "deep learning",
            "machine learning",
            "transformer",
            "gpu",
            "performance",
            "benchmark",
            "sota",
            "implementation",
            "code",
            "github",
            "paper",
            "research",
            "アルゴリズム",
            "モデル",
            "ニューラル",
            "ディープラーニング",
            "機械学習",
            "トランスフォーマー",
            "性能",
            "ベンチマーク",
            "実装",
            "コード",
            "研究",
        ],
        1.0,
    )
});

pub static EVERGREEN_KEYWORDS: Lazy<RuleTable> = Lazy::new(|| {
    RuleTable::uniform(
        &[
            "tutorial",
            "guide",
            "how to",
            "best practices",
            "framework",
            "architecture",
            "design pattern",
            "methodology",
            "technique",
            "チュートリアル",
            "ガイド",
            "方法",
            "ベストプラクティス",
            "フレームワーク",
        ],
        1.0,
    )
});

pub static TIME_SENSITIVE_KEYWORDS: Lazy<RuleTable> = Lazy::new(|| {
    RuleTable::uniform(
        &[
            "breaking",
            "just released",
            "today",
            "this week",
            "latest",
            "announcement",
            "launched",
            "breaking news",
            "速報",
            "今日",
            "今週",
            "最新",
            "発表",
            "ローンチ",
        ],
        1.0,
    )
});

pub static EXPERTISE_INDICATORS: Lazy<RuleTable> = Lazy::new(|| {
    RuleTable::uniform(
        &[
            "experiment",
            "evaluation",
            "methodology",
            "results",
            "comparison",
            "benchmark",
            "analysis",
            "implementation",
            "実験",
            "評価",
            "手法",
            "結果",
            "比較",
            "分析",
            "実装",
        ],
        1.0,
    )
});

/// Source-name fragments of research labs and journals (case-sensitive).
pub const RESEARCH_SOURCES: &[&str] = &[
    "MIT",
    "Stanford",
    "arXiv",
    "Nature",
    "Science",
    "OpenAI",
    "DeepMind",
    "Anthropic",
];

pub const CODE_HOSTING_DOMAINS: &[&str] = &["github.com"];

pub const RESEARCH_DOMAINS: &[&str] = &["arxiv.org", "openai.com", "deepmind.com"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiered_table_sums_weights_once_per_pattern() {
        let t = RuleTable::tiered(&[(&["code", "gpu"], 0.15), (&["paper"], 0.08)]);
        let text = ScanText::new("Code code CODE on a GPU, see the paper");
        assert_eq!(t.hits(&text), 3);
        assert!((t.weighted_hits(&text) - 0.38).abs() < 1e-6);
        assert_eq!(t.matched(&text), vec!["code", "gpu", "paper"]);
    }

    #[test]
    fn patterns_are_lowercased() {
        let t = RuleTable::uniform(&["ROI"], 1.0);
        assert!(t.any(&ScanText::new("strong roi story")));
    }

    #[test]
    fn scan_text_counts_chars_not_bytes() {
        let s = ScanText::new("機械学習");
        assert_eq!(s.char_len(), 4);
    }

    #[test]
    fn empty_text_has_no_hits() {
        let s = ScanText::new("");
        assert_eq!(TECH_KEYWORDS.hits(&s), 0);
        assert!(!EVERGREEN_KEYWORDS.any(&s));
    }
}
