//! Reader personas and their scoring strategies.
//!
//! Each persona is a [`PersonaStrategy`]: the keyword tables for relevance and
//! actionability, the relevance floor, and the ROI adjustment curve. Adding a
//! persona means adding one variant and one strategy; the axis scorers and
//! analyzers only talk to the trait.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::rules::RuleTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    Engineer,
    Business,
}

impl Persona {
    pub const ALL: [Persona; 2] = [Persona::Engineer, Persona::Business];

    pub fn as_str(self) -> &'static str {
        match self {
            Persona::Engineer => "engineer",
            Persona::Business => "business",
        }
    }

    pub fn strategy(self) -> &'static dyn PersonaStrategy {
        match self {
            Persona::Engineer => &EngineerStrategy,
            Persona::Business => &BusinessStrategy,
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Persona {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "engineer" => Ok(Persona::Engineer),
            "business" => Ok(Persona::Business),
            other => Err(anyhow::anyhow!("unknown persona: {other}")),
        }
    }
}

/// Linear payback/ROI estimate driven by the number of high-ROI keyword hits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoiCurve {
    pub base_payback_months: i32,
    pub payback_step_months: i32,
    pub min_payback_months: i32,
    pub base_roi_pct: i32,
    pub roi_step_pct: i32,
    pub max_roi_pct: i32,
}

impl RoiCurve {
    pub fn payback_months(&self, high_hits: usize) -> u32 {
        let h = i32::try_from(high_hits).unwrap_or(i32::MAX / 100);
        let m = (self.base_payback_months - self.payback_step_months * h)
            .max(self.min_payback_months);
        m.max(0) as u32
    }

    pub fn roi_percentage(&self, high_hits: usize) -> u32 {
        let h = i32::try_from(high_hits).unwrap_or(i32::MAX / 100);
        let r = (self.base_roi_pct + self.roi_step_pct * h).min(self.max_roi_pct);
        r.max(0) as u32
    }
}

pub trait PersonaStrategy: Send + Sync {
    fn persona(&self) -> Persona;

    /// Weighted relevance keywords (high / medium / low tiers).
    fn relevance_rules(&self) -> &RuleTable;

    /// Minimum relevance once any of [`Self::floor_triggers`] is present.
    fn relevance_floor(&self) -> f32;

    fn floor_triggers(&self) -> &RuleTable;

    /// Keywords signalling something the reader can act on.
    fn action_rules(&self) -> &RuleTable;

    fn roi_curve(&self) -> RoiCurve;
}

pub const HIGH_VALUE_WEIGHT: f32 = 0.15;
pub const MEDIUM_VALUE_WEIGHT: f32 = 0.08;
pub const LOW_VALUE_WEIGHT: f32 = 0.04;

/* ----------------------------
Engineer
---------------------------- */

pub struct EngineerStrategy;

static ENGINEER_RELEVANCE: Lazy<RuleTable> = Lazy::new(|| {
    RuleTable::tiered(&[
        (
            &[
                "implementation",
                "code",
                "github",
                "tensorflow",
                "pytorch",
                "optimization",
                "performance",
                "benchmark",
                "sota",
                "model",
                "architecture",
                "training",
                "inference",
                "gpu",
                "cuda",
                "foundation model",
                "transformer",
                "routing",
                "router",
                "実装",
                "コード",
                "最適化",
                "性能",
                "モデル",
                "アーキテクチャ",
            ],
            HIGH_VALUE_WEIGHT,
        ),
        (
            &[
                "algorithm",
                "neural",
                "deep",
                "learning",
                "ai",
                "ml",
                "research",
                "paper",
                "dataset",
                "evaluation",
                "llm",
                "machine learning",
                "artificial intelligence",
                "fine-tuning",
                "アルゴリズム",
                "ニューラル",
                "ディープ",
                "学習",
                "研究",
                "論文",
            ],
            MEDIUM_VALUE_WEIGHT,
        ),
        (
            &[
                "technology",
                "innovation",
                "future",
                "trend",
                "discussion",
                "question",
                "help",
                "advice",
                "recommendation",
                "技術",
                "イノベーション",
                "未来",
                "トレンド",
            ],
            LOW_VALUE_WEIGHT,
        ),
    ])
});

static ENGINEER_FLOOR: Lazy<RuleTable> = Lazy::new(|| {
    RuleTable::uniform(&["ai", "ml", "machine learning", "model", "algorithm"], 1.0)
});

static ENGINEER_ACTIONS: Lazy<RuleTable> = Lazy::new(|| {
    RuleTable::uniform(
        &[
            "implementation",
            "code",
            "tutorial",
            "how to",
            "guide",
            "example",
            "demo",
            "github",
            "colab",
            "notebook",
            "実装",
            "コード",
            "チュートリアル",
            "方法",
            "ガイド",
            "例",
        ],
        1.0,
    )
});

impl PersonaStrategy for EngineerStrategy {
    fn persona(&self) -> Persona {
        Persona::Engineer
    }

    fn relevance_rules(&self) -> &RuleTable {
        &ENGINEER_RELEVANCE
    }

    fn relevance_floor(&self) -> f32 {
        0.20
    }

    fn floor_triggers(&self) -> &RuleTable {
        &ENGINEER_FLOOR
    }

    fn action_rules(&self) -> &RuleTable {
        &ENGINEER_ACTIONS
    }

    fn roi_curve(&self) -> RoiCurve {
        RoiCurve {
            base_payback_months: 12,
            payback_step_months: 2,
            min_payback_months: 3,
            base_roi_pct: 100,
            roi_step_pct: 50,
            max_roi_pct: 500,
        }
    }
}

/* ----------------------------
Business
---------------------------- */

pub struct BusinessStrategy;

static BUSINESS_RELEVANCE: Lazy<RuleTable> = Lazy::new(|| {
    RuleTable::tiered(&[
        (
            &[
                "roi",
                "revenue",
                "cost",
                "profit",
                "market",
                "business",
                "customer",
                "user",
                "growth",
                "scale",
                "enterprise",
                "investment",
                "funding",
                "valuation",
                "startup",
                "収益",
                "コスト",
                "利益",
                "市場",
                "ビジネス",
                "顧客",
                "ユーザー",
                "成長",
                "投資",
                "資金調達",
            ],
            HIGH_VALUE_WEIGHT,
        ),
        (
            &[
                "efficiency",
                "productivity",
                "automation",
                "strategy",
                "competitive",
                "advantage",
                "disruption",
                "transformation",
                "効率",
                "生産性",
                "自動化",
                "戦略",
                "競争",
                "優位性",
                "変革",
            ],
            MEDIUM_VALUE_WEIGHT,
        ),
        (
            &[
                "company",
                "industry",
                "trend",
                "innovation",
                "企業",
                "業界",
                "トレンド",
                "イノベーション",
            ],
            LOW_VALUE_WEIGHT,
        ),
    ])
});

static BUSINESS_FLOOR: Lazy<RuleTable> = Lazy::new(|| {
    RuleTable::uniform(
        &["business", "market", "company", "industry", "strategy"],
        1.0,
    )
});

static BUSINESS_ACTIONS: Lazy<RuleTable> = Lazy::new(|| {
    RuleTable::uniform(
        &[
            "strategy",
            "implementation",
            "case study",
            "roi",
            "how to",
            "guide",
            "framework",
            "process",
            "step",
            "action",
            "戦略",
            "実装",
            "ケーススタディ",
            "方法",
            "プロセス",
        ],
        1.0,
    )
});

impl PersonaStrategy for BusinessStrategy {
    fn persona(&self) -> Persona {
        Persona::Business
    }

    fn relevance_rules(&self) -> &RuleTable {
        &BUSINESS_RELEVANCE
    }

    fn relevance_floor(&self) -> f32 {
        0.15
    }

    fn floor_triggers(&self) -> &RuleTable {
        &BUSINESS_FLOOR
    }

    fn action_rules(&self) -> &RuleTable {
        &BUSINESS_ACTIONS
    }

    fn roi_curve(&self) -> RoiCurve {
        RoiCurve {
            base_payback_months: 18,
            payback_step_months: 3,
            min_payback_months: 6,
            base_roi_pct: 150,
            roi_step_pct: 75,
            max_roi_pct: 800,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategies_are_keyed_by_persona() {
        for p in Persona::ALL {
            assert_eq!(p.strategy().persona(), p);
            assert!(!p.strategy().relevance_rules().is_empty());
            assert!(!p.strategy().action_rules().is_empty());
        }
    }

    #[test]
    fn parse_persona() {
        assert_eq!("Engineer".parse::<Persona>().unwrap(), Persona::Engineer);
        assert_eq!(" business ".parse::<Persona>().unwrap(), Persona::Business);
        assert!("designer".parse::<Persona>().is_err());
    }

    #[test]
    fn roi_curves_floor_and_ceiling() {
        let eng = Persona::Engineer.strategy().roi_curve();
        assert_eq!(eng.payback_months(0), 12);
        assert_eq!(eng.payback_months(2), 8);
        assert_eq!(eng.payback_months(10), 3);
        assert_eq!(eng.roi_percentage(0), 100);
        assert_eq!(eng.roi_percentage(20), 500);

        let biz = Persona::Business.strategy().roi_curve();
        assert_eq!(biz.payback_months(1), 15);
        assert_eq!(biz.payback_months(9), 6);
        assert_eq!(biz.roi_percentage(1), 225);
        assert_eq!(biz.roi_percentage(50), 800);
    }

    #[test]
    fn persona_serializes_snake_case() {
        let v = serde_json::to_value(Persona::Engineer).unwrap();
        assert_eq!(v, serde_json::json!("engineer"));
    }
}
