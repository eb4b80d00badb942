// src/present/mod.rs
//! Wire record and static page for ranked items.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::evaluate::{Breakdown, Persona, Recommendation};
use crate::item::SourceTier;
use crate::rank::{Label, LabelReason, RankedItem};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaSummary {
    pub total_score: f32,
    pub breakdown: Breakdown,
    pub recommendation: Recommendation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentedItem {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub url: String,
    pub source: String,
    pub source_tier: SourceTier,
    /// ISO-8601 UTC with a literal `Z`.
    pub published_at: Option<String>,
    pub tags: Vec<String>,
    pub label: Label,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_reason: Option<LabelReason>,
    /// Engineer total score as 0..=100.
    pub score: u8,
    pub evaluation: BTreeMap<Persona, PersonaSummary>,
}

pub fn format_instant(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// `round(100 · s)`, clamped; NaN maps to 0.
pub fn percent(score: f32) -> u8 {
    if score.is_nan() {
        return 0;
    }
    (score.clamp(0.0, 1.0) * 100.0).round() as u8
}

impl From<&RankedItem> for PresentedItem {
    fn from(r: &RankedItem) -> Self {
        let evaluation = r
            .evaluations
            .iter()
            .map(|(p, e)| {
                (
                    *p,
                    PersonaSummary {
                        total_score: e.total_score,
                        breakdown: e.breakdown,
                        recommendation: e.recommendation,
                    },
                )
            })
            .collect();
        Self {
            id: r.item.id.clone(),
            title: r.item.title.clone(),
            summary: r.item.content.clone(),
            url: r.item.url.clone(),
            source: r.item.source.clone(),
            source_tier: r.item.source_tier,
            published_at: r.item.published_at.map(format_instant),
            tags: r.item.tags.iter().cloned().collect(),
            label: r.label,
            label_reason: Some(r.label_reason),
            score: percent(r.engineer_score().unwrap_or(0.0)),
            evaluation,
        }
    }
}

pub fn present(ranked: &[RankedItem]) -> Vec<PresentedItem> {
    ranked.iter().map(PresentedItem::from).collect()
}

pub fn to_json(items: &[PresentedItem]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(items)
}

const SECTIONS: [(Label, &str); 4] = [
    (Label::MustRead, "Must read"),
    (Label::Recommended, "Recommended"),
    (Label::Consider, "Worth a look"),
    (Label::Skip, "Also collected"),
];

/// Single static page, one section per label, items in ranked order.
pub fn render_html(items: &[PresentedItem], generated_at: DateTime<Utc>) -> String {
    use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

    let mut out = String::with_capacity(4096 + items.len() * 512);
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    out.push_str("<title>Daily AI News</title>\n</head>\n<body>\n");
    let _ = writeln!(
        out,
        "<header><h1>Daily AI News</h1><p class=\"generated\">Updated {}</p></header>",
        text(&format_instant(generated_at))
    );

    for (label, heading) in SECTIONS {
        let group: Vec<&PresentedItem> = items.iter().filter(|i| i.label == label).collect();
        if group.is_empty() {
            continue;
        }
        let _ = writeln!(
            out,
            "<section class=\"{}\">\n<h2>{} ({})</h2>",
            label.as_str(),
            heading,
            group.len()
        );
        for it in group {
            out.push_str("<article>\n");
            if it.url.is_empty() {
                let _ = writeln!(out, "<h3>{}</h3>", text(&it.title));
            } else {
                let _ = writeln!(
                    out,
                    "<h3><a href=\"{}\" rel=\"noopener\">{}</a></h3>",
                    attr(&it.url),
                    text(&it.title)
                );
            }
            let _ = writeln!(
                out,
                "<p class=\"meta\"><span class=\"badge {}\">{}</span> <span class=\"score\">{}</span> <span class=\"source tier-{}\">{}</span>{}</p>",
                label.as_str(),
                label.as_str(),
                it.score,
                u8::from(it.source_tier),
                text(&it.source),
                it.published_at
                    .as_deref()
                    .map(|p| format!(" <time datetime=\"{}\">{}</time>", attr(p), text(p)))
                    .unwrap_or_default()
            );
            if !it.summary.is_empty() {
                let _ = writeln!(out, "<p>{}</p>", text(&it.summary));
            }
            out.push_str("</article>\n");
        }
        out.push_str("</section>\n");
    }

    out.push_str("</body>\n</html>\n");
    out
}
