//! # Trust Rank
//!
//! Binary trust classification used by the value score:
//! an item is `High` iff its source is tier 1 or its URL's registrable domain
//! is in a fixed allow-list.
//!
//! - Host extraction via `reqwest::Url`; scheme-less inputs are retried with `https://`.
//! - Registrable domain = last two labels, or last three when the last two
//!   form a known two-label public suffix (`co.jp`, `co.uk`, ...).
//! - Leading `www.` and trailing dots are ignored.

use serde::Serialize;

use crate::item::Item;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustRank {
    High,
    Normal,
}

/// Two-label public suffixes recognised when cutting a host to its domain.
pub const MULTI_PART_SUFFIXES: &[&str] = &[
    "co.jp", "ne.jp", "or.jp", "ac.jp", "go.jp", "co.uk", "org.uk", "ac.uk", "gov.uk", "com.au",
    "net.au", "org.au", "co.kr", "co.nz", "com.br", "com.cn", "com.tw", "co.in",
];

/// Registrable domains treated as high-trust regardless of source tier.
pub const HIGH_TRUST_DOMAINS: &[&str] = &[
    "arxiv.org",
    "openai.com",
    "anthropic.com",
    "deepmind.com",
    "deepmind.google",
    "googleblog.com",
    "meta.com",
    "microsoft.com",
    "nvidia.com",
    "huggingface.co",
    "github.com",
    "technologyreview.com",
    "nature.com",
    "science.org",
    "mit.edu",
    "stanford.edu",
    "itmedia.co.jp",
    "nikkei.com",
    "impress.co.jp",
];

pub fn trust_rank(item: &Item) -> TrustRank {
    if item.source_tier.is_primary() {
        return TrustRank::High;
    }
    match registrable_domain(&item.url) {
        Some(d) if is_high_trust_domain(&d) => TrustRank::High,
        _ => TrustRank::Normal,
    }
}

pub fn is_high_trust_domain(domain: &str) -> bool {
    HIGH_TRUST_DOMAINS.iter().any(|d| *d == domain)
}

/// Registrable domain of a URL, lower-cased. `None` when no host can be found.
pub fn registrable_domain(url: &str) -> Option<String> {
    let host = host_of(url)?;
    let host = host.trim_end_matches('.');
    let host = host.strip_prefix("www.").unwrap_or(host);

    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    if labels.len() < 2 {
        return None;
    }

    let last_two = labels[labels.len() - 2..].join(".");
    let keep = if MULTI_PART_SUFFIXES.contains(&last_two.as_str()) {
        3
    } else {
        2
    };
    let start = labels.len().saturating_sub(keep);
    Some(labels[start..].join("."))
}

fn host_of(url: &str) -> Option<String> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return None;
    }
    let parsed = reqwest::Url::parse(trimmed)
        .or_else(|_| reqwest::Url::parse(&format!("https://{trimmed}")))
        .ok()?;
    parsed.host_str().map(|h| h.to_ascii_lowercase())
}
