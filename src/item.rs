//! # Item
//! One collected article or post, normalized by the ingestion adapters.
//!
//! Items are plain values. The id is derived from `(source, content-or-title)`
//! so a re-run over the same input yields the same ids.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Tags that mark an item as a short social post.
pub const SOCIAL_TAGS: [&str; 2] = ["x_post", "social"];

/// Ordinal trust classification of a source. Never used arithmetically.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum SourceTier {
    /// High-trust source.
    Primary,
    /// General source.
    #[default]
    General,
}

impl SourceTier {
    pub fn is_primary(self) -> bool {
        matches!(self, SourceTier::Primary)
    }
}

impl TryFrom<u8> for SourceTier {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(SourceTier::Primary),
            2 => Ok(SourceTier::General),
            other => Err(format!("source tier must be 1 or 2, got {other}")),
        }
    }
}

impl From<SourceTier> for u8 {
    fn from(t: SourceTier) -> u8 {
        match t {
            SourceTier::Primary => 1,
            SourceTier::General => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Empty when the item came from outside an adapter; see [`Item::ensure_id`].
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Body text, possibly already summarized.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub source_tier: SourceTier,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl Item {
    /// Build an item whose id is derived from `source` + content (or title when
    /// content is empty). `prefix` distinguishes adapter families (`rss`, `x`).
    pub fn new(
        prefix: &str,
        source: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let source = source.into();
        let title = title.into();
        let content = content.into();
        let id = derive_id(prefix, &source, if content.is_empty() { &title } else { &content });
        Self {
            id,
            title,
            content,
            url: String::new(),
            source,
            source_tier: SourceTier::General,
            published_at: None,
            tags: BTreeSet::new(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_tier(mut self, tier: SourceTier) -> Self {
        self.source_tier = tier;
        self
    }

    pub fn published(mut self, at: DateTime<Utc>) -> Self {
        self.published_at = Some(at);
        self
    }

    pub fn tagged<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Title and body joined, the text every keyword scan runs over.
    pub fn full_text(&self) -> String {
        format!("{} {}", self.title, self.content)
    }

    /// Short social post (X/Twitter style) rather than an editorial source.
    pub fn is_social(&self) -> bool {
        SOCIAL_TAGS.iter().any(|t| self.tags.contains(*t))
            || self.source.starts_with("X(@")
            || self.source.starts_with('@')
    }

    pub fn has_url(&self) -> bool {
        !self.url.trim().is_empty()
    }

    /// Derive an id for items submitted without one.
    pub fn ensure_id(&mut self, prefix: &str) {
        if self.id.trim().is_empty() {
            let text = if self.content.is_empty() { &self.title } else { &self.content };
            self.id = derive_id(prefix, &self.source, text);
        }
    }
}

/// `prefix_` + first 4 bytes of SHA-256(source ‖ text) as hex.
pub fn derive_id(prefix: &str, source: &str, text: &str) -> String {
    use sha2::{Digest, Sha256};
    use std::fmt::Write as _;

    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();

    let mut out = String::with_capacity(prefix.len() + 9);
    out.push_str(prefix);
    out.push('_');
    for b in digest.iter().take(4) {
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}
