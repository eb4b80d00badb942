// src/ingest/providers/feed.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use quick_xml::de::from_str;
use serde::Deserialize;
use time::format_description::well_known::{Rfc2822, Rfc3339};
use time::OffsetDateTime;

use crate::config::FeedSource;
use crate::ingest::normalize_text;
use crate::ingest::types::SourceProvider;
use crate::item::Item;

pub const FEED_TAGS: [&str; 2] = ["rss_feed", "ai_news"];

// --- RSS 2.0 ---

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<RssItem>,
}

#[derive(Debug, Deserialize)]
struct RssItem {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
}

// --- Atom ---

#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(rename = "entry", default)]
    entry: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    title: Option<AtomText>,
    #[serde(rename = "link", default)]
    links: Vec<AtomLink>,
    updated: Option<String>,
    published: Option<String>,
    summary: Option<AtomText>,
    content: Option<AtomText>,
}

/// Text construct; `type="html"` and friends are ignored.
#[derive(Debug, Deserialize)]
struct AtomText {
    #[serde(rename = "$text", default)]
    value: String,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@href")]
    href: Option<String>,
    #[serde(rename = "@rel")]
    rel: Option<String>,
}

/// Entry shape shared by both formats before it becomes an [`Item`].
struct RawEntry {
    title: String,
    link: Option<String>,
    published_at: Option<DateTime<Utc>>,
    body: String,
}

fn unix_to_utc(dt: OffsetDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(dt.unix_timestamp(), dt.nanosecond())
}

pub fn parse_rfc2822(ts: &str) -> Option<DateTime<Utc>> {
    OffsetDateTime::parse(ts.trim(), &Rfc2822)
        .ok()
        .and_then(unix_to_utc)
}

pub fn parse_rfc3339(ts: &str) -> Option<DateTime<Utc>> {
    OffsetDateTime::parse(ts.trim(), &Rfc3339)
        .ok()
        .and_then(unix_to_utc)
}

fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
        .replace("&hellip;", "...")
}

fn is_atom(xml: &str) -> bool {
    match (xml.find("<feed"), xml.find("<rss")) {
        (Some(f), Some(r)) => f < r,
        (Some(_), None) => true,
        _ => false,
    }
}

fn rss_entries(xml: &str) -> Result<Vec<RawEntry>> {
    let rss: Rss = from_str(xml).context("parsing rss xml")?;
    Ok(rss
        .channel
        .item
        .into_iter()
        .map(|it| RawEntry {
            title: it.title.unwrap_or_default(),
            link: it.link,
            published_at: it.pub_date.as_deref().and_then(parse_rfc2822),
            body: it.description.unwrap_or_default(),
        })
        .collect())
}

fn atom_entries(xml: &str) -> Result<Vec<RawEntry>> {
    let feed: AtomFeed = from_str(xml).context("parsing atom xml")?;
    Ok(feed
        .entry
        .into_iter()
        .map(|e| {
            let link = e
                .links
                .iter()
                .find(|l| l.rel.as_deref().map_or(true, |r| r == "alternate"))
                .or(e.links.first())
                .and_then(|l| l.href.clone());
            let published_at = e
                .published
                .as_deref()
                .and_then(parse_rfc3339)
                .or_else(|| e.updated.as_deref().and_then(parse_rfc3339));
            let body = e
                .summary
                .or(e.content)
                .map(|t| t.value)
                .unwrap_or_default();
            RawEntry {
                title: e.title.map(|t| t.value).unwrap_or_default(),
                link,
                published_at,
                body,
            }
        })
        .collect())
}

/// RSS 2.0 or Atom feed, read from a fixture string or fetched over HTTP.
pub struct FeedProvider {
    source: FeedSource,
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http { client: reqwest::Client },
}

impl FeedProvider {
    pub fn from_fixture_str(source: FeedSource, xml: &str) -> Self {
        Self {
            source,
            mode: Mode::Fixture(xml.to_string()),
        }
    }

    pub fn from_url(source: FeedSource, timeout: std::time::Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("daily-ai-news/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building feed http client")?;
        Ok(Self {
            source,
            mode: Mode::Http { client },
        })
    }

    pub fn parse_items_from_str(&self, s: &str) -> Result<Vec<Item>> {
        let t0 = std::time::Instant::now();
        let xml = scrub_html_entities_for_xml(s);
        let entries = if is_atom(&xml) {
            atom_entries(&xml)
        } else {
            rss_entries(&xml)
        }
        .with_context(|| format!("feed {}", self.source.name))?;

        let mut out = Vec::with_capacity(entries.len().min(self.source.max_items));
        for e in entries {
            if out.len() >= self.source.max_items {
                break;
            }
            let title = normalize_text(&e.title);
            let content = normalize_text(&e.body);
            if title.is_empty() && content.is_empty() {
                continue;
            }
            let mut item = Item::new("rss", self.source.name.as_str(), title, content)
                .with_tier(self.source.tier)
                .tagged(FEED_TAGS);
            if let Some(link) = e.link {
                item = item.with_url(link.trim());
            }
            if let Some(at) = e.published_at {
                item = item.published(at);
            }
            out.push(item);
        }

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("ingest_parse_ms").record(ms);
        counter!("ingest_events_total").increment(out.len() as u64);
        Ok(out)
    }
}

#[async_trait]
impl SourceProvider for FeedProvider {
    async fn fetch_latest(&self) -> Result<Vec<Item>> {
        match &self.mode {
            Mode::Fixture(s) => self.parse_items_from_str(s),
            Mode::Http { client } => {
                let body = client
                    .get(&self.source.url)
                    .send()
                    .await
                    .and_then(|r| r.error_for_status())
                    .with_context(|| format!("feed http get {}", self.source.name))?
                    .text()
                    .await
                    .context("feed http .text()")?;
                self.parse_items_from_str(&body)
            }
        }
    }

    fn name(&self) -> &str {
        &self.source.name
    }
}
