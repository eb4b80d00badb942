// src/ingest/providers/spreadsheet.rs
//! Curated social posts exported from a spreadsheet.
//!
//! One post per line, header row first. Columns:
//! `created_at, username, content, first_link?, post_link?`, separated by
//! `|` when the line contains one, otherwise parsed as CSV.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use metrics::{counter, histogram};

use crate::config::SpreadsheetSection;
use crate::ingest::normalize_text;
use crate::ingest::types::SourceProvider;
use crate::item::{Item, SourceTier};

pub const POST_TAGS: [&str; 2] = ["x_post", "community"];
pub const MIN_LINE_CHARS: usize = 10;
pub const MAX_CONTENT_CHARS: usize = 300;
pub const MAX_TITLE_CHARS: usize = 100;
pub const SHORT_TITLE_CHARS: usize = 50;

pub struct SpreadsheetProvider {
    max_posts: usize,
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http { url: String, client: reqwest::Client },
}

impl SpreadsheetProvider {
    pub fn from_fixture_str(csv: &str, max_posts: usize) -> Self {
        Self {
            max_posts,
            mode: Mode::Fixture(csv.to_string()),
        }
    }

    pub fn from_config(cfg: &SpreadsheetSection, timeout: std::time::Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("building spreadsheet http client")?;
        Ok(Self {
            max_posts: cfg.max_posts,
            mode: Mode::Http {
                url: cfg.url.clone(),
                client,
            },
        })
    }

    /// Parse an export. Rows with a bad date get `fetched_at`.
    pub fn parse_rows(&self, body: &str, fetched_at: DateTime<Utc>) -> Vec<Item> {
        let t0 = std::time::Instant::now();
        let mut out: Vec<Item> = body
            .lines()
            .skip(1)
            .filter_map(|line| parse_row(line, fetched_at))
            .collect();

        // newest first; stable so equal instants keep sheet order
        out.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        out.truncate(self.max_posts);

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("ingest_parse_ms").record(ms);
        counter!("ingest_events_total").increment(out.len() as u64);
        out
    }
}

#[async_trait]
impl SourceProvider for SpreadsheetProvider {
    async fn fetch_latest(&self) -> Result<Vec<Item>> {
        let now = Utc::now();
        match &self.mode {
            Mode::Fixture(s) => Ok(self.parse_rows(s, now)),
            Mode::Http { url, client } => {
                let body = client
                    .get(url)
                    .header(reqwest::header::ACCEPT, "text/csv,text/plain,*/*")
                    .send()
                    .await
                    .and_then(|r| r.error_for_status())
                    .context("spreadsheet http get")?
                    .text()
                    .await
                    .context("spreadsheet http .text()")?;
                Ok(self.parse_rows(&body, now))
            }
        }
    }

    fn name(&self) -> &str {
        "Spreadsheet"
    }
}

fn parse_row(line: &str, fetched_at: DateTime<Utc>) -> Option<Item> {
    let line = line.trim_end_matches('\r');
    if line.trim().chars().count() < MIN_LINE_CHARS {
        return None;
    }
    let parts: Vec<String> = if line.contains('|') {
        line.split('|')
            .map(|p| p.trim().trim_matches('"').to_string())
            .collect()
    } else {
        split_csv_line(line)
    };
    if parts.len() < 3 {
        return None;
    }

    let username = parts[1].trim().replace('@', "");
    let raw_content = normalize_text(&parts[2]);
    if username.is_empty() || raw_content.is_empty() {
        return None;
    }
    let url = [3, 4]
        .iter()
        .filter_map(|&i| parts.get(i).map(|s| s.trim()))
        .find(|s| is_http_url(s))
        .map(str::to_string)
        .unwrap_or_else(|| format!("https://x.com/{username}"));

    let published = parse_created_at(&parts[0]).unwrap_or(fetched_at);
    let title = extract_title(&raw_content);
    let content = truncate_with_ellipsis(&raw_content, MAX_CONTENT_CHARS);

    Some(
        Item::new("x", format!("X(@{username})"), title, content)
            .with_url(url)
            .with_tier(SourceTier::General)
            .published(published)
            .tagged(POST_TAGS),
    )
}

/// Absolute `http(s)` URL with a host. Cells like `N/A` or `-` fail.
pub fn is_http_url(s: &str) -> bool {
    reqwest::Url::parse(s)
        .map(|u| {
            matches!(u.scheme(), "http" | "https") && u.host_str().is_some_and(|h| !h.is_empty())
        })
        .unwrap_or(false)
}

/// ISO-8601 with `T`; a missing offset is read as UTC.
pub fn parse_created_at(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if !s.contains('T') {
        return None;
    }
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|n| n.and_utc())
        })
}

/// First sentence if short enough, else a 50-char prefix.
pub fn extract_title(content: &str) -> String {
    let first = content
        .split(['.', '!', '?', '。', '！', '？', '\n'])
        .next()
        .unwrap_or_default()
        .trim();
    if !first.is_empty() && first.chars().count() <= MAX_TITLE_CHARS {
        return first.to_string();
    }
    truncate_with_ellipsis(content, SHORT_TITLE_CHARS)
}

fn truncate_with_ellipsis(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let mut out: String = s.chars().take(max).collect();
        out.push_str("...");
        out
    } else {
        s.to_string()
    }
}

/// One CSV record; `""` inside quotes is a literal quote.
pub fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut cur = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                cur.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut cur)),
            _ => cur.push(c),
        }
    }
    fields.push(cur);
    fields
}
