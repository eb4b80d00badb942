// src/config/news.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::{env, fs};

use crate::item::SourceTier;
use crate::rank::{RankConfig, DEFAULT_MINIMUM_SIZE};

pub const DEFAULT_NEWS_CONFIG_PATH: &str = "config/news.toml";

pub const ENV_NEWS_CONFIG_PATH: &str = "NEWS_CONFIG_PATH";
pub const ENV_MIN_OUTPUT: &str = "NEWS_MIN_OUTPUT";
pub const ENV_MAX_AGE_HOURS: &str = "NEWS_MAX_AGE_HOURS";
pub const ENV_SPREADSHEET_URL: &str = "NEWS_SPREADSHEET_URL";

/// Freshness ceilings beyond ten years are treated as ten years.
const MAX_AGE_CAP_HOURS: i64 = 10 * 365 * 24;

fn default_minimum_size() -> usize {
    DEFAULT_MINIMUM_SIZE
}
fn default_max_age_hours() -> u64 {
    7 * 24
}
fn default_timeout_secs() -> u64 {
    15
}
fn default_max_posts() -> usize {
    30
}
fn default_max_items() -> usize {
    10
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("docs")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsConfig {
    #[serde(default)]
    pub ranking: RankingSection,
    #[serde(default)]
    pub http: HttpSection,
    #[serde(default)]
    pub spreadsheet: Option<SpreadsheetSection>,
    #[serde(default)]
    pub feeds: Vec<FeedSource>,
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingSection {
    #[serde(default = "default_minimum_size")]
    pub minimum_size: usize,
    /// Items older than this are dropped before ranking.
    #[serde(default = "default_max_age_hours")]
    pub max_age_hours: u64,
}

impl Default for RankingSection {
    fn default() -> Self {
        Self {
            minimum_size: default_minimum_size(),
            max_age_hours: default_max_age_hours(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpSection {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadsheetSection {
    /// CSV export URL of the curated social-post sheet.
    pub url: String,
    #[serde(default = "default_max_posts")]
    pub max_posts: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedSource {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub tier: SourceTier,
    #[serde(default = "default_max_items")]
    pub max_items: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSection {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self::default_seed()
    }
}

impl NewsConfig {
    /// Load from an explicit TOML file, then apply env overrides.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading news config from {}", path.display()))?;
        let mut cfg = Self::from_toml_str(&data)
            .with_context(|| format!("parsing news config at {}", path.display()))?;
        cfg.apply_env()?;
        Ok(cfg)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let mut cfg: NewsConfig = toml::from_str(s)?;
        cfg.sanitize();
        Ok(cfg)
    }

    /// Resolve the config path:
    /// 1) $NEWS_CONFIG_PATH (must exist)
    /// 2) config/news.toml
    /// 3) built-in seed
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = env::var(ENV_NEWS_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from_file(&pb);
            }
            return Err(anyhow!("{ENV_NEWS_CONFIG_PATH} points to non-existent path"));
        }
        let default_path = PathBuf::from(DEFAULT_NEWS_CONFIG_PATH);
        if default_path.exists() {
            return Self::load_from_file(&default_path);
        }
        let mut cfg = Self::default_seed();
        cfg.apply_env()?;
        Ok(cfg)
    }

    pub fn rank_config(&self) -> RankConfig {
        RankConfig {
            minimum_size: self.ranking.minimum_size,
        }
    }

    pub fn max_age(&self) -> chrono::Duration {
        let hours = i64::try_from(self.ranking.max_age_hours)
            .unwrap_or(MAX_AGE_CAP_HOURS)
            .min(MAX_AGE_CAP_HOURS);
        chrono::Duration::hours(hours)
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.http.timeout_secs)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(raw) = env::var(ENV_MIN_OUTPUT) {
            self.ranking.minimum_size = raw
                .trim()
                .parse()
                .with_context(|| format!("{ENV_MIN_OUTPUT} must be a positive integer"))?;
        }
        if let Ok(raw) = env::var(ENV_MAX_AGE_HOURS) {
            self.ranking.max_age_hours = raw
                .trim()
                .parse()
                .with_context(|| format!("{ENV_MAX_AGE_HOURS} must be an integer"))?;
        }
        if let Ok(url) = env::var(ENV_SPREADSHEET_URL) {
            let url = url.trim().to_string();
            if !url.is_empty() {
                let max_posts = self
                    .spreadsheet
                    .as_ref()
                    .map(|s| s.max_posts)
                    .unwrap_or_else(default_max_posts);
                self.spreadsheet = Some(SpreadsheetSection { url, max_posts });
            }
        }
        self.sanitize();
        Ok(())
    }

    fn sanitize(&mut self) {
        if self.ranking.minimum_size == 0 {
            self.ranking.minimum_size = default_minimum_size();
        }
        if self.http.timeout_secs == 0 {
            self.http.timeout_secs = default_timeout_secs();
        }
        self.feeds.retain(|f| !f.url.trim().is_empty() && !f.name.trim().is_empty());
    }

    /// Built-in seed used when no config file is present.
    pub fn default_seed() -> Self {
        let feeds = [
            (
                "MIT Technology Review AI",
                "https://www.technologyreview.com/topic/artificial-intelligence/feed/",
                SourceTier::Primary,
            ),
            (
                "Reddit MachineLearning",
                "https://www.reddit.com/r/MachineLearning/.rss",
                SourceTier::Primary,
            ),
            (
                "Reddit LocalLLaMA",
                "https://www.reddit.com/r/LocalLLaMA/.rss",
                SourceTier::Primary,
            ),
            (
                "VentureBeat AI",
                "https://venturebeat.com/ai/feed/",
                SourceTier::Primary,
            ),
            (
                "TechCrunch AI",
                "https://techcrunch.com/category/artificial-intelligence/feed/",
                SourceTier::Primary,
            ),
            (
                "Hacker News AI",
                "https://hnrss.org/newest?q=AI+OR+machine+learning+OR+deep+learning",
                SourceTier::General,
            ),
        ]
        .into_iter()
        .map(|(name, url, tier)| FeedSource {
            name: name.to_string(),
            url: url.to_string(),
            tier,
            max_items: default_max_items(),
        })
        .collect();

        Self {
            ranking: RankingSection::default(),
            http: HttpSection::default(),
            spreadsheet: None,
            feeds,
            output: OutputSection::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_toml_with_defaults() {
        let cfg = NewsConfig::from_toml_str(
            r#"
            [ranking]
            minimum_size = 12

            [[feeds]]
            name = "Lab Blog"
            url = "https://example.org/feed.xml"
            tier = 1

            [[feeds]]
            name = "  "
            url = "https://dropped.example/feed"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.ranking.minimum_size, 12);
        assert_eq!(cfg.ranking.max_age_hours, 168);
        assert_eq!(cfg.http.timeout_secs, 15);
        assert_eq!(cfg.feeds.len(), 1);
        assert_eq!(cfg.feeds[0].tier, SourceTier::Primary);
        assert_eq!(cfg.feeds[0].max_items, 10);
        assert!(cfg.spreadsheet.is_none());
        assert_eq!(cfg.output.dir, PathBuf::from("docs"));
    }

    #[test]
    fn zero_minimum_is_sanitized() {
        let cfg = NewsConfig::from_toml_str("[ranking]\nminimum_size = 0\n").unwrap();
        assert_eq!(cfg.ranking.minimum_size, DEFAULT_MINIMUM_SIZE);
    }

    #[test]
    fn bad_tier_is_rejected() {
        let err = NewsConfig::from_toml_str(
            "[[feeds]]\nname = \"x\"\nurl = \"https://x\"\ntier = 3\n",
        );
        assert!(err.is_err());
    }

    #[test]
    fn seed_has_feeds() {
        let cfg = NewsConfig::default_seed();
        assert_eq!(cfg.feeds.len(), 6);
        assert!(cfg.feeds.iter().any(|f| f.tier == SourceTier::General));
        assert_eq!(cfg.rank_config().minimum_size, 20);
        assert_eq!(cfg.max_age(), chrono::Duration::hours(168));
    }

    #[serial_test::serial]
    #[test]
    fn default_uses_env_then_fallbacks() {
        let old = env::current_dir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        env::set_current_dir(tmp.path()).unwrap();
        env::remove_var(ENV_NEWS_CONFIG_PATH);
        env::remove_var(ENV_MIN_OUTPUT);
        env::remove_var(ENV_MAX_AGE_HOURS);
        env::remove_var(ENV_SPREADSHEET_URL);

        // No file in CWD -> seed
        let seed = NewsConfig::load_default().unwrap();
        assert_eq!(seed.feeds.len(), 6);

        // Env path wins, env overrides apply on top
        let p = tmp.path().join("custom.toml");
        fs::write(&p, "[ranking]\nminimum_size = 5\n").unwrap();
        env::set_var(ENV_NEWS_CONFIG_PATH, p.display().to_string());
        env::set_var(ENV_MIN_OUTPUT, "7");
        env::set_var(ENV_SPREADSHEET_URL, "https://sheet.example/export?format=csv");
        let cfg = NewsConfig::load_default().unwrap();
        assert_eq!(cfg.ranking.minimum_size, 7);
        assert!(cfg.feeds.is_empty());
        assert_eq!(cfg.spreadsheet.as_ref().unwrap().max_posts, 30);

        // Missing env path is an error
        env::set_var(ENV_NEWS_CONFIG_PATH, tmp.path().join("nope.toml").display().to_string());
        assert!(NewsConfig::load_default().is_err());

        env::remove_var(ENV_NEWS_CONFIG_PATH);
        env::remove_var(ENV_MIN_OUTPUT);
        env::remove_var(ENV_SPREADSHEET_URL);
        env::set_current_dir(&old).unwrap();
    }
}
