// src/config/mod.rs
pub mod news;

pub use news::{FeedSource, NewsConfig, OutputSection, RankingSection, SpreadsheetSection};
