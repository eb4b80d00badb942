// src/ingest/providers/mod.rs
pub mod feed;
pub mod spreadsheet;

use anyhow::Result;

use crate::config::NewsConfig;
use crate::ingest::types::SourceProvider;

pub use feed::FeedProvider;
pub use spreadsheet::SpreadsheetProvider;

/// HTTP providers for every configured feed plus the spreadsheet, if any.
pub fn from_config(cfg: &NewsConfig) -> Result<Vec<Box<dyn SourceProvider>>> {
    let mut out: Vec<Box<dyn SourceProvider>> = Vec::with_capacity(cfg.feeds.len() + 1);
    if let Some(sheet) = &cfg.spreadsheet {
        out.push(Box::new(SpreadsheetProvider::from_config(sheet, cfg.timeout())?));
    }
    for f in &cfg.feeds {
        out.push(Box::new(FeedProvider::from_url(f.clone(), cfg.timeout())?));
    }
    Ok(out)
}
