// src/ingest/types.rs
use anyhow::Result;

use crate::item::Item;

/// A source of raw items. Implementations parse and lightly clean their
/// input; filtering, freshness and dedup happen in [`crate::ingest::run_once`].
#[async_trait::async_trait]
pub trait SourceProvider: Send + Sync {
    async fn fetch_latest(&self) -> Result<Vec<Item>>;
    fn name(&self) -> &str;
}
