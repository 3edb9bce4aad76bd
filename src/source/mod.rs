//! Content sources
//!
//! A `ContentSource` is where a page's collection and its view counters live.
//! The engine only needs four operations: fetch everything once, bump a view
//! counter, read a counter back, and optionally do both in one round trip.
//!
//! `JsonFileSource` backs the CLI: the collection comes from a JSON file and
//! counters live in memory for the lifetime of the source.

use crate::model::{self, Item, ItemId, ModelError, Record};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SourceError {
    /// The backing store could not be reached or answered with an error
    #[error("Content source unavailable: {0}")]
    Unavailable(String),

    /// No record with this id
    #[error("Item not found: {0}")]
    NotFound(ItemId),

    /// The source does not implement this operation
    #[error("Operation not supported by this source")]
    Unsupported,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid collection: {0}")]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, SourceError>;

/// Backing store for one kind of content
#[async_trait]
pub trait ContentSource: Send + Sync + 'static {
    type Item: Record;

    /// Fetch the whole collection
    async fn fetch_all(&self) -> Result<Vec<Self::Item>>;

    /// Bump the remote view counter
    async fn increment_view_count(&self, id: &ItemId) -> Result<()>;

    /// Read the authoritative view count
    async fn read_view_count(&self, id: &ItemId) -> Result<u64>;

    /// Increment and return the new count in one operation
    ///
    /// Sources without an atomic primitive keep the default, which returns
    /// `SourceError::Unsupported`.
    async fn increment_and_read(&self, _id: &ItemId) -> Result<u64> {
        Err(SourceError::Unsupported)
    }
}

/// Collection stored as a JSON array on disk
#[derive(Debug)]
pub struct JsonFileSource {
    path: PathBuf,
    counts: Mutex<HashMap<ItemId, u64>>,
}

impl JsonFileSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            counts: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ContentSource for JsonFileSource {
    type Item = Item;

    async fn fetch_all(&self) -> Result<Vec<Item>> {
        let payload = tokio::fs::read_to_string(&self.path).await?;
        let collection = model::collection_from_json(&payload)?;
        let items = collection.items().to_vec();

        let mut counts = self.counts.lock().await;
        for item in &items {
            counts
                .entry(item.id.clone())
                .or_insert_with(|| item.view_count.unwrap_or(0));
        }
        debug!(path = %self.path.display(), items = items.len(), "collection loaded");
        Ok(items)
    }

    async fn increment_view_count(&self, id: &ItemId) -> Result<()> {
        self.increment_and_read(id).await.map(|_| ())
    }

    async fn read_view_count(&self, id: &ItemId) -> Result<u64> {
        self.counts
            .lock()
            .await
            .get(id)
            .copied()
            .ok_or_else(|| SourceError::NotFound(id.clone()))
    }

    async fn increment_and_read(&self, id: &ItemId) -> Result<u64> {
        let mut counts = self.counts.lock().await;
        let count = counts
            .get_mut(id)
            .ok_or_else(|| SourceError::NotFound(id.clone()))?;
        *count += 1;
        Ok(*count)
    }
}
