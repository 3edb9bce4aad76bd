//! Page session errors

use crate::browse::BrowseError;
use crate::export::ExportError;
use crate::model::ItemId;
use crate::query::QueryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Browse(#[from] BrowseError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    /// No item with this id in the loaded collection
    #[error("Unknown item '{0}'")]
    UnknownItem(ItemId),

    /// The item has no media to show
    #[error("Item '{0}' has no media")]
    NoMedia(ItemId),

    /// `load` runs once per session
    #[error("Collection already loaded for this session")]
    AlreadyLoaded,
}

pub type Result<T> = std::result::Result<T, SessionError>;
