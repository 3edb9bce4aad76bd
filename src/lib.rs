//! Vitrine - faceted browsing over content listings
//!
//! This library loads a collection of content items (news, contests, services,
//! archive documents) and provides the shared machinery every listing page needs:
//! free-text search and facet filtering, deterministic sorting, pagination, a
//! grid/list view toggle, a layered media browser and per-item view counting.

use thiserror::Error;

pub mod browse;
pub mod cli;
pub mod config;
pub mod counter;
pub mod export;
pub mod logging;
pub mod model;
pub mod notify;
pub mod output;
pub mod profile;
pub mod query;
pub mod session;
pub mod source;
pub mod view;

#[cfg(test)]
pub mod testing;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum VitrineError {
    /// Collection payload or record error
    #[error("Model error: {0}")]
    Model(#[from] model::ModelError),
    /// Criteria, sort or pagination error
    #[error("Query error: {0}")]
    Query(#[from] query::QueryError),
    /// Media browser error
    #[error("Browse error: {0}")]
    Browse(#[from] browse::BrowseError),
    /// Content source error
    #[error("Source error: {0}")]
    Source(#[from] source::SourceError),
    /// Export error
    #[error("Export error: {0}")]
    Export(#[from] export::ExportError),
    /// Page session error
    #[error("Session error: {0}")]
    Session(#[from] session::SessionError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
