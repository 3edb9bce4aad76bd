//! Error types for query operations
//!
//! Filtering, sorting and paging never fail on data; these errors only cover
//! requests the current page cannot honour (unknown sort keys or facets, a zero
//! page size coming from configuration).

use thiserror::Error;

/// Errors that can occur while configuring a query
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    /// Sort key name not recognised
    #[error("Unknown sort key '{0}'")]
    UnknownSortKey(String),

    /// Sort key exists but the page does not offer it
    #[error("Sort key '{key}' is not available on the {page} page")]
    UnsupportedSortKey { key: String, page: String },

    /// Facet name not exposed by the page
    #[error("Unknown facet '{0}'")]
    UnknownFacet(String),

    /// Status tab name not recognised
    #[error("Unknown status tab '{0}'")]
    UnknownTab(String),

    /// Page size must be at least 1
    #[error("Invalid page size {0}: must be at least 1")]
    InvalidPageSize(usize),
}

/// Result type for query operations
pub type Result<T> = std::result::Result<T, QueryError>;
