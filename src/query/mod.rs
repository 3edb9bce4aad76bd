//! Faceted query engine
//!
//! - [`criteria`]: what the user asked for (search text, facets, status tab)
//! - [`predicate`]: per-item evaluation of the criteria
//! - [`sort`]: sort keys and their comparators
//! - [`status`]: deadline-derived status, days remaining, urgency
//! - [`engine`]: filter + sort over a collection
//! - [`paginate`]: page slicing and the page-number window
//!
//! Everything here is synchronous and pure; "now" is always passed in.

pub mod criteria;
pub mod engine;
pub mod error;
pub mod paginate;
pub mod predicate;
pub mod sort;
pub mod status;

pub use criteria::{ALL, FacetSelection, FilterCriteria, FilterCriteriaBuilder, StatusTab};
pub use engine::{FacetCount, QueryEngine};
pub use error::{QueryError, Result};
pub use paginate::{Page, PaginationState, page_count, page_window, paginate};
pub use predicate::{Predicate, matches};
pub use sort::{CollationKey, SortKey, compare};
pub use status::{
    Clock, FixedClock, Status, StatusCounts, SystemClock, URGENT_WINDOW_DAYS, UrgencyTier,
    days_remaining, derive_status, is_closing_soon, status_counts, urgency,
};
