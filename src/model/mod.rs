//! Content data model
//!
//! The engine is generic over the `Record` trait; `Item` is the stock record used
//! by all four listing pages and by the CLI. A `Collection` is the immutable (apart
//! from view-count patches) snapshot fetched once per page visit.

pub mod collection;
pub mod de;
pub mod error;
pub mod record;
pub mod types;

pub use collection::Collection;
pub use error::ModelError;
pub use record::Record;
pub use types::{FacetValue, Item, ItemId, Media, MediaKind, Priority};

/// Decode a JSON array of items into a collection
///
/// # Errors
///
/// Returns `ModelError` if the payload is not a JSON array of items.
pub fn collection_from_json(payload: &str) -> Result<Collection<Item>, ModelError> {
    let items: Vec<Item> = serde_json::from_str(payload)?;
    Ok(Collection::new(items))
}
