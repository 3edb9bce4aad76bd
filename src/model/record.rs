//! Field accessor trait the engine is generic over

use super::types::{FacetValue, ItemId, Media, Priority};
use chrono::{DateTime, Utc};

/// A content record the query engine, media browser and view counter can work with
///
/// Every page (news, contests, services, archive) hands the engine its own record
/// type; the engine only ever reads through these accessors. `set_view_count` is
/// the single mutation, used when an authoritative view count arrives.
pub trait Record: Clone + Send + Sync + 'static {
    fn id(&self) -> &ItemId;

    fn title(&self) -> &str;

    fn description(&self) -> Option<&str>;

    /// Value assigned for the named facet, if any
    fn facet(&self, name: &str) -> Option<&FacetValue>;

    /// Every facet assigned to the record as (name, value)
    fn facets(&self) -> Vec<(&str, &FacetValue)> {
        Vec::new()
    }

    /// Display labels of every facet assigned to the record
    fn facet_labels(&self) -> Vec<&str> {
        self.facets()
            .into_iter()
            .map(|(_, value)| value.display_label())
            .collect()
    }

    fn tags(&self) -> &[String] {
        &[]
    }

    fn created_at(&self) -> DateTime<Utc>;

    fn deadline(&self) -> Option<DateTime<Utc>> {
        None
    }

    fn view_count(&self) -> Option<u64> {
        None
    }

    fn set_view_count(&mut self, count: u64);

    fn size_bytes(&self) -> Option<u64> {
        None
    }

    fn priority(&self) -> Option<Priority> {
        None
    }

    fn media(&self) -> Option<&Media> {
        None
    }

    fn is_featured(&self) -> bool {
        false
    }
}
