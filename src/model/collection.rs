//! Collection snapshot keyed by unique item id

use super::record::Record;
use super::types::ItemId;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::warn;

/// The full collection fetched for one page visit
///
/// Items keep their fetch order; the query engine refers to them by index so that
/// patching an item here is visible through every derived view.
#[derive(Debug, Clone)]
pub struct Collection<R> {
    items: Vec<R>,
    positions: HashMap<ItemId, usize>,
}

impl<R: Record> Collection<R> {
    /// Build a collection; the first item with a given id wins, later ones are dropped
    #[must_use]
    pub fn new(fetched: Vec<R>) -> Self {
        let mut items = Vec::with_capacity(fetched.len());
        let mut positions = HashMap::with_capacity(fetched.len());
        for item in fetched {
            match positions.entry(item.id().clone()) {
                Entry::Occupied(_) => warn!(id = %item.id(), "duplicate item id, keeping first occurrence"),
                Entry::Vacant(slot) => {
                    slot.insert(items.len());
                    items.push(item);
                }
            }
        }
        Self { items, positions }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            positions: HashMap::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn items(&self) -> &[R] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&R> {
        self.items.get(index)
    }

    #[must_use]
    pub fn position(&self, id: &ItemId) -> Option<usize> {
        self.positions.get(id).copied()
    }

    #[must_use]
    pub fn find(&self, id: &ItemId) -> Option<&R> {
        self.position(id).and_then(|index| self.items.get(index))
    }

    /// Overwrite the view count of one item; returns false if the id is unknown
    pub fn patch_view_count(&mut self, id: &ItemId, count: u64) -> bool {
        match self.position(id).and_then(|index| self.items.get_mut(index)) {
            Some(item) => {
                item.set_view_count(count);
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.items.iter()
    }
}

impl<R: Record> Default for Collection<R> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Item;
    use chrono::Utc;

    #[test]
    fn test_duplicate_ids_keep_first() {
        let now = Utc::now();
        let collection = Collection::new(vec![
            Item::new("a", "One", now),
            Item::new("b", "Two", now),
            Item::new("a", "Three", now),
        ]);
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.find(&"a".into()).map(|i| i.title.as_str()), Some("One"));
        assert_eq!(collection.position(&"b".into()), Some(1));
    }

    #[test]
    fn test_patch_view_count() {
        let now = Utc::now();
        let mut collection =
            Collection::new(vec![Item::new("a", "One", now), Item::new("b", "Two", now)]);

        assert!(collection.patch_view_count(&"b".into(), 7));
        assert!(!collection.patch_view_count(&"zzz".into(), 1));
        assert_eq!(collection.find(&"b".into()).and_then(|i| i.view_count), Some(7));
        assert_eq!(collection.position(&"a".into()), Some(0));
    }
}
