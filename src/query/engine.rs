//! Query engine
//!
//! Filters a collection with a `Predicate` and orders the survivors with the
//! comparator of the chosen `SortKey`. The result is a list of indices into the
//! collection, so later view-count patches on the collection are visible through
//! it without re-running the query.
//!
//! # Architecture
//!
//! There is no incremental index: every criteria or sort change recomputes the
//! whole list. Cost is linear in the collection plus the sort.

use super::criteria::FilterCriteria;
use super::predicate::Predicate;
use super::sort::{CollationKey, SortKey, compare};
use crate::model::{Collection, Record};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::debug;

/// Stateless filter + sort pass
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryEngine;

impl QueryEngine {
    /// Indices of matching items, in result order
    #[must_use]
    pub fn run<R: Record>(
        collection: &Collection<R>,
        criteria: &FilterCriteria,
        sort_key: SortKey,
        now: DateTime<Utc>,
    ) -> Vec<usize> {
        let started = Instant::now();
        let predicate = Predicate::new(criteria, now);
        let items = collection.items();

        let mut indices: Vec<usize> = items
            .iter()
            .enumerate()
            .filter(|(_, item)| predicate.matches(*item))
            .map(|(index, _)| index)
            .collect();

        if sort_key == SortKey::Alphabetical {
            indices.sort_by_cached_key(|&index| CollationKey::new(items[index].title()));
        } else {
            indices.sort_by(|&a, &b| compare(&items[a], &items[b], sort_key));
        }

        debug!(
            total = items.len(),
            matched = indices.len(),
            sort = %sort_key,
            elapsed_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX),
            "query recomputed"
        );
        indices
    }

    /// Distinct values of a facet across the whole collection, sorted by label
    #[must_use]
    pub fn facet_values<R: Record>(collection: &Collection<R>, facet: &str) -> Vec<FacetCount> {
        let mut counts: BTreeMap<&str, FacetCount> = BTreeMap::new();
        for value in collection.iter().filter_map(|item| item.facet(facet)) {
            counts
                .entry(value.id.as_str())
                .or_insert_with(|| FacetCount {
                    id: value.id.clone(),
                    label: value.display_label().to_string(),
                    count: 0,
                })
                .count += 1;
        }

        let mut values: Vec<FacetCount> = counts.into_values().collect();
        values.sort_by_cached_key(|value| CollationKey::new(&value.label));
        values
    }
}

/// A facet value with the number of items carrying it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetCount {
    pub id: String,
    pub label: String,
    pub count: usize,
}
