//! Item predicate
//!
//! `Predicate` compiles a `FilterCriteria` once (lower-cased needle, constrained
//! facets) and is then evaluated per item. Every active constraint must hold.

use super::criteria::{FilterCriteria, StatusTab};
use super::status::{Status, derive_status, is_closing_soon};
use crate::model::Record;
use chrono::{DateTime, Utc};

/// Criteria prepared for repeated evaluation
#[derive(Debug, Clone)]
pub struct Predicate<'c> {
    needle: String,
    facets: Vec<(&'c str, &'c str)>,
    tab: Option<StatusTab>,
    now: DateTime<Utc>,
}

impl<'c> Predicate<'c> {
    #[must_use]
    pub fn new(criteria: &'c FilterCriteria, now: DateTime<Utc>) -> Self {
        let needle = if criteria.search_text.trim().is_empty() {
            String::new()
        } else {
            criteria.needle()
        };
        Self {
            needle,
            facets: criteria.active_facets().collect(),
            tab: criteria.tab,
            now,
        }
    }

    /// Whether the item satisfies every active constraint
    #[must_use]
    pub fn matches<R: Record>(&self, item: &R) -> bool {
        self.matches_search(item) && self.matches_facets(item) && self.matches_tab(item)
    }

    fn matches_search<R: Record>(&self, item: &R) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        let needle = self.needle.as_str();
        contains_folded(item.title(), needle)
            || item.description().is_some_and(|d| contains_folded(d, needle))
            || item.facet_labels().into_iter().any(|l| contains_folded(l, needle))
            || item.tags().iter().any(|t| contains_folded(t, needle))
    }

    fn matches_facets<R: Record>(&self, item: &R) -> bool {
        self.facets
            .iter()
            .all(|(name, value)| item.facet(name).is_some_and(|facet| facet.id == *value))
    }

    fn matches_tab<R: Record>(&self, item: &R) -> bool {
        match self.tab {
            None => true,
            Some(StatusTab::Active) => derive_status(item, self.now) == Status::Active,
            Some(StatusTab::Closed) => derive_status(item, self.now) == Status::Closed,
            Some(StatusTab::ClosingSoon) => is_closing_soon(item, self.now),
            Some(StatusTab::Featured) => item.is_featured(),
            Some(StatusTab::Regular) => !item.is_featured(),
        }
    }
}

/// One-off evaluation of `criteria` against `item`
#[must_use]
pub fn matches<R: Record>(item: &R, criteria: &FilterCriteria, now: DateTime<Utc>) -> bool {
    Predicate::new(criteria, now).matches(item)
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FacetValue, Item};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()
    }

    fn school() -> Item {
        Item::new("n1", "Inauguração de escola", now())
            .with_description("Nova escola primária no bairro Popular")
            .with_facet("category", FacetValue::new("educacao", "Educação"))
            .with_facet("direction", FacetValue::new("dme", "Direcção de Educação"))
            .with_tags(vec!["infraestrutura".to_string()])
    }

    #[test]
    fn test_empty_search_matches_everything() {
        assert!(matches(&school(), &FilterCriteria::default(), now()));

        let blank = FilterCriteria::builder().search("   ").build();
        assert!(matches(&school(), &blank, now()));
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let criteria = FilterCriteria::builder().search("ESCOLA").build();
        assert!(matches(&school(), &criteria, now()));

        let criteria = FilterCriteria::builder().search("edu").build();
        assert!(matches(&school(), &criteria, now()), "matches facet label Educação");

        let criteria = FilterCriteria::builder().search("primária").build();
        assert!(matches(&school(), &criteria, now()), "matches description");

        let criteria = FilterCriteria::builder().search("infra").build();
        assert!(matches(&school(), &criteria, now()), "matches tags");

        let criteria = FilterCriteria::builder().search("escloa").build();
        assert!(!matches(&school(), &criteria, now()), "no fuzzy matching");
    }

    #[test]
    fn test_facet_match_uses_canonical_id() {
        let by_id = FilterCriteria::builder().facet("category", "educacao").build();
        assert!(matches(&school(), &by_id, now()));

        let by_label = FilterCriteria::builder().facet("category", "Educação").build();
        assert!(!matches(&school(), &by_label, now()));

        let wrong_case = FilterCriteria::builder().facet("category", "Educacao").build();
        assert!(!matches(&school(), &wrong_case, now()));

        let missing_facet = FilterCriteria::builder().facet("type", "edital").build();
        assert!(!matches(&school(), &missing_facet, now()));
    }

    #[test]
    fn test_constraints_are_and_combined() {
        let criteria = FilterCriteria::builder()
            .search("escola")
            .facet("category", "saude")
            .build();
        assert!(!matches(&school(), &criteria, now()));

        let criteria = FilterCriteria::builder()
            .search("escola")
            .facet("category", "educacao")
            .facet("direction", "dme")
            .build();
        assert!(matches(&school(), &criteria, now()));
    }

    #[test]
    fn test_tab_constraints() {
        let open = Item::new("c1", "Concurso", now()).with_deadline(now() + Duration::days(20));
        let soon = Item::new("c2", "Concurso", now()).with_deadline(now() + Duration::days(2));
        let closed = Item::new("c3", "Concurso", now()).with_deadline(now());

        let active = FilterCriteria::builder().tab(StatusTab::Active).build();
        assert!(matches(&open, &active, now()));
        assert!(matches(&soon, &active, now()));
        assert!(!matches(&closed, &active, now()));

        let closing = FilterCriteria::builder().tab(StatusTab::ClosingSoon).build();
        assert!(!matches(&open, &closing, now()));
        assert!(matches(&soon, &closing, now()));
        assert!(!matches(&closed, &closing, now()));

        let closed_tab = FilterCriteria::builder().tab(StatusTab::Closed).build();
        assert!(matches(&closed, &closed_tab, now()));
    }

    #[test]
    fn test_featured_tabs() {
        let featured = school().featured(true);
        let featured_tab = FilterCriteria::builder().tab(StatusTab::Featured).build();
        let regular_tab = FilterCriteria::builder().tab(StatusTab::Regular).build();

        assert!(matches(&featured, &featured_tab, now()));
        assert!(!matches(&featured, &regular_tab, now()));
        assert!(matches(&school(), &regular_tab, now()));
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let criteria = FilterCriteria::builder().search("bairro").facet("category", "educacao").build();
        let item = school();
        let first = matches(&item, &criteria, now());
        let second = matches(&item, &criteria, now());
        assert_eq!(first, second);
        assert!(first);
    }
}
