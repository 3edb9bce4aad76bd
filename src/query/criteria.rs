//! Filter criteria
//!
//! - `FacetSelection`: one facet constraint, or the "all" sentinel
//! - `StatusTab`: optional derived-status constraint (active, closed, ...)
//! - `FilterCriteria`: search text + facet selections + tab, with a builder
//!
//! Criteria are plain data. Evaluating the same criteria against the same
//! collection at the same instant always yields the same result.

use super::error::QueryError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Sentinel facet value meaning "no constraint"
pub const ALL: &str = "all";

/// Selected value for one facet
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FacetSelection {
    /// No constraint
    #[default]
    All,
    /// Item's canonical facet id must equal this value exactly
    Only(String),
}

impl FacetSelection {
    /// Parse a selection; "all" and the Portuguese "todos"/"todas" mean no constraint
    ///
    /// Surrounding whitespace only matters for the sentinels; a constrained value is
    /// kept as given and compared exactly.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "" | ALL | "todos" | "todas" | "Todas" => Self::All,
            _ => Self::Only(value.to_string()),
        }
    }

    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Selected canonical value, if constrained
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Only(value) => Some(value),
        }
    }
}

impl From<String> for FacetSelection {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<&str> for FacetSelection {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<FacetSelection> for String {
    fn from(selection: FacetSelection) -> Self {
        match selection {
            FacetSelection::All => ALL.to_string(),
            FacetSelection::Only(value) => value,
        }
    }
}

/// Derived-status constraint selected through a page tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusTab {
    /// Deadline absent or still ahead
    Active,
    /// Deadline reached
    Closed,
    /// Active, with the deadline inside the urgency window
    ClosingSoon,
    /// Marked as featured
    Featured,
    /// Not featured
    Regular,
}

impl StatusTab {
    pub const ALL: [Self; 5] = [
        Self::Active,
        Self::Closed,
        Self::ClosingSoon,
        Self::Featured,
        Self::Regular,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Closed => "closed",
            Self::ClosingSoon => "closing-soon",
            Self::Featured => "featured",
            Self::Regular => "regular",
        }
    }
}

impl fmt::Display for StatusTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusTab {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" | "open" | "abertos" => Ok(Self::Active),
            "closed" | "encerrados" => Ok(Self::Closed),
            "closing-soon" | "closing" => Ok(Self::ClosingSoon),
            "featured" | "destaque" => Ok(Self::Featured),
            "regular" => Ok(Self::Regular),
            other => Err(QueryError::UnknownTab(other.to_string())),
        }
    }
}

/// Current filter criteria for one listing
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Free text, matched case-insensitively as a substring
    #[serde(default)]
    pub search_text: String,

    /// Facet name -> selection; absent facets are unconstrained
    #[serde(default)]
    pub facets: BTreeMap<String, FacetSelection>,

    /// Optional status tab constraint
    #[serde(default)]
    pub tab: Option<StatusTab>,
}

impl FilterCriteria {
    #[must_use]
    pub fn builder() -> FilterCriteriaBuilder {
        FilterCriteriaBuilder::default()
    }

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or clear one facet selection
    ///
    /// Selecting `All` removes the entry so equal constraints compare equal.
    pub fn set_facet(&mut self, name: impl Into<String>, selection: FacetSelection) {
        let name = name.into();
        if selection.is_all() {
            self.facets.remove(&name);
        } else {
            self.facets.insert(name, selection);
        }
    }

    /// Selection for a facet (`All` when unset)
    #[must_use]
    pub fn facet(&self, name: &str) -> FacetSelection {
        self.facets.get(name).cloned().unwrap_or_default()
    }

    /// Constrained facets as (name, value) pairs
    pub fn active_facets(&self) -> impl Iterator<Item = (&str, &str)> {
        self.facets
            .iter()
            .filter_map(|(name, selection)| selection.value().map(|value| (name.as_str(), value)))
    }

    /// Lower-cased search needle
    #[must_use]
    pub fn needle(&self) -> String {
        self.search_text.to_lowercase()
    }

    /// True when nothing narrows the collection; blank search text does not narrow
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.search_text.trim().is_empty() && self.active_facets().next().is_none() && self.tab.is_none()
    }
}

/// Builder for `FilterCriteria`
#[derive(Debug, Clone, Default)]
pub struct FilterCriteriaBuilder {
    search_text: String,
    facets: BTreeMap<String, FacetSelection>,
    tab: Option<StatusTab>,
}

impl FilterCriteriaBuilder {
    #[must_use]
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    #[must_use]
    pub fn facet(mut self, name: impl Into<String>, value: impl Into<FacetSelection>) -> Self {
        let selection = value.into();
        let name = name.into();
        if selection.is_all() {
            self.facets.remove(&name);
        } else {
            self.facets.insert(name, selection);
        }
        self
    }

    #[must_use]
    pub const fn tab(mut self, tab: StatusTab) -> Self {
        self.tab = Some(tab);
        self
    }

    #[must_use]
    pub fn build(self) -> FilterCriteria {
        FilterCriteria {
            search_text: self.search_text,
            facets: self.facets,
            tab: self.tab,
        }
    }
}

impl fmt::Display for FilterCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.search_text.is_empty() {
            writeln!(f, "Search: (none)")?;
        } else {
            writeln!(f, "Search: \"{}\"", self.search_text)?;
        }

        let facets: Vec<String> = self
            .active_facets()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        if facets.is_empty() {
            writeln!(f, "Facets: (all)")?;
        } else {
            writeln!(f, "Facets: {}", facets.join(", "))?;
        }

        if let Some(tab) = self.tab {
            writeln!(f, "Tab: {tab}")?;
        }

        Ok(())
    }
}
