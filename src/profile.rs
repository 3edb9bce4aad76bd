//! Page profiles
//!
//! The four listing pages share one engine and differ only in their profile:
//! page size, default ordering, which sort keys they offer and which facets
//! they expose.

use crate::query::{QueryError, SortKey};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageProfile {
    News,
    Contests,
    Services,
    Archive,
}

impl PageProfile {
    pub const ALL: [Self; 4] = [Self::News, Self::Contests, Self::Services, Self::Archive];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::News => "news",
            Self::Contests => "contests",
            Self::Services => "services",
            Self::Archive => "archive",
        }
    }

    #[must_use]
    pub fn default_page_size(self) -> NonZeroUsize {
        let size = match self {
            Self::News => 9,
            Self::Contests => 10,
            Self::Services | Self::Archive => 12,
        };
        NonZeroUsize::new(size).unwrap_or(NonZeroUsize::MIN)
    }

    #[must_use]
    pub const fn default_sort(self) -> SortKey {
        match self {
            Self::News | Self::Archive => SortKey::Recent,
            Self::Contests => SortKey::DeadlineAscending,
            Self::Services => SortKey::Alphabetical,
        }
    }

    /// Sort keys offered in the page's sort menu
    #[must_use]
    pub const fn sort_keys(self) -> &'static [SortKey] {
        match self {
            Self::News => &[
                SortKey::Recent,
                SortKey::Oldest,
                SortKey::Popular,
                SortKey::Alphabetical,
            ],
            Self::Contests => &[
                SortKey::DeadlineAscending,
                SortKey::Recent,
                SortKey::Oldest,
                SortKey::Alphabetical,
            ],
            Self::Services => &[SortKey::Alphabetical, SortKey::Priority, SortKey::Recent],
            Self::Archive => &[
                SortKey::Recent,
                SortKey::Oldest,
                SortKey::Alphabetical,
                SortKey::Size,
            ],
        }
    }

    /// Facet names shown in the page's facet panel
    #[must_use]
    pub const fn facets(self) -> &'static [&'static str] {
        match self {
            Self::News => &["category"],
            Self::Contests | Self::Services => &["category", "direction"],
            Self::Archive => &["direction", "type"],
        }
    }

    /// Check that the page offers `key`
    ///
    /// # Errors
    ///
    /// Returns `QueryError::UnsupportedSortKey` otherwise.
    pub fn check_sort_key(self, key: SortKey) -> Result<SortKey, QueryError> {
        if self.sort_keys().contains(&key) {
            Ok(key)
        } else {
            Err(QueryError::UnsupportedSortKey {
                key: key.to_string(),
                page: self.to_string(),
            })
        }
    }

    /// Check that the page exposes facet `name`
    ///
    /// # Errors
    ///
    /// Returns `QueryError::UnknownFacet` otherwise.
    pub fn check_facet(self, name: &str) -> Result<(), QueryError> {
        if self.facets().contains(&name) {
            Ok(())
        } else {
            Err(QueryError::UnknownFacet(name.to_string()))
        }
    }
}

impl fmt::Display for PageProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "news" | "noticias" => Ok(Self::News),
            "contests" | "concursos" => Ok(Self::Contests),
            "services" | "servicos" => Ok(Self::Services),
            "archive" | "acervo" => Ok(Self::Archive),
            other => Err(format!(
                "Unknown page profile '{other}' (expected news, contests, services or archive)"
            )),
        }
    }
}

/// Effective settings for one page visit (profile defaults, possibly overridden by config)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSettings {
    pub profile: PageProfile,
    pub page_size: NonZeroUsize,
    pub default_sort: SortKey,
}

impl From<PageProfile> for PageSettings {
    fn from(profile: PageProfile) -> Self {
        Self {
            profile,
            page_size: profile.default_page_size(),
            default_sort: profile.default_sort(),
        }
    }
}
