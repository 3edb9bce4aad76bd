//! Sort keys and comparators
//!
//! Every `SortKey` maps to one total order. Ties are left to the caller's stable
//! sort, so equal items keep their input order.

use super::error::QueryError;
use crate::model::{Priority, Record};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Ordering applied to the filtered list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Newest first
    #[default]
    Recent,
    /// Oldest first
    Oldest,
    /// Most viewed first
    Popular,
    /// Title, locale-aware
    Alphabetical,
    /// Largest first
    Size,
    /// Earliest deadline first, undated last
    DeadlineAscending,
    /// Most urgent first
    Priority,
}

impl SortKey {
    pub const ALL: [Self; 7] = [
        Self::Recent,
        Self::Oldest,
        Self::Popular,
        Self::Alphabetical,
        Self::Size,
        Self::DeadlineAscending,
        Self::Priority,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Recent => "recent",
            Self::Oldest => "oldest",
            Self::Popular => "popular",
            Self::Alphabetical => "alphabetical",
            Self::Size => "size",
            Self::DeadlineAscending => "deadline-ascending",
            Self::Priority => "priority",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "recent" | "newest" | "recentes" => Ok(Self::Recent),
            "oldest" | "antigas" => Ok(Self::Oldest),
            "popular" | "views" | "populares" => Ok(Self::Popular),
            "alphabetical" | "alpha" | "title" | "alfabetica" => Ok(Self::Alphabetical),
            "size" | "tamanho" => Ok(Self::Size),
            "deadline-ascending" | "deadline" | "prazo" => Ok(Self::DeadlineAscending),
            "priority" | "prioridade" => Ok(Self::Priority),
            other => Err(QueryError::UnknownSortKey(other.to_string())),
        }
    }
}

/// Compare two records under `key`
#[must_use]
pub fn compare<R: Record>(a: &R, b: &R, key: SortKey) -> Ordering {
    match key {
        SortKey::Recent => b.created_at().cmp(&a.created_at()),
        SortKey::Oldest => a.created_at().cmp(&b.created_at()),
        SortKey::Popular => b.view_count().unwrap_or(0).cmp(&a.view_count().unwrap_or(0)),
        SortKey::Alphabetical => CollationKey::new(a.title()).cmp(&CollationKey::new(b.title())),
        SortKey::Size => b.size_bytes().unwrap_or(0).cmp(&a.size_bytes().unwrap_or(0)),
        SortKey::DeadlineAscending => match (a.deadline(), b.deadline()) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        SortKey::Priority => priority_rank(b).cmp(&priority_rank(a)),
    }
}

fn priority_rank<R: Record>(item: &R) -> u8 {
    item.priority().unwrap_or(Priority::Low).rank()
}

/// Title collation key: accent- and case-folded first, then accented
/// lower-case, then the raw title as the final tiebreak
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CollationKey {
    base: String,
    accented: String,
    raw: String,
}

impl CollationKey {
    #[must_use]
    pub fn new(title: &str) -> Self {
        let accented = title.to_lowercase();
        let base = accented
            .nfd()
            .filter(|c| !is_combining_mark(*c))
            .collect::<String>();
        Self {
            base,
            accented,
            raw: title.to_string(),
        }
    }
}
