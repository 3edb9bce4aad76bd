//! Content record types
//!
//! - `ItemId`: opaque, stable identifier
//! - `FacetValue`: canonical facet id plus its display label
//! - `Media` / `MediaKind`: attached media and how it can be browsed
//! - `Priority`: closed priority scale used by the services page
//! - `Item`: the stock `Record` implementation

use super::de;
use super::record::Record;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Opaque, stable item identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Create an identifier from anything string-like
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A facet assignment: canonical identifier used for matching, label used for display and search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetValue {
    /// Canonical identifier (e.g. "educacao")
    pub id: String,
    /// Human readable label (e.g. "Educação")
    #[serde(default)]
    pub label: String,
}

impl FacetValue {
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }

    /// Label to show, falling back to the canonical id when no label was provided
    #[must_use]
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() { &self.id } else { &self.label }
    }
}

/// Kind of media attached to an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Document,
    #[default]
    None,
}

impl MediaKind {
    /// Parse a kind label; unknown kinds are `None`
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "image" => Self::Image,
            "video" => Self::Video,
            "document" => Self::Document,
            _ => Self::None,
        }
    }

    /// Whether media of this kind can be shown in the carousel
    #[must_use]
    pub const fn is_browsable(self) -> bool {
        matches!(self, Self::Image | Self::Video)
    }
}

/// Media attached to an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    pub url: String,
    #[serde(default, deserialize_with = "de::lenient_media_kind")]
    pub kind: MediaKind,
}

impl Media {
    #[must_use]
    pub fn new(url: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            url: url.into(),
            kind,
        }
    }
}

/// Priority scale (services and complaints pages)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Normal,
    High,
    Urgent,
}

impl Priority {
    /// Integer rank used by the priority comparator
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Normal => 1,
            Self::High => 2,
            Self::Urgent => 3,
        }
    }

    /// Parse a priority label, accepting the Portuguese labels the content store uses
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "low" | "baixa" => Some(Self::Low),
            "normal" | "media" | "média" => Some(Self::Normal),
            "high" | "alta" => Some(Self::High),
            "urgent" | "urgente" => Some(Self::Urgent),
            _ => None,
        }
    }
}

/// Generic content record (news article, contest, service, archive document)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,

    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Facet name -> assigned value (e.g. "category" -> educacao)
    #[serde(default, deserialize_with = "de::lenient_facets")]
    pub facets: BTreeMap<String, FacetValue>,

    /// Free-form labels; searched like facet labels
    #[serde(default, deserialize_with = "de::lenient_string_list")]
    pub tags: Vec<String>,

    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "de::lenient_count")]
    pub view_count: Option<u64>,

    /// Size in bytes; accepts raw numbers or human strings like "2.5 MB"
    #[serde(default, deserialize_with = "de::lenient_size")]
    pub size_bytes: Option<u64>,

    #[serde(default, deserialize_with = "de::lenient_priority")]
    pub priority: Option<Priority>,

    #[serde(default, deserialize_with = "de::lenient_media")]
    pub media: Option<Media>,

    #[serde(default)]
    pub featured: bool,
}

impl Item {
    /// Create an item with the required fields; everything else starts empty
    #[must_use]
    pub fn new(id: impl Into<ItemId>, title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            facets: BTreeMap::new(),
            tags: Vec::new(),
            created_at,
            deadline: None,
            view_count: None,
            size_bytes: None,
            priority: None,
            media: None,
            featured: false,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_facet(mut self, name: impl Into<String>, value: FacetValue) -> Self {
        self.facets.insert(name.into(), value);
        self
    }

    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    #[must_use]
    pub const fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    #[must_use]
    pub const fn with_view_count(mut self, count: u64) -> Self {
        self.view_count = Some(count);
        self
    }

    #[must_use]
    pub const fn with_size(mut self, bytes: u64) -> Self {
        self.size_bytes = Some(bytes);
        self
    }

    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    #[must_use]
    pub fn with_media(mut self, media: Media) -> Self {
        self.media = Some(media);
        self
    }

    #[must_use]
    pub const fn featured(mut self, featured: bool) -> Self {
        self.featured = featured;
        self
    }
}

impl Record for Item {
    fn id(&self) -> &ItemId {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn facet(&self, name: &str) -> Option<&FacetValue> {
        self.facets.get(name)
    }

    fn facets(&self) -> Vec<(&str, &FacetValue)> {
        self.facets
            .iter()
            .map(|(name, value)| (name.as_str(), value))
            .collect()
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    fn view_count(&self) -> Option<u64> {
        self.view_count
    }

    fn set_view_count(&mut self, count: u64) {
        self.view_count = Some(count);
    }

    fn size_bytes(&self) -> Option<u64> {
        self.size_bytes
    }

    fn priority(&self) -> Option<Priority> {
        self.priority
    }

    fn media(&self) -> Option<&Media> {
        self.media.as_ref()
    }

    fn is_featured(&self) -> bool {
        self.featured
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_ranks_are_ordered() {
        assert!(Priority::Low.rank() < Priority::Normal.rank());
        assert!(Priority::Normal.rank() < Priority::High.rank());
        assert!(Priority::High.rank() < Priority::Urgent.rank());
    }

    #[test]
    fn test_priority_from_label() {
        assert_eq!(Priority::from_label("urgente"), Some(Priority::Urgent));
        assert_eq!(Priority::from_label("Alta"), Some(Priority::High));
        assert_eq!(Priority::from_label("media"), Some(Priority::Normal));
        assert_eq!(Priority::from_label("baixa"), Some(Priority::Low));
        assert_eq!(Priority::from_label("whenever"), None);
    }

    #[test]
    fn test_browsable_media_kinds() {
        assert!(MediaKind::Image.is_browsable());
        assert!(MediaKind::Video.is_browsable());
        assert!(!MediaKind::Document.is_browsable());
        assert!(!MediaKind::None.is_browsable());
    }

    #[test]
    fn test_facet_display_label_falls_back_to_id() {
        assert_eq!(FacetValue::new("saude", "").display_label(), "saude");
        assert_eq!(FacetValue::new("saude", "Saúde").display_label(), "Saúde");
    }

    #[test]
    fn test_record_accessors() {
        let item = Item::new("n1", "Nova escola", Utc::now())
            .with_facet("category", FacetValue::new("educacao", "Educação"))
            .with_tags(vec!["obras".into()]);

        assert_eq!(item.id().as_str(), "n1");
        assert_eq!(item.facet("category").map(|f| f.id.as_str()), Some("educacao"));
        assert_eq!(item.facet_labels(), vec!["Educação"]);
        assert!(item.description().is_none());
    }
}
