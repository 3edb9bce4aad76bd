//! Lenient deserializers for optional fields
//!
//! Content rows come from hand-edited admin forms, so optional fields are often
//! malformed: tag arrays and facet maps stored as JSON text, sizes written as
//! "2.5 MB", counts as strings, media kinds we do not render. None of these are
//! worth failing a whole collection load over; each helper falls back to an
//! empty/absent value instead.

use super::types::{FacetValue, Media, MediaKind, Priority};
use byte_unit::Byte;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

#[derive(Deserialize)]
#[serde(untagged)]
enum StringListRepr {
    List(Vec<String>),
    Encoded(String),
    Other(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SizeRepr {
    Bytes(u64),
    Fractional(f64),
    Text(String),
    Other(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LabelRepr {
    Text(String),
    Other(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CountRepr {
    Count(u64),
    Fractional(f64),
    Text(String),
    Other(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FacetRepr {
    Value(FacetValue),
    Bare(String),
    Other(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FacetsRepr {
    Map(BTreeMap<String, FacetRepr>),
    Encoded(String),
    Other(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MediaRepr {
    Full(Media),
    Other(IgnoredAny),
}

/// Accept a string array, a JSON-encoded string array, or anything else (-> empty)
pub fn lenient_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StringListRepr::deserialize(deserializer)? {
        StringListRepr::List(list) => list,
        StringListRepr::Encoded(text) => parse_encoded_list(&text),
        StringListRepr::Other(_) => {
            tracing::debug!("unparsable string list, defaulting to empty");
            Vec::new()
        }
    })
}

/// Accept a byte count, a fractional byte count, or a human size string
pub fn lenient_size<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match SizeRepr::deserialize(deserializer)? {
        SizeRepr::Bytes(bytes) => Some(bytes),
        SizeRepr::Fractional(bytes) if bytes.is_finite() && bytes >= 0.0 => {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            Some(bytes.round() as u64)
        }
        SizeRepr::Text(text) => parse_size(&text),
        SizeRepr::Fractional(_) | SizeRepr::Other(_) => None,
    })
}

/// Accept any known priority label; unknown labels become `None`
pub fn lenient_priority<'de, D>(deserializer: D) -> Result<Option<Priority>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match LabelRepr::deserialize(deserializer)? {
        LabelRepr::Text(label) => Priority::from_label(&label),
        LabelRepr::Other(_) => None,
    })
}

/// Accept a count as a number or numeric text; anything else becomes `None`
pub fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match CountRepr::deserialize(deserializer)? {
        CountRepr::Count(count) => Some(count),
        CountRepr::Fractional(count) if count.is_finite() && count >= 0.0 => {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            Some(count.round() as u64)
        }
        CountRepr::Text(text) => text.trim().parse().map_or_else(
            |_| {
                tracing::debug!(count = %text, "unparsable count, ignoring");
                None
            },
            Some,
        ),
        CountRepr::Fractional(_) | CountRepr::Other(_) => None,
    })
}

/// Accept a facet map whose values are `{id, label}` objects or bare ids,
/// either inline or JSON-encoded; anything else becomes an empty map
pub fn lenient_facets<'de, D>(deserializer: D) -> Result<BTreeMap<String, FacetValue>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match FacetsRepr::deserialize(deserializer)? {
        FacetsRepr::Map(map) => collect_facets(map),
        FacetsRepr::Encoded(text) => parse_encoded_facets(&text),
        FacetsRepr::Other(_) => {
            tracing::debug!("unparsable facets, defaulting to empty");
            BTreeMap::new()
        }
    })
}

/// Accept a media object; unknown kinds are kept as `MediaKind::None`,
/// anything without a url is dropped
pub fn lenient_media<'de, D>(deserializer: D) -> Result<Option<Media>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match MediaRepr::deserialize(deserializer)? {
        MediaRepr::Full(media) => Some(media),
        MediaRepr::Other(_) => {
            tracing::debug!("unparsable media, ignoring");
            None
        }
    })
}

/// Accept any media kind label; unknown or non-text kinds become `MediaKind::None`
pub fn lenient_media_kind<'de, D>(deserializer: D) -> Result<MediaKind, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match LabelRepr::deserialize(deserializer)? {
        LabelRepr::Text(label) => MediaKind::from_label(&label),
        LabelRepr::Other(_) => MediaKind::None,
    })
}

/// Parse a human size string such as "2.5 MB" or "512 KiB"
#[must_use]
pub fn parse_size(text: &str) -> Option<u64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    match Byte::parse_str(text, true) {
        Ok(byte) => Some(byte.as_u64()),
        Err(e) => {
            tracing::debug!(size = text, error = %e, "unparsable size, ignoring");
            None
        }
    }
}

fn parse_encoded_list(text: &str) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    serde_json::from_str::<Vec<String>>(trimmed).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "unparsable encoded string list, defaulting to empty");
        Vec::new()
    })
}

fn collect_facets(map: BTreeMap<String, FacetRepr>) -> BTreeMap<String, FacetValue> {
    map.into_iter()
        .filter_map(|(name, value)| match value {
            FacetRepr::Value(value) => Some((name, value)),
            FacetRepr::Bare(id) => Some((name, FacetValue::new(id, ""))),
            FacetRepr::Other(_) => {
                tracing::debug!(facet = %name, "unparsable facet value, dropping");
                None
            }
        })
        .collect()
}

fn parse_encoded_facets(text: &str) -> BTreeMap<String, FacetValue> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return BTreeMap::new();
    }
    serde_json::from_str::<BTreeMap<String, FacetRepr>>(trimmed).map_or_else(
        |e| {
            tracing::debug!(error = %e, "unparsable encoded facets, defaulting to empty");
            BTreeMap::new()
        },
        collect_facets,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "lenient_string_list")]
        tags: Vec<String>,
        #[serde(default, deserialize_with = "lenient_size")]
        size: Option<u64>,
        #[serde(default, deserialize_with = "lenient_priority")]
        priority: Option<Priority>,
        #[serde(default, deserialize_with = "lenient_count")]
        count: Option<u64>,
        #[serde(default, deserialize_with = "lenient_facets")]
        facets: BTreeMap<String, FacetValue>,
        #[serde(default, deserialize_with = "lenient_media")]
        media: Option<Media>,
    }

    fn row(value: serde_json::Value) -> Row {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_string_list_accepts_array() {
        let p = row(json!({ "tags": ["a", "b"] }));
        assert_eq!(p.tags, vec!["a", "b"]);
    }

    #[test]
    fn test_string_list_accepts_encoded_array() {
        let p = row(json!({ "tags": "[\"obras\", \"saude\"]" }));
        assert_eq!(p.tags, vec!["obras", "saude"]);
    }

    #[test]
    fn test_string_list_malformed_defaults_to_empty() {
        assert!(row(json!({ "tags": "[not json" })).tags.is_empty());
        assert!(row(json!({ "tags": 42 })).tags.is_empty());
        assert!(row(json!({ "tags": [1, 2] })).tags.is_empty());
        assert!(row(json!({ "tags": null })).tags.is_empty());
        assert!(row(json!({})).tags.is_empty());
    }

    #[test]
    fn test_size_variants() {
        assert_eq!(row(json!({ "size": 2048 })).size, Some(2048));
        assert_eq!(row(json!({ "size": "2 KB" })).size, Some(2000));
        assert_eq!(row(json!({ "size": "2.5 MB" })).size, Some(2_500_000));
        assert_eq!(row(json!({ "size": "huge" })).size, None);
        assert_eq!(row(json!({ "size": -3.0 })).size, None);
        assert_eq!(row(json!({ "size": [1] })).size, None);
    }

    #[test]
    fn test_priority_variants() {
        assert_eq!(row(json!({ "priority": "urgente" })).priority, Some(Priority::Urgent));
        assert_eq!(row(json!({ "priority": "nope" })).priority, None);
        assert_eq!(row(json!({ "priority": 3 })).priority, None);
    }

    #[test]
    fn test_count_variants() {
        assert_eq!(row(json!({ "count": 12 })).count, Some(12));
        assert_eq!(row(json!({ "count": "12" })).count, Some(12));
        assert_eq!(row(json!({ "count": " 7 " })).count, Some(7));
        assert_eq!(row(json!({ "count": 3.0 })).count, Some(3));
        assert_eq!(row(json!({ "count": "doze" })).count, None);
        assert_eq!(row(json!({ "count": -1 })).count, None);
        assert_eq!(row(json!({ "count": null })).count, None);
    }

    #[test]
    fn test_facets_accept_objects_and_bare_ids() {
        let facets = row(json!({
            "facets": {
                "category": { "id": "saude", "label": "Saúde" },
                "type": "edital",
                "broken": 42
            }
        }))
        .facets;
        assert_eq!(facets.len(), 2);
        assert_eq!(facets["category"], FacetValue::new("saude", "Saúde"));
        assert_eq!(facets["type"], FacetValue::new("edital", ""));
        assert_eq!(facets["type"].display_label(), "edital");
    }

    #[test]
    fn test_facets_accept_encoded_map() {
        let facets = row(json!({ "facets": "{\"category\": \"educacao\"}" })).facets;
        assert_eq!(facets["category"].id, "educacao");
    }

    #[test]
    fn test_facets_malformed_default_to_empty() {
        assert!(row(json!({ "facets": "[\"educacao\"]" })).facets.is_empty());
        assert!(row(json!({ "facets": "{not json" })).facets.is_empty());
        assert!(row(json!({ "facets": ["educacao"] })).facets.is_empty());
        assert!(row(json!({ "facets": 7 })).facets.is_empty());
        assert!(row(json!({})).facets.is_empty());
    }

    #[test]
    fn test_media_unknown_kind_is_kept_without_kind() {
        let media = row(json!({ "media": { "url": "https://cdn.example/a.ogg", "kind": "audio" } })).media;
        assert_eq!(media, Some(Media::new("https://cdn.example/a.ogg", MediaKind::None)));

        let media = row(json!({ "media": { "url": "https://cdn.example/a.jpg", "kind": "Image" } })).media;
        assert_eq!(media.map(|m| m.kind), Some(MediaKind::Image));
    }

    #[test]
    fn test_media_without_url_is_dropped() {
        assert_eq!(row(json!({ "media": { "kind": "image" } })).media, None);
        assert_eq!(row(json!({ "media": "https://cdn.example/a.jpg" })).media, None);
        assert_eq!(row(json!({ "media": null })).media, None);
    }
}
