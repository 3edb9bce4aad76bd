//! Media display resolution
//!
//! A media URL that failed to load is remembered for the rest of the visit and
//! resolves to a placeholder icon from then on. Failures are never surfaced to
//! the user.

use crate::model::{Media, MediaKind};
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderIcon {
    Image,
    Video,
    Document,
    Generic,
}

impl From<MediaKind> for PlaceholderIcon {
    fn from(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Image => Self::Image,
            MediaKind::Video => Self::Video,
            MediaKind::Document => Self::Document,
            MediaKind::None => Self::Generic,
        }
    }
}

/// What to render for one media entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MediaDisplay {
    Source(String),
    Placeholder(PlaceholderIcon),
}

/// URLs reported as failed during this visit
#[derive(Debug, Clone, Default)]
pub struct FailedMedia {
    urls: HashSet<String>,
}

impl FailedMedia {
    /// Remember a failed URL; returns false if it was already known
    pub fn report(&mut self, url: impl Into<String>) -> bool {
        let url = url.into();
        debug!(url = %url, "media failed to load, using placeholder");
        self.urls.insert(url)
    }

    #[must_use]
    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    /// Resolve what to show for `media`
    #[must_use]
    pub fn display(&self, media: &Media) -> MediaDisplay {
        if media.url.is_empty() || media.kind == MediaKind::None || self.contains(&media.url) {
            MediaDisplay::Placeholder(media.kind.into())
        } else {
            MediaDisplay::Source(media.url.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_url_resolves_to_placeholder() {
        let mut failed = FailedMedia::default();
        let photo = Media::new("https://cdn.example/a.jpg", MediaKind::Image);
        assert_eq!(failed.display(&photo), MediaDisplay::Source(photo.url.clone()));

        assert!(failed.report(photo.url.clone()));
        assert!(!failed.report(photo.url.clone()));
        assert_eq!(
            failed.display(&photo),
            MediaDisplay::Placeholder(PlaceholderIcon::Image)
        );
    }

    #[test]
    fn test_missing_media_is_placeholder() {
        let failed = FailedMedia::default();
        let none = Media::new("", MediaKind::Document);
        assert_eq!(
            failed.display(&none),
            MediaDisplay::Placeholder(PlaceholderIcon::Document)
        );
    }
}
