//! Carousel over the browsable media of a listing
//!
//! An open carousel is never empty, so `index` is always in range and every
//! navigation step is total.

use super::error::{BrowseError, Result};
use crate::model::Media;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarouselState {
    entries: Vec<Media>,
    index: usize,
}

impl CarouselState {
    /// Keep only images and videos, then start at `start_index` (clamped)
    ///
    /// # Errors
    ///
    /// Returns `BrowseError::EmptyCarousel` when nothing browsable remains.
    pub fn new(media: impl IntoIterator<Item = Media>, start_index: usize) -> Result<Self> {
        let entries: Vec<Media> = media
            .into_iter()
            .filter(|entry| entry.kind.is_browsable())
            .collect();
        if entries.is_empty() {
            return Err(BrowseError::EmptyCarousel);
        }
        let index = start_index.min(entries.len() - 1);
        Ok(Self { entries, index })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn entries(&self) -> &[Media] {
        &self.entries
    }

    #[must_use]
    pub fn current(&self) -> &Media {
        &self.entries[self.index]
    }

    pub fn next(&mut self) -> usize {
        self.index = (self.index + 1) % self.entries.len();
        self.index
    }

    pub fn prev(&mut self) -> usize {
        let len = self.entries.len();
        self.index = (self.index + len - 1) % len;
        self.index
    }

    pub fn jump_to(&mut self, index: usize) -> usize {
        self.index = index.min(self.entries.len() - 1);
        self.index
    }
}
