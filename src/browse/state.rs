//! Media browser state machine
//!
//! Surfaces stack on top of each other: the detail modal at the bottom, the
//! carousel above it, the fullscreen viewer on top. `state()` reports the
//! topmost open surface. Escape peels surfaces off one at a time; arrow keys
//! only move the carousel while it is the topmost surface.
//!
//! While any surface is open the browser holds a `ListenerGuard` from its
//! `KeyboardHost`; the guard is released as soon as the last surface closes.

use super::carousel::CarouselState;
use super::error::{BrowseError, Result};
use super::keys::{BrowserKey, KeyboardHost, ListenerGuard};
use super::media::{FailedMedia, MediaDisplay};
use crate::model::{ItemId, Media, Record};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Topmost open surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BrowserState {
    Closed,
    DetailOpen,
    CarouselOpen,
    FullscreenOpen,
}

impl fmt::Display for BrowserState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => f.write_str("closed"),
            Self::DetailOpen => f.write_str("detail is open"),
            Self::CarouselOpen => f.write_str("carousel is open"),
            Self::FullscreenOpen => f.write_str("fullscreen is open"),
        }
    }
}

/// What a key press did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// A surface was closed; carries the new topmost state
    Closed(BrowserState),
    /// The carousel moved to this index
    Moved(usize),
    /// Nothing to do in the current state
    Ignored,
}

pub struct MediaBrowser<R> {
    detail: Option<R>,
    carousel: Option<CarouselState>,
    fullscreen: Option<Media>,
    failed: FailedMedia,
    host: Option<Arc<dyn KeyboardHost>>,
    listener: Option<ListenerGuard>,
}

impl<R: Record> MediaBrowser<R> {
    /// Browser without keyboard integration
    #[must_use]
    pub fn new() -> Self {
        Self {
            detail: None,
            carousel: None,
            fullscreen: None,
            failed: FailedMedia::default(),
            host: None,
            listener: None,
        }
    }

    /// Browser that attaches a key listener to `host` while open
    #[must_use]
    pub fn with_host(host: Arc<dyn KeyboardHost>) -> Self {
        Self {
            host: Some(host),
            ..Self::new()
        }
    }

    #[must_use]
    pub const fn state(&self) -> BrowserState {
        if self.fullscreen.is_some() {
            BrowserState::FullscreenOpen
        } else if self.carousel.is_some() {
            BrowserState::CarouselOpen
        } else if self.detail.is_some() {
            BrowserState::DetailOpen
        } else {
            BrowserState::Closed
        }
    }

    #[must_use]
    pub const fn is_listening(&self) -> bool {
        self.listener.is_some()
    }

    #[must_use]
    pub const fn detail(&self) -> Option<&R> {
        self.detail.as_ref()
    }

    #[must_use]
    pub const fn carousel(&self) -> Option<&CarouselState> {
        self.carousel.as_ref()
    }

    #[must_use]
    pub const fn fullscreen(&self) -> Option<&Media> {
        self.fullscreen.as_ref()
    }

    /// Show `item` in the detail modal
    ///
    /// # Errors
    ///
    /// Returns `BrowseError::InvalidTransition` while the carousel or the
    /// fullscreen viewer is open.
    pub fn open_detail(&mut self, item: R) -> Result<()> {
        match self.state() {
            BrowserState::Closed | BrowserState::DetailOpen => {
                debug!(item = %item.id(), "detail opened");
                self.detail = Some(item);
                self.ensure_listener();
                Ok(())
            }
            from => Err(BrowseError::InvalidTransition {
                from,
                action: "open detail",
            }),
        }
    }

    /// Open the carousel over the browsable subset of `media`
    ///
    /// Closes the fullscreen viewer if it was open; the detail modal stays
    /// underneath.
    ///
    /// # Errors
    ///
    /// Returns `BrowseError::EmptyCarousel` (and changes nothing) when `media`
    /// holds no image or video.
    pub fn open_carousel(&mut self, media: impl IntoIterator<Item = Media>, start_index: usize) -> Result<usize> {
        let carousel = CarouselState::new(media, start_index)?;
        let index = carousel.index();
        debug!(len = carousel.len(), index, "carousel opened");
        self.fullscreen = None;
        self.carousel = Some(carousel);
        self.ensure_listener();
        Ok(index)
    }

    /// Show one entry fullscreen, independent of the carousel position
    pub fn open_fullscreen(&mut self, entry: Media) {
        debug!(url = %entry.url, "fullscreen opened");
        self.fullscreen = Some(entry);
        self.ensure_listener();
    }

    /// Close every surface and release the key listener
    pub fn close(&mut self) {
        self.detail = None;
        self.carousel = None;
        self.fullscreen = None;
        self.listener = None;
    }

    /// Advance the carousel with wraparound; `None` when no carousel is open
    pub fn next(&mut self) -> Option<usize> {
        self.carousel.as_mut().map(CarouselState::next)
    }

    /// Step the carousel back with wraparound; `None` when no carousel is open
    pub fn prev(&mut self) -> Option<usize> {
        self.carousel.as_mut().map(CarouselState::prev)
    }

    /// Jump to a carousel entry, clamped into range
    pub fn jump_to(&mut self, index: usize) -> Option<usize> {
        self.carousel.as_mut().map(|carousel| carousel.jump_to(index))
    }

    pub fn handle_key(&mut self, key: BrowserKey) -> KeyOutcome {
        match (key, self.state()) {
            (_, BrowserState::Closed) => KeyOutcome::Ignored,
            (BrowserKey::Escape, _) => {
                self.close_topmost();
                KeyOutcome::Closed(self.state())
            }
            (BrowserKey::ArrowLeft, BrowserState::CarouselOpen) => {
                self.prev().map_or(KeyOutcome::Ignored, KeyOutcome::Moved)
            }
            (BrowserKey::ArrowRight, BrowserState::CarouselOpen) => {
                self.next().map_or(KeyOutcome::Ignored, KeyOutcome::Moved)
            }
            _ => KeyOutcome::Ignored,
        }
    }

    /// Patch the view count of the item shown in the detail modal
    ///
    /// Returns false when no detail is open or it shows a different item.
    pub fn patch_view_count(&mut self, id: &ItemId, count: u64) -> bool {
        match self.detail.as_mut() {
            Some(item) if item.id() == id => {
                item.set_view_count(count);
                true
            }
            _ => false,
        }
    }

    /// Remember that `url` failed to load
    pub fn report_media_failure(&mut self, url: impl Into<String>) -> bool {
        self.failed.report(url)
    }

    #[must_use]
    pub fn media_display(&self, media: &Media) -> MediaDisplay {
        self.failed.display(media)
    }

    fn close_topmost(&mut self) {
        if self.fullscreen.take().is_none() && self.carousel.take().is_none() {
            self.detail = None;
        }
        if self.state() == BrowserState::Closed {
            self.listener = None;
        }
    }

    fn ensure_listener(&mut self) {
        if self.listener.is_none() {
            self.listener = self.host.clone().map(ListenerGuard::acquire);
        }
    }
}

impl<R: Record> Default for MediaBrowser<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record + fmt::Debug> fmt::Debug for MediaBrowser<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaBrowser")
            .field("state", &self.state())
            .field("detail", &self.detail)
            .field("carousel", &self.carousel)
            .field("fullscreen", &self.fullscreen)
            .field("listening", &self.is_listening())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod state_tests;
