//! Media browser - detail modal, carousel and fullscreen viewer
//!
//! This module is UI-agnostic: frontends feed it `BrowserKey`s and render
//! whatever `MediaBrowser::state()` reports.
//!
//! # Architecture
//!
//! - `state`: the layered state machine (`MediaBrowser`, `BrowserState`)
//! - `carousel`: wraparound index over browsable media
//! - `keys`: key vocabulary, crossterm conversion, scoped key listener
//! - `media`: failed-URL tracking and placeholder resolution

pub mod carousel;
pub mod error;
pub mod keys;
pub mod media;
pub mod state;

pub use carousel::CarouselState;
pub use error::BrowseError;
pub use keys::{BrowserKey, KeyboardHost, ListenerGuard, ListenerId};
pub use media::{FailedMedia, MediaDisplay, PlaceholderIcon};
pub use state::{BrowserState, KeyOutcome, MediaBrowser};
