//! Media browser errors
//!
//! Invalid requests leave the browser state untouched.

use super::state::BrowserState;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BrowseError {
    /// The requested surface cannot be opened from the current state
    #[error("Cannot {action} while {from}")]
    InvalidTransition {
        from: BrowserState,
        action: &'static str,
    },

    /// None of the given media can be shown in the carousel
    #[error("Carousel needs at least one image or video")]
    EmptyCarousel,

    /// Key name not understood by the browser
    #[error("Unknown key '{0}'")]
    UnknownKey(String),
}

pub type Result<T> = std::result::Result<T, BrowseError>;
