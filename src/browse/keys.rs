//! Keyboard input for the media browser
//!
//! `BrowserKey` is the small key vocabulary the browser reacts to. It parses
//! from DOM key names and converts from crossterm events so web and terminal
//! frontends drive the same state machine.
//!
//! The listener itself is a scoped resource: a `KeyboardHost` hands out a
//! `ListenerGuard`, and dropping the guard detaches the listener.

use super::error::BrowseError;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::trace;

/// Keys the media browser handles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrowserKey {
    Escape,
    ArrowLeft,
    ArrowRight,
}

impl BrowserKey {
    /// DOM `KeyboardEvent.key` name
    #[must_use]
    pub const fn dom_name(self) -> &'static str {
        match self {
            Self::Escape => "Escape",
            Self::ArrowLeft => "ArrowLeft",
            Self::ArrowRight => "ArrowRight",
        }
    }
}

impl fmt::Display for BrowserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dom_name())
    }
}

impl FromStr for BrowserKey {
    type Err = BrowseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Escape" | "Esc" => Ok(Self::Escape),
            "ArrowLeft" | "Left" => Ok(Self::ArrowLeft),
            "ArrowRight" | "Right" => Ok(Self::ArrowRight),
            other => Err(BrowseError::UnknownKey(other.to_string())),
        }
    }
}

impl TryFrom<KeyCode> for BrowserKey {
    type Error = BrowseError;

    fn try_from(code: KeyCode) -> Result<Self, Self::Error> {
        match code {
            KeyCode::Esc => Ok(Self::Escape),
            KeyCode::Left | KeyCode::Char('h') => Ok(Self::ArrowLeft),
            KeyCode::Right | KeyCode::Char('l') => Ok(Self::ArrowRight),
            other => Err(BrowseError::UnknownKey(format!("{other:?}"))),
        }
    }
}

impl TryFrom<&KeyEvent> for BrowserKey {
    type Error = BrowseError;

    /// Modified keys (ctrl, alt) are not browser keys
    fn try_from(event: &KeyEvent) -> Result<Self, Self::Error> {
        if event
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return Err(BrowseError::UnknownKey(format!("{:?}+{:?}", event.modifiers, event.code)));
        }
        Self::try_from(event.code)
    }
}

/// Opaque handle for one attached listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Whatever delivers key presses to the browser (window, terminal loop, ...)
pub trait KeyboardHost: Send + Sync {
    /// Start delivering key presses
    fn attach(&self) -> ListenerId;

    /// Stop delivering key presses for `id`
    fn detach(&self, id: ListenerId);
}

/// Attached key listener, detached on drop
pub struct ListenerGuard {
    host: Arc<dyn KeyboardHost>,
    id: ListenerId,
}

impl ListenerGuard {
    #[must_use]
    pub fn acquire(host: Arc<dyn KeyboardHost>) -> Self {
        let id = host.attach();
        trace!(listener = id.0, "key listener attached");
        Self { host, id }
    }

    #[must_use]
    pub const fn id(&self) -> ListenerId {
        self.id
    }
}

impl fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerGuard").field("id", &self.id).finish_non_exhaustive()
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.host.detach(self.id);
        trace!(listener = self.id.0, "key listener detached");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingHost;

    #[test]
    fn test_parse_dom_names() {
        assert_eq!("Escape".parse::<BrowserKey>(), Ok(BrowserKey::Escape));
        assert_eq!("ArrowLeft".parse::<BrowserKey>(), Ok(BrowserKey::ArrowLeft));
        assert_eq!("ArrowRight".parse::<BrowserKey>(), Ok(BrowserKey::ArrowRight));
        assert!(matches!("Enter".parse::<BrowserKey>(), Err(BrowseError::UnknownKey(_))));
        assert_eq!(BrowserKey::ArrowLeft.to_string(), "ArrowLeft");
    }

    #[test]
    fn test_from_crossterm() {
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(BrowserKey::try_from(&esc), Ok(BrowserKey::Escape));

        let right = KeyEvent::new(KeyCode::Right, KeyModifiers::SHIFT);
        assert_eq!(BrowserKey::try_from(&right), Ok(BrowserKey::ArrowRight));

        let ctrl_left = KeyEvent::new(KeyCode::Left, KeyModifiers::CONTROL);
        assert!(BrowserKey::try_from(&ctrl_left).is_err());

        assert!(BrowserKey::try_from(KeyCode::Enter).is_err());
    }

    #[test]
    fn test_guard_detaches_on_drop() {
        let host = Arc::new(RecordingHost::default());
        {
            let guard = ListenerGuard::acquire(host.clone());
            assert_eq!(host.active(), 1);
            assert_eq!(guard.id(), ListenerId(0));
        }
        assert_eq!(host.active(), 0);
        assert_eq!(host.attached(), 1);
        assert_eq!(host.detached(), 1);
    }
}
