//! Presentation state for a listing: grid or list layout, facet panel visibility

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Layout of the result list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Grid => Self::List,
            Self::List => Self::Grid,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid => f.write_str("grid"),
            Self::List => f.write_str("list"),
        }
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "grid" | "grelha" => Ok(Self::Grid),
            "list" | "lista" => Ok(Self::List),
            other => Err(format!("Unknown view mode '{other}'")),
        }
    }
}

/// UI-only state; nothing here affects which items are shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewModeController {
    mode: ViewMode,
    facet_panel_open: bool,
}

impl ViewModeController {
    #[must_use]
    pub const fn new(mode: ViewMode) -> Self {
        Self {
            mode,
            facet_panel_open: false,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> ViewMode {
        self.mode
    }

    pub const fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
    }

    pub const fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
    }

    #[must_use]
    pub const fn facet_panel_open(&self) -> bool {
        self.facet_panel_open
    }

    /// Flip facet panel visibility, returning the new state
    pub const fn toggle_facet_panel(&mut self) -> bool {
        self.facet_panel_open = !self.facet_panel_open;
        self.facet_panel_open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggles() {
        let mut view = ViewModeController::default();
        assert_eq!(view.mode(), ViewMode::Grid);
        view.toggle_mode();
        assert_eq!(view.mode(), ViewMode::List);
        view.set_mode(ViewMode::Grid);
        assert_eq!(view.mode(), ViewMode::Grid);

        assert!(!view.facet_panel_open());
        assert!(view.toggle_facet_panel());
        assert!(!view.toggle_facet_panel());
    }

    #[test]
    fn test_parse() {
        assert_eq!("Lista".parse::<ViewMode>(), Ok(ViewMode::List));
        assert!("cards".parse::<ViewMode>().is_err());
    }
}
