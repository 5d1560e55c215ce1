//! TUI screen definitions.
//!
//! Each screen corresponds to a tab in the TUI and encapsulates its
//! own state and rendering logic.

mod credentials;
mod outline;
mod preferences;

use std::fmt;

use blogoutline_core::Session;
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::prelude::*;

pub(crate) use credentials::CredentialsScreen;
pub(crate) use outline::OutlineScreen;
pub(crate) use preferences::PreferencesScreen;

/// Screen identifiers, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScreenId {
    Credentials,
    Preferences,
    Outline,
}

impl ScreenId {
    pub(crate) const ALL: [ScreenId; 3] = [Self::Credentials, Self::Preferences, Self::Outline];
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Credentials => write!(f, "Credentials"),
            Self::Preferences => write!(f, "Preferences"),
            Self::Outline => write!(f, "Outline"),
        }
    }
}

/// Something a screen asks the app to do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ScreenAction {
    /// Replace the status bar message.
    Status(String),
    /// Write the outline download file.
    Save,
}

/// State of every screen; only the active one receives keys.
pub(crate) struct Screens {
    pub credentials: CredentialsScreen,
    pub preferences: PreferencesScreen,
    pub outline: OutlineScreen,
}

impl Screens {
    pub(crate) fn new() -> Self {
        Self {
            credentials: CredentialsScreen::new(),
            preferences: PreferencesScreen::new(),
            outline: OutlineScreen::new(),
        }
    }

    /// Whether the given screen has an active text input field.
    pub(crate) fn is_editing(&self, id: ScreenId) -> bool {
        match id {
            ScreenId::Credentials => self.credentials.is_editing(),
            ScreenId::Preferences => self.preferences.is_editing(),
            ScreenId::Outline => false,
        }
    }

    pub(crate) fn draw(&self, id: ScreenId, f: &mut Frame, area: Rect, session: &Session) {
        match id {
            ScreenId::Credentials => self.credentials.draw(f, area, &session.credentials),
            ScreenId::Preferences => self.preferences.draw(f, area),
            ScreenId::Outline => self.outline.draw(f, area, session.rendered_outline()),
        }
    }

    pub(crate) fn handle_key(
        &mut self,
        id: ScreenId,
        code: KeyCode,
        modifiers: KeyModifiers,
        session: &mut Session,
    ) -> Option<ScreenAction> {
        match id {
            ScreenId::Credentials => {
                self.credentials
                    .handle_key(code, modifiers, &mut session.credentials)
            }
            ScreenId::Preferences => {
                self.preferences.handle_key(code, modifiers);
                None
            }
            ScreenId::Outline => self.outline.handle_key(code, modifiers),
        }
    }
}
