//! "Credentials" screen: masked entry of the OpenAI and SerpAPI keys.
//!
//! Keys live in the session only. Submitting an empty field leaves the
//! stored key untouched.

use blogoutline_shared::Credentials;
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use super::ScreenAction;
use crate::widgets::input_field;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    OpenAi,
    SerpApi,
}

impl Field {
    fn title(self) -> &'static str {
        match self {
            Self::OpenAi => "OpenAI API Key",
            Self::SerpApi => "SerpAPI Key",
        }
    }
}

pub(crate) struct CredentialsScreen {
    focused: Field,
    editing: bool,
    /// Keystrokes for the field being edited, never drawn in clear.
    buffer: String,
}

impl CredentialsScreen {
    pub(crate) fn new() -> Self {
        Self {
            focused: Field::OpenAi,
            editing: false,
            buffer: String::new(),
        }
    }

    pub(crate) fn is_editing(&self) -> bool {
        self.editing
    }

    pub(crate) fn draw(&self, f: &mut Frame, area: Rect, credentials: &Credentials) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3), // OpenAI
                Constraint::Length(3), // SerpAPI
                Constraint::Length(3), // Action hint
                Constraint::Min(1),    // Explanation
            ])
            .split(area);

        for (field, set, chunk) in [
            (Field::OpenAi, credentials.has_openai_key(), chunks[0]),
            (Field::SerpApi, credentials.has_serp_key(), chunks[1]),
        ] {
            let focused = self.focused == field;
            let value = if focused && self.editing {
                Line::from("•".repeat(self.buffer.chars().count()))
            } else if set {
                Line::from(Span::styled("✓ set", Style::default().fg(Color::Green)))
            } else {
                Line::from(Span::styled("not set", Style::default().fg(Color::DarkGray)))
            };
            f.render_widget(input_field(field.title(), value, focused, self.editing), chunk);
        }

        let hint = if self.editing {
            "Type or paste the key · Enter to save · Esc to cancel"
        } else {
            "Enter to edit · ↑/↓ to switch field"
        };
        let hint_p = Paragraph::new(hint)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(hint_p, chunks[2]);

        let about = Paragraph::new(vec![
            Line::from("Both keys are required to generate an outline."),
            Line::from(""),
            Line::from("OpenAI drives the research and outline agents."),
            Line::from("SerpAPI runs the Google search for reference articles."),
            Line::from(""),
            Line::from(Span::styled(
                "Keys stay in memory for this session and are never written to disk.",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" About "));
        f.render_widget(about, chunks[3]);
    }

    pub(crate) fn handle_key(
        &mut self,
        code: KeyCode,
        _modifiers: KeyModifiers,
        credentials: &mut Credentials,
    ) -> Option<ScreenAction> {
        if self.editing {
            match code {
                KeyCode::Esc => {
                    self.editing = false;
                    self.buffer.clear();
                }
                KeyCode::Enter => return Some(self.commit(credentials)),
                KeyCode::Backspace => {
                    self.buffer.pop();
                }
                KeyCode::Char(c) => self.buffer.push(c),
                _ => {}
            }
        } else {
            match code {
                KeyCode::Enter => self.editing = true,
                KeyCode::Up | KeyCode::Down => self.toggle_field(),
                _ => {}
            }
        }
        None
    }

    fn commit(&mut self, credentials: &mut Credentials) -> ScreenAction {
        let key = std::mem::take(&mut self.buffer);
        self.editing = false;

        let (updated, name) = match self.focused {
            Field::OpenAi => (credentials.set_openai_key(&key), "OpenAI API key"),
            Field::SerpApi => (credentials.set_serp_key(&key), "SerpAPI key"),
        };
        if updated {
            tracing::info!(field = name, "credential updated");
            ScreenAction::Status(format!("✅ {name} updated!"))
        } else {
            ScreenAction::Status(format!("{name} unchanged (empty input)"))
        }
    }

    fn toggle_field(&mut self) {
        self.focused = match self.focused {
            Field::OpenAi => Field::SerpApi,
            Field::SerpApi => Field::OpenAi,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(screen: &mut CredentialsScreen, creds: &mut Credentials, s: &str) {
        for c in s.chars() {
            screen.handle_key(KeyCode::Char(c), KeyModifiers::NONE, creds);
        }
    }

    #[test]
    fn entering_keys_updates_credentials() {
        let mut screen = CredentialsScreen::new();
        let mut creds = Credentials::default();

        screen.handle_key(KeyCode::Enter, KeyModifiers::NONE, &mut creds);
        type_str(&mut screen, &mut creds, "sk-abc");
        let action = screen.handle_key(KeyCode::Enter, KeyModifiers::NONE, &mut creds);
        assert_eq!(action, Some(ScreenAction::Status("✅ OpenAI API key updated!".into())));
        assert!(creds.has_openai_key());
        assert!(!screen.is_editing());

        screen.handle_key(KeyCode::Down, KeyModifiers::NONE, &mut creds);
        screen.handle_key(KeyCode::Enter, KeyModifiers::NONE, &mut creds);
        type_str(&mut screen, &mut creds, "serp-1");
        screen.handle_key(KeyCode::Enter, KeyModifiers::NONE, &mut creds);
        assert!(creds.missing().is_empty());
    }

    #[test]
    fn empty_submit_keeps_existing_key() {
        let mut screen = CredentialsScreen::new();
        let mut creds = Credentials::default();
        creds.set_openai_key("sk-existing");

        screen.handle_key(KeyCode::Enter, KeyModifiers::NONE, &mut creds);
        type_str(&mut screen, &mut creds, "   ");
        let action = screen.handle_key(KeyCode::Enter, KeyModifiers::NONE, &mut creds);
        assert_eq!(
            action,
            Some(ScreenAction::Status("OpenAI API key unchanged (empty input)".into()))
        );
        assert!(creds.has_openai_key());
    }

    #[test]
    fn escape_discards_typed_key() {
        let mut screen = CredentialsScreen::new();
        let mut creds = Credentials::default();

        screen.handle_key(KeyCode::Enter, KeyModifiers::NONE, &mut creds);
        type_str(&mut screen, &mut creds, "sk-oops");
        screen.handle_key(KeyCode::Esc, KeyModifiers::NONE, &mut creds);
        assert!(!creds.has_openai_key());
        assert!(screen.buffer.is_empty());
    }
}
