//! "Preferences" screen: the nine-field blog form.
//!
//! Topic, audience and notes are free text; every other field cycles through
//! its fixed choices with ←/→.

use blogoutline_shared::{BlogPreferences, Domain, Intent, PointOfView, Tone, WordCount};
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::widgets::input_field;

/// Form fields in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Topic,
    Audience,
    Domain,
    Tone,
    PointOfView,
    Intent,
    WordCount,
    IncludeFaq,
    Notes,
}

impl Field {
    const ORDER: [Field; 9] = [
        Self::Topic,
        Self::Audience,
        Self::Domain,
        Self::Tone,
        Self::PointOfView,
        Self::Intent,
        Self::WordCount,
        Self::IncludeFaq,
        Self::Notes,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::Topic => "Blog Topic",
            Self::Audience => "Target Audience",
            Self::Domain => "Industry/Domain",
            Self::Tone => "Tone",
            Self::PointOfView => "Point of View",
            Self::Intent => "Purpose",
            Self::WordCount => "Word Count",
            Self::IncludeFaq => "Include FAQ",
            Self::Notes => "Key subtopics or notes",
        }
    }

    fn is_text(self) -> bool {
        matches!(self, Self::Topic | Self::Audience | Self::Notes)
    }

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }
}

/// Step to the neighbouring choice, wrapping at either end.
fn cycle<T: Copy + PartialEq>(all: &[T], current: T, forward: bool) -> T {
    let len = all.len();
    let idx = all.iter().position(|c| *c == current).unwrap_or(0);
    let next = if forward { (idx + 1) % len } else { (idx + len - 1) % len };
    all[next]
}

pub(crate) struct PreferencesScreen {
    prefs: BlogPreferences,
    focused: Field,
    editing: bool,
}

impl PreferencesScreen {
    pub(crate) fn new() -> Self {
        Self {
            prefs: BlogPreferences::default(),
            focused: Field::Topic,
            editing: false,
        }
    }

    pub(crate) fn is_editing(&self) -> bool {
        self.editing
    }

    /// Current form values.
    pub(crate) fn preferences(&self) -> &BlogPreferences {
        &self.prefs
    }

    pub(crate) fn draw(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3), // Topic
                Constraint::Length(3), // Audience
                Constraint::Length(8), // Choices
                Constraint::Length(3), // Notes
                Constraint::Length(1), // Action hint
                Constraint::Min(0),
            ])
            .split(area);

        let text_field = |field: Field, value: &str, chunk: Rect, f: &mut Frame| {
            let focused = self.focused == field;
            let mut shown = value.to_string();
            if focused && self.editing {
                shown.push('▏');
            }
            f.render_widget(input_field(field.label(), shown, focused, self.editing), chunk);
        };
        text_field(Field::Topic, &self.prefs.topic, chunks[0], f);
        text_field(Field::Audience, &self.prefs.audience, chunks[1], f);

        let choices: Vec<Line> = [
            (Field::Domain, self.prefs.domain.label()),
            (Field::Tone, self.prefs.tone.label()),
            (Field::PointOfView, self.prefs.point_of_view.label()),
            (Field::Intent, self.prefs.intent.label()),
            (Field::WordCount, self.prefs.word_count.label()),
            (Field::IncludeFaq, if self.prefs.include_faq { "Yes" } else { "No" }),
        ]
        .into_iter()
        .map(|(field, value)| self.choice_line(field, value))
        .collect();
        let choices_focused = !self.focused.is_text();
        let choices_block = Block::default()
            .borders(Borders::ALL)
            .title(" Style & Format ")
            .border_style(if choices_focused {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            });
        f.render_widget(Paragraph::new(choices).block(choices_block), chunks[2]);

        text_field(Field::Notes, &self.prefs.notes, chunks[3], f);

        let hint = if self.editing {
            "Type to edit · Esc/Enter to stop editing · Tab to next field"
        } else if self.focused.is_text() {
            "Enter to edit · ↑/↓ to move · Ctrl-G to generate"
        } else {
            "←/→ to change · ↑/↓ to move · Ctrl-G to generate"
        };
        let hint_p = Paragraph::new(hint)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(hint_p, chunks[4]);
    }

    fn choice_line(&self, field: Field, value: &'static str) -> Line<'static> {
        let focused = self.focused == field;
        let label_style = if focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let value_text = if focused {
            format!("< {value} >")
        } else {
            format!("  {value}")
        };
        Line::from(vec![
            Span::styled(format!(" {:<16}", field.label()), label_style),
            Span::raw(value_text),
        ])
    }

    pub(crate) fn handle_key(&mut self, code: KeyCode, _modifiers: KeyModifiers) {
        if self.editing {
            match code {
                KeyCode::Esc | KeyCode::Enter => self.editing = false,
                KeyCode::Tab => {
                    self.editing = false;
                    self.move_focus(true);
                }
                KeyCode::Backspace => {
                    if let Some(text) = self.text_mut() {
                        text.pop();
                    }
                }
                KeyCode::Char(c) => {
                    if let Some(text) = self.text_mut() {
                        text.push(c);
                    }
                }
                _ => {}
            }
            return;
        }

        match code {
            KeyCode::Enter if self.focused.is_text() => self.editing = true,
            KeyCode::Enter | KeyCode::Right => self.change_choice(true),
            KeyCode::Left => self.change_choice(false),
            KeyCode::Down => self.move_focus(true),
            KeyCode::Up => self.move_focus(false),
            _ => {}
        }
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self.focused {
            Field::Topic => Some(&mut self.prefs.topic),
            Field::Audience => Some(&mut self.prefs.audience),
            Field::Notes => Some(&mut self.prefs.notes),
            _ => None,
        }
    }

    fn change_choice(&mut self, forward: bool) {
        let p = &mut self.prefs;
        match self.focused {
            Field::Domain => p.domain = cycle(Domain::ALL, p.domain, forward),
            Field::Tone => p.tone = cycle(Tone::ALL, p.tone, forward),
            Field::PointOfView => {
                p.point_of_view = cycle(PointOfView::ALL, p.point_of_view, forward);
            }
            Field::Intent => p.intent = cycle(Intent::ALL, p.intent, forward),
            Field::WordCount => p.word_count = cycle(WordCount::ALL, p.word_count, forward),
            Field::IncludeFaq => p.include_faq = !p.include_faq,
            Field::Topic | Field::Audience | Field::Notes => {}
        }
    }

    fn move_focus(&mut self, forward: bool) {
        let len = Field::ORDER.len();
        let idx = self.focused.index();
        let next = if forward { (idx + 1) % len } else { (idx + len - 1) % len };
        self.focused = Field::ORDER[next];
    }
}
