//! "Outline" screen: the generated outline rendered as Markdown.

use blogoutline_core::render::render_lines;
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use super::ScreenAction;
use crate::widgets::outline_line;

const PAGE: u16 = 10;

pub(crate) struct OutlineScreen {
    scroll: u16,
}

impl OutlineScreen {
    pub(crate) fn new() -> Self {
        Self { scroll: 0 }
    }

    /// Jump back to the top, e.g. after a new outline arrives.
    pub(crate) fn reset_scroll(&mut self) {
        self.scroll = 0;
    }

    pub(crate) fn draw(&self, f: &mut Frame, area: Rect, outline: Option<&str>) {
        let block = Block::default().borders(Borders::ALL).title(" Outline ");

        let Some(markdown) = outline else {
            let empty = Paragraph::new(vec![
                Line::from(""),
                Line::from("No outline yet."),
                Line::from(""),
                Line::from("Enter both API keys, fill in your preferences,"),
                Line::from("then press Ctrl-G to research and draft an outline."),
            ])
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
            f.render_widget(empty, area);
            return;
        };

        let lines: Vec<Line> = render_lines(markdown).iter().map(outline_line).collect();
        let body = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0))
            .block(block.title_bottom(" s save · ↑/↓ scroll · PgUp/PgDn page · g regenerate "));
        f.render_widget(body, area);
    }

    pub(crate) fn handle_key(
        &mut self,
        code: KeyCode,
        _modifiers: KeyModifiers,
    ) -> Option<ScreenAction> {
        match code {
            KeyCode::Char('s') => return Some(ScreenAction::Save),
            KeyCode::Down | KeyCode::Char('j') => self.scroll = self.scroll.saturating_add(1),
            KeyCode::Up | KeyCode::Char('k') => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::PageDown => self.scroll = self.scroll.saturating_add(PAGE),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(PAGE),
            KeyCode::Home => self.scroll = 0,
            _ => {}
        }
        None
    }
}
