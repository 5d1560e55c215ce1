//! Reusable TUI widgets.

use blogoutline_core::render::{LineKind, RenderedLine};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

/// Bottom status bar.
pub(crate) fn status_bar(msg: &str) -> Paragraph<'_> {
    Paragraph::new(format!(" {msg}")).style(Style::default().bg(Color::DarkGray).fg(Color::White))
}

/// Bordered single-line input, highlighted by focus and edit state.
pub(crate) fn input_field<'a>(
    title: &'a str,
    value: impl Into<Text<'a>>,
    focused: bool,
    editing: bool,
) -> Paragraph<'a> {
    let border = if focused && editing {
        Style::default().fg(Color::Yellow)
    } else if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Paragraph::new(value).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {title} "))
            .border_style(border),
    )
}

/// Styled terminal line for one line of the outline.
pub(crate) fn outline_line<'a>(line: &RenderedLine<'a>) -> Line<'a> {
    match line.kind {
        LineKind::Heading(1 | 2) => Line::from(Span::styled(
            line.text,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        LineKind::Heading(_) => Line::from(Span::styled(
            line.text,
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        LineKind::Bullet => Line::from(vec![
            Span::raw(" ".repeat(line.indent)),
            Span::styled("• ", Style::default().fg(Color::Cyan)),
            Span::raw(line.text),
        ]),
        LineKind::Rule => Line::from(Span::styled(
            "─".repeat(40),
            Style::default().fg(Color::DarkGray),
        )),
        LineKind::Blank => Line::default(),
        LineKind::Text => match emphasized(line.text) {
            Some((inner, modifier)) => Line::from(vec![
                Span::raw(" ".repeat(line.indent)),
                Span::styled(inner, Style::default().add_modifier(modifier)),
            ]),
            None => Line::from(vec![Span::raw(" ".repeat(line.indent)), Span::raw(line.text)]),
        },
    }
}

/// Whole-line emphasis without its markers: `**bold**` / `__bold__` or
/// `*italic*` / `_italic_`. Double markers are tried first.
fn emphasized(text: &str) -> Option<(&str, Modifier)> {
    [
        ("**", Modifier::BOLD),
        ("__", Modifier::BOLD),
        ("*", Modifier::ITALIC),
        ("_", Modifier::ITALIC),
    ]
    .into_iter()
    .find_map(|(marker, modifier)| {
        text.strip_prefix(marker)
            .and_then(|rest| rest.strip_suffix(marker))
            .filter(|inner| !inner.is_empty())
            .map(|inner| (inner, modifier))
    })
}
