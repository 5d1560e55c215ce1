//! Line-level Markdown classification for displaying an outline.
//!
//! Outlines are headings plus bullets, so rendering is per line: each line is
//! classified and stripped of its marker, and front ends map the kind to a
//! style. The source text is never modified.

use std::sync::LazyLock;

use regex::Regex;

/// What a rendered line represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// `#`..`######` heading with its level.
    Heading(u8),
    /// `-`, `*`, `+` or `1.` list item.
    Bullet,
    /// `---` / `***` separator.
    Rule,
    /// Empty line.
    Blank,
    /// Anything else.
    Text,
}

/// One classified line of Markdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine<'a> {
    pub kind: LineKind,
    /// Line content without its Markdown marker.
    pub text: &'a str,
    /// Leading indentation in spaces (nested bullets).
    pub indent: usize,
}

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.*)$").expect("valid regex"));

static BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[-*+]|\d+[.)])\s+(.*)$").expect("valid regex"));

static RULE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:-{3,}|\*{3,}|_{3,})\s*$").expect("valid regex"));

/// Classify every line of `markdown`, one output per input line.
pub fn render_lines(markdown: &str) -> Vec<RenderedLine<'_>> {
    markdown.lines().map(classify).collect()
}

fn classify(line: &str) -> RenderedLine<'_> {
    let trimmed = line.trim_start();
    let indent = line.len() - trimmed.len();

    if trimmed.trim().is_empty() {
        return RenderedLine { kind: LineKind::Blank, text: "", indent: 0 };
    }
    if let Some(caps) = HEADING_RE.captures(trimmed) {
        let level = caps[1].len() as u8;
        let text = caps.get(2).map_or("", |m| m.as_str()).trim_end();
        return RenderedLine { kind: LineKind::Heading(level), text, indent };
    }
    if RULE_RE.is_match(trimmed) {
        return RenderedLine { kind: LineKind::Rule, text: "", indent };
    }
    if let Some(caps) = BULLET_RE.captures(trimmed) {
        let text = caps.get(1).map_or("", |m| m.as_str());
        return RenderedLine { kind: LineKind::Bullet, text, indent };
    }
    RenderedLine { kind: LineKind::Text, text: trimmed, indent }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUTLINE: &str = "## 📝 Blog Outline

### Why Habits Matter
*Description of what goes in this section*
- Define a habit loop
  - cue, routine, reward
1. Start small

---
### Frequently Asked Questions";

    #[test]
    fn one_rendered_line_per_source_line() {
        assert_eq!(render_lines(OUTLINE).len(), OUTLINE.lines().count());
    }

    #[test]
    fn classifies_outline_lines() {
        let lines = render_lines(OUTLINE);
        assert_eq!(lines[0].kind, LineKind::Heading(2));
        assert_eq!(lines[0].text, "📝 Blog Outline");
        assert_eq!(lines[1].kind, LineKind::Blank);
        assert_eq!(lines[2].kind, LineKind::Heading(3));
        assert_eq!(lines[3].kind, LineKind::Text);
        assert_eq!(lines[4].kind, LineKind::Bullet);
        assert_eq!(lines[4].text, "Define a habit loop");
        assert_eq!(lines[5].kind, LineKind::Bullet);
        assert_eq!(lines[5].indent, 2);
        assert_eq!(lines[6].kind, LineKind::Bullet);
        assert_eq!(lines[6].text, "Start small");
        assert_eq!(lines[8].kind, LineKind::Rule);
        assert_eq!(lines[9].text, "Frequently Asked Questions");
    }

    #[test]
    fn emphasis_line_is_not_a_bullet() {
        let lines = render_lines("*Description in 4–5 bullet points*");
        assert_eq!(lines[0].kind, LineKind::Text);
    }
}
