//! Core TUI application state and event loop.

use std::io;
use std::time::Duration;

use blogoutline_core::{
    AgentOutlineStep, AgentResearchStep, Session, SilentProgress, compose_block,
};
use blogoutline_shared::{AppConfig, BlogOutlineError, credentials_from_env, load_config};
use color_eyre::eyre::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Tabs};
use tokio::runtime::Runtime;
use tracing::{error, info};

use crate::screens::{ScreenAction, ScreenId, Screens};
use crate::widgets::status_bar;

/// Status bar text while both pipeline steps run.
pub(crate) const GENERATING_STATUS: &str = "Drafting a structured outline for your blog...";

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Generate,
}

/// Application state.
pub(crate) struct App {
    /// Currently active screen tab.
    pub active_tab: usize,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Status message shown in bottom bar.
    pub status: String,
    /// Whether help overlay is visible.
    pub show_help: bool,
    /// Per-screen state.
    pub screens: Screens,
    /// Credentials and the last outline.
    pub session: Session,
    pub config: AppConfig,
}

impl App {
    pub(crate) fn new(config: AppConfig) -> Self {
        let session = Session::with_credentials(credentials_from_env(&config));
        let missing = session.credentials.missing();
        // Skip straight to the form when the environment already supplied both keys.
        let active_tab = if missing.is_empty() { 1 } else { 0 };

        Self {
            active_tab,
            should_quit: false,
            status: "Ready. Press ? for help".to_string(),
            show_help: false,
            screens: Screens::new(),
            session,
            config,
        }
    }

    fn current_id(&self) -> ScreenId {
        ScreenId::ALL[self.active_tab]
    }

    fn is_editing(&self) -> bool {
        self.screens.is_editing(self.current_id())
    }

    fn select_tab(&mut self, id: ScreenId) {
        if let Some(idx) = ScreenId::ALL.iter().position(|s| *s == id) {
            self.active_tab = idx;
        }
    }

    /// Compose the preferences block and run research then outline,
    /// blocking until both finish.
    fn generate(&mut self, rt: &Runtime) {
        let block = compose_block(self.screens.preferences.preferences());
        let research = AgentResearchStep::new(self.config.clone());
        let outline = AgentOutlineStep::new(self.config.clone());

        let result = rt.block_on(self.session.generate(
            &block,
            &research,
            &outline,
            &SilentProgress,
        ));

        match result.map(|doc| doc.content.len()) {
            Ok(chars) => {
                info!(chars, "outline ready");
                self.screens.outline.reset_scroll();
                self.select_tab(ScreenId::Outline);
                self.status = "Outline ready. Press s to save it as a text file.".to_string();
            }
            Err(e) => {
                error!(error = %e, "generation failed");
                if matches!(e, BlogOutlineError::MissingCredentials(_)) {
                    self.select_tab(ScreenId::Credentials);
                }
                self.status = e.user_messages().join(" ");
            }
        }
    }

    /// Write the outline download into the working directory.
    fn save(&mut self) {
        let Some(download) = self.session.download(&self.config.output.file_name) else {
            self.status = "Nothing to save yet. Generate an outline first.".to_string();
            return;
        };

        let written = std::env::current_dir()
            .map_err(|e| BlogOutlineError::io(".", e))
            .and_then(|dir| download.write_to(&dir));
        self.status = match written {
            Ok(path) => format!("Saved {}", path.display()),
            Err(e) => {
                error!(error = %e, "saving outline failed");
                format!("Could not save outline: {e}")
            }
        };
    }
}

/// Entry point: sets up terminal, runs event loop, restores terminal.
pub(crate) fn run() -> Result<()> {
    let config = load_config()?;
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    // Setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, App::new(config), &rt);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
    rt: &Runtime,
) -> Result<()> {
    loop {
        terminal.draw(|f| draw(f, &app))?;

        // Poll for events with 100ms timeout for responsive UI
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press
                    && handle_key(&mut app, key.code, key.modifiers) == Flow::Generate
                {
                    app.status = GENERATING_STATUS.to_string();
                    terminal.draw(|f| draw(f, &app))?;
                    app.generate(rt);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Flow {
    let tabs = ScreenId::ALL.len();

    // Global keybindings (always active)
    match code {
        KeyCode::Char('q') | KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
            return Flow::Continue;
        }
        KeyCode::Char('g') if modifiers.contains(KeyModifiers::CONTROL) => {
            return Flow::Generate;
        }
        KeyCode::Char('g') if !app.is_editing() => return Flow::Generate,
        KeyCode::Char('q') if !app.is_editing() => {
            app.should_quit = true;
            return Flow::Continue;
        }
        KeyCode::Char('?') if !app.is_editing() => {
            app.show_help = !app.show_help;
            return Flow::Continue;
        }
        KeyCode::Esc if app.show_help => {
            app.show_help = false;
            return Flow::Continue;
        }
        // Tab navigation with number keys
        KeyCode::Char(c @ '1'..='3') if !app.is_editing() => {
            app.active_tab = (c as usize) - ('1' as usize);
            app.status = app.current_id().to_string();
            return Flow::Continue;
        }
        KeyCode::Tab if !app.is_editing() => {
            app.active_tab = (app.active_tab + 1) % tabs;
            app.status = app.current_id().to_string();
            return Flow::Continue;
        }
        KeyCode::BackTab if !app.is_editing() => {
            app.active_tab = (app.active_tab + tabs - 1) % tabs;
            app.status = app.current_id().to_string();
            return Flow::Continue;
        }
        _ => {}
    }

    // If help is showing, consume any key to dismiss
    if app.show_help {
        app.show_help = false;
        return Flow::Continue;
    }

    // Delegate to current screen
    let id = app.current_id();
    match app.screens.handle_key(id, code, modifiers, &mut app.session) {
        Some(ScreenAction::Status(msg)) => app.status = msg,
        Some(ScreenAction::Save) => app.save(),
        None => {}
    }
    Flow::Continue
}

fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    // Tab bar
    let tab_titles: Vec<Line> = ScreenId::ALL
        .iter()
        .map(|s| Line::from(s.to_string()))
        .collect();

    let tabs = Tabs::new(tab_titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Blog Outline Creator "),
        )
        .select(app.active_tab)
        .style(Style::default().fg(Color::White))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .divider(" │ ");

    f.render_widget(tabs, chunks[0]);

    // Content area, delegated to the active screen
    app.screens
        .draw(app.current_id(), f, chunks[1], &app.session);

    // Status bar
    f.render_widget(status_bar(&app.status), chunks[2]);

    // Help overlay
    if app.show_help {
        draw_help_overlay(f);
    }
}

fn draw_help_overlay(f: &mut Frame) {
    let area = centered_rect(60, 60, f.area());

    let help_text = vec![
        Line::from("Keybindings").style(Style::default().add_modifier(Modifier::BOLD)),
        Line::from(""),
        Line::from("  1-3          Switch to screen"),
        Line::from("  Tab/S-Tab    Next/previous screen"),
        Line::from("  Ctrl-G / g   Generate outline"),
        Line::from("  ?            Toggle this help"),
        Line::from("  q / Ctrl-C   Quit"),
        Line::from(""),
        Line::from("Screen-specific:").style(Style::default().add_modifier(Modifier::BOLD)),
        Line::from("  Enter        Edit field / confirm"),
        Line::from("  Esc          Stop editing"),
        Line::from("  ↑/↓          Move between fields / scroll"),
        Line::from("  ←/→          Change choice"),
        Line::from("  s            Save outline (Outline tab)"),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help (press any key to close) ")
                .style(Style::default().bg(Color::DarkGray)),
        )
        .style(Style::default().fg(Color::White).bg(Color::DarkGray));

    // Clear background
    f.render_widget(Clear, area);
    f.render_widget(help, area);
}

/// Create a centered rectangle with percentage width and height.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let mut config = AppConfig::default();
        // Env vars that are never set, so the session starts empty.
        config.openai.api_key_env = "BLOGOUTLINE_TEST_UNSET_OPENAI".into();
        config.serpapi.api_key_env = "BLOGOUTLINE_TEST_UNSET_SERP".into();
        App::new(config)
    }

    fn press(app: &mut App, code: KeyCode) -> Flow {
        handle_key(app, code, KeyModifiers::NONE)
    }

    #[test]
    fn starts_on_credentials_without_keys() {
        let app = app();
        assert_eq!(app.current_id(), ScreenId::Credentials);
    }

    #[test]
    fn g_generates_outside_text_editing() {
        let mut app = app();
        assert_eq!(press(&mut app, KeyCode::Char('g')), Flow::Generate);

        app.select_tab(ScreenId::Preferences);
        press(&mut app, KeyCode::Enter);
        assert_eq!(press(&mut app, KeyCode::Char('g')), Flow::Continue);
        assert_eq!(app.screens.preferences.preferences().topic, "g");
        assert_eq!(
            handle_key(&mut app, KeyCode::Char('g'), KeyModifiers::CONTROL),
            Flow::Generate
        );
    }

    #[test]
    fn missing_keys_abort_generation_with_messages() {
        let mut app = app();
        app.select_tab(ScreenId::Preferences);
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        app.generate(&rt);
        assert_eq!(
            app.status,
            "Please provide your OpenAI API key. Please provide your SerpAPI key."
        );
        assert_eq!(app.current_id(), ScreenId::Credentials);
        assert!(app.session.outline().is_none());
    }

    #[test]
    fn save_without_outline_reports() {
        let mut app = app();
        app.select_tab(ScreenId::Outline);
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.status, "Nothing to save yet. Generate an outline first.");
    }

    #[test]
    fn number_keys_switch_tabs() {
        let mut app = app();
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.current_id(), ScreenId::Outline);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.current_id(), ScreenId::Preferences);
    }
}
