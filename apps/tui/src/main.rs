//! Blog outline TUI: interactive terminal form for credentials, writing
//! preferences and the generated outline, built with `ratatui` + `crossterm`.

mod app;
mod screens;
mod widgets;

use std::fs::OpenOptions;
use std::sync::Mutex;

use color_eyre::eyre::Result;
use tracing_subscriber::{EnvFilter, fmt};

const LOG_FILE_NAME: &str = "tui.log";

fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing()?;
    app::run()
}

/// Log to `~/.blogoutline/tui.log`; the terminal belongs to the UI.
fn init_tracing() -> Result<()> {
    let dir = blogoutline_shared::config_dir()?;
    std::fs::create_dir_all(&dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE_NAME))?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("blogoutline=info"));

    fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
