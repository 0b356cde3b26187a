// Entry point for the pokedex TUI.
// Loads configuration, starts logging, and runs the app on an alternate screen.

mod api;
mod app;
mod cache;
mod config;
mod error;
mod fetch;
mod logging;
mod state;
mod ui;

use std::io::{self, Stdout};
use std::sync::Arc;

use crossterm::cursor::Show;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::*;

use crate::api::ApiClient;
use crate::app::App;
use crate::cache::FetchCache;
use crate::config::Config;
use crate::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    logging::init(&config)?;
    tracing::info!(
        pokeapi = %config.pokeapi_base_url,
        posts = %config.posts_base_url,
        "starting pokedex"
    );

    let client = ApiClient::new(config.request_timeout())?;
    let cache = Arc::new(FetchCache::new(config.dedupe_interval()));
    let mut app = App::new(&config, cache, Arc::new(client))?;

    let mut terminal = setup_terminal()?;
    let result = app.run(&mut terminal);
    let restored = restore_terminal();

    match &result {
        Ok(()) => tracing::info!("pokedex exited"),
        Err(e) => tracing::error!(error = %e, "pokedex exited with error"),
    }
    result?;
    restored?;
    Ok(())
}

/// Enter raw mode and the alternate screen. Undone again if any step fails.
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    undo_on_error(
        || {
            execute!(io::stdout(), EnterAlternateScreen)?;
            Terminal::new(CrosstermBackend::new(io::stdout()))
        },
        restore_terminal,
    )
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, Show)
}

/// Run `step`; if it fails, run `undo` before handing back the original error.
fn undo_on_error<T>(
    step: impl FnOnce() -> io::Result<T>,
    undo: impl FnOnce() -> io::Result<()>,
) -> io::Result<T> {
    step().inspect_err(|_| {
        if let Err(e) = undo() {
            tracing::warn!(error = %e, "failed to restore terminal");
        }
    })
}
