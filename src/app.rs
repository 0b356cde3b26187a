// App state and main event loop.
// Owns the fetch cache, mounts the view for each tab, and handles keyboard input.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{prelude::*, widgets::ListState};

use crate::api::Fetcher;
use crate::cache::FetchCache;
use crate::config::Config;
use crate::error::Result;
use crate::fetch::FetchHook;
use crate::state::{Console, ListView, PostsView};
use crate::ui;

const PAGE_LINES: u16 = 20;

/// Active tab in the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Pokedex,
    Posts,
    Console,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Pokedex, Tab::Posts, Tab::Console];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Pokedex => "Pokédex",
            Tab::Posts => "Posts",
            Tab::Console => "Console",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Tab::Pokedex => Tab::Posts,
            Tab::Posts => Tab::Console,
            Tab::Console => Tab::Pokedex,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Tab::Pokedex => Tab::Console,
            Tab::Posts => Tab::Pokedex,
            Tab::Console => Tab::Posts,
        }
    }
}

/// Main application state.
pub struct App {
    /// Currently active tab.
    pub active_tab: Tab,
    /// Response cache shared by every view.
    pub cache: Arc<FetchCache>,
    /// Reported failures and activity messages.
    pub console: Console,
    pokeapi: FetchHook,
    posts_api: FetchHook,
    pub pokedex: ListView,
    /// Mounted the first time the Posts tab is shown.
    pub posts: Option<PostsView>,
    pub console_list_state: ListState,
    pub show_help: bool,
    /// Whether the app should exit.
    pub should_quit: bool,
}

impl App {
    pub fn new(config: &Config, cache: Arc<FetchCache>, fetcher: Arc<dyn Fetcher>) -> Result<Self> {
        let console = Console::new();
        let pokeapi = FetchHook::new(&config.pokeapi_base_url, cache.clone(), fetcher.clone());
        let posts_api = FetchHook::new(&config.posts_base_url, cache.clone(), fetcher);
        let pokedex = ListView::mount(pokeapi.clone(), console.clone())?;

        Ok(Self {
            active_tab: Tab::default(),
            cache,
            console,
            pokeapi,
            posts_api,
            pokedex,
            posts: None,
            console_list_state: ListState::default(),
            show_help: false,
            should_quit: false,
        })
    }

    /// Main event loop.
    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> Result<()> {
        while !self.should_quit {
            self.poll_views()?;
            terminal.draw(|frame| ui::draw(frame, self))?;
            self.handle_events()?;
        }
        Ok(())
    }

    /// Apply any fetch results published since the last frame.
    pub fn poll_views(&mut self) -> Result<bool> {
        let mut changed = self.pokedex.poll()?;
        if let Some(posts) = &mut self.posts {
            changed |= posts.poll();
        }
        Ok(changed)
    }

    /// Handle keyboard and other events.
    fn handle_events(&mut self) -> Result<()> {
        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            self.handle_key(key.code)?;
        }
        Ok(())
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<()> {
        if self.show_help {
            if matches!(code, KeyCode::Esc | KeyCode::Char('?')) {
                self.show_help = false;
            }
            return Ok(());
        }

        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('r') => self.refresh()?,
            KeyCode::Tab => self.switch_tab(self.active_tab.next())?,
            KeyCode::BackTab => self.switch_tab(self.active_tab.prev())?,
            KeyCode::Up | KeyCode::Char('k') => self.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::PageUp => {
                if let Some(posts) = self.active_posts() {
                    posts.scroll_up(PAGE_LINES);
                }
            }
            KeyCode::PageDown => {
                if let Some(posts) = self.active_posts() {
                    posts.scroll_down(PAGE_LINES);
                }
            }
            KeyCode::Home | KeyCode::Char('g') => {
                if let Some(posts) = self.active_posts() {
                    posts.scroll_to_start();
                }
            }
            KeyCode::End | KeyCode::Char('G') => {
                if let Some(posts) = self.active_posts() {
                    posts.scroll_to_end();
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn switch_tab(&mut self, tab: Tab) -> Result<()> {
        self.active_tab = tab;
        match tab {
            Tab::Posts if self.posts.is_none() => {
                self.posts = Some(PostsView::mount(&self.posts_api, self.console.clone())?);
            }
            Tab::Console => self.console.mark_read(),
            _ => {}
        }
        Ok(())
    }

    /// Drop every cached response and remount the mounted views.
    fn refresh(&mut self) -> Result<()> {
        self.cache.invalidate_all();
        self.console.info(format!("Refreshing {}", self.pokeapi.base_url()));
        self.pokedex = ListView::mount(self.pokeapi.clone(), self.console.clone())?;
        if self.posts.is_some() {
            self.posts = Some(PostsView::mount(&self.posts_api, self.console.clone())?);
        }
        Ok(())
    }

    fn active_posts(&mut self) -> Option<&mut PostsView> {
        match self.active_tab {
            Tab::Posts => self.posts.as_mut(),
            _ => None,
        }
    }

    fn select_prev(&mut self) {
        match self.active_tab {
            Tab::Pokedex => self.pokedex.select_prev(),
            Tab::Posts => {
                if let Some(posts) = &mut self.posts {
                    posts.scroll_up(1);
                }
            }
            Tab::Console => {
                let i = self.console_list_state.selected().unwrap_or(0);
                self.console_list_state.select(Some(i.saturating_sub(1)));
            }
        }
    }

    fn select_next(&mut self) {
        match self.active_tab {
            Tab::Pokedex => self.pokedex.select_next(),
            Tab::Posts => {
                if let Some(posts) = &mut self.posts {
                    posts.scroll_down(1);
                }
            }
            Tab::Console => {
                let last = self.console.len().saturating_sub(1);
                let i = self
                    .console_list_state
                    .selected()
                    .map_or(0, |i| (i + 1).min(last));
                self.console_list_state.select(Some(i));
            }
        }
    }
}
