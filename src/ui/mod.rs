// UI module for rendering the TUI.
// Contains the tab bar, the Pokédex list and card, the posts viewer, and the console.

mod list;
mod tabs;

use ratatui::{prelude::*, widgets::*};

use crate::app::{App, Tab};
use crate::state::posts::{POSTS_FAILURE_MESSAGE, POSTS_LOADING_MESSAGE};
use crate::state::{ConsoleLevel, PostsRender};

/// Main draw function that renders the entire UI.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(1),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    tabs::draw_tabs(frame, app, chunks[0]);
    draw_content(frame, app, chunks[1]);
    draw_status_bar(frame, app, chunks[2]);

    // Help overlay (rendered last, on top of everything)
    if app.show_help {
        draw_help_overlay(frame);
    }
}

/// Draw the main content area based on active tab.
fn draw_content(frame: &mut Frame, app: &mut App, area: Rect) {
    match app.active_tab {
        Tab::Pokedex => list::render_pokedex(frame, &mut app.pokedex, area),
        Tab::Posts => draw_posts_tab(frame, app, area),
        Tab::Console => draw_console_tab(frame, app, area),
    }
}

/// Draw the posts viewer: the fetched list dumped as pretty JSON.
fn draw_posts_tab(frame: &mut Frame, app: &App, area: Rect) {
    let Some(posts) = &app.posts else {
        let block = Block::default().borders(Borders::ALL).title(" Posts ");
        let inner = block.inner(area);
        frame.render_widget(block, area);
        list::render_empty(frame, inner, "Not loaded");
        return;
    };

    match posts.render() {
        PostsRender::Loading => {
            let block = Block::default().borders(Borders::ALL).title(" Posts ");
            let inner = block.inner(area);
            frame.render_widget(block, area);
            list::render_loading(frame, inner, POSTS_LOADING_MESSAGE);
        }
        PostsRender::Failed => {
            let block = Block::default().borders(Borders::ALL).title(" Posts ");
            let inner = block.inner(area);
            frame.render_widget(block, area);
            list::render_error(frame, inner, POSTS_FAILURE_MESSAGE);
        }
        PostsRender::Json(text) => {
            let line_count = text.lines().count();
            let scroll_y = posts.scroll_y as usize;
            let title = format!(
                " Posts ({}) [{}-{}/{}] ",
                posts.post_count().unwrap_or(0),
                scroll_y + 1,
                (scroll_y + area.height.saturating_sub(2) as usize).min(line_count),
                line_count
            );

            let paragraph = Paragraph::new(text)
                .block(Block::default().borders(Borders::ALL).title(title))
                .scroll((posts.scroll_y, 0));
            frame.render_widget(paragraph, area);
        }
    }
}

/// Draw the Console tab with reported failures.
fn draw_console_tab(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Console ");

    if app.console.is_empty() {
        let text = Paragraph::new("No messages")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(text, area);
    } else {
        // Show newest messages first (reverse order)
        let messages = app.console.messages();
        let items: Vec<ListItem> = messages
            .iter()
            .rev()
            .map(|msg| {
                let (icon, color) = match msg.level {
                    ConsoleLevel::Error => ("❌", Color::Red),
                    ConsoleLevel::Info => ("ℹ️", Color::Cyan),
                };

                let time = list::format_relative_time(&msg.timestamp);

                ListItem::new(Line::from(vec![
                    Span::raw(format!("{} ", icon)),
                    Span::styled(time, Style::default().fg(Color::DarkGray)),
                    Span::raw(" "),
                    Span::styled(msg.message.clone(), Style::default().fg(color)),
                ]))
            })
            .collect();

        let list_widget = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        frame.render_stateful_widget(list_widget, area, &mut app.console_list_state);
    }
}

/// Draw the status bar with keybinding hints and cache activity.
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut hints = if app.active_tab == Tab::Posts {
        vec![
            Span::raw(" ↑↓ "),
            Span::styled("Scroll", Style::default().fg(Color::DarkGray)),
            Span::raw("  PgUp/Dn "),
            Span::styled("Page", Style::default().fg(Color::DarkGray)),
            Span::raw("  Home/End "),
            Span::styled("Jump", Style::default().fg(Color::DarkGray)),
        ]
    } else {
        vec![
            Span::raw(" ↑↓ "),
            Span::styled("Navigate", Style::default().fg(Color::DarkGray)),
        ]
    };

    hints.extend([
        Span::raw("  Tab "),
        Span::styled("Switch", Style::default().fg(Color::DarkGray)),
        Span::raw("  r "),
        Span::styled("Refresh", Style::default().fg(Color::DarkGray)),
        Span::raw("  ? "),
        Span::styled("Help", Style::default().fg(Color::DarkGray)),
        Span::raw("  q "),
        Span::styled("Quit", Style::default().fg(Color::DarkGray)),
    ]);

    let in_flight = app.cache.in_flight();
    let cache_color = if in_flight > 0 {
        Color::Yellow
    } else {
        Color::DarkGray
    };
    let cache_text = if app.cache.is_empty() {
        "  Cache: empty".to_string()
    } else {
        format!("  Cache: {} cached, {} in flight", app.cache.len(), in_flight)
    };
    hints.push(Span::styled(cache_text, Style::default().fg(cache_color)));

    let status = Paragraph::new(Line::from(hints));
    frame.render_widget(status, area);
}

/// Draw the help overlay.
fn draw_help_overlay(frame: &mut Frame) {
    let area = frame.area();

    // Create a centered popup
    let popup_width = 50;
    let popup_height = 14;
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(
        popup_x,
        popup_y,
        popup_width.min(area.width),
        popup_height.min(area.height),
    );

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let key = Style::default().fg(Color::Cyan);
    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  ↑/↓ or j/k    ", key),
            Span::raw("Select Pokémon / scroll posts"),
        ]),
        Line::from(vec![
            Span::styled("  PgUp/PgDn     ", key),
            Span::raw("Page scroll (posts)"),
        ]),
        Line::from(vec![
            Span::styled("  Home/End g/G  ", key),
            Span::raw("Jump to start/end (posts)"),
        ]),
        Line::from(vec![
            Span::styled("  Tab           ", key),
            Span::raw("Switch tabs"),
        ]),
        Line::from(vec![
            Span::styled("  r             ", key),
            Span::raw("Clear cache and reload"),
        ]),
        Line::from(vec![
            Span::styled("  ?             ", key),
            Span::raw("Show/hide this help"),
        ]),
        Line::from(vec![Span::styled("  q             ", key), Span::raw("Quit")]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::DarkGray)),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::styled(" or ", Style::default().fg(Color::DarkGray)),
            Span::styled("?", Style::default().fg(Color::Yellow)),
            Span::styled(" to close", Style::default().fg(Color::DarkGray)),
        ]),
    ];

    let help_paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help ")
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .alignment(Alignment::Left);

    frame.render_widget(help_paragraph, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::FetchCache;
    use crate::config::Config;
    use crate::fetch::testing::{FakeFetcher, settle};
    use ratatui::backend::TestBackend;
    use serde_json::json;
    use std::sync::Arc;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[tokio::test]
    async fn test_draw_pokedex_card() {
        let config = Config {
            pokeapi_base_url: "http://poke.test/".to_string(),
            ..Config::default()
        };
        let fetcher = Arc::new(
            FakeFetcher::new()
                .respond(
                    "http://poke.test/pokemon",
                    Ok(json!({"count": 1, "results": [{"name": "bulbasaur", "url": "u"}]})),
                )
                .respond(
                    "http://poke.test/pokemon/bulbasaur",
                    Ok(json!({
                        "id": 1, "name": "bulbasaur",
                        "sprites": {"front_default": "img.png"},
                        "types": [
                            {"slot": 1, "type": {"name": "grass", "url": "g"}},
                            {"slot": 2, "type": {"name": "poison", "url": "p"}}
                        ]
                    })),
                ),
        );
        let mut app = App::new(&config, Arc::new(FetchCache::default()), fetcher).unwrap();
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();

        terminal.draw(|frame| draw(frame, &mut app)).unwrap();
        assert!(buffer_text(&terminal).contains("Loading..."));

        for _ in 0..8 {
            settle().await;
            app.poll_views().unwrap();
        }
        terminal.draw(|frame| draw(frame, &mut app)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("#001 bulbasaur"));
        assert!(text.contains("grass, poison"));
        assert!(text.contains("img.png"));
    }

    #[tokio::test]
    async fn test_draw_empty_console_and_cache() {
        let fetcher = Arc::new(FakeFetcher::new());
        let mut app = App::new(&Config::default(), Arc::new(FetchCache::default()), fetcher)
            .unwrap();
        app.cache.invalidate_all();
        app.active_tab = Tab::Console;

        let mut terminal = Terminal::new(TestBackend::new(100, 12)).unwrap();
        terminal.draw(|frame| draw(frame, &mut app)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("No messages"));
        assert!(text.contains("Cache: empty"));
    }

    #[tokio::test]
    async fn test_draw_collection_failure() {
        let fetcher = Arc::new(FakeFetcher::new());
        let mut app = App::new(&Config::default(), Arc::new(FetchCache::default()), fetcher)
            .unwrap();
        for _ in 0..4 {
            settle().await;
            app.poll_views().unwrap();
        }

        let mut terminal = Terminal::new(TestBackend::new(80, 12)).unwrap();
        terminal.draw(|frame| draw(frame, &mut app)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Something went wrong"));
        assert!(text.contains("Console (1)"));
    }
}
