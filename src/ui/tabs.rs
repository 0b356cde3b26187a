// Tab strip for the three views.
// Each label carries a small live summary: entries loaded, posts fetched, unread errors.

use ratatui::{prelude::*, widgets::*};

use crate::app::{App, Tab};

/// Label text for `tab`, with its summary suffix when there is one.
fn tab_label(tab: Tab, app: &App) -> String {
    let suffix = match tab {
        Tab::Pokedex => Some(app.pokedex.items().len()).filter(|n| *n > 0),
        Tab::Posts => app.posts.as_ref().and_then(|posts| posts.post_count()),
        Tab::Console => Some(app.console.unread()).filter(|n| *n > 0),
    };
    match suffix {
        Some(n) => format!("{} ({})", tab.title(), n),
        None => tab.title().to_string(),
    }
}

fn tab_style(tab: Tab, app: &App) -> Style {
    if tab == app.active_tab {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else if tab == Tab::Console && app.console.unread() > 0 {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::White)
    }
}

/// Draw the tab strip at the top of the screen.
pub fn draw_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let labels = Tab::ALL
        .into_iter()
        .map(|tab| Line::from(Span::styled(tab_label(tab, app), tab_style(tab, app))));
    let active = Tab::ALL.into_iter().position(|tab| tab == app.active_tab);

    let strip = Tabs::new(labels)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(Span::styled(
                    " pokedex ",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )),
        )
        .select(active.unwrap_or(0))
        .divider(Span::styled(" · ", Style::default().fg(Color::DarkGray)));

    frame.render_widget(strip, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::FetchCache;
    use crate::config::Config;
    use crate::error::FetchError;
    use crate::fetch::testing::FakeFetcher;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_labels_carry_summaries() {
        let app = App::new(
            &Config::default(),
            Arc::new(FetchCache::default()),
            Arc::new(FakeFetcher::new()),
        )
        .unwrap();
        assert_eq!(tab_label(Tab::Pokedex, &app), "Pokédex");
        assert_eq!(tab_label(Tab::Posts, &app), "Posts");
        assert_eq!(tab_label(Tab::Console, &app), "Console");

        app.console.report("pokemon", &FetchError::Network("offline".into()));
        assert_eq!(tab_label(Tab::Console, &app), "Console (1)");
        assert_eq!(tab_style(Tab::Console, &app).fg, Some(Color::Red));
    }
}
