// Pokédex rendering.
// Draws the collection list and the card for the selected entry, plus the shared
// loading/error/empty placeholders.

use chrono::{DateTime, Utc};
use ratatui::{prelude::*, widgets::*};

use crate::state::pokedex::{FAILURE_MESSAGE, LOADING_MESSAGE};
use crate::state::{Card, ItemRender, ItemView, ListRender, ListView};

/// Format a timestamp as relative time (e.g., "2h ago").
pub fn format_relative_time(dt: &DateTime<Utc>) -> String {
    let now = Utc::now();
    let duration = now.signed_duration_since(*dt);

    if duration.num_days() > 0 {
        format!("{}d ago", duration.num_days())
    } else if duration.num_hours() > 0 {
        format!("{}h ago", duration.num_hours())
    } else if duration.num_minutes() > 0 {
        format!("{}m ago", duration.num_minutes())
    } else {
        "just now".to_string()
    }
}

/// Render a loading indicator.
pub fn render_loading(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(format!("⏳ {}", message))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(text, area);
}

/// Render an error message.
pub fn render_error(frame: &mut Frame, area: Rect, error: &str) {
    let text = Paragraph::new(format!("❌ {}", error))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Red));
    frame.render_widget(text, area);
}

/// Render an empty state message.
pub fn render_empty(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(text, area);
}

/// One list row: the entry name plus whatever its item view currently shows.
fn item_line(name: &str, render: &ItemRender) -> Line<'static> {
    match render {
        ItemRender::Loading => Line::from(vec![
            Span::raw("⏳ "),
            Span::styled(name.to_string(), Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("  {}", LOADING_MESSAGE),
                Style::default().fg(Color::Yellow),
            ),
        ]),
        ItemRender::Failed => Line::from(vec![
            Span::raw("❌ "),
            Span::styled(name.to_string(), Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("  {}", FAILURE_MESSAGE),
                Style::default().fg(Color::Red),
            ),
        ]),
        ItemRender::Card(card) => Line::from(vec![
            Span::styled(
                format!("#{:03} ", card.id),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(card.title.clone(), Style::default().fg(Color::Cyan)),
            Span::styled(
                format!("  {}", card.tags),
                Style::default().fg(Color::Magenta),
            ),
        ]),
    }
}

/// Render the Pokédex tab: list on the left, selected card on the right.
pub fn render_pokedex(frame: &mut Frame, view: &mut ListView, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Pokédex ");

    match view.render() {
        ListRender::Loading => {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            render_loading(frame, inner, LOADING_MESSAGE);
        }
        ListRender::Failed => {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            render_error(frame, inner, FAILURE_MESSAGE);
        }
        ListRender::Items(renders) if renders.is_empty() => {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            render_empty(frame, inner, "No Pokémon returned");
        }
        ListRender::Items(renders) => {
            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(area);

            let title = match view.total_count() {
                Some(total) => format!(" Pokédex ({} of {}) ", renders.len(), total),
                None => format!(" Pokédex ({}) ", renders.len()),
            };

            let items: Vec<ListItem> = view
                .items()
                .iter()
                .zip(&renders)
                .map(|(item, render)| ListItem::new(item_line(&item.reference().name, render)))
                .collect();

            let list_widget = List::new(items)
                .block(Block::default().borders(Borders::ALL).title(title))
                .highlight_style(
                    Style::default()
                        .bg(Color::DarkGray)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("> ");

            frame.render_stateful_widget(list_widget, chunks[0], &mut view.list_state);

            let selected = view.selected_item().map(ItemView::render);
            render_card(frame, selected.as_ref(), chunks[1]);
        }
    }
}

/// Render the detail pane for the selected item.
fn render_card(frame: &mut Frame, render: Option<&ItemRender>, area: Rect) {
    match render {
        None => {
            let block = Block::default().borders(Borders::ALL).title(" Card ");
            let inner = block.inner(area);
            frame.render_widget(block, area);
            render_empty(frame, inner, "Nothing selected");
        }
        Some(ItemRender::Loading) => {
            let block = Block::default().borders(Borders::ALL).title(" Card ");
            let inner = block.inner(area);
            frame.render_widget(block, area);
            render_loading(frame, inner, LOADING_MESSAGE);
        }
        Some(ItemRender::Failed) => {
            let block = Block::default().borders(Borders::ALL).title(" Card ");
            let inner = block.inner(area);
            frame.render_widget(block, area);
            render_error(frame, inner, FAILURE_MESSAGE);
        }
        Some(ItemRender::Card(card)) => {
            let paragraph = Paragraph::new(card_lines(card))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(format!(" {} ", card.title))
                        .title_style(
                            Style::default()
                                .fg(Color::Cyan)
                                .add_modifier(Modifier::BOLD),
                        ),
                )
                .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, area);
        }
    }
}

fn card_lines(card: &Card) -> Vec<Line<'_>> {
    let label = Style::default().fg(Color::DarkGray);
    vec![
        Line::from(vec![
            Span::styled("Id     ", label),
            Span::styled(
                card.id.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Image  ", label),
            Span::raw(card.image.as_deref().unwrap_or("-")),
        ]),
        Line::from(vec![
            Span::styled("Types  ", label),
            Span::styled(card.tags.as_str(), Style::default().fg(Color::Magenta)),
        ]),
    ]
}
