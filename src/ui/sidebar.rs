use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::ui::route::Route;
use crate::ui::theme::Theme;

pub const TITLE: &str = "CRM Dashboard";

/// Sidebar lines in display order: `(shortcut, label, active)`
pub fn nav_entries(current: &Route) -> Vec<(char, &'static str, bool)> {
    Route::NAV
        .iter()
        .enumerate()
        .map(|(i, route)| {
            let shortcut = char::from_digit(i as u32 + 1, 10).unwrap_or(' ');
            (shortcut, route.label(), route == current)
        })
        .collect()
}

pub fn render_sidebar<B: Backend>(frame: &mut Frame<B>, area: Rect, current: &Route, theme: Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.muted())
        .style(theme.base());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(2),
                Constraint::Min(4),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(inner);

    let title = Paragraph::new(Spans::from(Span::styled(TITLE, theme.title()))).style(theme.base());
    frame.render_widget(title, chunks[0]);

    let items: Vec<ListItem> = nav_entries(current)
        .into_iter()
        .map(|(shortcut, label, active)| {
            let style = if active { theme.highlight() } else { theme.base() };
            ListItem::new(Spans::from(Span::styled(format!(" {shortcut}  {label}"), style)))
        })
        .collect();
    frame.render_widget(List::new(items).style(theme.base()), chunks[1]);

    let footer = Paragraph::new(vec![
        Spans::from(Span::styled(format!(" t  {}", theme.toggled().label()), theme.muted())),
        Spans::from(Span::styled(" q  Quit", theme.muted())),
    ])
    .style(theme.base());
    frame.render_widget(footer, chunks[2]);
}
