use tui::{
    backend::Backend,
    layout::{Alignment, Rect},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::ui::theme::Theme;

pub fn render_settings<B: Backend>(frame: &mut Frame<B>, area: Rect, theme: Theme) {
    let text = vec![
        Spans::from(Span::styled("Settings", theme.title())),
        Spans::from(""),
        Spans::from(Span::styled("Settings page coming soon...", theme.muted())),
        Spans::from(""),
        Spans::from(format!("Theme: {} (press t to switch)", theme.label())),
    ];

    let paragraph = Paragraph::new(text)
        .style(theme.base())
        .block(Block::default().title("Settings").borders(Borders::ALL).border_style(theme.muted()))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

pub fn render_not_found<B: Backend>(frame: &mut Frame<B>, area: Rect, path: &str, theme: Theme) {
    let text = vec![
        Spans::from(Span::styled("404", theme.error())),
        Spans::from(Span::styled("Page not found", theme.title())),
        Spans::from(""),
        Spans::from(Span::styled(format!("No page at {path}"), theme.muted())),
        Spans::from("Press 0 to go back to the dashboard"),
    ];

    let paragraph = Paragraph::new(text)
        .style(theme.base())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(theme.muted()));
    frame.render_widget(paragraph, area);
}
