use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::Spans,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::ui::theme::Theme;

// Helper function to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
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

/// Yes/no popup drawn over the whole frame
pub fn render_delete_confirmation<B: Backend>(frame: &mut Frame<B>, what: &str, theme: Theme) {
    let popup_area = centered_rect(50, 25, frame.size());

    let popup = Paragraph::new(vec![
        Spans::from(""),
        Spans::from(format!("Are you sure you want to delete {what}?")),
        Spans::from(""),
        Spans::from("This cannot be undone."),
        Spans::from(""),
        Spans::from("<Y> Yes  <N> No"),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title("Confirm Delete")
            .borders(Borders::ALL)
            .border_style(theme.error()),
    )
    .style(theme.base());

    frame.render_widget(Clear, popup_area);
    frame.render_widget(popup, popup_area);
}
