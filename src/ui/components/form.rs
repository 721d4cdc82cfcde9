use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Span, Spans},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::ui::components::popup::centered_rect;
use crate::ui::theme::Theme;

/// One rendered row of a form
pub struct FieldView<'a> {
    pub label: &'a str,
    pub value: String,
    pub error: Option<&'a str>,
    /// Field is a picker rather than free text
    pub choice: bool,
}

impl<'a> FieldView<'a> {
    pub fn text(label: &'a str, value: &str, error: Option<&'a str>) -> Self {
        Self {
            label,
            value: value.to_string(),
            error,
            choice: false,
        }
    }

    pub fn choice(label: &'a str, value: impl Into<String>, error: Option<&'a str>) -> Self {
        Self {
            label,
            value: value.into(),
            error,
            choice: true,
        }
    }
}

/// Apply a typing key to a text field
pub fn edit_text(value: &mut String, key: KeyCode) {
    match key {
        KeyCode::Char(c) => {
            value.push(c);
        }
        KeyCode::Backspace => {
            value.pop();
        }
        _ => {}
    }
}

/// Optional columns are stored as `None` when left blank
pub fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

pub fn render_form<B: Backend>(
    frame: &mut Frame<B>,
    title: &str,
    fields: &[FieldView<'_>],
    current: usize,
    editing: bool,
    theme: Theme,
) {
    let area = centered_rect(70, 80, frame.size());
    frame.render_widget(Clear, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(area);

    frame.render_widget(Block::default().style(theme.base()), area);

    let title = Paragraph::new(title.to_string())
        .style(theme.title())
        .block(Block::default().borders(Borders::ALL).border_style(theme.border(true)));
    frame.render_widget(title, chunks[0]);

    render_fields(frame, chunks[1], fields, current, editing, theme);

    let help_text = if editing {
        "Enter - Save field | Esc - Stop editing"
    } else {
        "Enter - Edit field | Up/Down - Navigate | Left/Right - Pick | S - Save | R - Reset | Esc - Cancel"
    };

    let help = Paragraph::new(help_text)
        .style(theme.muted())
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).border_style(theme.muted()));
    frame.render_widget(help, chunks[2]);
}

fn render_fields<B: Backend>(
    frame: &mut Frame<B>,
    area: Rect,
    fields: &[FieldView<'_>],
    current: usize,
    editing: bool,
    theme: Theme,
) {
    let items: Vec<ListItem> = fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let focused = i == current;
            let label_style = if focused { theme.focused_field() } else { theme.base() };

            let value = if field.choice {
                format!("< {} >", field.value)
            } else if focused && editing {
                format!("{}|", field.value)
            } else {
                field.value.clone()
            };

            let value_style = if focused && editing {
                theme.base().add_modifier(Modifier::BOLD)
            } else {
                theme.base()
            };

            let mut lines = vec![Spans::from(vec![
                Span::styled(format!("{}: ", field.label), label_style),
                Span::styled(value, value_style),
            ])];
            if let Some(error) = field.error {
                lines.push(Spans::from(Span::styled(format!("  {error}"), theme.error())));
            }

            ListItem::new(lines)
        })
        .collect();

    let form_list = List::new(items)
        .style(theme.base())
        .block(Block::default().borders(Borders::ALL).title("Details").border_style(theme.muted()));

    frame.render_widget(form_list, area);
}
