use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::Rect,
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::theme::Theme;

/// Client-side search box above a record table
#[derive(Debug, Default, Clone)]
pub struct SearchState {
    query: String,
    editing: bool,
}

impl SearchState {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn start_editing(&mut self) {
        self.editing = true;
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.editing = false;
    }

    /// Returns true when the query text changed
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char(c) => {
                self.query.push(c);
                true
            }
            KeyCode::Backspace => self.query.pop().is_some(),
            KeyCode::Enter | KeyCode::Esc => {
                self.editing = false;
                false
            }
            _ => false,
        }
    }

    /// Lower-cased needle, `None` when nothing is typed
    pub fn needle(&self) -> Option<String> {
        if self.query.is_empty() {
            None
        } else {
            Some(self.query.to_lowercase())
        }
    }
}

pub fn render_search<B: Backend>(
    frame: &mut Frame<B>,
    area: Rect,
    state: &SearchState,
    placeholder: &str,
    theme: Theme,
) {
    let content = if state.query.is_empty() && !state.editing {
        Spans::from(Span::styled(placeholder.to_string(), theme.muted()))
    } else {
        Spans::from(vec![
            Span::styled(state.query.clone(), theme.base()),
            Span::styled(if state.editing { "|" } else { "" }, theme.focused_field()),
        ])
    };

    let border = if state.editing {
        theme.focused_field()
    } else {
        theme.muted()
    };

    let search = Paragraph::new(content)
        .style(theme.base())
        .block(Block::default().title("Search").borders(Borders::ALL).border_style(border));

    frame.render_widget(search, area);
}
