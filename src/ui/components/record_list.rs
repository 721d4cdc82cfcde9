use crossterm::event::KeyCode;
use tui::widgets::TableState;

use super::search_input::SearchState;

/// Records that the search box can filter
pub trait Searchable {
    /// `needle` is already lower-cased
    fn matches(&self, needle: &str) -> bool;
}

/// Case-insensitive substring test used by every table
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// What a shared list key asks the owning screen to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListCommand {
    New,
    Edit,
    Delete,
    /// Not a shared list key; the screen may handle it
    Other(KeyCode),
}

/// The last fetched records of one table plus selection, search and
/// delete-confirmation state
pub struct RecordList<T> {
    records: Vec<T>,
    search: SearchState,
    table_state: TableState,
    confirming_delete: bool,
}

impl<T: Searchable> RecordList<T> {
    pub fn new(records: Vec<T>) -> Self {
        let mut list = Self {
            records,
            search: SearchState::default(),
            table_state: TableState::default(),
            confirming_delete: false,
        };
        list.reset_selection();
        list
    }

    /// Replace the records with a fresh fetch, keeping the search text
    pub fn set_records(&mut self, records: Vec<T>) {
        let previous = self.table_state.selected();
        self.records = records;
        self.confirming_delete = false;

        let len = self.visible().len();
        match previous {
            Some(i) if len > 0 => self.table_state.select(Some(i.min(len - 1))),
            _ => self.reset_selection(),
        }
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    pub fn table_state_mut(&mut self) -> &mut TableState {
        &mut self.table_state
    }

    pub fn is_confirming_delete(&self) -> bool {
        self.confirming_delete
    }

    /// True while keys belong to the search box or the confirmation popup
    pub fn is_capturing_input(&self) -> bool {
        self.search.is_editing() || self.confirming_delete
    }

    /// Records passing the current search, in stored order
    pub fn visible(&self) -> Vec<&T> {
        match self.search.needle() {
            Some(needle) => self.records.iter().filter(|r| r.matches(&needle)).collect(),
            None => self.records.iter().collect(),
        }
    }

    pub fn selected(&self) -> Option<&T> {
        let index = self.table_state.selected()?;
        self.visible().get(index).copied()
    }

    pub fn reset_selection(&mut self) {
        let selection = if self.visible().is_empty() { None } else { Some(0) };
        self.table_state.select(selection);
    }

    pub fn next(&mut self) {
        let len = self.visible().len();
        if len == 0 {
            return;
        }

        let i = match self.table_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.visible().len();
        if len == 0 {
            return;
        }

        let i = match self.table_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }

    pub fn handle_key(&mut self, key: KeyCode) -> Option<ListCommand> {
        if self.search.is_editing() {
            if self.search.handle_key(key) {
                self.reset_selection();
            }
            return None;
        }

        if self.confirming_delete {
            match key {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    self.confirming_delete = false;
                    if self.selected().is_some() {
                        return Some(ListCommand::Delete);
                    }
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.confirming_delete = false;
                }
                _ => {}
            }
            return None;
        }

        match key {
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::Char('/') => self.search.start_editing(),
            KeyCode::Esc if !self.search.query().is_empty() => {
                self.search.clear();
                self.reset_selection();
            }
            KeyCode::Char('n') => return Some(ListCommand::New),
            KeyCode::Char('e') | KeyCode::Enter => {
                if self.selected().is_some() {
                    return Some(ListCommand::Edit);
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if self.selected().is_some() {
                    self.confirming_delete = true;
                }
            }
            other => return Some(ListCommand::Other(other)),
        }

        None
    }
}
