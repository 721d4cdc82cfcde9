use uuid::Uuid;

/// Picks one related record (or none) from the records loaded for a form
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceState {
    options: Vec<(Uuid, String)>,
    selected: Option<usize>,
    none_label: &'static str,
}

impl ChoiceState {
    pub fn new(options: Vec<(Uuid, String)>, none_label: &'static str) -> Self {
        Self {
            options,
            selected: None,
            none_label,
        }
    }

    /// Preselect `id`; an id that is not among the options selects nothing
    pub fn select_id(&mut self, id: Option<Uuid>) {
        self.selected = id.and_then(|id| self.options.iter().position(|(option, _)| *option == id));
    }

    /// Add `id` as an option when the loaded records do not include it, so a
    /// record whose related row is missing from the list keeps its reference
    pub fn keep_option(&mut self, id: Uuid, label: impl Into<String>) {
        if !self.options.iter().any(|(option, _)| *option == id) {
            self.options.push((id, label.into()));
        }
    }

    pub fn selected_id(&self) -> Option<Uuid> {
        self.selected.and_then(|i| self.options.get(i)).map(|(id, _)| *id)
    }

    pub fn label(&self) -> &str {
        self.selected
            .and_then(|i| self.options.get(i))
            .map(|(_, label)| label.as_str())
            .unwrap_or(self.none_label)
    }

    // "none" sits before the first option
    pub fn next(&mut self) {
        self.selected = match self.selected {
            None if !self.options.is_empty() => Some(0),
            Some(i) if i + 1 < self.options.len() => Some(i + 1),
            _ => None,
        };
    }

    pub fn previous(&mut self) {
        self.selected = match self.selected {
            None => self.options.len().checked_sub(1),
            Some(0) => None,
            Some(i) => Some(i - 1),
        };
    }
}
