use chrono::{Local, NaiveDate};
use crossterm::event::KeyCode;
use tui::{backend::Backend, Frame};
use uuid::Uuid;

use crate::models::{Contact, NewTask, Task, TaskPriority, TaskStatus};
use crate::ui::components::choice::ChoiceState;
use crate::ui::components::date_input::DateInputState;
use crate::ui::components::form::{edit_text, optional, render_form, FieldView};
use crate::ui::theme::Theme;
use crate::validation::{validate_task, ValidationErrors};

pub enum TaskFormAction {
    Cancel,
    Save { id: Option<Uuid>, task: NewTask },
}

#[derive(Clone, PartialEq, Copy, Debug)]
pub enum TaskField {
    Title,
    Description,
    Status,
    Priority,
    DueDate,
    AssignedTo,
}

impl TaskField {
    const ALL: [TaskField; 6] = [
        TaskField::Title,
        TaskField::Description,
        TaskField::Status,
        TaskField::Priority,
        TaskField::DueDate,
        TaskField::AssignedTo,
    ];

    fn key(self) -> &'static str {
        match self {
            TaskField::Title => "title",
            TaskField::Description => "description",
            TaskField::Status => "status",
            TaskField::Priority => "priority",
            TaskField::DueDate => "due_date",
            TaskField::AssignedTo => "contact_id",
        }
    }

    fn label(self) -> &'static str {
        match self {
            TaskField::Title => "Title",
            TaskField::Description => "Description",
            TaskField::Status => "Status",
            TaskField::Priority => "Priority",
            TaskField::DueDate => "Due Date",
            TaskField::AssignedTo => "Assigned To",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn is_choice(self) -> bool {
        matches!(self, TaskField::Status | TaskField::Priority | TaskField::AssignedTo)
    }
}

pub fn contact_choices(contacts: &[Contact]) -> Vec<(Uuid, String)> {
    contacts.iter().map(|c| (c.id, c.full_name())).collect()
}

pub struct TaskFormState {
    id: Option<Uuid>,
    initial: NewTask,
    title: String,
    description: String,
    status: TaskStatus,
    priority: TaskPriority,
    due_date: Option<DateInputState>,
    assignee: ChoiceState,
    pub current_field: TaskField,
    pub editing: bool,
    errors: ValidationErrors,
}

impl TaskFormState {
    pub fn new(contacts: Vec<(Uuid, String)>) -> Self {
        Self::with_values(None, NewTask::default(), contacts)
    }

    pub fn from_existing(task: &Task, contacts: Vec<(Uuid, String)>) -> Self {
        let mut state = Self::with_values(Some(task.id), NewTask::from(task), contacts);
        if let Some(contact_id) = task.contact_id {
            let label = match task.contact {
                Some(_) => task.assignee_name(),
                None => "Unknown contact".to_string(),
            };
            state.assignee.keep_option(contact_id, label);
            state.assignee.select_id(Some(contact_id));
        }
        state
    }

    fn with_values(id: Option<Uuid>, initial: NewTask, contacts: Vec<(Uuid, String)>) -> Self {
        let mut state = Self {
            id,
            initial,
            title: String::new(),
            description: String::new(),
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
            due_date: None,
            assignee: ChoiceState::new(contacts, "Unassigned"),
            current_field: TaskField::Title,
            editing: false,
            errors: ValidationErrors::default(),
        };
        state.reset();
        state
    }

    pub fn is_edit(&self) -> bool {
        self.id.is_some()
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn draft(&self) -> NewTask {
        NewTask {
            title: self.title.clone(),
            description: optional(&self.description),
            status: self.status,
            priority: self.priority,
            due_date: self.due_date.as_ref().map(|input| input.date),
            contact_id: self.assignee.selected_id(),
        }
    }

    pub fn reset(&mut self) {
        self.title = self.initial.title.clone();
        self.description = self.initial.description.clone().unwrap_or_default();
        self.status = self.initial.status;
        self.priority = self.initial.priority;
        self.due_date = self.initial.due_date.map(DateInputState::new);
        self.assignee.select_id(self.initial.contact_id);
        self.errors = ValidationErrors::default();
        self.editing = false;
    }

    pub fn next_field(&mut self) {
        let i = (self.current_field.index() + 1) % TaskField::ALL.len();
        self.current_field = TaskField::ALL[i];
    }

    pub fn previous_field(&mut self) {
        let len = TaskField::ALL.len();
        let i = (self.current_field.index() + len - 1) % len;
        self.current_field = TaskField::ALL[i];
    }

    fn cycle_choice(&mut self, forward: bool) {
        match (self.current_field, forward) {
            (TaskField::Status, true) => self.status = self.status.next(),
            (TaskField::Status, false) => self.status = self.status.previous(),
            (TaskField::Priority, true) => self.priority = self.priority.next(),
            (TaskField::Priority, false) => self.priority = self.priority.previous(),
            (TaskField::AssignedTo, true) => self.assignee.next(),
            (TaskField::AssignedTo, false) => self.assignee.previous(),
            _ => {}
        }
    }

    /// Start editing the current field. An unset due date starts from `today`.
    fn start_editing(&mut self, today: NaiveDate) {
        if self.current_field == TaskField::DueDate {
            let input = self.due_date.get_or_insert_with(|| DateInputState::new(today));
            input.toggle_editing();
        }
        self.editing = true;
    }

    fn stop_editing(&mut self) {
        if let Some(input) = self.due_date.as_mut().filter(|input| input.editing) {
            input.toggle_editing();
        }
        self.editing = false;
    }

    fn edit_current_field(&mut self, key: KeyCode) {
        match self.current_field {
            TaskField::Title => edit_text(&mut self.title, key),
            TaskField::Description => edit_text(&mut self.description, key),
            TaskField::DueDate => {
                if let Some(input) = self.due_date.as_mut() {
                    input.handle_input(key);
                }
            }
            _ => {}
        }
    }

    pub fn submit(&mut self) -> Option<TaskFormAction> {
        let task = self.draft();
        match validate_task(&task) {
            Ok(()) => {
                self.errors = ValidationErrors::default();
                Some(TaskFormAction::Save { id: self.id, task })
            }
            Err(errors) => {
                tracing::debug!(errors = errors.len(), "task form rejected");
                self.errors = errors;
                None
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyCode) -> Option<TaskFormAction> {
        if self.editing {
            match key {
                KeyCode::Enter | KeyCode::Esc => self.stop_editing(),
                other => self.edit_current_field(other),
            }
            return None;
        }

        let choice = self.current_field.is_choice();
        match key {
            KeyCode::Esc => return Some(TaskFormAction::Cancel),
            KeyCode::Enter | KeyCode::Right if choice => self.cycle_choice(true),
            KeyCode::Left if choice => self.cycle_choice(false),
            KeyCode::Enter => self.start_editing(Local::now().date_naive()),
            KeyCode::Backspace | KeyCode::Delete if self.current_field == TaskField::DueDate => {
                self.due_date = None;
            }
            KeyCode::Up => self.previous_field(),
            KeyCode::Down | KeyCode::Tab => self.next_field(),
            KeyCode::Char('s') => return self.submit(),
            KeyCode::Char('r') => self.reset(),
            _ => {}
        }

        None
    }
}

pub fn render_task_form<B: Backend>(frame: &mut Frame<B>, state: &TaskFormState, theme: Theme) {
    let title = if state.is_edit() { "Edit Task" } else { "Add New Task" };

    let due_date = state
        .due_date
        .as_ref()
        .map(DateInputState::get_display_string)
        .unwrap_or_else(|| "No due date".to_string());

    let fields: Vec<FieldView> = TaskField::ALL
        .iter()
        .map(|field| {
            let error = state.errors().get(field.key());
            match field {
                TaskField::Title => FieldView::text(field.label(), &state.title, error),
                TaskField::Description => FieldView::text(field.label(), &state.description, error),
                TaskField::Status => FieldView::choice(field.label(), state.status.as_str(), error),
                TaskField::Priority => FieldView::choice(field.label(), state.priority.as_str(), error),
                TaskField::DueDate => FieldView::text(field.label(), &due_date, error),
                TaskField::AssignedTo => FieldView::choice(field.label(), state.assignee.label(), error),
            }
        })
        .collect();

    render_form(
        frame,
        title,
        &fields,
        state.current_field.index(),
        state.editing,
        theme,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contacts() -> Vec<(Uuid, String)> {
        vec![
            (Uuid::from_u128(1), "John Doe".to_string()),
            (Uuid::from_u128(2), "Jane Smith".to_string()),
        ]
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn go_to(state: &mut TaskFormState, field: TaskField) {
        while state.current_field != field {
            state.handle_key(KeyCode::Down);
        }
    }

    #[test]
    fn title_is_required() {
        let mut state = TaskFormState::new(contacts());
        assert!(state.handle_key(KeyCode::Char('s')).is_none());
        assert_eq!(state.errors().get("title"), Some("Task title is required"));
    }

    #[test]
    fn new_task_defaults() {
        let mut state = TaskFormState::new(contacts());
        state.handle_key(KeyCode::Enter);
        for c in "Follow up".chars() {
            state.handle_key(KeyCode::Char(c));
        }
        state.handle_key(KeyCode::Enter);

        match state.handle_key(KeyCode::Char('s')) {
            Some(TaskFormAction::Save { id, task }) => {
                assert_eq!(id, None);
                assert_eq!(task.title, "Follow up");
                assert_eq!(task.status, TaskStatus::Pending);
                assert_eq!(task.priority, TaskPriority::Medium);
                assert_eq!(task.due_date, None);
                assert_eq!(task.contact_id, None);
            }
            _ => panic!("expected save"),
        }
    }

    #[test]
    fn choices_cycle_with_arrows() {
        let mut state = TaskFormState::new(contacts());
        go_to(&mut state, TaskField::Status);
        state.handle_key(KeyCode::Right);
        go_to(&mut state, TaskField::Priority);
        state.handle_key(KeyCode::Left);
        go_to(&mut state, TaskField::AssignedTo);
        state.handle_key(KeyCode::Left);

        let task = state.draft();
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.priority, TaskPriority::Low);
        assert_eq!(task.contact_id, Some(Uuid::from_u128(2)));
        assert!(!state.editing);
    }

    #[test]
    fn due_date_is_set_edited_and_cleared() {
        let mut state = TaskFormState::new(contacts());
        go_to(&mut state, TaskField::DueDate);

        state.start_editing(date(2024, 3, 15));
        assert!(state.editing);
        for c in "2025".chars() {
            state.handle_key(KeyCode::Char(c));
        }
        state.handle_key(KeyCode::Enter);
        assert!(!state.editing);
        assert_eq!(state.draft().due_date, Some(date(2025, 3, 15)));

        state.handle_key(KeyCode::Backspace);
        assert_eq!(state.draft().due_date, None);
    }

    #[test]
    fn assignee_missing_from_the_list_is_kept() {
        let task = Task {
            id: Uuid::from_u128(5),
            title: "Call back".to_string(),
            description: None,
            status: TaskStatus::Pending,
            priority: TaskPriority::Medium,
            due_date: None,
            contact_id: Some(Uuid::from_u128(7)),
            created_at: None,
            updated_at: None,
            contact: None,
        };
        let mut state = TaskFormState::from_existing(&task, Vec::new());
        assert_eq!(state.assignee.label(), "Unknown contact");

        match state.handle_key(KeyCode::Char('s')) {
            Some(TaskFormAction::Save { task: saved, .. }) => {
                assert_eq!(saved.contact_id, Some(Uuid::from_u128(7)));
            }
            _ => panic!("expected save"),
        }
    }

    #[test]
    fn existing_task_round_trips_through_the_form() {
        let task = Task {
            id: Uuid::from_u128(5),
            title: "Quarterly review".to_string(),
            description: Some("Prepare slides".to_string()),
            status: TaskStatus::InProgress,
            priority: TaskPriority::High,
            due_date: Some(date(2024, 6, 30)),
            contact_id: Some(Uuid::from_u128(1)),
            created_at: None,
            updated_at: None,
            contact: None,
        };
        let mut state = TaskFormState::from_existing(&task, contacts());
        assert_eq!(state.draft(), NewTask::from(&task));

        go_to(&mut state, TaskField::Status);
        state.handle_key(KeyCode::Right);
        state.handle_key(KeyCode::Char('r'));
        assert_eq!(state.draft().status, TaskStatus::InProgress);

        match state.handle_key(KeyCode::Char('s')) {
            Some(TaskFormAction::Save { id, .. }) => assert_eq!(id, Some(task.id)),
            _ => panic!("expected save"),
        }
    }
}
