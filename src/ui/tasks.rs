use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};
use uuid::Uuid;

use crate::models::{Task, TaskStatus};
use crate::ui::components::popup::render_delete_confirmation;
use crate::ui::components::record_list::{contains_ignore_case, ListCommand, RecordList, Searchable};
use crate::ui::components::search_input::render_search;
use crate::ui::theme::Theme;

impl Searchable for Task {
    fn matches(&self, needle: &str) -> bool {
        contains_ignore_case(&self.title, needle)
            || self
                .description
                .as_deref()
                .is_some_and(|description| contains_ignore_case(description, needle))
    }
}

pub enum TaskAction {
    NewTask,
    EditTask(Task),
    DeleteTask(Uuid),
    /// Completion checkbox: the task and the status it flips to
    SetStatus(Uuid, TaskStatus),
}

pub struct TasksState {
    list: RecordList<Task>,
}

impl TasksState {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            list: RecordList::new(tasks),
        }
    }

    pub fn set_tasks(&mut self, tasks: Vec<Task>) {
        self.list.set_records(tasks);
    }

    pub fn list(&self) -> &RecordList<Task> {
        &self.list
    }

    pub fn is_capturing_input(&self) -> bool {
        self.list.is_capturing_input()
    }

    pub fn handle_key(&mut self, key: KeyCode) -> Option<TaskAction> {
        match self.list.handle_key(key)? {
            ListCommand::New => Some(TaskAction::NewTask),
            ListCommand::Edit => self.list.selected().cloned().map(TaskAction::EditTask),
            ListCommand::Delete => self.list.selected().map(|t| TaskAction::DeleteTask(t.id)),
            ListCommand::Other(KeyCode::Char(' ') | KeyCode::Char('x')) => self
                .list
                .selected()
                .map(|t| TaskAction::SetStatus(t.id, t.status.toggled())),
            ListCommand::Other(_) => None,
        }
    }
}

pub fn format_due_date(task: &Task) -> String {
    task.due_date
        .map(|date| date.format("%b %d, %Y").to_string())
        .unwrap_or_else(|| "No due date".to_string())
}

pub fn render_tasks<B: Backend>(
    frame: &mut Frame<B>,
    area: Rect,
    state: &mut TasksState,
    theme: Theme,
    focused: bool,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)].as_ref())
        .split(area);

    render_search(frame, chunks[0], state.list().search(), "Search tasks...", theme);

    let rows: Vec<Row> = state
        .list()
        .visible()
        .into_iter()
        .map(|task| {
            let checkbox = if task.is_completed() { "[x]" } else { "[ ]" };
            Row::new(vec![
                Cell::from(checkbox),
                Cell::from(task.title.clone()),
                Cell::from(Span::styled(
                    task.description.clone().unwrap_or_default(),
                    theme.muted(),
                )),
                Cell::from(Span::styled(task.status.to_string(), theme.status(task.status))),
                Cell::from(Span::styled(task.priority.to_string(), theme.priority(task.priority))),
                Cell::from(format_due_date(task)),
                Cell::from(task.assignee_name()),
            ])
        })
        .collect();

    let title = format!("Tasks ({})", rows.len());
    let header = Row::new(vec!["", "Title", "Description", "Status", "Priority", "Due", "Assigned To"])
        .style(theme.title())
        .bottom_margin(1);

    let widths = [
        Constraint::Length(3),
        Constraint::Percentage(20),
        Constraint::Percentage(25),
        Constraint::Length(11),
        Constraint::Length(8),
        Constraint::Length(12),
        Constraint::Percentage(15),
    ];

    let table = Table::new(rows)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(theme.border(focused)),
        )
        .style(theme.base())
        .widths(&widths)
        .highlight_style(theme.highlight());

    frame.render_stateful_widget(table, chunks[1], state.list.table_state_mut());

    if state.list().is_confirming_delete() {
        let title = state
            .list()
            .selected()
            .map(|t| format!("\"{}\"", t.title))
            .unwrap_or_else(|| "this task".to_string());
        render_delete_confirmation(frame, &title, theme);
    }
}
