use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};
use uuid::Uuid;

use crate::models::Contact;
use crate::ui::components::popup::render_delete_confirmation;
use crate::ui::components::record_list::{contains_ignore_case, ListCommand, RecordList, Searchable};
use crate::ui::components::search_input::render_search;
use crate::ui::theme::Theme;

impl Searchable for Contact {
    fn matches(&self, needle: &str) -> bool {
        contains_ignore_case(&self.full_name(), needle) || contains_ignore_case(&self.email, needle)
    }
}

pub enum ContactAction {
    NewContact,
    EditContact(Contact),
    DeleteContact(Uuid),
}

pub struct ContactsState {
    list: RecordList<Contact>,
}

impl ContactsState {
    pub fn new(contacts: Vec<Contact>) -> Self {
        Self {
            list: RecordList::new(contacts),
        }
    }

    pub fn set_contacts(&mut self, contacts: Vec<Contact>) {
        self.list.set_records(contacts);
    }

    pub fn list(&self) -> &RecordList<Contact> {
        &self.list
    }

    pub fn is_capturing_input(&self) -> bool {
        self.list.is_capturing_input()
    }

    pub fn handle_key(&mut self, key: KeyCode) -> Option<ContactAction> {
        match self.list.handle_key(key)? {
            ListCommand::New => Some(ContactAction::NewContact),
            ListCommand::Edit => self.list.selected().cloned().map(ContactAction::EditContact),
            ListCommand::Delete => self.list.selected().map(|c| ContactAction::DeleteContact(c.id)),
            ListCommand::Other(_) => None,
        }
    }
}

pub fn render_contacts<B: Backend>(
    frame: &mut Frame<B>,
    area: Rect,
    state: &mut ContactsState,
    theme: Theme,
    focused: bool,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)].as_ref())
        .split(area);

    render_search(frame, chunks[0], state.list.search(), "Search contacts...", theme);

    let rows: Vec<Row> = state
        .list
        .visible()
        .into_iter()
        .map(|contact| {
            Row::new(vec![
                Cell::from(contact.full_name()),
                Cell::from(contact.email.clone()),
                Cell::from(contact.phone.clone()),
                Cell::from(Span::styled(contact.company_name().to_string(), theme.muted())),
                Cell::from(contact.job_title.clone().unwrap_or_default()),
            ])
        })
        .collect();

    let title = format!("Contacts ({})", rows.len());
    let header = Row::new(vec!["Name", "Email", "Phone", "Company", "Job Title"])
        .style(theme.title())
        .bottom_margin(1);

    let widths = [
        Constraint::Percentage(20),
        Constraint::Percentage(25),
        Constraint::Percentage(15),
        Constraint::Percentage(20),
        Constraint::Percentage(20),
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

    if state.list.is_confirming_delete() {
        let name = state
            .list
            .selected()
            .map(Contact::full_name)
            .unwrap_or_else(|| "this contact".to_string());
        render_delete_confirmation(frame, &name, theme);
    }
}
