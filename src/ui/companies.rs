use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};
use uuid::Uuid;

use crate::models::Company;
use crate::ui::components::popup::render_delete_confirmation;
use crate::ui::components::record_list::{contains_ignore_case, ListCommand, RecordList, Searchable};
use crate::ui::components::search_input::render_search;
use crate::ui::theme::Theme;

impl Searchable for Company {
    fn matches(&self, needle: &str) -> bool {
        contains_ignore_case(&self.name, needle)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortColumn {
    Name,
    Email,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

pub enum CompanyAction {
    NewCompany,
    EditCompany(Company),
    DeleteCompany(Uuid),
}

// Represents the state of the companies table
pub struct CompaniesState {
    list: RecordList<Company>,
    // Rows in the order the service returned them
    fetched: Vec<Company>,
    sort: Option<(SortColumn, SortDirection)>,
}

impl CompaniesState {
    pub fn new(companies: Vec<Company>) -> Self {
        Self {
            list: RecordList::new(companies.clone()),
            fetched: companies,
            sort: None,
        }
    }

    pub fn set_companies(&mut self, companies: Vec<Company>) {
        self.fetched = companies;
        self.list.set_records(self.sorted());
    }

    pub fn list(&self) -> &RecordList<Company> {
        &self.list
    }

    pub fn sort(&self) -> Option<(SortColumn, SortDirection)> {
        self.sort
    }

    /// None -> name asc -> name desc -> email asc -> email desc -> None
    pub fn cycle_sort(&mut self) {
        use SortColumn::*;
        use SortDirection::*;

        self.sort = match self.sort {
            None => Some((Name, Ascending)),
            Some((Name, Ascending)) => Some((Name, Descending)),
            Some((Name, Descending)) => Some((Email, Ascending)),
            Some((Email, Ascending)) => Some((Email, Descending)),
            Some((Email, Descending)) => None,
        };
        self.list.set_records(self.sorted());
        self.list.reset_selection();
    }

    fn sorted(&self) -> Vec<Company> {
        let mut companies = self.fetched.clone();
        let Some((column, direction)) = self.sort else {
            return companies;
        };

        companies.sort_by(|a, b| {
            let ordering = match column {
                SortColumn::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
                SortColumn::Email => a.email.to_lowercase().cmp(&b.email.to_lowercase()),
            };
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
        companies
    }

    pub fn is_capturing_input(&self) -> bool {
        self.list.is_capturing_input()
    }

    pub fn handle_key(&mut self, key: KeyCode) -> Option<CompanyAction> {
        match self.list.handle_key(key)? {
            ListCommand::New => Some(CompanyAction::NewCompany),
            ListCommand::Edit => self.list.selected().cloned().map(CompanyAction::EditCompany),
            ListCommand::Delete => self.list.selected().map(|c| CompanyAction::DeleteCompany(c.id)),
            ListCommand::Other(KeyCode::Char('s')) => {
                self.cycle_sort();
                None
            }
            ListCommand::Other(_) => None,
        }
    }
}

fn header_label(title: &str, column: SortColumn, sort: Option<(SortColumn, SortDirection)>) -> String {
    match sort {
        Some((active, SortDirection::Ascending)) if active == column => format!("{title} ^"),
        Some((active, SortDirection::Descending)) if active == column => format!("{title} v"),
        _ => title.to_string(),
    }
}

pub fn render_companies<B: Backend>(
    frame: &mut Frame<B>,
    area: Rect,
    state: &mut CompaniesState,
    theme: Theme,
    focused: bool,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)].as_ref())
        .split(area);

    render_search(frame, chunks[0], state.list.search(), "Search companies...", theme);

    let rows: Vec<Row> = state
        .list
        .visible()
        .into_iter()
        .map(|company| {
            Row::new(vec![
                Cell::from(company.name.clone()),
                Cell::from(company.email.clone()),
                Cell::from(company.phone.clone()),
                Cell::from(company.website.clone().unwrap_or_default()),
                Cell::from(company.address.clone()),
            ])
        })
        .collect();

    let title = format!("Companies ({})", rows.len());
    let header = Row::new(vec![
        header_label("Name", SortColumn::Name, state.sort()),
        header_label("Email", SortColumn::Email, state.sort()),
        "Phone".to_string(),
        "Website".to_string(),
        "Address".to_string(),
    ])
    .style(theme.title())
    .bottom_margin(1);

    let widths = [
        Constraint::Percentage(20),
        Constraint::Percentage(20),
        Constraint::Percentage(15),
        Constraint::Percentage(15),
        Constraint::Percentage(30),
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
            .map(|c| c.name.clone())
            .unwrap_or_else(|| "this company".to_string());
        render_delete_confirmation(frame, &name, theme);
    }
}
