use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Span, Spans},
    widgets::{Block, Paragraph},
    Frame,
};
use uuid::Uuid;

use crate::db::Database;
use crate::models::{CompanyPatch, ContactPatch, NewCompany, NewContact, NewTask, TaskPatch, TaskStatus};
use crate::ui::{
    companies::{render_companies, CompaniesState, CompanyAction},
    company_form::{render_company_form, CompanyFormAction, CompanyFormState},
    contact_form::{company_choices, render_contact_form, ContactFormAction, ContactFormState},
    contacts::{render_contacts, ContactAction, ContactsState},
    pages::{render_not_found, render_settings},
    route::Route,
    sidebar::render_sidebar,
    task_form::{contact_choices, render_task_form, TaskFormAction, TaskFormState},
    tasks::{render_tasks, TaskAction, TasksState},
    theme::Theme,
};

/// Which list receives keys on the overview screen
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pane {
    Companies,
    Contacts,
    Tasks,
}

impl Pane {
    fn next(self) -> Self {
        match self {
            Pane::Companies => Pane::Contacts,
            Pane::Contacts => Pane::Tasks,
            Pane::Tasks => Pane::Companies,
        }
    }

    fn previous(self) -> Self {
        match self {
            Pane::Companies => Pane::Tasks,
            Pane::Contacts => Pane::Companies,
            Pane::Tasks => Pane::Contacts,
        }
    }
}

// The modal form shown above the current screen
enum Form {
    Company(CompanyFormState),
    Contact(ContactFormState),
    Task(TaskFormState),
}

pub struct App {
    db: Database,
    route: Route,
    theme: Theme,
    pane: Pane,
    companies: CompaniesState,
    contacts: ContactsState,
    tasks: TasksState,
    form: Option<Form>,
    should_quit: bool,
}

impl App {
    pub fn new(db: Database, route: Route) -> Self {
        Self {
            db,
            route,
            theme: Theme::default(),
            pane: Pane::Companies,
            companies: CompaniesState::new(Vec::new()),
            contacts: ContactsState::new(Vec::new()),
            tasks: TasksState::new(Vec::new()),
            form: None,
            should_quit: false,
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn is_form_open(&self) -> bool {
        self.form.is_some()
    }

    pub async fn navigate(&mut self, route: Route) {
        tracing::info!(path = route.path(), "navigate");
        self.route = route;
        self.load_current_route().await;
    }

    pub async fn load_current_route(&mut self) {
        match self.route {
            Route::Overview => {
                self.load_companies().await;
                self.load_contacts().await;
                self.load_tasks().await;
            }
            Route::Companies => self.load_companies().await,
            Route::Contacts => self.load_contacts().await,
            Route::Tasks => self.load_tasks().await,
            Route::Settings | Route::NotFound(_) => {}
        }
    }

    async fn load_companies(&mut self) {
        match self.db.get_companies().await {
            Ok(companies) => self.companies.set_companies(companies),
            Err(err) => tracing::error!(error = %err, "failed to load companies"),
        }
    }

    async fn load_contacts(&mut self) {
        match self.db.get_contacts().await {
            Ok(contacts) => self.contacts.set_contacts(contacts),
            Err(err) => tracing::error!(error = %err, "failed to load contacts"),
        }
    }

    async fn load_tasks(&mut self) {
        match self.db.get_tasks().await {
            Ok(tasks) => self.tasks.set_tasks(tasks),
            Err(err) => tracing::error!(error = %err, "failed to load tasks"),
        }
    }

    // Pane that receives list keys on the current screen
    fn active_pane(&self) -> Option<Pane> {
        match self.route {
            Route::Overview => Some(self.pane),
            Route::Companies => Some(Pane::Companies),
            Route::Contacts => Some(Pane::Contacts),
            Route::Tasks => Some(Pane::Tasks),
            Route::Settings | Route::NotFound(_) => None,
        }
    }

    fn is_list_capturing_input(&self) -> bool {
        match self.active_pane() {
            Some(Pane::Companies) => self.companies.is_capturing_input(),
            Some(Pane::Contacts) => self.contacts.is_capturing_input(),
            Some(Pane::Tasks) => self.tasks.is_capturing_input(),
            None => false,
        }
    }

    pub async fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.is_form_open() {
            self.handle_form_key(key.code).await;
            return;
        }

        if !self.is_list_capturing_input() && self.handle_global_key(key.code).await {
            return;
        }

        match self.active_pane() {
            Some(Pane::Companies) => {
                if let Some(action) = self.companies.handle_key(key.code) {
                    self.handle_company_action(action).await;
                }
            }
            Some(Pane::Contacts) => {
                if let Some(action) = self.contacts.handle_key(key.code) {
                    self.handle_contact_action(action).await;
                }
            }
            Some(Pane::Tasks) => {
                if let Some(action) = self.tasks.handle_key(key.code) {
                    self.handle_task_action(action).await;
                }
            }
            None => {}
        }
    }

    /// Sidebar and shell keys. Returns true when the key was consumed.
    async fn handle_global_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('t') => {
                self.theme = self.theme.toggled();
                tracing::info!(theme = self.theme.label(), "theme changed");
            }
            KeyCode::Tab => self.navigate(self.route.next()).await,
            KeyCode::BackTab => self.navigate(self.route.previous()).await,
            KeyCode::Char(c) if c.is_ascii_digit() => match Route::from_shortcut(c) {
                Some(route) => self.navigate(route).await,
                None => return false,
            },
            KeyCode::Right if self.route == Route::Overview => self.pane = self.pane.next(),
            KeyCode::Left if self.route == Route::Overview => self.pane = self.pane.previous(),
            _ => return false,
        }
        true
    }

    async fn handle_company_action(&mut self, action: CompanyAction) {
        match action {
            CompanyAction::NewCompany => {
                self.form = Some(Form::Company(CompanyFormState::new()));
            }
            CompanyAction::EditCompany(company) => {
                self.form = Some(Form::Company(CompanyFormState::from_existing(&company)));
            }
            CompanyAction::DeleteCompany(id) => {
                match self.db.delete_company(id).await {
                    Ok(()) => tracing::info!(%id, "company deleted"),
                    Err(err) => tracing::error!(error = %err, %id, "failed to delete company"),
                }
                self.load_companies().await;
            }
        }
    }

    async fn handle_contact_action(&mut self, action: ContactAction) {
        match action {
            ContactAction::NewContact => {
                self.load_companies().await;
                let companies = company_choices(self.companies.list().records());
                self.form = Some(Form::Contact(ContactFormState::new(companies)));
            }
            ContactAction::EditContact(contact) => {
                self.load_companies().await;
                let companies = company_choices(self.companies.list().records());
                self.form = Some(Form::Contact(ContactFormState::from_existing(&contact, companies)));
            }
            ContactAction::DeleteContact(id) => {
                match self.db.delete_contact(id).await {
                    Ok(()) => tracing::info!(%id, "contact deleted"),
                    Err(err) => tracing::error!(error = %err, %id, "failed to delete contact"),
                }
                self.load_contacts().await;
            }
        }
    }

    async fn handle_task_action(&mut self, action: TaskAction) {
        match action {
            TaskAction::NewTask => {
                self.load_contacts().await;
                let contacts = contact_choices(self.contacts.list().records());
                self.form = Some(Form::Task(TaskFormState::new(contacts)));
            }
            TaskAction::EditTask(task) => {
                self.load_contacts().await;
                let contacts = contact_choices(self.contacts.list().records());
                self.form = Some(Form::Task(TaskFormState::from_existing(&task, contacts)));
            }
            TaskAction::DeleteTask(id) => {
                match self.db.delete_task(id).await {
                    Ok(()) => tracing::info!(%id, "task deleted"),
                    Err(err) => tracing::error!(error = %err, %id, "failed to delete task"),
                }
                self.load_tasks().await;
            }
            TaskAction::SetStatus(id, status) => self.set_task_status(id, status).await,
        }
    }

    async fn set_task_status(&mut self, id: Uuid, status: TaskStatus) {
        match self.db.update_task(id, &TaskPatch::status(status)).await {
            Ok(_) => {
                tracing::info!(%id, %status, "task status changed");
                self.load_tasks().await;
            }
            Err(err) => tracing::error!(error = %err, %id, "failed to update task status"),
        }
    }

    async fn handle_form_key(&mut self, key: KeyCode) {
        match &mut self.form {
            Some(Form::Company(state)) => match state.handle_key(key) {
                Some(CompanyFormAction::Cancel) => self.form = None,
                Some(CompanyFormAction::Save { id, company }) => {
                    if self.save_company(id, company).await {
                        self.form = None;
                    }
                }
                None => {}
            },
            Some(Form::Contact(state)) => match state.handle_key(key) {
                Some(ContactFormAction::Cancel) => self.form = None,
                Some(ContactFormAction::Save { id, contact }) => {
                    if self.save_contact(id, contact).await {
                        self.form = None;
                    }
                }
                None => {}
            },
            Some(Form::Task(state)) => match state.handle_key(key) {
                Some(TaskFormAction::Cancel) => self.form = None,
                Some(TaskFormAction::Save { id, task }) => {
                    if self.save_task(id, task).await {
                        self.form = None;
                    }
                }
                None => {}
            },
            None => {}
        }
    }

    // Create or update, then reload. A failed save leaves the form open.
    async fn save_company(&mut self, id: Option<Uuid>, company: NewCompany) -> bool {
        let result = match id {
            Some(id) => self.db.update_company(id, &CompanyPatch::from(company)).await,
            None => self.db.create_company(&company).await,
        };

        match result {
            Ok(saved) => {
                tracing::info!(id = %saved.id, "company saved");
                self.load_companies().await;
                true
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to save company");
                false
            }
        }
    }

    async fn save_contact(&mut self, id: Option<Uuid>, contact: NewContact) -> bool {
        let result = match id {
            Some(id) => self.db.update_contact(id, &ContactPatch::from(contact)).await,
            None => self.db.create_contact(&contact).await,
        };

        match result {
            Ok(saved) => {
                tracing::info!(id = %saved.id, "contact saved");
                self.load_contacts().await;
                true
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to save contact");
                false
            }
        }
    }

    async fn save_task(&mut self, id: Option<Uuid>, task: NewTask) -> bool {
        let result = match id {
            Some(id) => self.db.update_task(id, &TaskPatch::from(task)).await,
            None => self.db.create_task(&task).await,
        };

        match result {
            Ok(saved) => {
                tracing::info!(id = %saved.id, "task saved");
                self.load_tasks().await;
                true
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to save task");
                false
            }
        }
    }

    pub fn render<B: Backend>(&mut self, frame: &mut Frame<B>) {
        let theme = self.theme();
        let size = frame.size();
        frame.render_widget(Block::default().style(theme.base()), size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(26), Constraint::Min(40)].as_ref())
            .split(size);

        render_sidebar(frame, columns[0], self.route(), theme);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([Constraint::Min(5), Constraint::Length(1)].as_ref())
            .split(columns[1]);

        self.render_content(frame, rows[0]);

        let help = Paragraph::new(Spans::from(Span::styled(self.help_text(), theme.muted())))
            .style(theme.base());
        frame.render_widget(help, rows[1]);

        match &self.form {
            Some(Form::Company(state)) => render_company_form(frame, state, theme),
            Some(Form::Contact(state)) => render_contact_form(frame, state, theme),
            Some(Form::Task(state)) => render_task_form(frame, state, theme),
            None => {}
        }
    }

    fn render_content<B: Backend>(&mut self, frame: &mut Frame<B>, area: Rect) {
        let theme = self.theme();
        match &self.route {
            Route::Overview => {
                let panes = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints(
                        [
                            Constraint::Percentage(34),
                            Constraint::Percentage(33),
                            Constraint::Percentage(33),
                        ]
                        .as_ref(),
                    )
                    .split(area);

                let pane = self.pane;
                render_companies(frame, panes[0], &mut self.companies, theme, pane == Pane::Companies);
                render_contacts(frame, panes[1], &mut self.contacts, theme, pane == Pane::Contacts);
                render_tasks(frame, panes[2], &mut self.tasks, theme, pane == Pane::Tasks);
            }
            Route::Companies => render_companies(frame, area, &mut self.companies, theme, true),
            Route::Contacts => render_contacts(frame, area, &mut self.contacts, theme, true),
            Route::Tasks => render_tasks(frame, area, &mut self.tasks, theme, true),
            Route::Settings => render_settings(frame, area, theme),
            Route::NotFound(path) => render_not_found(frame, area, path, theme),
        }
    }

    fn help_text(&self) -> String {
        let list_keys = "/ Search | n New | e Edit | d Delete";
        let screen_keys = match self.active_pane() {
            Some(Pane::Companies) => format!("{list_keys} | s Sort"),
            Some(Pane::Contacts) => list_keys.to_string(),
            Some(Pane::Tasks) => format!("{list_keys} | Space Done"),
            None => String::new(),
        };
        let pane_keys = if self.route == Route::Overview { " | Left/Right Pane" } else { "" };
        let separator = if screen_keys.is_empty() { "" } else { " | " };

        format!("{screen_keys}{pane_keys}{separator}Tab Section | t Theme | q Quit")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::RestClient;
    use serde_json::json;
    use wiremock::matchers::{body_json, body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const COMPANY_ID: &str = "5b2f6f4e-0f0a-4a43-8d55-8a7f1c2b9e01";
    const CONTACT_ID: &str = "9c0e5a21-7d4b-4f5e-a1b2-3c4d5e6f7a8b";
    const TASK_ID: &str = "1e2d3c4b-5a69-4788-97a6-b5c4d3e2f100";

    fn app(server: &MockServer, route: Route) -> App {
        let db = Database::from_rest(RestClient::new(&server.uri(), "anon").unwrap());
        App::new(db, route)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    async fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c))).await;
        }
    }

    fn company_json(name: &str) -> serde_json::Value {
        json!({
            "id": COMPANY_ID,
            "name": name,
            "email": "contact@acme.com",
            "phone": "+1 (555) 123-4567",
            "website": null,
            "address": "123 Business Ave",
            "description": null
        })
    }

    fn contact_json(company_id: Option<&str>) -> serde_json::Value {
        json!({
            "id": CONTACT_ID,
            "first_name": "Jane",
            "last_name": "Smith",
            "email": "jane.smith@example.com",
            "phone": "+1 (555) 000-0001",
            "company_id": company_id,
            "job_title": null,
            "companies": company_id.map(|_| json!({ "name": "Acme Corp" }))
        })
    }

    fn assigned_task_json() -> serde_json::Value {
        json!({
            "id": TASK_ID,
            "title": "Send proposal",
            "description": null,
            "status": "pending",
            "priority": "high",
            "due_date": "2026-11-02",
            "contact_id": CONTACT_ID,
            "contacts": { "first_name": "Jane", "last_name": "Smith" }
        })
    }

    fn unavailable() -> ResponseTemplate {
        ResponseTemplate::new(503).set_body_string("upstream unavailable")
    }

    fn task_json(status: &str) -> serde_json::Value {
        json!({
            "id": TASK_ID,
            "title": "Send proposal",
            "description": null,
            "status": status,
            "priority": "medium",
            "due_date": null,
            "contact_id": null,
            "contacts": null
        })
    }

    #[tokio::test]
    async fn loading_a_route_fills_its_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/companies"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([company_json("Acme Corp")])))
            .expect(1)
            .mount(&server)
            .await;

        let mut app = app(&server, Route::Companies);
        app.load_current_route().await;
        assert_eq!(app.companies.list().records().len(), 1);
        assert_eq!(app.companies.list().records()[0].name, "Acme Corp");
    }

    #[tokio::test]
    async fn failed_reload_keeps_the_previous_rows() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/companies"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "code": "XX000",
                "message": "internal error",
                "details": null,
                "hint": null
            })))
            .mount(&server)
            .await;

        let mut app = app(&server, Route::Companies);
        let company = serde_json::from_value(company_json("Acme Corp")).unwrap();
        app.companies.set_companies(vec![company]);

        app.load_current_route().await;
        assert_eq!(app.companies.list().records().len(), 1);
    }

    #[tokio::test]
    async fn checkbox_patches_the_status_then_reloads() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/tasks"))
            .and(query_param("order", "due_date.asc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([task_json("pending")])))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/rest/v1/tasks"))
            .and(query_param("id", format!("eq.{TASK_ID}")))
            .and(body_json(json!({ "status": "completed" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(task_json("completed")))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([task_json("completed")])))
            .expect(1)
            .mount(&server)
            .await;

        let mut app = app(&server, Route::Tasks);
        app.load_current_route().await;
        assert!(!app.tasks.list().records()[0].is_completed());

        app.handle_key(key(KeyCode::Char(' '))).await;
        assert!(app.tasks.list().records()[0].is_completed());
    }

    #[tokio::test]
    async fn new_company_form_posts_and_closes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/companies"))
            .and(body_json(json!({
                "name": "Acme Corp",
                "email": "contact@acme.com",
                "phone": "+1 (555) 123-4567",
                "website": null,
                "address": "123 Business Ave",
                "description": null
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(company_json("Acme Corp")))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/companies"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([company_json("Acme Corp")])))
            .expect(1)
            .mount(&server)
            .await;

        let mut app = app(&server, Route::Companies);
        app.handle_key(key(KeyCode::Char('n'))).await;
        assert!(app.is_form_open());

        for (i, value) in ["Acme Corp", "contact@acme.com", "+1 (555) 123-4567", "", "123 Business Ave"]
            .into_iter()
            .enumerate()
        {
            if i > 0 {
                app.handle_key(key(KeyCode::Down)).await;
            }
            if value.is_empty() {
                continue;
            }
            app.handle_key(key(KeyCode::Enter)).await;
            type_text(&mut app, value).await;
            app.handle_key(key(KeyCode::Enter)).await;
        }

        app.handle_key(key(KeyCode::Char('s'))).await;
        assert!(!app.is_form_open());
        assert_eq!(app.companies.list().records().len(), 1);
    }

    #[tokio::test]
    async fn overview_loads_every_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/companies"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([company_json("Acme Corp")])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/contacts"))
            .and(query_param("order", "first_name.asc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([contact_json(Some(COMPANY_ID))])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([task_json("pending")])))
            .expect(1)
            .mount(&server)
            .await;

        let mut app = app(&server, Route::Overview);
        app.load_current_route().await;
        assert_eq!(app.companies.list().records().len(), 1);
        assert_eq!(app.contacts.list().records()[0].company_name(), "Acme Corp");
        assert_eq!(app.tasks.list().records()[0].title, "Send proposal");
    }

    #[tokio::test]
    async fn confirmed_delete_removes_then_reloads() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/contacts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([contact_json(None)])))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/rest/v1/contacts"))
            .and(query_param("id", format!("eq.{CONTACT_ID}")))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/contacts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let mut app = app(&server, Route::Contacts);
        app.load_current_route().await;
        assert_eq!(app.contacts.list().records().len(), 1);

        app.handle_key(key(KeyCode::Char('d'))).await;
        app.handle_key(key(KeyCode::Char('y'))).await;
        assert!(app.contacts.list().records().is_empty());
    }

    #[tokio::test]
    async fn new_contact_form_posts_then_reloads() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/companies"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([company_json("Acme Corp")])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/contacts"))
            .and(body_json(json!({
                "first_name": "Jane",
                "last_name": "Smith",
                "email": "jane.smith@example.com",
                "phone": "+1 (555) 000-0001",
                "company_id": COMPANY_ID,
                "job_title": null
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(contact_json(Some(COMPANY_ID))))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/contacts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([contact_json(Some(COMPANY_ID))])))
            .expect(1)
            .mount(&server)
            .await;

        let mut app = app(&server, Route::Contacts);
        app.handle_key(key(KeyCode::Char('n'))).await;
        assert!(app.is_form_open());

        for (i, value) in ["Jane", "Smith", "jane.smith@example.com", "+1 (555) 000-0001"]
            .into_iter()
            .enumerate()
        {
            if i > 0 {
                app.handle_key(key(KeyCode::Down)).await;
            }
            app.handle_key(key(KeyCode::Enter)).await;
            type_text(&mut app, value).await;
            app.handle_key(key(KeyCode::Enter)).await;
        }
        app.handle_key(key(KeyCode::Down)).await;
        app.handle_key(key(KeyCode::Right)).await;

        app.handle_key(key(KeyCode::Char('s'))).await;
        assert!(!app.is_form_open());
        assert_eq!(app.contacts.list().records()[0].full_name(), "Jane Smith");
    }

    #[tokio::test]
    async fn edited_contact_patches_then_reloads() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/companies"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([company_json("Acme Corp")])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/contacts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([contact_json(Some(COMPANY_ID))])))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/rest/v1/contacts"))
            .and(query_param("id", format!("eq.{CONTACT_ID}")))
            .and(body_partial_json(json!({ "first_name": "Jane", "company_id": null })))
            .respond_with(ResponseTemplate::new(200).set_body_json(contact_json(None)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/contacts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([contact_json(None)])))
            .expect(1)
            .mount(&server)
            .await;

        let mut app = app(&server, Route::Contacts);
        app.load_current_route().await;

        app.handle_key(key(KeyCode::Char('e'))).await;
        for _ in 0..4 {
            app.handle_key(key(KeyCode::Down)).await;
        }
        app.handle_key(key(KeyCode::Left)).await;
        app.handle_key(key(KeyCode::Char('s'))).await;

        assert!(!app.is_form_open());
        assert_eq!(app.contacts.list().records()[0].company_id, None);
    }

    #[tokio::test]
    async fn contact_edit_keeps_its_company_when_companies_fail_to_load() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/companies"))
            .respond_with(unavailable())
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/contacts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([contact_json(Some(COMPANY_ID))])))
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/rest/v1/contacts"))
            .and(query_param("id", format!("eq.{CONTACT_ID}")))
            .and(body_partial_json(json!({ "company_id": COMPANY_ID })))
            .respond_with(ResponseTemplate::new(200).set_body_json(contact_json(Some(COMPANY_ID))))
            .expect(1)
            .mount(&server)
            .await;

        let mut app = app(&server, Route::Contacts);
        app.load_current_route().await;

        app.handle_key(key(KeyCode::Char('e'))).await;
        assert!(app.is_form_open());
        app.handle_key(key(KeyCode::Char('s'))).await;
        assert!(!app.is_form_open());
    }

    #[tokio::test]
    async fn new_task_form_posts_then_reloads() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/contacts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([contact_json(None)])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/tasks"))
            .and(body_json(json!({
                "title": "Send proposal",
                "description": null,
                "status": "pending",
                "priority": "medium",
                "due_date": null,
                "contact_id": null
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(task_json("pending")))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([task_json("pending")])))
            .expect(1)
            .mount(&server)
            .await;

        let mut app = app(&server, Route::Tasks);
        app.handle_key(key(KeyCode::Char('n'))).await;
        assert!(app.is_form_open());

        app.handle_key(key(KeyCode::Enter)).await;
        type_text(&mut app, "Send proposal").await;
        app.handle_key(key(KeyCode::Enter)).await;
        app.handle_key(key(KeyCode::Char('s'))).await;

        assert!(!app.is_form_open());
        assert_eq!(app.tasks.list().records().len(), 1);
    }

    #[tokio::test]
    async fn task_edit_keeps_its_assignee_when_contacts_fail_to_load() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/contacts"))
            .respond_with(unavailable())
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([assigned_task_json()])))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/rest/v1/tasks"))
            .and(query_param("id", format!("eq.{TASK_ID}")))
            .and(body_json(json!({
                "title": "Send proposal",
                "description": null,
                "status": "pending",
                "priority": "high",
                "due_date": "2026-11-02",
                "contact_id": CONTACT_ID
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(assigned_task_json()))
            .expect(1)
            .mount(&server)
            .await;

        let mut app = app(&server, Route::Tasks);
        app.load_current_route().await;

        app.handle_key(key(KeyCode::Char('e'))).await;
        assert!(app.is_form_open());
        app.handle_key(key(KeyCode::Char('s'))).await;
        assert!(!app.is_form_open());
    }

    #[tokio::test]
    async fn invalid_form_sends_nothing() {
        let server = MockServer::start().await;
        let mut app = app(&server, Route::Companies);

        app.handle_key(key(KeyCode::Char('n'))).await;
        app.handle_key(key(KeyCode::Char('s'))).await;
        assert!(app.is_form_open());

        app.handle_key(key(KeyCode::Esc)).await;
        assert!(!app.is_form_open());
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn shell_keys() {
        let server = MockServer::start().await;
        let mut app = app(&server, Route::Settings);

        app.handle_key(key(KeyCode::Char('t'))).await;
        assert_eq!(app.theme(), Theme::Dark);

        app.handle_key(key(KeyCode::Tab)).await;
        assert_eq!(app.route(), &Route::Overview);

        app.handle_key(key(KeyCode::Right)).await;
        assert_eq!(app.pane, Pane::Contacts);

        app.handle_key(key(KeyCode::Char('3'))).await;
        assert_eq!(app.route(), &Route::Tasks);

        app.handle_key(key(KeyCode::Char('q'))).await;
        assert!(app.should_quit());
    }

    #[tokio::test]
    async fn search_text_is_not_a_shortcut() {
        let server = MockServer::start().await;
        let mut app = app(&server, Route::Contacts);

        app.handle_key(key(KeyCode::Char('/'))).await;
        type_text(&mut app, "q1t").await;
        assert!(!app.should_quit());
        assert_eq!(app.route(), &Route::Contacts);
        assert_eq!(app.theme(), Theme::Light);
    }

    #[tokio::test]
    async fn ctrl_c_quits_from_a_form() {
        let server = MockServer::start().await;
        let mut app = app(&server, Route::Companies);
        app.handle_key(key(KeyCode::Char('n'))).await;

        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)).await;
        assert!(app.should_quit());
    }

    #[test]
    fn unknown_paths_render_not_found_help() {
        let db = Database::from_rest(RestClient::new("http://localhost:54321", "anon").unwrap());
        let app = App::new(db, Route::from_path("/reports"));
        assert_eq!(app.route(), &Route::NotFound("/reports".to_string()));
        assert_eq!(app.help_text(), "Tab Section | t Theme | q Quit");
    }
}
