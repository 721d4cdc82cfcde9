use crossterm::event::KeyCode;
use tui::{backend::Backend, Frame};
use uuid::Uuid;

use crate::models::{Company, Contact, NewContact};
use crate::ui::components::choice::ChoiceState;
use crate::ui::components::form::{edit_text, optional, render_form, FieldView};
use crate::ui::theme::Theme;
use crate::validation::{validate_contact, ValidationErrors};

pub enum ContactFormAction {
    Cancel,
    Save { id: Option<Uuid>, contact: NewContact },
}

#[derive(Clone, PartialEq, Copy, Debug)]
pub enum ContactField {
    FirstName,
    LastName,
    Email,
    Phone,
    Company,
    JobTitle,
}

impl ContactField {
    const ALL: [ContactField; 6] = [
        ContactField::FirstName,
        ContactField::LastName,
        ContactField::Email,
        ContactField::Phone,
        ContactField::Company,
        ContactField::JobTitle,
    ];

    fn key(self) -> &'static str {
        match self {
            ContactField::FirstName => "first_name",
            ContactField::LastName => "last_name",
            ContactField::Email => "email",
            ContactField::Phone => "phone",
            ContactField::Company => "company_id",
            ContactField::JobTitle => "job_title",
        }
    }

    fn label(self) -> &'static str {
        match self {
            ContactField::FirstName => "First Name",
            ContactField::LastName => "Last Name",
            ContactField::Email => "Email",
            ContactField::Phone => "Phone",
            ContactField::Company => "Company",
            ContactField::JobTitle => "Job Title",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }
}

pub fn company_choices(companies: &[Company]) -> Vec<(Uuid, String)> {
    companies.iter().map(|c| (c.id, c.name.clone())).collect()
}

pub struct ContactFormState {
    id: Option<Uuid>,
    initial: NewContact,
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
    company: ChoiceState,
    job_title: String,
    pub current_field: ContactField,
    pub editing: bool,
    errors: ValidationErrors,
}

impl ContactFormState {
    pub fn new(companies: Vec<(Uuid, String)>) -> Self {
        Self::with_values(None, NewContact::default(), companies)
    }

    pub fn from_existing(contact: &Contact, companies: Vec<(Uuid, String)>) -> Self {
        let mut state = Self::with_values(Some(contact.id), NewContact::from(contact), companies);
        if let Some(company_id) = contact.company_id {
            let label = match contact.company_name() {
                "" => "Unknown company",
                name => name,
            };
            state.company.keep_option(company_id, label);
            state.company.select_id(Some(company_id));
        }
        state
    }

    fn with_values(id: Option<Uuid>, initial: NewContact, companies: Vec<(Uuid, String)>) -> Self {
        let mut state = Self {
            id,
            initial,
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            company: ChoiceState::new(companies, "No company"),
            job_title: String::new(),
            current_field: ContactField::FirstName,
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

    pub fn draft(&self) -> NewContact {
        NewContact {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            company_id: self.company.selected_id(),
            job_title: optional(&self.job_title),
        }
    }

    pub fn reset(&mut self) {
        self.first_name = self.initial.first_name.clone();
        self.last_name = self.initial.last_name.clone();
        self.email = self.initial.email.clone();
        self.phone = self.initial.phone.clone();
        self.company.select_id(self.initial.company_id);
        self.job_title = self.initial.job_title.clone().unwrap_or_default();
        self.errors = ValidationErrors::default();
        self.editing = false;
    }

    pub fn next_field(&mut self) {
        let i = (self.current_field.index() + 1) % ContactField::ALL.len();
        self.current_field = ContactField::ALL[i];
    }

    pub fn previous_field(&mut self) {
        let len = ContactField::ALL.len();
        let i = (self.current_field.index() + len - 1) % len;
        self.current_field = ContactField::ALL[i];
    }

    fn text_field_mut(&mut self) -> Option<&mut String> {
        match self.current_field {
            ContactField::FirstName => Some(&mut self.first_name),
            ContactField::LastName => Some(&mut self.last_name),
            ContactField::Email => Some(&mut self.email),
            ContactField::Phone => Some(&mut self.phone),
            ContactField::JobTitle => Some(&mut self.job_title),
            ContactField::Company => None,
        }
    }

    pub fn submit(&mut self) -> Option<ContactFormAction> {
        let contact = self.draft();
        match validate_contact(&contact) {
            Ok(()) => {
                self.errors = ValidationErrors::default();
                Some(ContactFormAction::Save { id: self.id, contact })
            }
            Err(errors) => {
                tracing::debug!(errors = errors.len(), "contact form rejected");
                self.errors = errors;
                None
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyCode) -> Option<ContactFormAction> {
        if self.editing {
            match key {
                KeyCode::Enter | KeyCode::Esc => self.editing = false,
                other => {
                    if let Some(value) = self.text_field_mut() {
                        edit_text(value, other);
                    }
                }
            }
            return None;
        }

        match key {
            KeyCode::Esc => return Some(ContactFormAction::Cancel),
            KeyCode::Enter if self.current_field == ContactField::Company => self.company.next(),
            KeyCode::Enter => self.editing = true,
            KeyCode::Right if self.current_field == ContactField::Company => self.company.next(),
            KeyCode::Left if self.current_field == ContactField::Company => self.company.previous(),
            KeyCode::Up => self.previous_field(),
            KeyCode::Down | KeyCode::Tab => self.next_field(),
            KeyCode::Char('s') => return self.submit(),
            KeyCode::Char('r') => self.reset(),
            _ => {}
        }

        None
    }
}

pub fn render_contact_form<B: Backend>(frame: &mut Frame<B>, state: &ContactFormState, theme: Theme) {
    let title = if state.is_edit() { "Edit Contact" } else { "Add New Contact" };

    let fields: Vec<FieldView> = ContactField::ALL
        .iter()
        .map(|field| {
            let error = state.errors().get(field.key());
            match field {
                ContactField::FirstName => FieldView::text(field.label(), &state.first_name, error),
                ContactField::LastName => FieldView::text(field.label(), &state.last_name, error),
                ContactField::Email => FieldView::text(field.label(), &state.email, error),
                ContactField::Phone => FieldView::text(field.label(), &state.phone, error),
                ContactField::Company => FieldView::choice(field.label(), state.company.label(), error),
                ContactField::JobTitle => FieldView::text(field.label(), &state.job_title, error),
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
