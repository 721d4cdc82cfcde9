use crossterm::event::KeyCode;
use tui::{backend::Backend, Frame};
use uuid::Uuid;

use crate::models::{Company, NewCompany};
use crate::ui::components::form::{edit_text, optional, render_form, FieldView};
use crate::ui::theme::Theme;
use crate::validation::{validate_company, ValidationErrors};

pub enum CompanyFormAction {
    Cancel,
    /// `id` is set when editing an existing company
    Save { id: Option<Uuid>, company: NewCompany },
}

#[derive(Clone, PartialEq, Copy, Debug)]
pub enum CompanyField {
    Name,
    Email,
    Phone,
    Website,
    Address,
    Description,
}

impl CompanyField {
    const ALL: [CompanyField; 6] = [
        CompanyField::Name,
        CompanyField::Email,
        CompanyField::Phone,
        CompanyField::Website,
        CompanyField::Address,
        CompanyField::Description,
    ];

    fn key(self) -> &'static str {
        match self {
            CompanyField::Name => "name",
            CompanyField::Email => "email",
            CompanyField::Phone => "phone",
            CompanyField::Website => "website",
            CompanyField::Address => "address",
            CompanyField::Description => "description",
        }
    }

    fn label(self) -> &'static str {
        match self {
            CompanyField::Name => "Company Name",
            CompanyField::Email => "Email",
            CompanyField::Phone => "Phone",
            CompanyField::Website => "Website",
            CompanyField::Address => "Address",
            CompanyField::Description => "Description",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }
}

#[derive(Default, Clone, Debug, PartialEq)]
struct CompanyInput {
    name: String,
    email: String,
    phone: String,
    website: String,
    address: String,
    description: String,
}

impl From<&NewCompany> for CompanyInput {
    fn from(company: &NewCompany) -> Self {
        Self {
            name: company.name.clone(),
            email: company.email.clone(),
            phone: company.phone.clone(),
            website: company.website.clone().unwrap_or_default(),
            address: company.address.clone(),
            description: company.description.clone().unwrap_or_default(),
        }
    }
}

pub struct CompanyFormState {
    id: Option<Uuid>,
    initial: CompanyInput,
    input: CompanyInput,
    pub current_field: CompanyField,
    pub editing: bool,
    errors: ValidationErrors,
}

impl CompanyFormState {
    pub fn new() -> Self {
        Self {
            id: None,
            initial: CompanyInput::default(),
            input: CompanyInput::default(),
            current_field: CompanyField::Name,
            editing: false,
            errors: ValidationErrors::default(),
        }
    }

    pub fn from_existing(company: &Company) -> Self {
        let input = CompanyInput::from(&NewCompany::from(company));
        Self {
            id: Some(company.id),
            initial: input.clone(),
            input,
            current_field: CompanyField::Name,
            editing: false,
            errors: ValidationErrors::default(),
        }
    }

    pub fn is_edit(&self) -> bool {
        self.id.is_some()
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// The form contents as the draft that would be submitted
    pub fn draft(&self) -> NewCompany {
        NewCompany {
            name: self.input.name.clone(),
            email: self.input.email.clone(),
            phone: self.input.phone.clone(),
            website: optional(&self.input.website),
            address: self.input.address.clone(),
            description: optional(&self.input.description),
        }
    }

    pub fn reset(&mut self) {
        self.input = self.initial.clone();
        self.errors = ValidationErrors::default();
        self.editing = false;
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
    }

    pub fn next_field(&mut self) {
        let i = (self.current_field.index() + 1) % CompanyField::ALL.len();
        self.current_field = CompanyField::ALL[i];
    }

    pub fn previous_field(&mut self) {
        let len = CompanyField::ALL.len();
        let i = (self.current_field.index() + len - 1) % len;
        self.current_field = CompanyField::ALL[i];
    }

    fn current_value_mut(&mut self) -> &mut String {
        match self.current_field {
            CompanyField::Name => &mut self.input.name,
            CompanyField::Email => &mut self.input.email,
            CompanyField::Phone => &mut self.input.phone,
            CompanyField::Website => &mut self.input.website,
            CompanyField::Address => &mut self.input.address,
            CompanyField::Description => &mut self.input.description,
        }
    }

    fn value(&self, field: CompanyField) -> &str {
        match field {
            CompanyField::Name => &self.input.name,
            CompanyField::Email => &self.input.email,
            CompanyField::Phone => &self.input.phone,
            CompanyField::Website => &self.input.website,
            CompanyField::Address => &self.input.address,
            CompanyField::Description => &self.input.description,
        }
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }
        edit_text(self.current_value_mut(), key);
    }

    /// Validate and hand back the draft, or keep the form open with messages
    pub fn submit(&mut self) -> Option<CompanyFormAction> {
        let company = self.draft();
        match validate_company(&company) {
            Ok(()) => {
                self.errors = ValidationErrors::default();
                Some(CompanyFormAction::Save { id: self.id, company })
            }
            Err(errors) => {
                tracing::debug!(errors = errors.len(), "company form rejected");
                self.errors = errors;
                None
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyCode) -> Option<CompanyFormAction> {
        if self.editing {
            match key {
                KeyCode::Enter | KeyCode::Esc => self.toggle_editing(),
                other => self.edit_current_field(other),
            }
            return None;
        }

        match key {
            KeyCode::Esc => return Some(CompanyFormAction::Cancel),
            KeyCode::Enter => self.toggle_editing(),
            KeyCode::Up => self.previous_field(),
            KeyCode::Down | KeyCode::Tab => self.next_field(),
            KeyCode::Char('s') => return self.submit(),
            KeyCode::Char('r') => self.reset(),
            _ => {}
        }

        None
    }
}

pub fn render_company_form<B: Backend>(frame: &mut Frame<B>, state: &CompanyFormState, theme: Theme) {
    let title = if state.is_edit() { "Edit Company" } else { "Add New Company" };

    let fields: Vec<FieldView> = CompanyField::ALL
        .iter()
        .map(|field| FieldView::text(field.label(), state.value(*field), state.errors().get(field.key())))
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

    fn type_into(state: &mut CompanyFormState, text: &str) {
        state.handle_key(KeyCode::Enter);
        for c in text.chars() {
            state.handle_key(KeyCode::Char(c));
        }
        state.handle_key(KeyCode::Enter);
    }

    fn fill_valid(state: &mut CompanyFormState) {
        type_into(state, "Acme Corporation");
        state.handle_key(KeyCode::Down);
        type_into(state, "contact@acme.com");
        state.handle_key(KeyCode::Down);
        type_into(state, "+1 (555) 123-4567");
        state.handle_key(KeyCode::Down);
        state.handle_key(KeyCode::Down);
        type_into(state, "123 Business Ave");
    }

    #[test]
    fn new_form_saves_a_draft_without_id() {
        let mut state = CompanyFormState::new();
        fill_valid(&mut state);

        match state.handle_key(KeyCode::Char('s')) {
            Some(CompanyFormAction::Save { id, company }) => {
                assert_eq!(id, None);
                assert_eq!(company.name, "Acme Corporation");
                assert_eq!(company.website, None);
                assert_eq!(company.description, None);
            }
            _ => panic!("expected save"),
        }
    }

    #[test]
    fn invalid_form_reports_errors_and_stays_open() {
        let mut state = CompanyFormState::new();
        type_into(&mut state, "A");

        assert!(state.handle_key(KeyCode::Char('s')).is_none());
        assert_eq!(
            state.errors().get("name"),
            Some("Company name must be at least 2 characters")
        );
        assert!(state.errors().get("email").is_some());
    }

    #[test]
    fn typing_s_while_editing_is_text() {
        let mut state = CompanyFormState::new();
        type_into(&mut state, "ss");
        assert_eq!(state.draft().name, "ss");
    }

    #[test]
    fn edit_form_keeps_the_id_and_resets_to_initial() {
        let company = Company {
            id: Uuid::from_u128(7),
            name: "Globex".to_string(),
            email: "info@globex.com".to_string(),
            phone: "+1 (555) 987-6543".to_string(),
            website: Some("www.globex.com".to_string()),
            address: "456 Enterprise St".to_string(),
            description: None,
            created_at: None,
            updated_at: None,
        };
        let mut state = CompanyFormState::from_existing(&company);
        assert!(state.is_edit());

        type_into(&mut state, " Corp");
        assert_eq!(state.draft().name, "Globex Corp");
        state.handle_key(KeyCode::Char('r'));
        assert_eq!(state.draft(), NewCompany::from(&company));

        match state.handle_key(KeyCode::Char('s')) {
            Some(CompanyFormAction::Save { id, .. }) => assert_eq!(id, Some(company.id)),
            _ => panic!("expected save"),
        }
    }

    #[test]
    fn escape_cancels() {
        let mut state = CompanyFormState::new();
        assert!(matches!(state.handle_key(KeyCode::Esc), Some(CompanyFormAction::Cancel)));
    }

    #[test]
    fn field_navigation_wraps() {
        let mut state = CompanyFormState::new();
        state.previous_field();
        assert_eq!(state.current_field, CompanyField::Description);
        state.next_field();
        assert_eq!(state.current_field, CompanyField::Name);
    }
}
