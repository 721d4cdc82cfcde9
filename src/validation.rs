use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::models::{NewCompany, NewContact, NewTask};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .expect("email pattern compiles")
});

/// First failing rule per form field
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ValidationErrors {
    errors: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
    fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.entry(field).or_insert_with(|| message.into());
    }

    fn check(&mut self, field: &'static str, ok: bool, message: &str) {
        if !ok {
            self.add(field, message);
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

fn min_len(value: &str, min: usize) -> bool {
    value.chars().count() >= min
}

pub fn is_email(value: &str) -> bool {
    !value.starts_with('.') && !value.contains("..") && EMAIL.is_match(value)
}

/// Accepts absolute URLs and bare hosts such as `www.acme.com`.
pub fn is_url(value: &str) -> bool {
    match Url::parse(value) {
        Ok(url) => url.has_host() || url.scheme() == "mailto",
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            !value.contains(char::is_whitespace)
                && value.contains('.')
                && Url::parse(&format!("https://{value}")).is_ok_and(|url| url.has_host())
        }
        Err(_) => false,
    }
}

pub fn validate_company(company: &NewCompany) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    errors.check(
        "name",
        min_len(&company.name, 2),
        "Company name must be at least 2 characters",
    );
    errors.check("email", is_email(&company.email), "Invalid email address");
    errors.check(
        "phone",
        min_len(&company.phone, 10),
        "Phone number must be at least 10 digits",
    );
    if let Some(website) = company.website.as_deref().filter(|w| !w.is_empty()) {
        errors.check("website", is_url(website), "Invalid website URL");
    }
    errors.check(
        "address",
        min_len(&company.address, 5),
        "Address must be at least 5 characters",
    );
    errors.into_result()
}

pub fn validate_contact(contact: &NewContact) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    errors.check(
        "first_name",
        min_len(&contact.first_name, 2),
        "First name must be at least 2 characters",
    );
    errors.check(
        "last_name",
        min_len(&contact.last_name, 2),
        "Last name must be at least 2 characters",
    );
    errors.check("email", is_email(&contact.email), "Invalid email address");
    errors.check(
        "phone",
        min_len(&contact.phone, 10),
        "Phone number must be at least 10 digits",
    );
    errors.into_result()
}

pub fn validate_task(task: &NewTask) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    errors.check("title", !task.title.trim().is_empty(), "Task title is required");
    errors.into_result()
}
