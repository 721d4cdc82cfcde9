use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The embedded `companies(name)` column of a contact listing.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CompanyName {
    pub name: String,
}

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Contact {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub company_id: Option<Uuid>,
    pub job_title: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(rename = "companies", default, skip_serializing)]
    #[sqlx(skip)]
    pub company: Option<CompanyName>,
}

impl Contact {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn company_name(&self) -> &str {
        self.company.as_ref().map(|c| c.name.as_str()).unwrap_or("")
    }
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct NewContact {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub company_id: Option<Uuid>,
    pub job_title: Option<String>,
}

/// Partial update. `None` leaves a column untouched, `Some(None)` clears it.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct ContactPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<Option<Uuid>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<Option<String>>,
}

impl ContactPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<NewContact> for ContactPatch {
    fn from(contact: NewContact) -> Self {
        Self {
            first_name: Some(contact.first_name),
            last_name: Some(contact.last_name),
            email: Some(contact.email),
            phone: Some(contact.phone),
            company_id: Some(contact.company_id),
            job_title: Some(contact.job_title),
        }
    }
}

impl From<&Contact> for NewContact {
    fn from(contact: &Contact) -> Self {
        Self {
            first_name: contact.first_name.clone(),
            last_name: contact.last_name.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            company_id: contact.company_id,
            job_title: contact.job_title.clone(),
        }
    }
}
