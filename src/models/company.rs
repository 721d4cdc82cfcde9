use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub website: Option<String>,
    pub address: String,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A company as submitted by the create form; the service assigns the rest.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct NewCompany {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub website: Option<String>,
    pub address: String,
    pub description: Option<String>,
}

/// Partial update. `None` leaves a column untouched, `Some(None)` clears it.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct CompanyPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
}

impl CompanyPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<NewCompany> for CompanyPatch {
    fn from(company: NewCompany) -> Self {
        Self {
            name: Some(company.name),
            email: Some(company.email),
            phone: Some(company.phone),
            website: Some(company.website),
            address: Some(company.address),
            description: Some(company.description),
        }
    }
}

impl From<&Company> for NewCompany {
    fn from(company: &Company) -> Self {
        Self {
            name: company.name.clone(),
            email: company.email.clone(),
            phone: company.phone.clone(),
            website: company.website.clone(),
            address: company.address.clone(),
            description: company.description.clone(),
        }
    }
}
