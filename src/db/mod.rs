mod error;
mod postgres;
mod rest;

use anyhow::Result;
use uuid::Uuid;

use crate::config::{BackendKind, Config};
use crate::models::{
    Company, CompanyPatch, Contact, ContactPatch, NewCompany, NewContact, NewTask, Task, TaskPatch,
};

pub use error::DbResult;
pub use postgres::PgStore;
pub use rest::RestClient;

pub const COMPANIES: &str = "companies";
pub const CONTACTS: &str = "contacts";
pub const TASKS: &str = "tasks";

const COMPANY_COLUMNS: &str = "*";
const CONTACT_COLUMNS: &str = "*, companies(name)";
const TASK_COLUMNS: &str = "*, contacts(first_name, last_name)";

enum Backend {
    Rest(RestClient),
    Postgres(PgStore),
}

/// Typed access to the companies, contacts and tasks tables.
///
/// Every method is exactly one remote call; errors come back unchanged.
pub struct Database {
    backend: Backend,
}

impl Database {
    /// Connect to whichever backend the configuration selects
    pub async fn new(config: &Config) -> Result<Self> {
        let db = match config.backend {
            BackendKind::Rest => {
                let client = RestClient::new(config.supabase_url(), config.supabase_anon_key())?;
                tracing::debug!(url = %client.base_url(), "table API client ready");
                Self::from_rest(client)
            }
            BackendKind::Postgres => Self::from_postgres(PgStore::connect(config.database_url()).await?),
        };

        Ok(db)
    }

    pub fn from_rest(client: RestClient) -> Self {
        Self {
            backend: Backend::Rest(client),
        }
    }

    pub fn from_postgres(store: PgStore) -> Self {
        Self {
            backend: Backend::Postgres(store),
        }
    }

    // Company operations
    pub async fn get_companies(&self) -> DbResult<Vec<Company>> {
        match &self.backend {
            Backend::Rest(rest) => rest.select(COMPANIES, COMPANY_COLUMNS, "name").await,
            Backend::Postgres(pg) => pg.get_companies().await,
        }
    }

    pub async fn create_company(&self, company: &NewCompany) -> DbResult<Company> {
        match &self.backend {
            Backend::Rest(rest) => rest.insert(COMPANIES, company).await,
            Backend::Postgres(pg) => pg.create_company(company).await,
        }
    }

    pub async fn update_company(&self, id: Uuid, company: &CompanyPatch) -> DbResult<Company> {
        match &self.backend {
            Backend::Rest(rest) => rest.update(COMPANIES, id, company).await,
            Backend::Postgres(pg) => pg.update_company(id, company).await,
        }
    }

    pub async fn delete_company(&self, id: Uuid) -> DbResult<()> {
        match &self.backend {
            Backend::Rest(rest) => rest.delete(COMPANIES, id).await,
            Backend::Postgres(pg) => pg.delete_company(id).await,
        }
    }

    // Contact operations
    pub async fn get_contacts(&self) -> DbResult<Vec<Contact>> {
        match &self.backend {
            Backend::Rest(rest) => rest.select(CONTACTS, CONTACT_COLUMNS, "first_name").await,
            Backend::Postgres(pg) => pg.get_contacts().await,
        }
    }

    pub async fn create_contact(&self, contact: &NewContact) -> DbResult<Contact> {
        match &self.backend {
            Backend::Rest(rest) => rest.insert(CONTACTS, contact).await,
            Backend::Postgres(pg) => pg.create_contact(contact).await,
        }
    }

    pub async fn update_contact(&self, id: Uuid, contact: &ContactPatch) -> DbResult<Contact> {
        match &self.backend {
            Backend::Rest(rest) => rest.update(CONTACTS, id, contact).await,
            Backend::Postgres(pg) => pg.update_contact(id, contact).await,
        }
    }

    pub async fn delete_contact(&self, id: Uuid) -> DbResult<()> {
        match &self.backend {
            Backend::Rest(rest) => rest.delete(CONTACTS, id).await,
            Backend::Postgres(pg) => pg.delete_contact(id).await,
        }
    }

    // Task operations
    pub async fn get_tasks(&self) -> DbResult<Vec<Task>> {
        match &self.backend {
            Backend::Rest(rest) => rest.select(TASKS, TASK_COLUMNS, "due_date").await,
            Backend::Postgres(pg) => pg.get_tasks().await,
        }
    }

    pub async fn create_task(&self, task: &NewTask) -> DbResult<Task> {
        match &self.backend {
            Backend::Rest(rest) => rest.insert(TASKS, task).await,
            Backend::Postgres(pg) => pg.create_task(task).await,
        }
    }

    pub async fn update_task(&self, id: Uuid, task: &TaskPatch) -> DbResult<Task> {
        match &self.backend {
            Backend::Rest(rest) => rest.update(TASKS, id, task).await,
            Backend::Postgres(pg) => pg.update_task(id, task).await,
        }
    }

    pub async fn delete_task(&self, id: Uuid) -> DbResult<()> {
        match &self.backend {
            Backend::Rest(rest) => rest.delete(TASKS, id).await,
            Backend::Postgres(pg) => pg.delete_task(id).await,
        }
    }
}

/// Validate the configuration and connect to the selected backend
pub async fn init(config: &Config) -> Result<Database> {
    config.validate()?;
    tracing::info!(backend = %config.backend, "connecting to data service");

    Database::new(config).await
}
