use sqlx::postgres::PgPoolOptions;
use sqlx::{Encode, PgPool, Postgres, QueryBuilder, Type};
use uuid::Uuid;

use super::error::{DbError, DbResult};
use super::{COMPANIES, CONTACTS, TASKS};
use crate::models::{
    Company, CompanyName, CompanyPatch, Contact, ContactName, ContactPatch, NewCompany, NewContact,
    NewTask, Task, TaskPatch,
};

/// Direct connection to the tables behind the hosted service
pub struct PgStore {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct ContactRow {
    #[sqlx(flatten)]
    contact: Contact,
    company_name: Option<String>,
}

impl From<ContactRow> for Contact {
    fn from(row: ContactRow) -> Self {
        let mut contact = row.contact;
        contact.company = row.company_name.map(|name| CompanyName { name });
        contact
    }
}

#[derive(sqlx::FromRow)]
struct TaskRow {
    #[sqlx(flatten)]
    task: Task,
    contact_first_name: Option<String>,
    contact_last_name: Option<String>,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        let mut task = row.task;
        if let (Some(first_name), Some(last_name)) = (row.contact_first_name, row.contact_last_name) {
            task.contact = Some(ContactName {
                first_name,
                last_name,
            });
        }
        task
    }
}

impl PgStore {
    /// Create a new store with a connection pool
    pub async fn connect(database_url: &str) -> DbResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool
    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }

    // Company operations
    pub async fn get_companies(&self) -> DbResult<Vec<Company>> {
        tracing::debug!(table = COMPANIES, "select");
        let companies = sqlx::query_as::<_, Company>("SELECT * FROM companies ORDER BY name ASC")
            .fetch_all(self.get_pool())
            .await?;

        Ok(companies)
    }

    pub async fn create_company(&self, company: &NewCompany) -> DbResult<Company> {
        tracing::debug!(table = COMPANIES, "insert");
        let company = sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (name, email, phone, website, address, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&company.name)
        .bind(&company.email)
        .bind(&company.phone)
        .bind(&company.website)
        .bind(&company.address)
        .bind(&company.description)
        .fetch_one(self.get_pool())
        .await?;

        Ok(company)
    }

    pub async fn update_company(&self, id: Uuid, patch: &CompanyPatch) -> DbResult<Company> {
        tracing::debug!(table = COMPANIES, %id, "update");
        let row = if patch.is_empty() {
            sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1")
                .bind(id)
                .fetch_optional(self.get_pool())
                .await?
        } else {
            let mut query = company_update(id, patch);
            query
                .build_query_as::<Company>()
                .fetch_optional(self.get_pool())
                .await?
        };

        row.ok_or_else(|| not_found(COMPANIES, id))
    }

    pub async fn delete_company(&self, id: Uuid) -> DbResult<()> {
        tracing::debug!(table = COMPANIES, %id, "delete");
        sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(self.get_pool())
            .await?;

        Ok(())
    }

    // Contact operations
    pub async fn get_contacts(&self) -> DbResult<Vec<Contact>> {
        tracing::debug!(table = CONTACTS, "select");
        let rows = sqlx::query_as::<_, ContactRow>(
            r#"
            SELECT ct.*, co.name AS company_name
            FROM contacts ct
            LEFT JOIN companies co ON co.id = ct.company_id
            ORDER BY ct.first_name ASC
            "#,
        )
        .fetch_all(self.get_pool())
        .await?;

        Ok(rows.into_iter().map(Contact::from).collect())
    }

    pub async fn create_contact(&self, contact: &NewContact) -> DbResult<Contact> {
        tracing::debug!(table = CONTACTS, "insert");
        let contact = sqlx::query_as::<_, Contact>(
            r#"
            INSERT INTO contacts (first_name, last_name, email, phone, company_id, job_title)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&contact.first_name)
        .bind(&contact.last_name)
        .bind(&contact.email)
        .bind(&contact.phone)
        .bind(contact.company_id)
        .bind(&contact.job_title)
        .fetch_one(self.get_pool())
        .await?;

        Ok(contact)
    }

    pub async fn update_contact(&self, id: Uuid, patch: &ContactPatch) -> DbResult<Contact> {
        tracing::debug!(table = CONTACTS, %id, "update");
        let row = if patch.is_empty() {
            sqlx::query_as::<_, Contact>("SELECT * FROM contacts WHERE id = $1")
                .bind(id)
                .fetch_optional(self.get_pool())
                .await?
        } else {
            let mut query = contact_update(id, patch);
            query
                .build_query_as::<Contact>()
                .fetch_optional(self.get_pool())
                .await?
        };

        row.ok_or_else(|| not_found(CONTACTS, id))
    }

    pub async fn delete_contact(&self, id: Uuid) -> DbResult<()> {
        tracing::debug!(table = CONTACTS, %id, "delete");
        sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(self.get_pool())
            .await?;

        Ok(())
    }

    // Task operations
    pub async fn get_tasks(&self) -> DbResult<Vec<Task>> {
        tracing::debug!(table = TASKS, "select");
        let rows = sqlx::query_as::<_, TaskRow>(
            r#"
            SELECT t.*,
                ct.first_name AS contact_first_name,
                ct.last_name AS contact_last_name
            FROM tasks t
            LEFT JOIN contacts ct ON ct.id = t.contact_id
            ORDER BY t.due_date ASC
            "#,
        )
        .fetch_all(self.get_pool())
        .await?;

        Ok(rows.into_iter().map(Task::from).collect())
    }

    pub async fn create_task(&self, task: &NewTask) -> DbResult<Task> {
        tracing::debug!(table = TASKS, "insert");
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, status, priority, due_date, contact_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.priority.as_str())
        .bind(task.due_date)
        .bind(task.contact_id)
        .fetch_one(self.get_pool())
        .await?;

        Ok(task)
    }

    pub async fn update_task(&self, id: Uuid, patch: &TaskPatch) -> DbResult<Task> {
        tracing::debug!(table = TASKS, %id, "update");
        let row = if patch.is_empty() {
            sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1")
                .bind(id)
                .fetch_optional(self.get_pool())
                .await?
        } else {
            let mut query = task_update(id, patch);
            query
                .build_query_as::<Task>()
                .fetch_optional(self.get_pool())
                .await?
        };

        row.ok_or_else(|| not_found(TASKS, id))
    }

    pub async fn delete_task(&self, id: Uuid) -> DbResult<()> {
        tracing::debug!(table = TASKS, %id, "delete");
        sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(self.get_pool())
            .await?;

        Ok(())
    }
}

fn not_found(table: &'static str, id: Uuid) -> DbError {
    DbError::NotFound {
        table,
        id: id.to_string(),
    }
}

/// Builds `UPDATE <table> SET a = $1, b = $2 ... WHERE id = $n RETURNING *`
struct UpdateBuilder<'args> {
    query: QueryBuilder<'args, Postgres>,
    columns: usize,
}

impl<'args> UpdateBuilder<'args> {
    fn new(table: &str) -> Self {
        Self {
            query: QueryBuilder::new(format!("UPDATE {table} SET ")),
            columns: 0,
        }
    }

    fn set<T>(&mut self, column: &str, value: Option<T>) -> &mut Self
    where
        T: 'args + Encode<'args, Postgres> + Send + Type<Postgres>,
    {
        if let Some(value) = value {
            if self.columns > 0 {
                self.query.push(", ");
            }
            self.query.push(column).push(" = ").push_bind(value);
            self.columns += 1;
        }
        self
    }

    fn finish(mut self, id: Uuid) -> QueryBuilder<'args, Postgres> {
        self.query
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING *");
        self.query
    }
}

fn company_update(id: Uuid, patch: &CompanyPatch) -> QueryBuilder<'static, Postgres> {
    let mut update = UpdateBuilder::new(COMPANIES);
    update
        .set("name", patch.name.clone())
        .set("email", patch.email.clone())
        .set("phone", patch.phone.clone())
        .set("website", patch.website.clone())
        .set("address", patch.address.clone())
        .set("description", patch.description.clone());
    update.finish(id)
}

fn contact_update(id: Uuid, patch: &ContactPatch) -> QueryBuilder<'static, Postgres> {
    let mut update = UpdateBuilder::new(CONTACTS);
    update
        .set("first_name", patch.first_name.clone())
        .set("last_name", patch.last_name.clone())
        .set("email", patch.email.clone())
        .set("phone", patch.phone.clone())
        .set("company_id", patch.company_id)
        .set("job_title", patch.job_title.clone());
    update.finish(id)
}

fn task_update(id: Uuid, patch: &TaskPatch) -> QueryBuilder<'static, Postgres> {
    let mut update = UpdateBuilder::new(TASKS);
    update
        .set("title", patch.title.clone())
        .set("description", patch.description.clone())
        .set("status", patch.status.map(|s| s.as_str()))
        .set("priority", patch.priority.map(|p| p.as_str()))
        .set("due_date", patch.due_date)
        .set("contact_id", patch.contact_id);
    update.finish(id)
}
