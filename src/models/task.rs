use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("unknown {kind} `{value}`")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [Self::Pending, Self::InProgress, Self::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }

    /// The status the completion checkbox flips to.
    pub fn toggled(self) -> Self {
        match self {
            Self::Completed => Self::Pending,
            Self::Pending | Self::InProgress => Self::Completed,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Pending => Self::InProgress,
            Self::InProgress => Self::Completed,
            Self::Completed => Self::Pending,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Self::Pending => Self::Completed,
            Self::InProgress => Self::Pending,
            Self::Completed => Self::InProgress,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "task status",
                value: s.to_string(),
            })
    }
}

impl TryFrom<String> for TaskStatus {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High => Self::Low,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Self::Low => Self::High,
            Self::Medium => Self::Low,
            Self::High => Self::Medium,
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|priority| priority.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "task priority",
                value: s.to_string(),
            })
    }
}

impl TryFrom<String> for TaskPriority {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// The embedded `contacts(first_name, last_name)` column of a task listing.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ContactName {
    pub first_name: String,
    pub last_name: String,
}

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: TaskStatus,
    #[sqlx(try_from = "String")]
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDate>,
    pub contact_id: Option<Uuid>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(rename = "contacts", default, skip_serializing)]
    #[sqlx(skip)]
    pub contact: Option<ContactName>,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    pub fn assignee_name(&self) -> String {
        match &self.contact {
            Some(contact) => format!("{} {}", contact.first_name, contact.last_name),
            None => "Unassigned".to_string(),
        }
    }
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDate>,
    pub contact_id: Option<Uuid>,
}

/// Partial update. `None` leaves a column untouched, `Some(None)` clears it.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_id: Option<Option<Uuid>>,
}

impl TaskPatch {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<NewTask> for TaskPatch {
    fn from(task: NewTask) -> Self {
        Self {
            title: Some(task.title),
            description: Some(task.description),
            status: Some(task.status),
            priority: Some(task.priority),
            due_date: Some(task.due_date),
            contact_id: Some(task.contact_id),
        }
    }
}

impl From<&Task> for NewTask {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            priority: task.priority,
            due_date: task.due_date,
            contact_id: task.contact_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_uses_kebab_case_on_the_wire() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
        assert_eq!("in-progress".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
        assert!("done".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn completion_toggle() {
        assert_eq!(TaskStatus::Pending.toggled(), TaskStatus::Completed);
        assert_eq!(TaskStatus::InProgress.toggled(), TaskStatus::Completed);
        assert_eq!(TaskStatus::Completed.toggled(), TaskStatus::Pending);
    }

    #[test]
    fn task_listing_decodes_embedded_contact() {
        let json = r#"{
            "id": "6f1c1d1e-8f43-4b55-9a55-2f1f4bd1c0a1",
            "title": "Call back",
            "description": null,
            "status": "pending",
            "priority": "high",
            "due_date": "2024-03-01",
            "contact_id": "0b3a8c7e-1d35-4d2e-9d57-53c1e7a0f6d2",
            "created_at": "2024-02-01T10:00:00+00:00",
            "updated_at": null,
            "contacts": { "first_name": "Jane", "last_name": "Smith" }
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.priority, TaskPriority::High);
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(task.assignee_name(), "Jane Smith");
    }

    #[test]
    fn unassigned_task() {
        let json = r#"{
            "id": "6f1c1d1e-8f43-4b55-9a55-2f1f4bd1c0a1",
            "title": "Write proposal",
            "status": "completed",
            "priority": "low",
            "contacts": null
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert!(task.is_completed());
        assert_eq!(task.assignee_name(), "Unassigned");
    }

    #[test]
    fn patch_only_serializes_present_columns() {
        let patch = TaskPatch::status(TaskStatus::Completed);
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "completed" }));

        let clear = TaskPatch {
            contact_id: Some(None),
            ..TaskPatch::default()
        };
        let json = serde_json::to_value(&clear).unwrap();
        assert_eq!(json, serde_json::json!({ "contact_id": null }));
    }
}
