use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Result type alias for data-access operations
pub type DbResult<T> = std::result::Result<T, DbError>;

/// Errors surfaced by the data-access layer
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DbError {
    /// Transport failure talking to the hosted service
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Failure on the direct Postgres connection
    #[error("database error: {0}")]
    Sql(#[from] sqlx::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The service answered with an error document
    #[error("{status}: {message} (code {})", .code.as_deref().unwrap_or("none"))]
    Remote {
        status: StatusCode,
        code: Option<String>,
        message: String,
        details: Option<String>,
        hint: Option<String>,
    },

    #[error("no row in `{table}` with id {id}")]
    NotFound { table: &'static str, id: String },

    #[error("configuration error: {0}")]
    Config(String),
}

/// Error body returned by the table API.
#[derive(Debug, Deserialize)]
pub(crate) struct RemoteErrorBody {
    pub code: Option<String>,
    pub message: Option<String>,
    pub details: Option<String>,
    pub hint: Option<String>,
}

impl DbError {
    pub(crate) fn from_response_body(status: StatusCode, body: &str) -> Self {
        match serde_json::from_str::<RemoteErrorBody>(body) {
            Ok(err) => DbError::Remote {
                status,
                code: err.code,
                message: err.message.unwrap_or_else(|| body.to_string()),
                details: err.details,
                hint: err.hint,
            },
            Err(_) => DbError::Remote {
                status,
                code: None,
                message: body.to_string(),
                details: None,
                hint: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_service_error_document() {
        let body = r#"{"code":"23505","message":"duplicate key value violates unique constraint","details":null,"hint":null}"#;
        let err = DbError::from_response_body(StatusCode::CONFLICT, body);
        match &err {
            DbError::Remote { status, code, message, .. } => {
                assert_eq!(*status, StatusCode::CONFLICT);
                assert_eq!(code.as_deref(), Some("23505"));
                assert!(message.starts_with("duplicate key"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("(code 23505)"));
    }

    #[test]
    fn falls_back_to_raw_body() {
        let err = DbError::from_response_body(StatusCode::BAD_GATEWAY, "upstream unavailable");
        match err {
            DbError::Remote { code, message, .. } => {
                assert!(code.is_none());
                assert_eq!(message, "upstream unavailable");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
