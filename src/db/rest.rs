use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;
use uuid::Uuid;

use super::error::{DbError, DbResult};

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
const RETURN_REPRESENTATION: &str = "return=representation";
/// Error code the table API uses when a single-object request matched no row.
const NO_ROWS_CODE: &str = "PGRST116";

/// Generic table API client for the hosted data service
#[derive(Clone, Debug)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: Url,
}

impl RestClient {
    /// Create a client for `{base_url}/rest/v1/` authenticating with `api_key`
    pub fn new(base_url: &str, api_key: &str) -> DbResult<Self> {
        let mut base = Url::parse(base_url)
            .map_err(|e| DbError::Config(format!("invalid service URL `{base_url}`: {e}")))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let base_url = base
            .join("rest/v1/")
            .map_err(|e| DbError::Config(format!("invalid service URL `{base_url}`: {e}")))?;

        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(api_key)
            .map_err(|_| DbError::Config("API key is not a valid header value".to_string()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| DbError::Config("API key is not a valid header value".to_string()))?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn request(&self, method: Method, table: &str) -> DbResult<RequestBuilder> {
        let url = self
            .base_url
            .join(table)
            .map_err(|e| DbError::Config(format!("invalid table name `{table}`: {e}")))?;
        Ok(self.http.request(method, url))
    }

    /// `select <columns> from <table> order by <order> asc`
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        columns: &str,
        order: &str,
    ) -> DbResult<Vec<T>> {
        tracing::debug!(table, columns, order, "select");
        let response = self
            .request(Method::GET, table)?
            .query(&[("select", columns.to_string()), ("order", format!("{order}.asc"))])
            .send()
            .await?;

        read_json(response).await
    }

    /// Insert one row and return it as stored
    pub async fn insert<B, T>(&self, table: &str, body: &B) -> DbResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!(table, "insert");
        let response = self
            .request(Method::POST, table)?
            .header("Prefer", RETURN_REPRESENTATION)
            .header(ACCEPT, SINGLE_OBJECT)
            .json(body)
            .send()
            .await?;

        read_json(response).await
    }

    /// Update the row with `id` and return it as stored
    pub async fn update<B, T>(&self, table: &'static str, id: Uuid, body: &B) -> DbResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!(table, %id, "update");
        let response = self
            .request(Method::PATCH, table)?
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", RETURN_REPRESENTATION)
            .header(ACCEPT, SINGLE_OBJECT)
            .json(body)
            .send()
            .await?;

        read_json(response).await.map_err(|err| match err {
            DbError::Remote { code: Some(code), .. } if code == NO_ROWS_CODE => DbError::NotFound {
                table,
                id: id.to_string(),
            },
            other => other,
        })
    }

    /// Delete the row with `id`
    pub async fn delete(&self, table: &str, id: Uuid) -> DbResult<()> {
        tracing::debug!(table, %id, "delete");
        let response = self
            .request(Method::DELETE, table)?
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(DbError::from_response_body(status, &body));
        }

        Ok(())
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> DbResult<T> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(DbError::from_response_body(status, &body));
    }

    Ok(serde_json::from_str(&body)?)
}
