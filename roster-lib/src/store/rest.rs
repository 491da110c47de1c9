use async_trait::async_trait;
use reqwest::{
    Client, RequestBuilder, Response, StatusCode,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde::Deserialize;
use tracing::debug;

use crate::{
    Error, Result,
    config::StoreConfig,
    store::{RecordStore, StoreError, StoreResult},
    student::{Student, StudentId},
};

/// A [`RecordStore`] backed by a hosted table exposed through a PostgREST style HTTP API.
#[derive(Debug, Clone)]
pub struct RestStore {
    client: Client,
    headers: HeaderMap,
    table_url: String,
}

/// Error body returned by the API for failed requests.
#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

impl RestStore {
    pub fn new(cfg: &StoreConfig) -> Result<Self> {
        if cfg.url.trim().is_empty() {
            return Err(Error::MissingSetting("url"));
        }
        if cfg.api_key.trim().is_empty() {
            return Err(Error::MissingSetting("api_key"));
        }
        if cfg.table.trim().is_empty() {
            return Err(Error::MissingSetting("table"));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("apikey", HeaderValue::from_str(&cfg.api_key)?);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", cfg.api_key))?,
        );

        Ok(Self {
            client: Client::builder().build()?,
            headers,
            table_url: table_url(&cfg.url, &cfg.table),
        })
    }

    pub fn table_url(&self) -> &str {
        &self.table_url
    }

    // Requests

    fn list_request(&self) -> RequestBuilder {
        self.client
            .get(&self.table_url)
            .headers(self.headers.clone())
            .query(&[("select", "*")])
    }

    fn insert_request(&self, student: &Student) -> RequestBuilder {
        self.client
            .post(&self.table_url)
            .headers(self.headers.clone())
            .header("Prefer", "return=minimal")
            .json(&[student.without_id()])
    }

    fn update_request(&self, id: &StudentId, student: &Student) -> RequestBuilder {
        self.client
            .patch(&self.table_url)
            .headers(self.headers.clone())
            .query(&[id_filter(id)])
            .header("Prefer", "return=minimal")
            .json(student)
    }

    fn delete_request(&self, id: &StudentId) -> RequestBuilder {
        self.client
            .delete(&self.table_url)
            .headers(self.headers.clone())
            .query(&[id_filter(id)])
    }
}

#[async_trait]
impl RecordStore for RestStore {
    async fn list_all(&self) -> StoreResult<Vec<Student>> {
        debug!("GET {}", self.table_url);
        let response = self.list_request().send().await?;

        Ok(check(response).await?.json().await?)
    }

    async fn insert(&self, student: &Student) -> StoreResult<()> {
        debug!("POST {}", self.table_url);
        let response = self.insert_request(student).send().await?;

        check(response).await.map(drop)
    }

    async fn update_by_id(&self, id: &StudentId, student: &Student) -> StoreResult<()> {
        debug!("PATCH {} id={id}", self.table_url);
        let response = self.update_request(id, student).send().await?;

        check(response).await.map(drop)
    }

    async fn delete_by_id(&self, id: &StudentId) -> StoreResult<()> {
        debug!("DELETE {} id={id}", self.table_url);
        let response = self.delete_request(id).send().await?;

        check(response).await.map(drop)
    }
}

fn table_url(base: &str, table: &str) -> String {
    format!("{}/rest/v1/{}", base.trim_end_matches('/'), table)
}

fn id_filter(id: &StudentId) -> (&'static str, String) {
    ("id", format!("eq.{id}"))
}

/// Pass successful responses through, turn everything else into a [`StoreError`].
async fn check(response: Response) -> StoreResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(error_from_body(status, &body))
}

fn error_from_body(status: StatusCode, body: &str) -> StoreError {
    if let Ok(err) = serde_json::from_str::<ApiError>(body) {
        return StoreError::new(err.message);
    }

    let body = body.trim();
    if !body.is_empty() {
        return StoreError::new(body);
    }

    StoreError::new(
        status
            .canonical_reason()
            .map_or_else(|| status.to_string(), str::to_string),
    )
}
