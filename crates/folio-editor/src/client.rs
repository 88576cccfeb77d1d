//! HTTP client for the folio REST API.
//!
//! [`NotesClient`] implements [`NoteRepository`], so the editor saves through
//! the server exactly as it would through a local store.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use folio_core::defaults::{API_TIMEOUT_SECS, API_URL};
use folio_core::{
    CreateNoteRequest, Error, FieldError, Note, NoteRepository, Result, UpdateNoteRequest,
};

/// Error body returned by the API for 4xx/5xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    details: Vec<FieldError>,
}

/// REST client for `/api/notes`.
#[derive(Debug, Clone)]
pub struct NotesClient {
    client: Client,
    base_url: String,
}

impl NotesClient {
    /// Client for `base_url` (e.g. `http://localhost:5000`) with a request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(
            subsystem = "editor",
            component = "client",
            base_url = %base_url,
            "Notes client initialized"
        );
        Ok(Self { client, base_url })
    }

    /// Create from environment variables.
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `FOLIO_API_URL` | `http://localhost:5000` | Server base URL |
    /// | `FOLIO_API_TIMEOUT_SECS` | `30` | Per-request timeout |
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("FOLIO_API_URL").unwrap_or_else(|_| API_URL.to_string());
        let timeout = std::env::var("FOLIO_API_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(API_TIMEOUT_SECS);
        Self::new(base_url, Duration::from_secs(timeout))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/notes{}", self.base_url, path)
    }

    async fn send(&self, op: &'static str, request: RequestBuilder) -> Result<Response> {
        let start = Instant::now();
        let response = request.send().await?;
        debug!(
            subsystem = "editor",
            component = "client",
            op,
            status = response.status().as_u16(),
            duration_ms = start.elapsed().as_millis() as u64,
            "API request complete"
        );
        Ok(response)
    }

    async fn json<T: DeserializeOwned>(&self, response: Response, id: Option<i32>) -> Result<T> {
        let response = check(response, id).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| Error::Serialization(format!("Failed to parse response: {}", e)))
    }
}

/// Turn a non-success response into the matching [`Error`].
async fn check(response: Response, id: Option<i32>) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let body: Option<ErrorBody> = serde_json::from_str(&text).ok();

    Err(match (status, id, body) {
        (StatusCode::NOT_FOUND, Some(id), _) => Error::NoteNotFound(id),
        (StatusCode::NOT_FOUND, None, body) => {
            Error::NotFound(body.map(|b| b.error).unwrap_or(text))
        }
        (StatusCode::BAD_REQUEST, _, Some(body)) if !body.details.is_empty() => {
            Error::Validation(body.details)
        }
        (StatusCode::BAD_REQUEST, _, body) => {
            Error::InvalidInput(body.map(|b| b.error).unwrap_or(text))
        }
        (status, _, body) => Error::Request(format!(
            "API returned {}: {}",
            status,
            body.map(|b| b.error).unwrap_or(text)
        )),
    })
}

#[async_trait]
impl NoteRepository for NotesClient {
    async fn list(&self) -> Result<Vec<Note>> {
        let response = self.send("list", self.client.get(self.url(""))).await?;
        self.json(response, None).await
    }

    async fn get(&self, id: i32) -> Result<Note> {
        let response = self
            .send("get", self.client.get(self.url(&format!("/{}", id))))
            .await?;
        self.json(response, Some(id)).await
    }

    async fn create(&self, req: CreateNoteRequest) -> Result<Note> {
        let response = self
            .send("create", self.client.post(self.url("")).json(&req))
            .await?;
        self.json(response, None).await
    }

    async fn update(&self, id: i32, req: UpdateNoteRequest) -> Result<Note> {
        let response = self
            .send(
                "update",
                self.client.patch(self.url(&format!("/{}", id))).json(&req),
            )
            .await?;
        self.json(response, Some(id)).await
    }

    async fn delete(&self, id: i32) -> Result<()> {
        let response = self
            .send("delete", self.client.delete(self.url(&format!("/{}", id))))
            .await?;
        check(response, Some(id)).await?;
        Ok(())
    }

    async fn search(&self, query: &str) -> Result<Vec<Note>> {
        let response = self
            .send(
                "search",
                self.client.get(self.url("/search")).query(&[("q", query)]),
            )
            .await?;
        self.json(response, None).await
    }
}
