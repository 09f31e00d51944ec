use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use sde_core::traits::SdeApi;
use sde_core::types::{
    CountermeasureFilter, CountermeasureId, CountermeasureUpdate, ProjectFilter, ProjectId,
};
use sde_core::Error;

use crate::config::ClientConfig;

/// `reqwest`-backed SD Elements API client.
#[derive(Debug, Clone)]
pub struct SdeClient {
    client: Client,
    base_url: Url,
}

#[derive(Serialize)]
struct NoteBody<'a> {
    text: &'a str,
}

impl SdeClient {
    /// Build a client for the given instance.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the host is not a usable base URL, the API
    /// key is not a valid header value or the underlying HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let mut auth = HeaderValue::from_str(&format!("Token {}", config.api_key))
            .map_err(|e| Error::Config(format!("invalid API key: {e}")))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;

        let base_url = format!("{}/api/v2", config.host.trim_end_matches('/'));
        let base_url = Url::parse(&base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| Error::Config(format!("invalid host URL: {}", config.host)))?;
        info!("SD Elements client initialized for {base_url}");

        Ok(Self { client, base_url })
    }

    /// Build a client from `SDE_HOST` / `SDE_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the environment is incomplete or invalid.
    pub fn from_env() -> Result<Self, Error> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Start a request to `{base_url}/{segments..}/`. Each segment is
    /// percent-encoded, so caller-supplied ids cannot leave their collection.
    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments).push("");
        }
        debug!("SD Elements request: {method} {url}");
        self.client.request(method, url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, Error> {
        let response = request
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("SD Elements request failed: {status} - {body}");
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(Value::Object(serde_json::Map::new()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;
        if bytes.is_empty() {
            return Ok(Value::Object(serde_json::Map::new()));
        }

        serde_json::from_slice(&bytes).map_err(|e| Error::Decode(e.to_string()))
    }

    fn task(&self, method: Method, id: &CountermeasureId, tail: &[&str]) -> RequestBuilder {
        let project = id.project.to_string();
        let task = id.to_string();
        let mut segments = vec!["projects", project.as_str(), "tasks", task.as_str()];
        segments.extend_from_slice(tail);
        self.request(method, &segments)
    }
}

#[async_trait]
impl SdeApi for SdeClient {
    async fn list_countermeasures(
        &self,
        project: ProjectId,
        filter: &CountermeasureFilter,
    ) -> Result<Value, Error> {
        let project = project.to_string();
        let request = self
            .request(Method::GET, &["projects", project.as_str(), "tasks"])
            .query(filter);
        self.send(request).await
    }

    async fn get_countermeasure(&self, id: &CountermeasureId) -> Result<Value, Error> {
        self.send(self.task(Method::GET, id, &[])).await
    }

    async fn update_countermeasure(
        &self,
        id: &CountermeasureId,
        update: &CountermeasureUpdate,
    ) -> Result<Value, Error> {
        let request = self.task(Method::PATCH, id, &[]).json(update);
        self.send(request).await
    }

    async fn add_task_note(&self, id: &CountermeasureId, note: &str) -> Result<Value, Error> {
        let request = self
            .task(Method::POST, id, &["notes"])
            .json(&NoteBody { text: note });
        self.send(request).await
    }

    async fn list_projects(&self, filter: &ProjectFilter) -> Result<Value, Error> {
        let request = self.request(Method::GET, &["projects"]).query(filter);
        self.send(request).await
    }

    async fn get_project(&self, project: ProjectId) -> Result<Value, Error> {
        let project = project.to_string();
        self.send(self.request(Method::GET, &["projects", project.as_str()]))
            .await
    }

    async fn test_connection(&self) -> Result<Value, Error> {
        let user = self.send(self.request(Method::GET, &["users", "me"])).await?;
        Ok(serde_json::json!({
            "status": "ok",
            "message": "Connection successful",
            "user": user,
        }))
    }
}
