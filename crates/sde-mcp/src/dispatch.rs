//! Maps MCP tool calls onto the SD Elements API.
//!
//! Each tool deserializes its arguments, resolves countermeasure ids against
//! the project, shapes the request and forwards it to the shared client. The
//! backend's JSON comes back pretty-printed and otherwise untouched.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use sde_core::types::{
    CountermeasureFilter, CountermeasureId, CountermeasureUpdate, ProjectFilter, ProjectId,
};
use sde_core::Error;

use crate::handle::ApiHandle;

/// Arguments of `list_countermeasures`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListCountermeasures {
    pub project_id: ProjectId,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub page_size: Option<u32>,
    #[serde(default = "default_true")]
    pub risk_relevant: bool,
}

/// Arguments of `get_countermeasure`.
#[derive(Debug, Clone, Deserialize)]
pub struct GetCountermeasure {
    pub project_id: ProjectId,
    #[serde(deserialize_with = "string_or_number")]
    pub countermeasure_id: String,
}

/// Arguments of `update_countermeasure`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCountermeasure {
    pub project_id: ProjectId,
    #[serde(deserialize_with = "string_or_number")]
    pub countermeasure_id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Arguments of `add_countermeasure_note`.
#[derive(Debug, Clone, Deserialize)]
pub struct AddCountermeasureNote {
    pub project_id: ProjectId,
    #[serde(deserialize_with = "string_or_number")]
    pub countermeasure_id: String,
    pub note: String,
}

/// Arguments of `list_projects`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListProjects {
    #[serde(default)]
    pub page_size: Option<u32>,
    #[serde(default)]
    pub search: Option<String>,
}

/// Arguments of `get_project`.
#[derive(Debug, Clone, Deserialize)]
pub struct GetProject {
    pub project_id: ProjectId,
}

fn default_true() -> bool {
    true
}

// Countermeasure ids are strings, but agents regularly send bare numeric ids.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
    })
}

fn parse_args<T: DeserializeOwned>(arguments: Value) -> Result<T, Error> {
    let arguments = if arguments.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        arguments
    };
    serde_json::from_value(arguments).map_err(|e| Error::InvalidArguments(e.to_string()))
}

// Empty strings and zero page sizes count as "not supplied".
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

fn non_zero(value: Option<u32>) -> Option<u32> {
    value.filter(|&n| n != 0)
}

fn render(value: &Value) -> Result<String, Error> {
    serde_json::to_string_pretty(value).map_err(|e| Error::Decode(e.to_string()))
}

/// Executes tool calls against the lazily built API client.
pub struct ToolDispatcher {
    api: ApiHandle,
}

impl ToolDispatcher {
    #[must_use]
    pub fn new(api: ApiHandle) -> Self {
        Self { api }
    }

    pub fn is_client_initialized(&self) -> bool {
        self.api.is_initialized()
    }

    /// Run the tool `name` with raw JSON `arguments`.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownTool`] for an unregistered name, [`Error::InvalidArguments`]
    /// when the arguments do not fit the tool, and any client error unchanged.
    pub async fn call(&self, name: &str, arguments: Value) -> Result<String, Error> {
        tracing::info!("Tool call: {name}");

        let result = self.route(name, arguments).await;
        if let Err(err) = &result {
            tracing::warn!("Tool '{name}' failed: {err}");
        }
        result
    }

    async fn route(&self, name: &str, arguments: Value) -> Result<String, Error> {
        match name {
            "list_countermeasures" => self.list_countermeasures(parse_args(arguments)?).await,
            "get_countermeasure" => self.get_countermeasure(parse_args(arguments)?).await,
            "update_countermeasure" => self.update_countermeasure(parse_args(arguments)?).await,
            "add_countermeasure_note" => {
                self.add_countermeasure_note(parse_args(arguments)?).await
            }
            "list_projects" => self.list_projects(parse_args(arguments)?).await,
            "get_project" => self.get_project(parse_args(arguments)?).await,
            "test_connection" => self.test_connection().await,
            _ => Err(Error::UnknownTool(name.to_string())),
        }
    }
}

#[allow(clippy::missing_errors_doc)]
impl ToolDispatcher {
    pub async fn list_countermeasures(&self, args: ListCountermeasures) -> Result<String, Error> {
        let filter = CountermeasureFilter {
            status: non_empty(args.status),
            page_size: non_zero(args.page_size),
            risk_relevant: args.risk_relevant,
        };
        let api = self.api.get().await?;
        render(&api.list_countermeasures(args.project_id, &filter).await?)
    }

    pub async fn get_countermeasure(&self, args: GetCountermeasure) -> Result<String, Error> {
        let id = CountermeasureId::resolve(args.project_id, &args.countermeasure_id);
        let api = self.api.get().await?;
        render(&api.get_countermeasure(&id).await?)
    }

    /// Change status and/or status note. Free-text notes go through
    /// [`ToolDispatcher::add_countermeasure_note`] instead.
    pub async fn update_countermeasure(
        &self,
        args: UpdateCountermeasure,
    ) -> Result<String, Error> {
        let id = CountermeasureId::resolve(args.project_id, &args.countermeasure_id);
        let update = CountermeasureUpdate {
            status: non_empty(args.status),
            notes: non_empty(args.notes),
        };
        let api = self.api.get().await?;
        render(&api.update_countermeasure(&id, &update).await?)
    }

    pub async fn add_countermeasure_note(
        &self,
        args: AddCountermeasureNote,
    ) -> Result<String, Error> {
        let id = CountermeasureId::resolve(args.project_id, &args.countermeasure_id);
        let api = self.api.get().await?;
        render(&api.add_task_note(&id, &args.note).await?)
    }

    pub async fn list_projects(&self, args: ListProjects) -> Result<String, Error> {
        let filter = ProjectFilter {
            page_size: non_zero(args.page_size),
            search: non_empty(args.search),
        };
        let api = self.api.get().await?;
        render(&api.list_projects(&filter).await?)
    }

    pub async fn get_project(&self, args: GetProject) -> Result<String, Error> {
        let api = self.api.get().await?;
        render(&api.get_project(args.project_id).await?)
    }

    pub async fn test_connection(&self) -> Result<String, Error> {
        let api = self.api.get().await?;
        render(&api.test_connection().await?)
    }
}
