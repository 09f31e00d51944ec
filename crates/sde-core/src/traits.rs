use async_trait::async_trait;
use serde_json::Value;

use crate::error::Error;
use crate::types::{
    CountermeasureFilter, CountermeasureId, CountermeasureUpdate, ProjectFilter, ProjectId,
};

/// Client for the SD Elements REST API.
///
/// Every method returns the backend's JSON body as-is. Implementations own
/// authentication and timeouts; callers never reshape or retry.
#[async_trait]
pub trait SdeApi: Send + Sync {
    /// List the countermeasures of a project.
    async fn list_countermeasures(
        &self,
        project: ProjectId,
        filter: &CountermeasureFilter,
    ) -> Result<Value, Error>;

    /// Fetch a single countermeasure.
    async fn get_countermeasure(&self, id: &CountermeasureId) -> Result<Value, Error>;

    /// Apply a partial update (status and/or status note) to a countermeasure.
    async fn update_countermeasure(
        &self,
        id: &CountermeasureId,
        update: &CountermeasureUpdate,
    ) -> Result<Value, Error>;

    /// Append a free-text note to a countermeasure.
    async fn add_task_note(&self, id: &CountermeasureId, note: &str) -> Result<Value, Error>;

    async fn list_projects(&self, filter: &ProjectFilter) -> Result<Value, Error>;

    async fn get_project(&self, project: ProjectId) -> Result<Value, Error>;

    /// Verify host and credentials by fetching the current user.
    async fn test_connection(&self) -> Result<Value, Error>;
}
