use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Definition of an MCP tool exposed to the agent host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Registry of all MCP tools available to the agent host.
pub struct ToolRegistry;

fn project_id_schema() -> Value {
    serde_json::json!({
        "type": "integer",
        "description": "ID of the SD Elements project"
    })
}

fn countermeasure_id_schema() -> Value {
    serde_json::json!({
        "type": "string",
        "description": "Countermeasure ID, either bare (\"T21\") or prefixed with the project ID (\"1234-T21\")"
    })
}

impl ToolRegistry {
    /// Return the list of tool definitions for the MCP `tools/list` method.
    #[must_use]
    #[allow(clippy::too_many_lines)]
    pub fn definitions() -> Vec<ToolDefinition> {
        vec![
            ToolDefinition {
                name: "test_connection".to_string(),
                description: "Test the connection to SD Elements using the configured host and API key.".to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {},
                    "required": []
                }),
            },
            ToolDefinition {
                name: "list_projects".to_string(),
                description: "List SD Elements projects, optionally filtered by a search term.".to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "page_size": {
                            "type": "integer",
                            "description": "Number of results per page"
                        },
                        "search": {
                            "type": "string",
                            "description": "Only return projects whose name matches this term"
                        }
                    },
                    "required": []
                }),
            },
            ToolDefinition {
                name: "get_project".to_string(),
                description: "Get the details of a single project. Use list_countermeasures to see the countermeasures of a project.".to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "project_id": project_id_schema()
                    },
                    "required": ["project_id"]
                }),
            },
            ToolDefinition {
                name: "list_countermeasures".to_string(),
                description: "List all countermeasures for a project. Use this to see countermeasures associated with a project, not get_project which returns project details.".to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "project_id": project_id_schema(),
                        "status": {
                            "type": "string",
                            "description": "Only return countermeasures with this status"
                        },
                        "page_size": {
                            "type": "integer",
                            "description": "Number of results per page"
                        },
                        "risk_relevant": {
                            "type": "boolean",
                            "default": true,
                            "description": "Only return risk-relevant countermeasures"
                        }
                    },
                    "required": ["project_id"]
                }),
            },
            ToolDefinition {
                name: "get_countermeasure".to_string(),
                description: "Get details of a specific countermeasure.".to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "project_id": project_id_schema(),
                        "countermeasure_id": countermeasure_id_schema()
                    },
                    "required": ["project_id", "countermeasure_id"]
                }),
            },
            ToolDefinition {
                name: "update_countermeasure".to_string(),
                description: "Update a countermeasure (status or notes). Use when user says 'update status', 'mark as complete', or 'change status'. Do NOT use for 'add note', 'document', or 'note' - use add_countermeasure_note instead.".to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "project_id": project_id_schema(),
                        "countermeasure_id": countermeasure_id_schema(),
                        "status": {
                            "type": "string",
                            "description": "New status of the countermeasure"
                        },
                        "notes": {
                            "type": "string",
                            "description": "Note recorded with the status change"
                        }
                    },
                    "required": ["project_id", "countermeasure_id"]
                }),
            },
            ToolDefinition {
                name: "add_countermeasure_note".to_string(),
                description: "Add a note to a countermeasure. Use when user says 'add note', 'document', 'note that', 'record that', or wants to add documentation. Use update_countermeasure if user wants to change status.".to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "project_id": project_id_schema(),
                        "countermeasure_id": countermeasure_id_schema(),
                        "note": {
                            "type": "string",
                            "description": "Text of the note"
                        }
                    },
                    "required": ["project_id", "countermeasure_id", "note"]
                }),
            },
        ]
    }
}
