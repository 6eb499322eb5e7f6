//! Get todos tool definition.
//!
//! With an id, returns the single record (or a not-found notice); without
//! one, returns the whole list with a total count. Every response carries a
//! `requestedBy` annotation with the resolved caller identity.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Content, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::core::auth::Principal;
use crate::domains::todos::{Todo, TodoStore};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the get todos tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetTodosParams {
    /// Optional todo ID to get a specific todo.
    #[schemars(description = "Optional todo ID to get specific todo")]
    #[serde(default)]
    pub id: Option<u64>,
}

// ============================================================================
// Output Structures (JSON format for AI agents)
// ============================================================================

/// A single record annotated with the requesting identity.
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct TodoRecord {
    #[serde(flatten)]
    todo: Todo,
    requested_by: String,
}

/// The full listing with a total count.
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct TodoListing {
    todos: Vec<Todo>,
    requested_by: String,
    total_count: usize,
}

/// Notice returned when the requested id does not exist.
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct NotFoundNotice {
    message: String,
    requested_by: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Get todos tool - reads one record or the whole list.
pub struct GetTodosTool;

impl GetTodosTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "GetTodosAsync";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Gets all todos or a specific todo by ID";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(id = ?params.id))]
    pub fn execute(
        params: &GetTodosParams,
        store: &TodoStore,
        principal: &Principal,
    ) -> CallToolResult {
        let user = principal.username();

        match params.id {
            Some(id) => match store.get(id) {
                Ok(todo) => {
                    let summary = format!(
                        "Todo {}: {} [{}{}] created by {} (requested by {})",
                        todo.id,
                        todo.description,
                        todo.priority,
                        if todo.is_completed { ", completed" } else { "" },
                        todo.created_by,
                        user
                    );
                    let record = TodoRecord {
                        todo,
                        requested_by: user,
                    };
                    structured(summary, &record)
                }
                Err(e) => {
                    info!("Lookup miss for todo {}", id);
                    let notice = NotFoundNotice {
                        message: e.to_string(),
                        requested_by: user,
                    };
                    structured(notice.message.clone(), &notice)
                }
            },
            None => {
                let todos = store.get_all();
                let total_count = todos.len();
                let summary = format!("{} todo(s) (requested by {})", total_count, user);
                let listing = TodoListing {
                    todos,
                    requested_by: user,
                    total_count,
                };
                structured(summary, &listing)
            }
        }
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub fn http_handler(
        arguments: serde_json::Value,
        store: Arc<TodoStore>,
        principal: &Principal,
    ) -> Result<serde_json::Value, crate::domains::tools::ToolError> {
        use crate::domains::tools::ToolError;

        let id = match arguments.get("id") {
            None | Some(serde_json::Value::Null) => None,
            Some(v) => Some(v.as_u64().ok_or_else(|| {
                ToolError::invalid_arguments("'id' must be a non-negative integer")
            })?),
        };

        let params = GetTodosParams { id };
        let result = Self::execute(&params, &store, principal);

        serde_json::to_value(&result).map_err(|e| ToolError::internal(e.to_string()))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<GetTodosParams>(),
            annotations: None,
            // The result is either a record, a listing, or a notice, so no
            // single output schema fits.
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for the STDIO transport.
    pub fn create_route<S>(store: Arc<TodoStore>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let store = store.clone();
            async move {
                let params: GetTodosParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &store, &Principal::Anonymous))
            }
            .boxed()
        })
    }
}

/// Build a result with a text summary plus structured content.
fn structured<T: Serialize>(summary: String, value: &T) -> CallToolResult {
    CallToolResult {
        content: vec![Content::text(summary)],
        structured_content: serde_json::to_value(value).ok(),
        is_error: Some(false),
        meta: None,
    }
}

// ============================================================================
// Tests
// ============================================================================
