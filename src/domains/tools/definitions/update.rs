//! Update todo tool definition.
//!
//! Applies only the fields provided. Empty strings mean "no change", and the
//! completion flag is set only when explicitly present. Confirmation names
//! both the updater and the original creator.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Content, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::core::auth::Principal;
use crate::domains::todos::TodoStore;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the update todo tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoParams {
    /// ID of the todo to update.
    #[schemars(description = "ID of the todo to update")]
    pub id: u64,

    /// New description (optional).
    #[schemars(description = "New description (optional)")]
    #[serde(default)]
    pub description: Option<String>,

    /// New priority (optional).
    #[schemars(description = "New priority (optional)")]
    #[serde(default)]
    pub priority: Option<String>,

    /// Mark as completed (optional).
    #[schemars(description = "Mark as completed (optional)")]
    #[serde(default)]
    pub is_completed: Option<bool>,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Update todo tool - mutates an existing record in place.
pub struct UpdateTodoTool;

impl UpdateTodoTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "UpdateTodoAsync";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Updates a todo item";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(id = params.id))]
    pub fn execute(
        params: &UpdateTodoParams,
        store: &TodoStore,
        principal: &Principal,
    ) -> CallToolResult {
        let user = principal.username();

        match store.update(
            params.id,
            params.description.as_deref(),
            params.priority.as_deref(),
            params.is_completed,
        ) {
            Ok(todo) => {
                info!("Todo {} updated by {}", params.id, user);
                CallToolResult::success(vec![Content::text(format!(
                    "Todo {} updated successfully by {} (originally created by {})",
                    params.id, user, todo.created_by
                ))])
            }
            Err(e) => CallToolResult::error(vec![Content::text(format!(
                "{} (requested by {})",
                e, user
            ))]),
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

        let id = arguments
            .get("id")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| ToolError::invalid_arguments("Missing or invalid 'id' parameter"))?;

        let description = arguments
            .get("description")
            .and_then(|v| v.as_str())
            .map(str::to_string);

        let priority = arguments
            .get("priority")
            .and_then(|v| v.as_str())
            .map(str::to_string);

        let is_completed = arguments.get("isCompleted").and_then(|v| v.as_bool());

        let params = UpdateTodoParams {
            id,
            description,
            priority,
            is_completed,
        };

        let result = Self::execute(&params, &store, principal);

        serde_json::to_value(&result).map_err(|e| ToolError::internal(e.to_string()))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<UpdateTodoParams>(),
            annotations: None,
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
                let params: UpdateTodoParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &store, &Principal::Anonymous))
            }
            .boxed()
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
