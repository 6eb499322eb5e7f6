//! Create todo tool definition.
//!
//! Allocates the next id, stamps the current UTC time and the resolved
//! caller identity, and confirms with a human-readable string.

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
use crate::domains::todos::{DEFAULT_PRIORITY, TodoStore};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the create todo tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateTodoParams {
    /// Description of the todo.
    #[schemars(description = "Description of the todo")]
    pub description: String,

    /// Priority level.
    #[schemars(description = "Priority level")]
    #[serde(default = "default_priority")]
    pub priority: String,
}

fn default_priority() -> String {
    DEFAULT_PRIORITY.to_string()
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Create todo tool - appends a new record attributed to the caller.
pub struct CreateTodoTool;

impl CreateTodoTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "CreateTodoAsync";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Creates a new todo item";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(description = %params.description))]
    pub fn execute(
        params: &CreateTodoParams,
        store: &TodoStore,
        principal: &Principal,
    ) -> CallToolResult {
        let user = principal.username();
        let todo = store.create(&params.description, &params.priority, &user);

        info!("Todo {} created by {}", todo.id, user);

        CallToolResult::success(vec![Content::text(format!(
            "Todo created: {} (Id: {}) by {}",
            todo.description, todo.id, user
        ))])
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub fn http_handler(
        arguments: serde_json::Value,
        store: Arc<TodoStore>,
        principal: &Principal,
    ) -> Result<serde_json::Value, crate::domains::tools::ToolError> {
        use crate::domains::tools::ToolError;

        let description = arguments
            .get("description")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                ToolError::invalid_arguments("Missing or invalid 'description' parameter")
            })?
            .to_string();

        let priority = arguments
            .get("priority")
            .and_then(|v| v.as_str())
            .unwrap_or(DEFAULT_PRIORITY)
            .to_string();

        let params = CreateTodoParams {
            description,
            priority,
        };

        let result = Self::execute(&params, &store, principal);

        serde_json::to_value(&result).map_err(|e| ToolError::internal(e.to_string()))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<CreateTodoParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for the STDIO transport. No bearer token exists
    /// there, so calls run as the anonymous principal.
    pub fn create_route<S>(store: Arc<TodoStore>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let store = store.clone();
            async move {
                let params: CreateTodoParams =
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn user(name: &str) -> Principal {
        let mut claims = BTreeMap::new();
        claims.insert("preferred_username".to_string(), name.to_string());
        Principal::authenticated(claims)
    }

    fn result_text(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            rmcp::model::RawContent::Text(text) => &text.text,
            _ => panic!("Expected text content"),
        }
    }

    #[test]
    fn test_create_confirmation_names_id_and_creator() {
        let store = TodoStore::new();
        let params = CreateTodoParams {
            description: "Buy milk".to_string(),
            priority: "medium".to_string(),
        };

        let result = CreateTodoTool::execute(&params, &store, &user("alice@example.com"));
        assert!(result.is_error.is_none() || !result.is_error.unwrap());

        let text = result_text(&result);
        assert_eq!(text, "Todo created: Buy milk (Id: 1) by alice@example.com");
    }

    #[test]
    fn test_create_attributes_anonymous_caller() {
        let store = TodoStore::new();
        let params = CreateTodoParams {
            description: "task".to_string(),
            priority: default_priority(),
        };

        let result = CreateTodoTool::execute(&params, &store, &Principal::Anonymous);
        assert!(result_text(&result).contains("by Anonymous"));
        assert_eq!(store.get(1).unwrap().created_by, "Anonymous");
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_http_handler_defaults_priority() {
        let store = Arc::new(TodoStore::new());
        let args = serde_json::json!({ "description": "task" });

        let result = CreateTodoTool::http_handler(args, store.clone(), &user("bob"));
        assert!(result.is_ok());
        assert_eq!(store.get(1).unwrap().priority, "medium");
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_http_handler_missing_description() {
        let store = Arc::new(TodoStore::new());
        let args = serde_json::json!({ "priority": "high" });

        let result = CreateTodoTool::http_handler(args, store, &user("bob"));
        assert!(result.is_err());
    }
}
