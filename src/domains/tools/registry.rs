//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - A registry of all available tools
//! - HTTP dispatch for tool calls (when http feature is enabled)
//! - Tool metadata for listing

use std::sync::Arc;
#[cfg(feature = "http")]
use tracing::warn;

use rmcp::model::Tool;

#[cfg(feature = "http")]
use crate::core::auth::Principal;
use crate::domains::todos::TodoStore;
#[cfg(feature = "http")]
use crate::domains::tools::ToolError;

use super::definitions::{CreateTodoTool, DeleteTodoTool, GetTodosTool, UpdateTodoTool};

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - manages all available tools.
///
/// This struct provides a central point for:
/// - Listing all available tools
/// - Dispatching HTTP tool calls with the caller's resolved principal
pub struct ToolRegistry {
    store: Arc<TodoStore>,
}

impl ToolRegistry {
    /// Create a new tool registry over the shared store.
    pub fn new(store: Arc<TodoStore>) -> Self {
        Self { store }
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        vec![
            CreateTodoTool::NAME,
            GetTodosTool::NAME,
            UpdateTodoTool::NAME,
            DeleteTodoTool::NAME,
        ]
    }

    /// Get all tools as Tool models (metadata).
    ///
    /// This is the single source of truth for all available tools.
    /// Both HTTP and STDIO transports use this to get tool metadata.
    pub fn get_all_tools() -> Vec<Tool> {
        vec![
            CreateTodoTool::to_tool(),
            GetTodosTool::to_tool(),
            UpdateTodoTool::to_tool(),
            DeleteTodoTool::to_tool(),
        ]
    }

    /// Dispatch an HTTP tool call to the appropriate handler.
    ///
    /// This is used by the HTTP transport to call tools with the identity
    /// the auth layer resolved for the request.
    #[cfg(feature = "http")]
    pub fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
        principal: &Principal,
    ) -> Result<serde_json::Value, ToolError> {
        match name {
            CreateTodoTool::NAME => {
                CreateTodoTool::http_handler(arguments, self.store.clone(), principal)
            }
            GetTodosTool::NAME => {
                GetTodosTool::http_handler(arguments, self.store.clone(), principal)
            }
            UpdateTodoTool::NAME => {
                UpdateTodoTool::http_handler(arguments, self.store.clone(), principal)
            }
            DeleteTodoTool::NAME => {
                DeleteTodoTool::http_handler(arguments, self.store.clone(), principal)
            }
            _ => {
                warn!("Unknown tool requested: {}", name);
                Err(ToolError::unknown_tool(name))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> Arc<TodoStore> {
        Arc::new(TodoStore::new())
    }

    #[test]
    fn test_registry_tool_names() {
        let registry = ToolRegistry::new(test_store());
        let names = registry.tool_names();
        assert_eq!(names.len(), 4);
        assert!(names.contains(&"CreateTodoAsync"));
        assert!(names.contains(&"GetTodosAsync"));
        assert!(names.contains(&"UpdateTodoAsync"));
        assert!(names.contains(&"DeleteTodoAsync"));
    }

    #[test]
    fn test_metadata_matches_names() {
        let registry = ToolRegistry::new(test_store());
        let names = registry.tool_names();
        let tools = ToolRegistry::get_all_tools();

        assert_eq!(tools.len(), names.len());
        for tool in &tools {
            assert!(names.contains(&tool.name.as_ref()));
            assert!(tool.description.is_some());
        }
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_registry_call_unknown() {
        let registry = ToolRegistry::new(test_store());
        let result = registry.call_tool("unknown", serde_json::json!({}), &Principal::Anonymous);
        assert!(matches!(result, Err(ToolError::UnknownTool(_))));
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_full_crud_scenario() {
        use std::collections::BTreeMap;

        let mut claims = BTreeMap::new();
        claims.insert("upn".to_string(), "a@b.com".to_string());
        let principal = Principal::authenticated(claims);

        let registry = ToolRegistry::new(test_store());

        // Create
        let created = registry
            .call_tool(
                "CreateTodoAsync",
                serde_json::json!({ "description": "Buy milk" }),
                &principal,
            )
            .unwrap();
        let text = created["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("(Id: 1)"));
        assert!(text.contains("by a@b.com"));

        // Read: not completed yet
        let fetched = registry
            .call_tool("GetTodosAsync", serde_json::json!({ "id": 1 }), &principal)
            .unwrap();
        assert_eq!(fetched["structuredContent"]["isCompleted"], false);

        // Update: completion only
        registry
            .call_tool(
                "UpdateTodoAsync",
                serde_json::json!({ "id": 1, "isCompleted": true }),
                &principal,
            )
            .unwrap();

        let fetched = registry
            .call_tool("GetTodosAsync", serde_json::json!({ "id": 1 }), &principal)
            .unwrap();
        assert_eq!(fetched["structuredContent"]["isCompleted"], true);
        assert_eq!(fetched["structuredContent"]["description"], "Buy milk");

        // Delete, then read reports not found
        registry
            .call_tool("DeleteTodoAsync", serde_json::json!({ "id": 1 }), &principal)
            .unwrap();

        let fetched = registry
            .call_tool("GetTodosAsync", serde_json::json!({ "id": 1 }), &principal)
            .unwrap();
        assert_eq!(
            fetched["structuredContent"]["message"],
            "Todo with ID 1 not found"
        );
    }
}
