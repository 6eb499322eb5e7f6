//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol by delegating to the tool layer.
//!
//! ## Tool Architecture
//!
//! Tools are defined in `domains/tools/definitions/` with one file per tool.
//! Each tool defines:
//! - Parameters struct (for rmcp)
//! - `execute()` method (core logic, takes the store and the caller principal)
//! - `http_handler()` method (called via ToolRegistry for HTTP transport)
//!
//! The ToolRouter is built dynamically in `domains/tools/router.rs`.
//! **Adding a new tool does NOT require modifying this file!**

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, handler::server::tool::ToolRouter, model::*,
    service::RequestContext, tool_handler,
};
use std::sync::Arc;

use super::config::Config;
use crate::domains::todos::TodoStore;
use crate::domains::tools::build_tool_router;

#[cfg(feature = "http")]
use crate::core::auth::Principal;
#[cfg(feature = "http")]
use crate::domains::tools::{ToolError, ToolRegistry};

/// The main MCP server handler.
///
/// This struct implements the `ServerHandler` trait from rmcp and owns the
/// process-wide todo store shared by every tool invocation.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Shared in-memory todo store.
    store: Arc<TodoStore>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);
        let store = Arc::new(TodoStore::new());

        Self {
            tool_router: build_tool_router::<Self>(store.clone()),
            config,
            store,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Get the shared todo store.
    pub fn store(&self) -> &Arc<TodoStore> {
        &self.store
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools (for HTTP transport).
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by name with the caller's resolved identity (for HTTP
    /// transport).
    ///
    /// This method uses the ToolRegistry to dispatch to the appropriate
    /// tool handler. Each tool's http_handler is defined in its own file
    /// under `domains/tools/definitions/`.
    #[cfg(feature = "http")]
    pub fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
        principal: &Principal,
    ) -> Result<serde_json::Value, ToolError> {
        let registry = ToolRegistry::new(self.store.clone());
        registry.call_tool(name, arguments, principal)
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool
/// routing on the STDIO transport.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Manage a shared todo list: create, read, update, and delete todo items. \
                 Every change is attributed to the calling user."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_lists_four_tools() {
        let server = McpServer::new(Config::default());
        let tools = server.list_tools();
        assert_eq!(tools.len(), 4);
        let names: Vec<_> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
        assert!(names.contains(&"CreateTodoAsync"));
        assert!(names.contains(&"DeleteTodoAsync"));
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_server_call_tool_uses_shared_store() {
        let server = McpServer::new(Config::default());
        server
            .call_tool(
                "CreateTodoAsync",
                serde_json::json!({ "description": "task" }),
                &Principal::Anonymous,
            )
            .unwrap();
        assert_eq!(server.store().len(), 1);
    }

    #[test]
    fn test_fresh_server_has_empty_store() {
        let server = McpServer::new(Config::default());
        assert!(server.store().is_empty());
    }
}
