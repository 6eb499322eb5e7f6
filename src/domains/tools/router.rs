//! Tool Router - builds the rmcp ToolRouter from the tool definitions.
//!
//! This module builds the ToolRouter for the STDIO transport by delegating
//! to the tool definitions themselves. Each tool knows how to create its own
//! route over the shared store.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;

use crate::domains::todos::TodoStore;

use super::definitions::{CreateTodoTool, DeleteTodoTool, GetTodosTool, UpdateTodoTool};

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(store: Arc<TodoStore>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(CreateTodoTool::create_route(store.clone()))
        .with_route(GetTodosTool::create_route(store.clone()))
        .with_route(UpdateTodoTool::create_route(store.clone()))
        .with_route(DeleteTodoTool::create_route(store))
}
