//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own file for better maintainability.

mod create;
mod delete;
mod get;
mod update;

pub use create::{CreateTodoParams, CreateTodoTool};
pub use delete::{DeleteTodoParams, DeleteTodoTool};
pub use get::{GetTodosParams, GetTodosTool};
pub use update::{UpdateTodoParams, UpdateTodoTool};
