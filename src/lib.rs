//! Todo MCP Server Library
//!
//! This crate provides a Model Context Protocol (MCP) server that exposes a
//! small in-memory todo list as remotely invocable tools, behind a
//! bearer-token authenticated HTTP endpoint.
//!
//! # Architecture
//!
//! The server is organized into the following modules:
//!
//! - **core**: Core infrastructure including configuration, error handling,
//!   authentication/identity resolution, and the main server
//! - **domains**: Business logic organized by bounded contexts
//!   - **todos**: The in-memory todo store and record model
//!   - **tools**: The four MCP tools exposed to clients
//!
//! # Example
//!
//! ```rust,no_run
//! use todo_mcp_server::{core::Config, core::McpServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let server = McpServer::new(config);
//!     // Start the server...
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Principal, Result};
