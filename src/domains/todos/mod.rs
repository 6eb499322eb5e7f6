//! Todos domain module.
//!
//! This module owns the todo record model and the in-memory store that the
//! tool layer operates on. The store lives for the whole process and is
//! injected wherever it is needed; nothing in here performs I/O.

mod error;
mod store;

pub use error::TodoError;
pub use store::{DEFAULT_PRIORITY, Todo, TodoStore};
