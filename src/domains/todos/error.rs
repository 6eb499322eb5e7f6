//! Todo store error types.

use thiserror::Error;

/// Errors that can occur when addressing the todo store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TodoError {
    /// No record exists with the requested id. Never fatal; the tool layer
    /// turns this into a user-visible message.
    #[error("Todo with ID {0} not found")]
    NotFound(u64),
}
