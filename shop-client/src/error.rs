//! Client error types

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Structured `{field, message}` error returned by a platform mutation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserError {
    /// Path to the offending input field
    #[serde(default)]
    pub field: Option<Vec<String>>,
    pub message: String,
}

impl fmt::Display for UserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) if !field.is_empty() => write!(f, "{}: {}", field.join("."), self.message),
            _ => f.write_str(&self.message),
        }
    }
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The call exceeded its timeout; outcome unknown, never retried
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Non-2xx response
    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// Top-level GraphQL errors
    #[error("GraphQL error: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    /// Structured errors reported by a mutation
    #[error("User errors: {}", join(.0))]
    UserErrors(Vec<UserError>),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Success payload missing or malformed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Map a transport error, separating timeouts from other failures
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout(err.to_string())
        } else {
            ClientError::Http(err)
        }
    }

    /// Structured user errors, if this is a mutation rejection
    pub fn user_errors(&self) -> Option<&[UserError]> {
        match self {
            ClientError::UserErrors(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Fail with [`ClientError::UserErrors`] when a mutation reported any
pub(crate) fn check_user_errors(errors: Vec<UserError>) -> ClientResult<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ClientError::UserErrors(errors))
    }
}
