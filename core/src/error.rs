//! Error types for the todo service and its client.
//!
//! # Design
//! `TodoError` is what the service returns; its `Display` output is the
//! message clients see in `errorMessage`. Callers that need to pick a status
//! code go through `kind()` instead of matching every variant.
//!
//! `ApiError` is the client-side view of a failed response.

use thiserror::Error;

/// Coarse classification used to choose an HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Conflict,
    BadRequest,
    NotFound,
}

/// Failures produced by `TodoService` operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TodoError {
    #[error("TODO with the title [{0}] already exists in the system")]
    TitleExists(String),

    #[error("Can't create new TODO with a due date in the past")]
    DueDateInPast,

    #[error("Bad Request: Invalid status parameter.")]
    InvalidStatus,

    #[error("Bad Request: Invalid sortBy parameter.")]
    InvalidSortBy,

    #[error("Bad Request: {0}")]
    MalformedBody(String),

    #[error("Bad Request: {0}")]
    MalformedQuery(String),

    /// Holds the id exactly as the caller sent it.
    #[error("Error: no such TODO with id {0}")]
    NoSuchTodo(String),

    #[error("Failure: There is no such logger with this name")]
    UnknownLogger,

    #[error("Failure: There is no such logger level")]
    UnknownLevel,
}

impl TodoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TodoError::TitleExists(_) | TodoError::DueDateInPast => ErrorKind::Conflict,
            TodoError::InvalidStatus
            | TodoError::InvalidSortBy
            | TodoError::MalformedBody(_)
            | TodoError::MalformedQuery(_) => ErrorKind::BadRequest,
            TodoError::NoSuchTodo(_) | TodoError::UnknownLogger | TodoError::UnknownLevel => {
                ErrorKind::NotFound
            }
        }
    }
}

/// Errors returned by `TodoClient` parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 409, with the server's `errorMessage`.
    #[error("conflict: {0}")]
    Conflict(String),

    /// 400, with the server's `errorMessage`.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// 404, with the server's `errorMessage`.
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other unexpected status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    #[error("serialization failed: {0}")]
    SerializationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_http_contract() {
        assert_eq!(TodoError::TitleExists("a".into()).kind(), ErrorKind::Conflict);
        assert_eq!(TodoError::DueDateInPast.kind(), ErrorKind::Conflict);
        assert_eq!(TodoError::InvalidSortBy.kind(), ErrorKind::BadRequest);
        assert_eq!(TodoError::MalformedQuery("x".into()).kind(), ErrorKind::BadRequest);
        assert_eq!(TodoError::NoSuchTodo("9".into()).kind(), ErrorKind::NotFound);
        assert_eq!(TodoError::UnknownLevel.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn messages_carry_caller_input() {
        assert_eq!(
            TodoError::TitleExists("Walk dog".into()).to_string(),
            "TODO with the title [Walk dog] already exists in the system"
        );
        assert_eq!(
            TodoError::NoSuchTodo("abc".into()).to_string(),
            "Error: no such TODO with id abc"
        );
    }
}
