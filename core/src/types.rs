//! Domain types for the todo service.
//!
//! # Design
//! Query parameters arrive as raw strings and are parsed through `FromStr`.
//! Parsing is exact and case-sensitive: `"PENDING"` is a status, `"pending"`
//! is not. The same types serialize to the wire names used by the HTTP API.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a todo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TodoStatus {
    Pending,
    Late,
    Done,
}

impl TodoStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TodoStatus::Pending => "PENDING",
            TodoStatus::Late => "LATE",
            TodoStatus::Done => "DONE",
        }
    }
}

impl fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TodoStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(TodoStatus::Pending),
            "LATE" => Ok(TodoStatus::Late),
            "DONE" => Ok(TodoStatus::Done),
            _ => Err(()),
        }
    }
}

/// Status selector for count and list queries. `ALL` matches every todo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Only(TodoStatus),
}

impl StatusFilter {
    pub fn matches(self, status: TodoStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("ALL"),
            StatusFilter::Only(status) => status.fmt(f),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ALL" => Ok(StatusFilter::All),
            other => other.parse().map(StatusFilter::Only),
        }
    }
}

/// Sort key for content listings. All orders are ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    Id,
    DueDate,
    Title,
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortBy::Id => "ID",
            SortBy::DueDate => "DUE_DATE",
            SortBy::Title => "TITLE",
        })
    }
}

impl FromStr for SortBy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ID" => Ok(SortBy::Id),
            "DUE_DATE" => Ok(SortBy::DueDate),
            "TITLE" => Ok(SortBy::Title),
            _ => Err(()),
        }
    }
}

/// A single todo held by the service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: u64,
    pub title: String,
    pub content: String,
    /// Epoch milliseconds.
    pub due_date: i64,
    pub status: TodoStatus,
}

/// Request payload for creating a new todo.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTodo {
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub due_date: i64,
}

/// Response wrapper shared by every endpoint except the content listing.
///
/// Exactly one side carries information: successful responses leave
/// `error_message` empty, failed ones carry an empty string in `result`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub result: T,
    #[serde(default)]
    pub error_message: String,
}

impl<T> Envelope<T> {
    pub fn ok(result: T) -> Self {
        Self {
            result,
            error_message: String::new(),
        }
    }
}

impl Envelope<String> {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            result: String::new(),
            error_message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_serializes_with_wire_names() {
        let todo = Todo {
            id: 7,
            title: "Test".to_string(),
            content: "body".to_string(),
            due_date: 1_700_000_000_000,
            status: TodoStatus::Late,
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["dueDate"], 1_700_000_000_000i64);
        assert_eq!(json["status"], "LATE");
        assert!(json.get("due_date").is_none());
    }

    #[test]
    fn new_todo_defaults_content_to_empty() {
        let input: NewTodo =
            serde_json::from_str(r#"{"title":"No content","dueDate":5}"#).unwrap();
        assert_eq!(input.title, "No content");
        assert!(input.content.is_empty());
        assert_eq!(input.due_date, 5);
    }

    #[test]
    fn new_todo_rejects_missing_due_date() {
        let result: Result<NewTodo, _> = serde_json::from_str(r#"{"title":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn status_filter_parses_exact_names_only() {
        assert_eq!("ALL".parse(), Ok(StatusFilter::All));
        assert_eq!("DONE".parse(), Ok(StatusFilter::Only(TodoStatus::Done)));
        assert!("done".parse::<StatusFilter>().is_err());
        assert!("".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn todo_status_does_not_accept_all() {
        assert!("ALL".parse::<TodoStatus>().is_err());
    }

    #[test]
    fn sort_by_parses_known_keys() {
        assert_eq!("DUE_DATE".parse(), Ok(SortBy::DueDate));
        assert!("NAME".parse::<SortBy>().is_err());
    }

    #[test]
    fn error_envelope_has_empty_result() {
        let json = serde_json::to_value(Envelope::error("boom")).unwrap();
        assert_eq!(json, serde_json::json!({"result": "", "errorMessage": "boom"}));
    }

    #[test]
    fn ok_envelope_has_empty_error_message() {
        let json = serde_json::to_value(Envelope::ok(3)).unwrap();
        assert_eq!(json, serde_json::json!({"result": 3, "errorMessage": ""}));
    }
}
