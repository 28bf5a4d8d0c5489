//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url`. Each endpoint is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`. Error statuses are decoded from the
//! `{result, errorMessage}` envelope so callers get the server's message.

use serde::de::DeserializeOwned;

use crate::activity::{Channel, LogLevel};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Envelope, NewTodo, SortBy, StatusFilter, Todo, TodoStatus};

/// Synchronous, stateless client for the todo API.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub fn build_health(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.url("/todo/health"),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_todo(&self, input: &NewTodo) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest::json(HttpMethod::Post, self.url("/todo"), body))
    }

    pub fn build_count(&self, status: StatusFilter) -> Result<HttpRequest, ApiError> {
        let status = status.to_string();
        HttpRequest::bare(HttpMethod::Get, self.url("/todo/size"), &[("status", &status)])
    }

    pub fn build_list(&self, status: StatusFilter, sort_by: SortBy) -> Result<HttpRequest, ApiError> {
        let status = status.to_string();
        let sort_by = sort_by.to_string();
        HttpRequest::bare(
            HttpMethod::Get,
            self.url("/todo/content"),
            &[("status", &status), ("sortBy", &sort_by)],
        )
    }

    pub fn build_update_status(&self, id: u64, status: TodoStatus) -> Result<HttpRequest, ApiError> {
        let id = id.to_string();
        HttpRequest::bare(
            HttpMethod::Put,
            self.url("/todo"),
            &[("id", &id), ("status", status.as_str())],
        )
    }

    pub fn build_delete_todo(&self, id: u64) -> Result<HttpRequest, ApiError> {
        let id = id.to_string();
        HttpRequest::bare(HttpMethod::Delete, self.url("/todo"), &[("id", &id)])
    }

    pub fn build_logger_level(&self, channel: Channel) -> Result<HttpRequest, ApiError> {
        HttpRequest::bare(
            HttpMethod::Get,
            self.url("/logs/level"),
            &[("loggerName", channel.name())],
        )
    }

    pub fn build_set_logger_level(&self, channel: Channel, level: LogLevel) -> Result<HttpRequest, ApiError> {
        let level = level.to_string();
        HttpRequest::bare(
            HttpMethod::Put,
            self.url("/logs/level"),
            &[("loggerName", channel.name()), ("loggerLevel", &level)],
        )
    }

    pub fn parse_health(&self, response: HttpResponse) -> Result<String, ApiError> {
        parse_envelope(response)
    }

    /// Returns the id of the created todo.
    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<u64, ApiError> {
        parse_envelope(response)
    }

    pub fn parse_count(&self, response: HttpResponse) -> Result<usize, ApiError> {
        parse_envelope(response)
    }

    /// The content listing is a bare JSON array, not an envelope.
    pub fn parse_list(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    /// Returns the status the todo had before the update.
    pub fn parse_update_status(&self, response: HttpResponse) -> Result<TodoStatus, ApiError> {
        parse_envelope(response)
    }

    /// Returns how many todos remain.
    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<usize, ApiError> {
        parse_envelope(response)
    }

    pub fn parse_logger_level(&self, response: HttpResponse) -> Result<LogLevel, ApiError> {
        let confirmation: String = parse_envelope(response)?;
        confirmation
            .strip_prefix("Success: ")
            .and_then(|level| level.parse().ok())
            .ok_or_else(|| ApiError::DeserializationError(format!("unexpected level reply: {confirmation}")))
    }

    pub fn parse_set_logger_level(&self, response: HttpResponse) -> Result<LogLevel, ApiError> {
        self.parse_logger_level(response)
    }
}

fn parse_envelope<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    let envelope: Envelope<T> =
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))?;
    Ok(envelope.result)
}

/// Map non-200 status codes to the matching `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    let message = || {
        serde_json::from_str::<Envelope<serde_json::Value>>(&response.body)
            .map(|envelope| envelope.error_message)
            .unwrap_or_else(|_| response.body.clone())
    };
    match response.status {
        200 => Ok(()),
        400 => Err(ApiError::BadRequest(message())),
        404 => Err(ApiError::NotFound(message())),
        409 => Err(ApiError::Conflict(message())),
        status => Err(ApiError::HttpError {
            status,
            body: response.body.clone(),
        }),
    }
}
