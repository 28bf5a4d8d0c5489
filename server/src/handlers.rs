//! Endpoint handlers. Each one locks the service, runs a single operation
//! and wraps the outcome in the response envelope.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use todo_core::{Envelope, NewTodo, Todo, TodoError, TodoService, TodoStatus};

use crate::error::AppError;
use crate::AppState;

/// Query parameters are optional at the HTTP layer; a missing value is
/// passed on as `""` and fails validation like any other bad value.
#[derive(Debug, Default, Deserialize)]
pub struct StatusQuery {
    status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentQuery {
    status: Option<String>,
    sort_by: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateQuery {
    id: Option<String>,
    status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct IdQuery {
    id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggerQuery {
    logger_name: Option<String>,
    logger_level: Option<String>,
}

fn param(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}

/// Unwraps a query extraction, recording a malformed query string as a
/// service failure.
fn accept<T>(service: &mut TodoService, query: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    match query {
        Ok(Query(query)) => Ok(query),
        Err(rejection) => Err(service.reject(TodoError::MalformedQuery(rejection.body_text())).into()),
    }
}

pub async fn health() -> Json<Envelope<&'static str>> {
    Json(Envelope::ok("OK"))
}

pub async fn create_todo(
    State(state): State<AppState>,
    body: Result<Json<NewTodo>, JsonRejection>,
) -> Result<Json<Envelope<u64>>, AppError> {
    let mut service = state.service.lock().await;
    let Json(input) =
        body.map_err(|rejection| service.reject(TodoError::MalformedBody(rejection.body_text())))?;
    let id = service.create(input, Utc::now().timestamp_millis())?;
    Ok(Json(Envelope::ok(id)))
}

pub async fn count(
    State(state): State<AppState>,
    query: Result<Query<StatusQuery>, QueryRejection>,
) -> Result<Json<Envelope<usize>>, AppError> {
    let mut service = state.service.lock().await;
    let query = accept(&mut service, query)?;
    let count = service.count_by_status(param(&query.status))?;
    Ok(Json(Envelope::ok(count)))
}

pub async fn content(
    State(state): State<AppState>,
    query: Result<Query<ContentQuery>, QueryRejection>,
) -> Result<Json<Vec<Todo>>, AppError> {
    let mut service = state.service.lock().await;
    let query = accept(&mut service, query)?;
    let todos = service.list_by_status(param(&query.status), param(&query.sort_by))?;
    Ok(Json(todos))
}

pub async fn update_status(
    State(state): State<AppState>,
    query: Result<Query<UpdateQuery>, QueryRejection>,
) -> Result<Json<Envelope<TodoStatus>>, AppError> {
    let mut service = state.service.lock().await;
    let query = accept(&mut service, query)?;
    let old = service.update_status(param(&query.id), param(&query.status))?;
    Ok(Json(Envelope::ok(old)))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Json<Envelope<usize>>, AppError> {
    let mut service = state.service.lock().await;
    let query = accept(&mut service, query)?;
    let remaining = service.delete(param(&query.id))?;
    Ok(Json(Envelope::ok(remaining)))
}

pub async fn logger_level(
    State(state): State<AppState>,
    query: Result<Query<LoggerQuery>, QueryRejection>,
) -> Result<Json<Envelope<String>>, AppError> {
    let mut service = state.service.lock().await;
    let query = accept(&mut service, query)?;
    let level = service.logger_level(param(&query.logger_name))?;
    Ok(Json(Envelope::ok(format!("Success: {level}"))))
}

pub async fn set_logger_level(
    State(state): State<AppState>,
    query: Result<Query<LoggerQuery>, QueryRejection>,
) -> Result<Json<Envelope<String>>, AppError> {
    let mut service = state.service.lock().await;
    let query = accept(&mut service, query)?;
    let level = service.set_logger_level(param(&query.logger_name), param(&query.logger_level))?;
    Ok(Json(Envelope::ok(format!("Success: {level}"))))
}
