//! HTTP mapping for service failures.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use todo_core::{Envelope, ErrorKind, TodoError};

/// A `TodoError` on its way out as a response.
#[derive(Debug)]
pub struct AppError(pub TodoError);

impl From<TodoError> for AppError {
    fn from(err: TodoError) -> Self {
        Self(err)
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self.0.kind() {
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), Json(Envelope::error(self.0.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;

    use super::*;

    #[test]
    fn kinds_map_to_status_codes() {
        assert_eq!(AppError(TodoError::DueDateInPast).status(), StatusCode::CONFLICT);
        assert_eq!(AppError(TodoError::InvalidStatus).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError(TodoError::UnknownLogger).status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn response_body_is_an_error_envelope() {
        let response = AppError(TodoError::NoSuchTodo("5".into())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"result": "", "errorMessage": "Error: no such TODO with id 5"})
        );
    }
}
