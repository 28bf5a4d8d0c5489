//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain owned data. `TodoClient` produces
//! `HttpRequest` values and consumes `HttpResponse` values; executing the
//! round-trip is left to the caller, so this crate never opens a socket.
//! Query strings are encoded here, once, with `serde_urlencoded`.

use crate::error::ApiError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data. `path` is the full URL,
/// query string included.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Body-less request to `url`, with `query` appended when non-empty.
    pub(crate) fn bare(method: HttpMethod, url: String, query: &[(&str, &str)]) -> Result<Self, ApiError> {
        let path = if query.is_empty() {
            url
        } else {
            let encoded = serde_urlencoded::to_string(query)
                .map_err(|e| ApiError::SerializationError(e.to_string()))?;
            format!("{url}?{encoded}")
        };
        Ok(Self {
            method,
            path,
            headers: Vec::new(),
            body: None,
        })
    }

    pub(crate) fn json(method: HttpMethod, url: String, body: String) -> Self {
        Self {
            method,
            path: url,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        }
    }
}

/// An HTTP response described as plain data, filled in by the caller after
/// executing an `HttpRequest`.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_values_are_encoded() {
        let req = HttpRequest::bare(
            HttpMethod::Get,
            "http://host/logs/level".to_string(),
            &[("loggerName", "a b&c")],
        )
        .unwrap();
        assert_eq!(req.path, "http://host/logs/level?loggerName=a+b%26c");
    }

    #[test]
    fn empty_query_leaves_url_untouched() {
        let req = HttpRequest::bare(HttpMethod::Get, "http://host/todo/health".to_string(), &[]).unwrap();
        assert_eq!(req.path, "http://host/todo/health");
        assert!(req.headers.is_empty());
    }
}
