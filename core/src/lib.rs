//! Domain core for the todo service.
//!
//! # Overview
//! `TodoService` holds the in-memory todos and implements every request
//! operation: validation, filtering, sorting and the error-driven log level
//! alerting. It performs no I/O; the server crate wraps it in a lock and
//! exposes it over HTTP.
//!
//! The crate also ships `TodoClient`, a stateless request builder and
//! response parser for the same API (host-does-IO pattern).
//!
//! # Design
//! - Enum query parameters are parsed here, so invalid values are rejected
//!   and logged in one place.
//! - Log verbosity is tracked by `ActivityLog` and enforced through the
//!   `LevelSink` trait, keeping `tracing-subscriber` out of the core.

pub mod activity;
pub mod client;
pub mod error;
pub mod http;
pub mod service;
pub mod types;

pub use activity::{ActivityLog, Channel, ChannelLevels, LevelSink, LogLevel, NoopSink};
pub use client::TodoClient;
pub use error::{ApiError, ErrorKind, TodoError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use service::TodoService;
pub use types::{Envelope, NewTodo, SortBy, StatusFilter, Todo, TodoStatus};
