//! HTTP surface of the todo service.
//!
//! # Design
//! One `TodoService` behind a `tokio` mutex, shared by every handler through
//! `AppState`. A middleware registers each request with the service before
//! the handler runs, which numbers the request and clears any error alert
//! left by the previous one.
//!
//! Requests take turns: the middleware holds `AppState::turn` from
//! registration until the response is built, so no other request can fail
//! and raise an alert between a request's reset and its own operation.

pub mod config;
pub mod error;
pub mod handlers;
pub mod telemetry;

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use todo_core::activity::REQUEST_TARGET;
use todo_core::TodoService;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tracing::Instrument;

#[derive(Clone, Default)]
pub struct AppState {
    service: Arc<Mutex<TodoService>>,
    turn: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(service: TodoService) -> Self {
        Self {
            service: Arc::new(Mutex::new(service)),
            turn: Arc::default(),
        }
    }

    pub fn service(&self) -> &Mutex<TodoService> {
        &self.service
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/todo/health", get(handlers::health))
        .route(
            "/todo",
            axum::routing::post(handlers::create_todo)
                .put(handlers::update_status)
                .delete(handlers::delete_todo),
        )
        .route("/todo/size", get(handlers::count))
        .route("/todo/content", get(handlers::content))
        .route(
            "/logs/level",
            get(handlers::logger_level).put(handlers::set_logger_level),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), track_request))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}

async fn track_request(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let _turn = state.turn.lock().await;
    let started = Instant::now();
    let number = state
        .service
        .lock()
        .await
        .begin_request(request.uri().path(), request.method().as_str());

    let span = tracing::info_span!("request", number);
    let response = next.run(request).instrument(span.clone()).await;
    span.in_scope(|| {
        tracing::debug!(
            target: REQUEST_TARGET,
            "request {number} duration: {}ms",
            started.elapsed().as_millis()
        )
    });
    response
}
