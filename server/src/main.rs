use todo_core::TodoService;
use todo_server::config::Config;
use todo_server::{telemetry, AppState};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let sink = telemetry::init(&config)?;
    let state = AppState::new(TodoService::with_sink(Box::new(sink)));

    let addr = config.addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("listening on {addr}");
    todo_server::run(listener, state).await?;
    Ok(())
}
