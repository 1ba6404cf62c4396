//! Binary entrypoint for the users server.
//!
//! Configuration is read from `TYPED_ROUTER_*` environment variables; see
//! [`typed_router_server::config`].

use typed_router_server::config::ServerConfig;
use typed_router_server::router::build_router;
use typed_router_server::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = ServerConfig::from_env()?;
    let app = build_router(AppState::new(), config.dispatch)?;

    let addr = config.addr();
    tracing::info!(dispatch = ?config.dispatch, "users server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
