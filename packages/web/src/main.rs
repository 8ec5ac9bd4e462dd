use std::error::Error;

use api::{AppState, ServerConfig};
use db::{DbConfig, TaskRepository};
use dispatcher::Dispatcher;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let db_config = DbConfig::from_env()?;
    let server_config = ServerConfig::from_env()?;

    let db = db::init(&db_config).await?;
    let dispatcher =
        Dispatcher::with_config(TaskRepository::new(db), server_config.dispatcher_config());
    let state = AppState::new(dispatcher, server_config.priority_source);
    let app = api::router(state, server_config.request_timeout);

    let addr = server_config.addr();
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        priority_source = %server_config.priority_source,
        allow_complete_unclaimed = server_config.allow_complete_unclaimed,
        "dispatcher listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("dispatcher stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
