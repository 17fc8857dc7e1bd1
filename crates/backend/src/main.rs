use std::net::SocketAddr;

use backend::routes::{configure_routes, AppState};
use backend::shared::config;
use backend::shared::data::db;
use backend::system;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    system::tracing::initialize()?;

    let config = config::load_config()?;

    // Initialize database
    let db_path = config::get_database_path(&config);
    db::initialize_database(&db_path)
        .await
        .map_err(|e| anyhow::anyhow!("db init failed: {e}"))?;

    if let Some(seed_path) = config::get_seed_path(&config) {
        system::initialization::seed_if_empty(&seed_path).await?;
    }

    let state = AppState {
        display: config.display.to_contract(),
    };
    let static_dir = config::get_static_dir(&config);
    match &static_dir {
        Some(dir) => tracing::info!("Serving frontend from {}", dir.display()),
        None => tracing::info!("No static_dir configured, serving the API only"),
    }
    let app = configure_routes(state, static_dir);

    let port = config.server.port;
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    port
                );
            } else {
                tracing::error!("Failed to bind to port {}. Error: {}", port, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
