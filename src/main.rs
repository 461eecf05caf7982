use civica::router::init_router;
use civica::state::init_app_state;
use civica_access::{BootstrapMode, bootstrap};
use civica_config::{DatabaseConfig, ServerConfig};
use civica_observability::{init_metrics, init_tracing, metrics_app};
use dotenvy::dotenv;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    let state = init_app_state(&DatabaseConfig::from_env()).await?;

    bootstrap(state.store.catalog(), BootstrapMode::IfEmpty).await?;

    let mut app = init_router(state);
    if let Some(handle) = init_metrics() {
        app = app.merge(metrics_app(handle));
        info!("Prometheus metrics exposed at /metrics");
    }

    let server_config = ServerConfig::from_env();
    let address = server_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;

    info!("Server running on http://{}", address);
    info!("Scalar UI available at http://{}/scalar", address);
    axum::serve(listener, app).await?;

    Ok(())
}
