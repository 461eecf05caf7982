use std::sync::Arc;

use civica_access::{InMemoryStore, Store};
use civica_config::{CorsConfig, DatabaseConfig, JwtConfig};
use civica_db::{PgStore, init_db_pool, run_migrations};
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, jwt_config: JwtConfig, cors_config: CorsConfig) -> Self {
        Self {
            store,
            jwt_config,
            cors_config,
        }
    }
}

/// Connects the configured store and loads the remaining configuration.
///
/// Without `DATABASE_URL` the service runs on the in-memory store; its
/// contents are lost on restart.
pub async fn init_app_state(db_config: &DatabaseConfig) -> anyhow::Result<AppState> {
    let store: Arc<dyn Store> = match db_config.url.as_deref() {
        Some(url) => {
            let pool = init_db_pool(url, db_config.max_connections).await?;
            run_migrations(&pool).await?;
            info!(
                max_connections = db_config.max_connections,
                "Connected to PostgreSQL"
            );
            Arc::new(PgStore::new(pool))
        }
        None => {
            warn!("DATABASE_URL is not set, using the in-memory store");
            Arc::new(InMemoryStore::new())
        }
    };

    Ok(AppState::new(
        store,
        JwtConfig::from_env(),
        CorsConfig::from_env(),
    ))
}
