//! # Civica DB
//!
//! Database pool, embedded migrations and the PostgreSQL implementation of
//! the access-control store traits.
//!
//! # Example
//!
//! ```ignore
//! use civica_db::{PgStore, init_db_pool, run_migrations};
//!
//! let pool = init_db_pool(&url, 5).await?;
//! run_migrations(&pool).await?;
//! let store = PgStore::new(pool);
//! ```

pub mod postgres;

use sqlx::postgres::PgPoolOptions;

pub use postgres::PgStore;
pub use sqlx::PgPool;

/// Initializes a PostgreSQL connection pool.
///
/// The pool is cheaply cloneable; create it once at startup and hand it to
/// [`PgStore`].
pub async fn init_db_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Apply pending migrations from the workspace `migrations/` directory.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    tracing::info!("Running database migrations...");
    sqlx::migrate!("../../migrations").run(pool).await?;
    tracing::info!("Migrations completed successfully");
    Ok(())
}
