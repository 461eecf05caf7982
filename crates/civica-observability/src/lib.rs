//! Civica Observability
//!
//! - Tracing subscriber initialisation and HTTP request logging (always on)
//! - Prometheus metrics and business counters (`observability` feature)
//!
//! At runtime metrics can be switched off with `OBSERVABILITY_ENABLED=false`.
//!
//! # Examples
//!
//! ```ignore
//! use civica_observability::{init_metrics, init_tracing, metrics_app};
//!
//! #[tokio::main]
//! async fn main() {
//!     init_tracing();
//!     let mut app = axum::Router::new();
//!     if let Some(handle) = init_metrics() {
//!         app = app.merge(metrics_app(handle));
//!     }
//! }
//! ```

pub mod logging;
#[cfg(feature = "observability")]
pub mod metrics;

pub use logging::{init_tracing, logging_middleware};

#[cfg(feature = "observability")]
pub use self::metrics::{
    MetricsHandle, init_metrics, is_observability_enabled, metrics_app, metrics_middleware,
    track_authorization_denied, track_collaborator_created, track_grants_replaced,
    track_login_failure, track_login_success,
};

// No-op stubs when observability is disabled
#[cfg(not(feature = "observability"))]
pub mod stubs {
    use axum::{Router, extract::Request, middleware::Next, response::Response};

    /// Placeholder handle; never constructed.
    #[derive(Clone, Debug)]
    pub struct MetricsHandle;

    pub fn is_observability_enabled() -> bool {
        false
    }

    pub fn init_metrics() -> Option<MetricsHandle> {
        None
    }

    pub fn metrics_app(_handle: MetricsHandle) -> Router {
        Router::new()
    }

    pub async fn metrics_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    pub fn track_collaborator_created(_role: &str) {}
    pub fn track_grants_replaced(_count: usize) {}
    pub fn track_authorization_denied(_reason: &str) {}
    pub fn track_login_success(_role: &str) {}
    pub fn track_login_failure(_reason: &str) {}
}

#[cfg(not(feature = "observability"))]
pub use stubs::*;
