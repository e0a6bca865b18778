//! HTTP serving adapter.
//!
//! ## Routes
//!
//! - `GET /api/meta?url=<url>` - Extract Open Graph / Twitter Card metadata (JSON)
//! - `GET /api/ping` - Liveness ping
//! - `GET /health` - Health check (JSON)

mod error;
mod health;
mod meta;
mod state;

use axum::Router;
use axum::routing::get;

pub use error::ApiError;
pub use state::AppState;

/// Build the complete service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/meta", get(meta::meta_handler))
        .route("/api/ping", get(health::ping))
        .route("/health", get(health::health_check))
        .with_state(state)
}
