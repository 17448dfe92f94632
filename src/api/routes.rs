//! API Routes
//!
//! Configures the Axum router with all key-value server endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    delete_handler, ensure_handler, exists_handler, get_handler, health_handler, set_handler,
    stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /store` - Insert a value if the key is absent, answer 200 with the stored value
/// - `PUT /store` - Store a value, overwriting any existing one
/// - `GET /store?key` - Retrieve a value
/// - `DELETE /store?key` - Delete a key
/// - `GET /exists?key` - Check whether a key is present
/// - `GET /stats` - Get store statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/store",
            post(ensure_handler)
                .put(set_handler)
                .get(get_handler)
                .delete(delete_handler),
        )
        .route("/exists", get(exists_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
