//! API Routes
//!
//! Configures the Axum router with all cart endpoints.

use axum::{
    routing::{get, patch, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    add_item_handler, checkout_handler, count_handler, delete_session_handler, get_cart_handler,
    health_handler, put_session_handler, remove_item_handler, totals_handler,
    update_quantity_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin (the storefront is served from elsewhere)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route("/cart", get(get_cart_handler))
        .route("/cart/items", post(add_item_handler))
        .route(
            "/cart/items/:id",
            patch(update_quantity_handler).delete(remove_item_handler),
        )
        .route("/cart/totals", get(totals_handler))
        .route("/cart/count", get(count_handler))
        .route("/cart/checkout", post(checkout_handler))
        .route("/session", put(put_session_handler).delete(delete_session_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
