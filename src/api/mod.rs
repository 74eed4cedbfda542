//! API Module
//!
//! HTTP handlers and routing for the cart REST API.
//!
//! # Endpoints
//! - `GET /cart` - Cart contents, badge count and totals
//! - `POST /cart/items` - Add a product
//! - `PATCH /cart/items/:id` - Change a line's quantity
//! - `DELETE /cart/items/:id` - Remove a line
//! - `GET /cart/totals` - Order totals
//! - `GET /cart/count` - Badge count
//! - `POST /cart/checkout` - Simulated checkout (bearer token required)
//! - `PUT /session` / `DELETE /session` - Store or clear the auth session
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
