//! API Module
//!
//! HTTP handlers and routing for the key-value server.
//!
//! # Endpoints
//! - `POST /store` - Insert if absent
//! - `PUT /store` - Store, overwriting
//! - `GET /store?key` - Retrieve a value by key
//! - `DELETE /store?key` - Delete a key
//! - `GET /exists?key` - Check presence
//! - `GET /stats` - Get store statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
