//! API Handlers
//!
//! HTTP request handlers translating requests into store operations.
//! GET, DELETE and /exists take the key as the raw query string
//! (`/store?my-key`).

use axum::{
    extract::{RawQuery, State},
    Json,
};
use serde_json::Value;

use crate::cache::Store;
use crate::error::{CacheError, Result};
use crate::models::{
    DeleteResponse, ExistsResponse, HealthResponse, SetResponse, StatsResponse, StoreRequest,
};

/// Application state shared across all handlers.
///
/// The store synchronizes itself, so handlers share it through a plain clone.
#[derive(Clone)]
pub struct AppState {
    /// Store holding arbitrary JSON values
    pub store: Store<Value>,
}

impl AppState {
    /// Creates a new AppState with the given store.
    pub fn new(store: Store<Value>) -> Self {
        Self { store }
    }
}

fn require_key(query: Option<String>) -> Result<String> {
    match query {
        Some(key) if !key.is_empty() => Ok(key),
        _ => Err(CacheError::InvalidRequest(
            "Key must be given as the query string".to_string(),
        )),
    }
}

/// Handler for POST /store
///
/// Inserts the value only if the key is absent and answers with the value
/// now stored, which is the existing one when the key was already present.
pub async fn ensure_handler(
    State(state): State<AppState>,
    Json(req): Json<StoreRequest>,
) -> Result<Json<Value>> {
    let (key, value, expires_at) = req.into_parts()?;

    let (value, _inserted) = state.store.ensure_key(key, value, expires_at)?;

    Ok(Json(value))
}

/// Handler for PUT /store
///
/// Stores the value unconditionally, replacing any existing entry.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<StoreRequest>,
) -> Result<Json<SetResponse>> {
    let (key, value, expires_at) = req.into_parts()?;

    state.store.set(key.clone(), value, expires_at)?;

    Ok(Json(SetResponse::new(key)))
}

/// Handler for GET /store?key
///
/// Answers with the stored JSON value, or 404 when missing or expired.
pub async fn get_handler(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<Value>> {
    let key = require_key(query)?;
    let value = state.store.get(&key)?;

    Ok(Json(value))
}

/// Handler for DELETE /store?key
///
/// Succeeds whether or not the key was present.
pub async fn delete_handler(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<DeleteResponse>> {
    let key = require_key(query)?;
    let removed = state.store.delete(&key);

    Ok(Json(DeleteResponse::new(key, removed)))
}

/// Handler for GET /exists?key
pub async fn exists_handler(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<ExistsResponse>> {
    let key = require_key(query)?;
    let exists = state.store.key_exists(&key);

    Ok(Json(ExistsResponse::new(key, exists)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.store.stats()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
