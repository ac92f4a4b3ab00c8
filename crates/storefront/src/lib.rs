//! Veilbound Storefront library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::{Router, extract::Request};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::catalog::{InMemoryMerchCatalog, MerchCatalog};
use crate::config::StorefrontConfig;
use crate::db::{PgMerchCatalog, create_pool};
use crate::state::AppState;

/// Directory served under `/static`.
pub const STATIC_DIR: &str = "crates/storefront/static";

/// Build the merch catalog backend for a configuration.
///
/// Uses `PostgreSQL` when a database URL is configured, otherwise an
/// in-memory catalog seeded with the launch merch.
///
/// # Errors
///
/// Returns `sqlx::Error` if the database URL cannot be parsed.
pub fn build_catalog(config: &StorefrontConfig) -> Result<Arc<dyn MerchCatalog>, sqlx::Error> {
    match &config.database_url {
        Some(url) => {
            let pool = create_pool(url)?;
            tracing::info!("Merch catalog backed by PostgreSQL");
            Ok(Arc::new(PgMerchCatalog::new(pool)))
        }
        None => {
            tracing::warn!("No database configured; using in-memory merch catalog");
            Ok(Arc::new(InMemoryMerchCatalog::seeded()))
        }
    }
}

/// Build the storefront router with its session, session lock, request ID, and
/// trace layers.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .merge(routes::routes(state.config().admin_enabled))
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(session_layer)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::session_lock_middleware,
        ))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}
