//! Club Forms Server Library
//!
//! Clubs and events collect submissions through admin-defined forms, each
//! backed by its own runtime-created table. This module exports the core
//! types and functions for the binary and for testing.

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod export;
pub mod forms;
pub mod models;
pub mod routes;
pub mod security;

pub use config::Config;
pub use db::open_database;
pub use error::{AppError, Result};
pub use forms::Forms;

use axum::Router;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub forms: Forms,
}

impl AppState {
    /// Create a new AppState with the given pool and configuration
    pub fn new(pool: SqlitePool, config: Config) -> Self {
        let forms = Forms::new(pool.clone(), config.max_submissions);
        Self { pool, forms }
    }
}

/// Build the application router with request tracing
pub fn app(state: AppState) -> Router {
    routes::router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
