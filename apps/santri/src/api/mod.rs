//! # API Module
//!
//! HTTP surface of Santri: routing, shared state and server start-up.
//!
//! Routes:
//! - `GET /health`
//! - `GET|POST /api/students`
//! - `GET|PUT|DELETE /api/students/{id}`
//! - `GET /api/students/{id}/pdf`
//! - `GET /api/students/export/excel`
//! - `POST /api/students/import/excel`
//! - `GET /api/dashboard/stats`

pub mod auth;
mod error;
pub mod handlers;

pub use error::{ApiError, ErrorBody};

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use chrono::NaiveDate;
use santri_core::{StudentStore, seed_store};
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::{ServerConfig, UPLOAD_LIMIT_BYTES};
use auth::{ApiKey, rate_limit, rate_limiter, require_api_key};
use handlers::{
    create_student, dashboard_stats, delete_student, export_excel, get_student, health,
    import_excel, list_students, student_pdf, update_student,
};

/// Store handle shared by all handlers.
pub type SharedStore = Arc<RwLock<StudentStore>>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    clock: fn() -> NaiveDate,
}

impl AppState {
    pub fn new(store: StudentStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            clock: santri_core::today,
        }
    }

    /// Replace the date source used for ages and sequence years.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> NaiveDate) -> Self {
        self.clock = clock;
        self
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }
}

/// Build the full router, including the optional `/api` guards.
pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    let mut api = Router::new()
        .route("/students", get(list_students).post(create_student))
        .route("/students/export/excel", get(export_excel))
        .route(
            "/students/import/excel",
            post(import_excel).layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES)),
        )
        .route(
            "/students/{id}",
            get(get_student).put(update_student).delete(delete_student),
        )
        .route("/students/{id}/pdf", get(student_pdf))
        .route("/dashboard/stats", get(dashboard_stats));

    // Layers wrap outside-in: the key check runs before the limiter.
    if let Some(per_second) = config.rate_limit {
        info!(per_second = per_second.get(), "rate limiting enabled");
        api = api.layer(middleware::from_fn_with_state(
            rate_limiter(per_second),
            rate_limit,
        ));
    }
    if let Some(key) = config.api_key.as_deref() {
        info!("API key required for /api");
        api = api.layer(middleware::from_fn_with_state(
            ApiKey::new(key),
            require_api_key,
        ));
    }

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = StudentStore::new();
    if config.seed {
        let ids = seed_store(&mut store, santri_core::today());
        info!(count = ids.len(), "loaded sample students");
    }

    let app = create_router(AppState::new(store), &config);
    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!(addr = %listener.local_addr()?, "santri listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
