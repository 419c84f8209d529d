use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::Config,
    error::AppResult,
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::catalog::Catalog,
};

pub mod dishes;
pub mod recommendations;

/// Shared application state
///
/// The catalog is read-only for the life of the process, so handlers share it
/// without locking.
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub default_top_k: usize,
}

impl AppState {
    pub fn new(catalog: Catalog, default_top_k: usize) -> Self {
        Self {
            catalog: Arc::new(catalog),
            default_top_k,
        }
    }

    /// Loads the catalog named in the configuration
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let catalog = Catalog::from_path(&config.catalog_path)?;
        Ok(Self::new(catalog, config.default_top_k))
    }
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(Arc::new(state))
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/categories", get(dishes::list_categories))
        .route("/dishes", get(dishes::list_dishes))
        .route("/dishes/:name", get(dishes::get_dish))
        .route("/recommendations", post(recommendations::recommend))
}

/// Health check endpoint
async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "healthy", "dishes": state.catalog.len() })),
    )
}
