// HTTP routes

mod http;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;
use crate::downloads_repo::DownloadsRepo;
use crate::update_service::UpdateService;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) downloads_repo: Arc<DownloadsRepo>,
    pub(crate) update_service: Arc<UpdateService>,
    pub(crate) config: AppConfig,
}

pub fn app(
    downloads_repo: Arc<DownloadsRepo>,
    update_service: Arc<UpdateService>,
    config: AppConfig,
) -> Router {
    let state = AppState {
        downloads_repo,
        update_service,
        config,
    };
    Router::new()
        .route("/", get(http::index_handler)) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/health", get(http::health_handler)) // GET /health
        .route("/api/{plugin_id}", get(http::badge_handler)) // GET /api/{plugin_id}
        .route("/sparkline/{plugin_id}", get(http::sparkline_handler)) // GET /sparkline/{plugin_id}?days=N
        .route("/update/{plugin_id}", post(http::update_handler)) // POST /update/{plugin_id}
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
