//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the `serve` command and integration tests.

use axum::{
    extract::{DefaultBodyLimit, FromRef},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::assets::AssetLoader;
use crate::models::AppConfig;
use crate::rendering::PageRenderer;
use crate::services::{Dispatcher, ImageProcessor, LightFrameClient, SessionHandle};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub session: SessionHandle,
    pub dispatcher: Arc<Dispatcher>,
    pub pages: Arc<PageRenderer>,
    pub assets: Arc<AssetLoader>,
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for SessionHandle {
    fn from_ref(state: &AppState) -> Self {
        state.session.clone()
    }
}

impl FromRef<AppState> for Arc<Dispatcher> {
    fn from_ref(state: &AppState) -> Self {
        state.dispatcher.clone()
    }
}

impl FromRef<AppState> for Arc<PageRenderer> {
    fn from_ref(state: &AppState) -> Self {
        state.pages.clone()
    }
}

impl FromRef<AppState> for Arc<AssetLoader> {
    fn from_ref(state: &AppState) -> Self {
        state.assets.clone()
    }
}

/// Create application state talking to the configured backend.
pub fn create_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let client = LightFrameClient::new(&config)
        .map_err(|e| anyhow::anyhow!("Failed to create API client: {e}"))?;
    create_app_state_with(config, Arc::new(client))
}

/// Create application state around any image processor.
pub fn create_app_state_with(
    config: AppConfig,
    processor: Arc<dyn ImageProcessor>,
) -> anyhow::Result<AppState> {
    let assets = Arc::new(AssetLoader::new(config.assets_dir.clone()));
    let pages = Arc::new(PageRenderer::new(&assets)?);
    let session = SessionHandle::new();
    let dispatcher = Arc::new(Dispatcher::new(session.clone(), processor));

    Ok(AppState {
        config: Arc::new(config),
        session,
        dispatcher,
        pages,
        assets,
    })
}

/// Build the router with all endpoints and middleware.
///
/// This is the core router used by both production and tests.
pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        // Page
        .route("/", get(api::handle_page))
        .route("/style.css", get(api::handle_stylesheet))
        // Actions
        .route("/select", post(api::handle_select))
        .route("/options", post(api::handle_options))
        .route("/compress", post(api::handle_compress))
        .route("/enhance", post(api::handle_enhance))
        // Image data
        .route("/blob/:id", get(api::handle_blob))
        .route("/download", get(api::handle_download))
        .route("/api/state", get(api::handle_state))
        // Health check
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
        .layer(DefaultBodyLimit::max(upload_limit))
        .layer(TraceLayer::new_for_http())
}
