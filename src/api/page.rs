//! The single HTML page and its stylesheet.

use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;

use crate::assets::{AssetLoader, STYLESHEET};
use crate::error::ApiError;
use crate::rendering::{PageRenderer, PageView};
use crate::services::SessionHandle;

/// Render both panels and the controls from the current session
pub async fn handle_page(
    State(session): State<SessionHandle>,
    State(pages): State<Arc<PageRenderer>>,
) -> Result<Html<String>, ApiError> {
    let view = PageView::from_state(&session.snapshot());
    Ok(Html(pages.render(&view)?))
}

pub async fn handle_stylesheet(State(assets): State<Arc<AssetLoader>>) -> Result<Response, ApiError> {
    let css = assets.read(STYLESHEET).map_err(|e| {
        tracing::warn!(error = %e, "Stylesheet unavailable");
        ApiError::NotFound
    })?;
    Ok(([(header::CONTENT_TYPE, "text/css")], css.into_owned()).into_response())
}
