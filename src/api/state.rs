use axum::{extract::State, Json};
use serde::Serialize;

use crate::models::{Phase, UiState};
use crate::services::SessionHandle;

/// Session state plus the values the page derives from it
#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub phase: Phase,
    pub can_process: bool,
    pub can_download: bool,
    #[serde(flatten)]
    pub state: UiState,
}

impl From<UiState> for StateResponse {
    fn from(state: UiState) -> Self {
        Self {
            phase: state.phase(),
            can_process: state.can_process(),
            can_download: state.can_download(),
            state,
        }
    }
}

pub async fn handle_state(State(session): State<SessionHandle>) -> Json<StateResponse> {
    Json(session.snapshot().into())
}
