//! Weed and insect detection handlers

use axum::{extract::State, Json};
use shared::{DetectionKind, DetectionReply, DetectionRequest};

use crate::error::AppResult;
use crate::handlers::inference_client;
use crate::services::DetectionService;
use crate::AppState;

async fn run_detection(
    state: &AppState,
    kind: DetectionKind,
    request: DetectionRequest,
) -> AppResult<Json<DetectionReply>> {
    let service = DetectionService::new(inference_client(state)?);
    let reply = service.analyze(kind, &request.image).await?;
    Ok(Json(reply))
}

/// Identify weeds in a field photo
pub async fn detect_weed(
    State(state): State<AppState>,
    Json(request): Json<DetectionRequest>,
) -> AppResult<Json<DetectionReply>> {
    run_detection(&state, DetectionKind::Weed, request).await
}

/// Assess pests and crop health in a field photo
pub async fn detect_insect(
    State(state): State<AppState>,
    Json(request): Json<DetectionRequest>,
) -> AppResult<Json<DetectionReply>> {
    run_detection(&state, DetectionKind::Insect, request).await
}
