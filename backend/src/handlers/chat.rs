//! Chatbot handler

use axum::{extract::State, Json};
use shared::{ChatReply, ChatRequest};

use crate::error::AppResult;
use crate::handlers::inference_client;
use crate::services::{ChatService, InsightService};
use crate::AppState;

/// Continue a conversation with the farming assistant
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> AppResult<Json<ChatReply>> {
    let service = ChatService::new(
        inference_client(&state)?,
        InsightService::new(state.weather.clone()),
    );
    let reply = service.respond(request).await?;
    Ok(Json(reply))
}
