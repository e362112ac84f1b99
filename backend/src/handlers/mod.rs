//! HTTP request handlers

mod chat;
mod detection;
mod health;
mod insights;

pub use chat::*;
pub use detection::*;
pub use health::*;
pub use insights::*;

use crate::error::{AppError, AppResult};
use crate::external::GroqClient;
use crate::AppState;

/// Inference client, or 503 when no API key is configured
fn inference_client(state: &AppState) -> AppResult<GroqClient> {
    state.inference.clone().ok_or(AppError::InferenceNotConfigured)
}
