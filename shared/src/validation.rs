//! Validation utilities for the EekoAI platform
//!
//! These checks run at the request boundary, before input reaches the
//! insight engine or an external provider.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rust_decimal::Decimal;

use crate::models::{ChatMessage, ChatRole, MessageContent};
use crate::types::DateRange;

/// Longest window fetched in one request, counting both ends; a leap-year
/// `DateRangePreset::Year` window spans 367 days
pub const MAX_RANGE_DAYS: i64 = 367;

// ============================================================================
// Location and time window
// ============================================================================

/// Validate latitude/longitude are on the globe
pub fn validate_coordinates(latitude: Decimal, longitude: Decimal) -> Result<(), &'static str> {
    if latitude < Decimal::from(-90) || latitude > Decimal::from(90) {
        return Err("Latitude must be between -90 and 90");
    }
    if longitude < Decimal::from(-180) || longitude > Decimal::from(180) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

/// Validate a query window is ordered and not longer than a year
pub fn validate_date_range(range: &DateRange) -> Result<(), &'static str> {
    if range.start > range.end {
        return Err("Start date must not be after end date");
    }
    if range.span_days() > MAX_RANGE_DAYS {
        return Err("Date range cannot exceed one year");
    }
    Ok(())
}

// ============================================================================
// Images and chat
// ============================================================================

/// Split a `data:image/...;base64,` URL into its payload
///
/// Bare payloads are returned unchanged.
pub fn strip_data_url_prefix(image: &str) -> &str {
    if let Some(rest) = image.strip_prefix("data:image/") {
        if let Some(idx) = rest.find(";base64,") {
            return &rest[idx + ";base64,".len()..];
        }
    }
    image
}

/// Validate an image is a base64 data URL or bare base64 payload
pub fn validate_image_data_url(image: &str) -> Result<(), &'static str> {
    let trimmed = image.trim();
    if trimmed.is_empty() {
        return Err("No image provided.");
    }
    if trimmed.starts_with("data:") && !trimmed.starts_with("data:image/") {
        return Err("Only image data URLs are supported");
    }

    let payload = strip_data_url_prefix(trimmed);
    if payload.is_empty() {
        return Err("No image provided.");
    }
    if !payload
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '='))
    {
        return Err("Image payload is not base64 encoded");
    }
    Ok(())
}

/// Check an image decodes and re-wrap it as the JPEG data URL sent to the model
pub fn normalize_image_data_url(image: &str) -> Result<String, &'static str> {
    validate_image_data_url(image)?;

    let payload = strip_data_url_prefix(image.trim());
    STANDARD
        .decode(payload)
        .map_err(|_| "Image payload is not valid base64")?;

    Ok(format!("data:image/jpeg;base64,{}", payload))
}

/// Validate a conversation ends with a usable user turn
///
/// The system prompt belongs to the server, and only user turns may carry images.
pub fn validate_chat_messages(messages: &[ChatMessage]) -> Result<(), &'static str> {
    let last = messages.last().ok_or("Conversation must contain at least one message")?;

    if last.role != ChatRole::User {
        return Err("Last message must come from the user");
    }

    for message in messages {
        match (message.role, &message.content) {
            (ChatRole::System, _) => return Err("System messages cannot be sent by the client"),
            (_, MessageContent::Text { text }) if text.trim().is_empty() => {
                return Err("Text messages cannot be empty");
            }
            (ChatRole::User, MessageContent::Image { image }) => {
                normalize_image_data_url(image)?;
            }
            (_, MessageContent::Image { .. }) => return Err("Only user messages can carry images"),
            _ => {}
        }
    }
    Ok(())
}
