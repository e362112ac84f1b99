//! Farming chatbot service
//!
//! Forwards the conversation to the inference provider. When the user shares
//! a field location, the last ten days of weather for it are summarized by
//! the insight engine and appended to the final user turn.

use chrono::Utc;
use shared::{
    normalize_image_data_url, validate_chat_messages, ChatMessage, ChatReply, ChatRequest,
    DateRange, GpsCoordinates, MessageContent,
};

use crate::error::{AppError, AppResult};
use crate::external::groq::{CompletionMessage, ContentPart};
use crate::external::GroqClient;
use crate::services::insights::InsightService;

/// Days of weather history attached to a located question
const WEATHER_CONTEXT_DAYS: i64 = 10;

const CHAT_MAX_TOKENS: u32 = 1024;

const SYSTEM_PROMPT: &str = "You are EekoAI, an agricultural assistant for farmers. Give practical, concise advice in markdown. When weather data is provided, use it to explain how current conditions affect crops and field work.";

const IMAGE_PROMPT: &str = "Analyze this agricultural image:";

/// Chat service
#[derive(Clone)]
pub struct ChatService {
    inference: GroqClient,
    insights: InsightService,
}

impl ChatService {
    pub fn new(inference: GroqClient, insights: InsightService) -> Self {
        Self {
            inference,
            insights,
        }
    }

    /// Produce the assistant's next turn
    pub async fn respond(&self, request: ChatRequest) -> AppResult<ChatReply> {
        validate_chat_messages(&request.messages)
            .map_err(|msg| AppError::validation("messages", msg))?;

        let weather_context = match &request.location {
            Some(location) => self.weather_context(location).await,
            None => None,
        };

        let messages =
            build_completion_messages(&request.messages, weather_context.as_deref())?;
        let content = self.inference.complete(&messages, CHAT_MAX_TOKENS).await?;

        tracing::info!(
            turns = request.messages.len(),
            with_weather = weather_context.is_some(),
            "Chat reply generated"
        );

        Ok(ChatReply::assistant(content))
    }

    /// Summarize recent weather for the prompt; failures only drop the context
    async fn weather_context(&self, location: &GpsCoordinates) -> Option<String> {
        let range = DateRange::trailing_days(Utc::now().date_naive(), WEATHER_CONTEXT_DAYS);

        match self.insights.analyze_location(location.clone(), range).await {
            Ok(summary) => Some(summary.to_prompt_context()),
            Err(e) => {
                tracing::warn!("Continuing chat without weather context: {}", e);
                None
            }
        }
    }
}

fn weather_block(question: &str, context: &str) -> String {
    format!(
        "User query: {}\n\nWeather data for the location:\n{}\n\nPlease analyze the weather data provided above and use it to inform your response to the user's query. Consider how the weather conditions might affect agricultural practices or crop growth in the area.",
        question, context
    )
}

fn to_completion_message(
    message: &ChatMessage,
    weather_context: Option<&str>,
) -> AppResult<CompletionMessage> {
    let role = message.role.as_str();
    let mapped = match (&message.content, weather_context) {
        (MessageContent::Text { text }, Some(context)) => {
            CompletionMessage::text(role, weather_block(text, context))
        }
        (MessageContent::Text { text }, None) => CompletionMessage::text(role, text.clone()),
        (MessageContent::Image { image }, context) => {
            let image_url = normalize_image_data_url(image)
                .map_err(|msg| AppError::validation("messages", msg))?;
            let mut parts = vec![ContentPart::text(IMAGE_PROMPT)];
            if let Some(context) = context {
                parts.push(ContentPart::text(weather_block("(see image)", context)));
            }
            parts.push(ContentPart::image(image_url));
            CompletionMessage::parts(role, parts)
        }
    };
    Ok(mapped)
}

/// Map the conversation to provider messages
///
/// The weather context, if any, is attached to the last message only.
fn build_completion_messages(
    messages: &[ChatMessage],
    weather_context: Option<&str>,
) -> AppResult<Vec<CompletionMessage>> {
    let last = messages.len().saturating_sub(1);

    std::iter::once(Ok(CompletionMessage::text("system", SYSTEM_PROMPT)))
        .chain(messages.iter().enumerate().map(|(i, message)| {
            let context = if i == last { weather_context } else { None };
            to_completion_message(message, context)
        }))
        .collect()
}
