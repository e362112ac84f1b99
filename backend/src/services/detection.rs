//! Weed and insect analysis of field photos

use shared::{normalize_image_data_url, ChatRole, DetectionKind, DetectionReply};

use crate::error::{AppError, AppResult};
use crate::external::groq::{CompletionMessage, ContentPart};
use crate::external::GroqClient;

const DETECTION_MAX_TOKENS: u32 = 8192;

const WEED_PROMPT: &str = "You are an expert in weed detection for agricultural fields. Analyze the following image and provide a concise response: just tell which weeds are detected and if no weed is detected reply with no weed detected , your response SHOULD be in 3 lines and your reply should be based on the squares shown on the image , if there are no squares then no weed is detected";

const INSECT_PROMPT: &str = "You are an expert agricultural analyst. The following image shows an agricultural scene. Analyze this image in detail and provide concise insights. Focus on:";

const INSECT_FOCUS: &str = "1) Crop types visible\n2) Plant growth stages\n3) Signs of pest damage or disease\n4) Overall crop health\n5) Soil condition (if visible)\n6) Irrigation systems or farming equipment\n7) Estimated field size and crop density\n8) Recommendations for improving yield or health\n\nRemember to use agricultural terms and keep your analysis concise.";

/// Detection service
#[derive(Clone)]
pub struct DetectionService {
    inference: GroqClient,
}

impl DetectionService {
    pub fn new(inference: GroqClient) -> Self {
        Self { inference }
    }

    /// Analyze a photo with the requested detector
    pub async fn analyze(&self, kind: DetectionKind, image: &str) -> AppResult<DetectionReply> {
        let image_url = normalize_image(image)?;
        let messages = vec![CompletionMessage::parts("user", prompt_parts(kind, image_url))];

        let content = self
            .inference
            .complete(&messages, DETECTION_MAX_TOKENS)
            .await?;

        tracing::info!(%kind, chars = content.len(), "Image analysis complete");

        Ok(DetectionReply {
            role: ChatRole::Assistant,
            content,
        })
    }
}

fn normalize_image(image: &str) -> AppResult<String> {
    normalize_image_data_url(image).map_err(|msg| AppError::validation("image", msg))
}

fn prompt_parts(kind: DetectionKind, image_url: String) -> Vec<ContentPart> {
    match kind {
        DetectionKind::Weed => vec![ContentPart::text(WEED_PROMPT), ContentPart::image(image_url)],
        DetectionKind::Insect => vec![
            ContentPart::text(INSECT_PROMPT),
            ContentPart::text(INSECT_FOCUS),
            ContentPart::image(image_url),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_rewraps_as_jpeg() {
        assert_eq!(
            normalize_image("data:image/png;base64,QUJD").unwrap(),
            "data:image/jpeg;base64,QUJD"
        );
        assert_eq!(normalize_image("QUJD").unwrap(), "data:image/jpeg;base64,QUJD");
    }

    #[test]
    fn test_normalize_rejects_missing_image() {
        match normalize_image("") {
            Err(AppError::Validation { field, message }) => {
                assert_eq!(field, "image");
                assert_eq!(message, "No image provided.");
            }
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_normalize_rejects_bad_padding() {
        assert!(normalize_image("data:image/png;base64,QUJ").is_err());
    }

    #[test]
    fn test_weed_prompt_parts() {
        let parts = prompt_parts(DetectionKind::Weed, "data:image/jpeg;base64,QUJD".to_string());
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[1], ContentPart::image("data:image/jpeg;base64,QUJD"));
    }

    #[test]
    fn test_insect_prompt_parts() {
        let parts = prompt_parts(DetectionKind::Insect, "data:image/jpeg;base64,QUJD".to_string());
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], ContentPart::text(INSECT_PROMPT));
        assert_eq!(parts[2], ContentPart::image("data:image/jpeg;base64,QUJD"));
    }
}
