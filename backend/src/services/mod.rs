//! Business logic services for the EekoAI platform

pub mod chat;
pub mod detection;
pub mod insights;

pub use chat::ChatService;
pub use detection::DetectionService;
pub use insights::{AgronomicSummary, InsightService};
