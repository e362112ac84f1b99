//! Domain models for the EekoAI platform

mod chat;
mod detection;
mod insight;
mod weather;

pub use chat::*;
pub use detection::*;
pub use insight::*;
pub use weather::*;
