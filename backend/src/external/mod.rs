//! External API integrations

pub mod groq;
pub mod nasa_power;

pub use groq::GroqClient;
pub use nasa_power::NasaPowerClient;
